//! Command dispatch: load settings, run the service, print the result

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{write_records, DatasetService};
use crate::application::{ApplicationError, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Generate {
            count,
            seed,
            output,
            force,
            pretty,
        }) => {
            if *count == Some(0) {
                return Err(CliError::InvalidArgs("--count must be at least 1".to_string()));
            }
            let mut settings = load_settings(cli, *seed)?;
            if let Some(count) = count {
                settings.count = *count;
            }
            cmd_generate(&settings, output.as_deref(), *force, *pretty)
        }
        Some(Commands::Sample { seed }) => cmd_sample(&load_settings(cli, *seed)?),
        Some(Commands::Tree { seed }) => cmd_tree(&load_settings(cli, *seed)?),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => {
                output::info(&load_settings(cli, None)?.to_toml()?);
                Ok(())
            }
            ConfigCommands::Template => {
                output::info(&Settings::template());
                Ok(())
            }
            ConfigCommands::Path => {
                let global = global_config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unavailable>".to_string());
                output::action("global", &global);
                Ok(())
            }
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `formgen --help`".to_string(),
        )),
    }
}

/// Load layered settings; a command-line seed wins over every layer.
fn load_settings(cli: &Cli, seed: Option<u64>) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if seed.is_some() {
        settings.seed = seed;
    }
    settings.validate()?;
    debug!("load_settings: seed={:?} count={}", settings.seed, settings.count);
    Ok(settings)
}

#[instrument(level = "debug", skip(settings))]
fn cmd_generate(
    settings: &Settings,
    destination: Option<&Path>,
    force: bool,
    pretty: bool,
) -> CliResult<()> {
    let mut service = DatasetService::from_settings(settings)?;
    let records = service.generate_batch(settings.count)?;

    match destination {
        Some(path) => {
            if path.exists() && !force {
                return Err(ApplicationError::OutputExists(path.to_path_buf()).into());
            }
            let file = File::create(path).with_path_context("create output", path)?;
            write_records(&records, BufWriter::new(file), pretty)?;
            output::success(&format!("{} records written to {}", records.len(), path.display()));
        }
        None => write_records(&records, io::stdout().lock(), pretty)?,
    }
    Ok(())
}

fn cmd_sample(settings: &Settings) -> CliResult<()> {
    let mut service = DatasetService::from_settings(settings)?;
    let record = service.generate_record()?;

    output::header("// form");
    output::info(&record.serialized_form);
    output::header("// modified form");
    output::info(&record.serialized_modified_form);
    output::header("// removed node");
    output::info(&record.removed_node);
    output::header("// removed node (English)");
    output::info(&record.removed_node_english);
    output::header("// removal context (English)");
    output::info(&record.removed_node_context_english);
    Ok(())
}

fn cmd_tree(settings: &Settings) -> CliResult<()> {
    let mut service = DatasetService::from_settings(settings)?;
    let tree = service.generate_tree()?;
    output::info(&tree.to_tree_string());
    Ok(())
}
