//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Synthetic form-tree generator: random form hierarchies, single-node removal, text and prose renderings
#[derive(Parser, Debug)]
#[command(name = "formgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write training records as JSON lines
    Generate {
        /// Number of records (default: config `count`)
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,
        /// One pretty-printed JSON array instead of JSON lines
        #[arg(long)]
        pretty: bool,
    },

    /// Print one record in readable form
    Sample {
        /// Seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Print the outline of one generated tree
    Tree {
        /// Seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config paths
    Path,
}
