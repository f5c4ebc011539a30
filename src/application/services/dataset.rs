//! Training-record generation: one tree, one removal, four renderings

use std::io::Write;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::application::{ApplicationResult, IoResultExt, JsonResultExt};
use crate::config::Settings;
use crate::domain::{
    context_bullets, to_prose, to_text, FormGenerator, FormTree, RemovalContext,
};

/// One training example: a form before and after removing a node, plus
/// English descriptions of what was removed and where it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormPromptRecord {
    pub serialized_form: String,
    pub serialized_modified_form: String,
    /// Form-language text of the removed subtree.
    pub removed_node: String,
    pub removed_node_english: String,
    pub removed_node_context: RemovalContext,
    pub removed_node_context_english: String,
}

/// Drives one generator session for a whole batch.
///
/// Identifiers stay unique across every record of the session unless
/// `reset_between_records` is set.
#[derive(Debug)]
pub struct DatasetService<R: Rng> {
    generator: FormGenerator<R>,
    reset_between_records: bool,
}

impl DatasetService<StdRng> {
    /// Build a session from loaded settings; without a seed the OS seeds it.
    pub fn from_settings(settings: &Settings) -> ApplicationResult<Self> {
        let random = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let generator = FormGenerator::new(
            random,
            settings.hyperparameters.clone(),
            settings.catalog.clone(),
        )?;
        Ok(Self::new(generator).with_reset(settings.reset_between_records))
    }
}

impl<R: Rng> DatasetService<R> {
    pub fn new(generator: FormGenerator<R>) -> Self {
        Self {
            generator,
            reset_between_records: false,
        }
    }

    pub fn with_reset(mut self, reset_between_records: bool) -> Self {
        self.reset_between_records = reset_between_records;
        self
    }

    pub fn generator(&self) -> &FormGenerator<R> {
        &self.generator
    }

    /// Generate a tree without removing anything.
    pub fn generate_tree(&mut self) -> ApplicationResult<FormTree> {
        Ok(self.generator.generate_form()?)
    }

    /// Generate, render, remove one node, render again and describe the removal.
    #[instrument(level = "debug", skip(self))]
    pub fn generate_record(&mut self) -> ApplicationResult<FormPromptRecord> {
        let mut tree = self.generator.generate_form()?;
        let serialized_form = to_text(&tree);

        let removal = self.generator.remove_random_node(&mut tree)?;
        let serialized_modified_form = to_text(&tree);

        debug!(
            "generate_record: removed {} of {} nodes",
            removal.removed.len(),
            removal.removed.len() + tree.len()
        );

        Ok(FormPromptRecord {
            serialized_form,
            serialized_modified_form,
            removed_node: to_text(&removal.removed),
            removed_node_english: to_prose(&removal.removed),
            removed_node_context_english: context_bullets(&removal.context),
            removed_node_context: removal.context,
        })
    }

    /// Generate `count` records in one session.
    #[instrument(level = "debug", skip(self))]
    pub fn generate_batch(&mut self, count: usize) -> ApplicationResult<Vec<FormPromptRecord>> {
        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            if self.reset_between_records {
                self.generator.clear();
            }
            records.push(self.generate_record()?);
        }
        info!("generate_batch: {} records", records.len());
        Ok(records)
    }
}

/// Write records as JSON lines, or as one pretty-printed array.
pub fn write_records<W: Write>(
    records: &[FormPromptRecord],
    mut writer: W,
    pretty: bool,
) -> ApplicationResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, records).with_context("encode records")?;
        writeln!(writer).with_context("write records")?;
    } else {
        for record in records {
            serde_json::to_writer(&mut writer, record).with_context("encode record")?;
            writeln!(writer).with_context("write record")?;
        }
    }
    writer.flush().with_context("flush records")
}
