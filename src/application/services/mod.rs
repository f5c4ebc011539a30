//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod dataset;

pub use dataset::{write_records, DatasetService, FormPromptRecord};
