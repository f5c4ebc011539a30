//! Application layer: services and use cases
//!
//! This layer drives generator sessions and packages their output as records.

pub mod error;
pub mod error_ext;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::{IoResultExt, JsonResultExt};
