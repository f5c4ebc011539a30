//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::catalog::CatalogKind;

/// Domain errors represent generation failures.
/// These are independent of configuration loading and I/O concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("invalid hyperparameter {name}: {reason}")]
    InvalidHyperParameter { name: &'static str, reason: String },

    #[error("invalid identifier length range: min={min}, max={max}")]
    InvalidLengthRange { min: usize, max: usize },

    #[error("empty {0} component catalog")]
    EmptyCatalog(CatalogKind),

    #[error("identifier space exhausted after {attempts} attempts (length {min}..={max})")]
    IdentifierExhausted {
        attempts: usize,
        min: usize,
        max: usize,
    },

    #[error("no node selected for removal after {attempts} traversals")]
    RemovalExhausted { attempts: usize },

    #[error("node not found in tree: {0}")]
    NodeNotFound(String),

    #[error("node cannot hold children: {0}")]
    InvalidParent(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
