//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::Application(ApplicationError::Domain(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OutputExists(_) => crate::exitcode::CANTCREAT,
                ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                ApplicationError::Domain(d) => match d {
                    DomainError::InvalidHyperParameter { .. }
                    | DomainError::InvalidLengthRange { .. }
                    | DomainError::EmptyCatalog(_) => crate::exitcode::CONFIG,
                    DomainError::IdentifierExhausted { .. }
                    | DomainError::RemovalExhausted { .. } => crate::exitcode::DATAERR,
                    DomainError::NodeNotFound(_) | DomainError::InvalidParent(_) => {
                        crate::exitcode::SOFTWARE
                    }
                },
            },
        }
    }
}
