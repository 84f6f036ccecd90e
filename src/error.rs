use std::fmt;

use thiserror::Error;

/// Common result type used across the crate.
pub type Result<T> = std::result::Result<T, MongoExtError>;

/// Unified error enum surfaced by all public APIs.
#[derive(Error, Debug)]
pub enum MongoExtError {
    #[error("driver error: {0}")]
    Driver(#[from] mongodb::error::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to drop {} of {attempted}: {}", .failures.len(), DropFailure::join_names(.failures))]
    Drop {
        attempted: usize,
        failures: Vec<DropFailure>,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MongoExtError {
    /// Failed drop requests, if this is an aggregate drop error.
    pub fn drop_failures(&self) -> &[DropFailure] {
        match self {
            MongoExtError::Drop { failures, .. } => failures,
            _ => &[],
        }
    }
}

/// One failed request from a concurrent bulk drop.
#[derive(Debug)]
pub struct DropFailure {
    pub name: String,
    pub error: MongoExtError,
}

impl DropFailure {
    fn join_names(failures: &[DropFailure]) -> String {
        failures
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DropFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.error)
    }
}
