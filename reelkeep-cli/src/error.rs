use std::path::PathBuf;

use reelkeep_db::{QueryError, SchemaError};
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The library database could not be opened or migrated
    #[error("Failed to open library database {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    /// Query or mutation against the library failed
    #[error("Database error: {0}")]
    Query(#[from] QueryError),

    /// Bad argument or filter input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn open(path: impl Into<PathBuf>, source: SchemaError) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
