use thiserror::Error;

use buylist_reconcile::ReconcileError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Service operation failed
    #[error("{0}")]
    Reconcile(#[from] ReconcileError),

    /// Database could not be opened
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Assistant call failed
    #[error("Assistant error: {0}")]
    Assistant(String),

    /// Bad command-line input
    #[error("{0}")]
    Input(String),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    pub(crate) fn assistant(msg: impl Into<String>) -> Self {
        Self::Assistant(msg.into())
    }

    pub(crate) fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }
}
