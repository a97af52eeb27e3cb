//! CLI error types and result alias.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(clickpush::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(clickpush::config))]
    Config(String),

    /// Input source error
    #[error("Source error: {0}")]
    #[diagnostic(code(clickpush::source))]
    Source(String),

    /// Batching error
    #[error("Batch error: {0}")]
    #[diagnostic(code(clickpush::batch))]
    Batch(#[from] clickpush_core::error::BatchError),

    /// Database error
    #[error("Database error: {0}")]
    #[diagnostic(code(clickpush::database))]
    Database(#[from] clickpush_mssql::error::MssqlError),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a source error.
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Config(format!("Failed to parse TOML: {}", err))
    }
}
