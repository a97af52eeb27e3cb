//! Error types for SQL Server operations.

use clickpush_core::error::ExecuteError;
use thiserror::Error;

/// Result type for MSSQL operations.
pub type MssqlResult<T> = Result<T, MssqlError>;

/// Errors that can occur while talking to SQL Server.
#[derive(Error, Debug)]
pub enum MssqlError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Tiberius/SQL Server error.
    #[error("sql server error: {0}")]
    SqlServer(#[from] tiberius::error::Error),

    /// The report sink rejected a write.
    #[error("report sink error: {0}")]
    Report(#[from] std::io::Error),

    /// A result-set cell could not be converted for rendering.
    #[error("type conversion error: {0}")]
    TypeConversion(String),

    /// Connecting took longer than the configured timeout.
    #[error("connect timed out after {0:?}")]
    ConnectTimeout(std::time::Duration),
}

impl MssqlError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a type conversion error.
    pub fn type_conversion(message: impl Into<String>) -> Self {
        Self::TypeConversion(message.into())
    }

    /// Check if this is a connection-level error.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::ConnectTimeout(_))
    }
}

impl From<MssqlError> for ExecuteError {
    fn from(err: MssqlError) -> Self {
        if err.is_connection_error() {
            ExecuteError::connection(err.to_string())
        } else {
            ExecuteError::statement(err.to_string())
        }
    }
}
