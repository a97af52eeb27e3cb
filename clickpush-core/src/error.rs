//! Error types for the batching pipeline.

use thiserror::Error;

/// Errors raised while turning records into statement batches.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// A record does not have the shape the value formatter expects.
    #[error("malformed record {row}: field {field} {reason}")]
    MalformedRow {
        /// Zero-based index of the record in the input sequence.
        row: usize,
        /// Zero-based index of the offending field.
        field: usize,
        /// What was wrong with the field.
        reason: String,
    },
}

impl BatchError {
    /// Create a malformed-row error.
    pub fn malformed(row: usize, field: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            row,
            field,
            reason: reason.into(),
        }
    }

    /// The input row the error points at.
    pub fn row(&self) -> usize {
        match self {
            Self::MalformedRow { row, .. } => *row,
        }
    }

    /// The field within that row.
    pub fn field(&self) -> usize {
        match self {
            Self::MalformedRow { field, .. } => *field,
        }
    }
}

/// Errors surfaced by a statement executor for a single unit.
///
/// Drivers map their own error types into this classification; the pipeline
/// records every variant as a per-unit failure and keeps draining.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecuteError {
    /// The connection to the backing store failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// The statement itself was rejected.
    #[error("statement failed: {0}")]
    Statement(String),
}

impl ExecuteError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a statement error.
    pub fn statement(message: impl Into<String>) -> Self {
        Self::Statement(message.into())
    }

    /// Check if this is a connection error.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_malformed_row_display() {
        let err = BatchError::malformed(3, 0, "is shorter than 19 characters");
        assert_eq!(
            err.to_string(),
            "malformed record 3: field 0 is shorter than 19 characters"
        );
        assert_eq!(err.row(), 3);
        assert_eq!(err.field(), 0);
    }

    #[test]
    fn test_execute_error_classification() {
        assert!(ExecuteError::connection("refused").is_connection_error());
        assert!(!ExecuteError::statement("syntax error").is_connection_error());
    }
}
