//! Error types for rowstore operations.
//!
//! This module provides the error hierarchy using `thiserror` for storage
//! access, identifier validation, and CLI commands. Engine failures are
//! never swallowed: every one surfaces as a typed variant the caller can
//! branch on.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Result type alias for rowstore operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Storage-related errors (database operations and validation).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The engine could not open or create the store.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Malformed SQL, unknown object, or any other engine failure.
    #[error("statement failed: {0}")]
    StatementFailed(String),

    /// A constraint (NOT NULL, PRIMARY KEY, FOREIGN KEY, ...) rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Table name is not in the schema registry.
    #[error("unknown table: {table}")]
    UnknownTable {
        /// The rejected table name.
        table: String,
    },

    /// Column name is not part of the table's registered layout.
    #[error("unknown column: {table}.{column}")]
    UnknownColumn {
        /// Table the column was looked up in.
        table: String,
        /// The rejected column name.
        column: String,
    },

    /// A filter-based operation was given no predicate.
    #[error("empty filter for {table}; use the select-all/delete-all forms instead")]
    EmptyFilter {
        /// Target table.
        table: String,
    },

    /// An update was given no columns to set.
    #[error("no columns to update in {table}")]
    EmptyUpdate {
        /// Target table.
        table: String,
    },

    /// Insert value count does not match the table's insert layout.
    #[error("{table} expects {expected} values, got {actual}")]
    ArityMismatch {
        /// Target table.
        table: String,
        /// Number of insertable columns.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// A row could not be decoded into a typed record.
    #[error("cannot decode {record} from row: {reason}")]
    RowDecode {
        /// Record type being decoded.
        record: &'static str,
        /// What was wrong with the row.
        reason: String,
    },
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
}

impl StorageError {
    /// Returns true for errors raised before the engine was reached.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownTable { .. }
                | Self::UnknownColumn { .. }
                | Self::EmptyFilter { .. }
                | Self::EmptyUpdate { .. }
                | Self::ArityMismatch { .. }
        )
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => Self::ConstraintViolation(err.to_string()),
            Some(ErrorCode::CannotOpen | ErrorCode::NotADatabase) => {
                Self::ConnectionFailed(err.to_string())
            }
            _ => Self::StatementFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StorageError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::UnknownColumn {
            table: "Marka".to_string(),
            column: "colour".to_string(),
        };
        assert_eq!(err.to_string(), "unknown column: Marka.colour");

        let err = StorageError::ArityMismatch {
            table: "Model".to_string(),
            expected: 4,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Model expects 4 values, got 2");
    }

    #[test]
    fn test_error_from_storage() {
        let err: Error = StorageError::EmptyFilter {
            table: "Marka".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Storage(StorageError::EmptyFilter { .. })));
    }

    #[test]
    fn test_error_from_command() {
        let err: Error = CommandError::InvalidArgument("year=abc".to_string()).into();
        assert!(err.to_string().contains("invalid argument"));
    }

    #[test]
    fn test_from_rusqlite_invalid_query() {
        let err: StorageError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, StorageError::StatementFailed(_)));
    }

    #[test]
    fn test_from_rusqlite_constraint() {
        let ffi = rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT);
        let err: StorageError =
            rusqlite::Error::SqliteFailure(ffi, Some("NOT NULL".to_string())).into();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }

    #[test]
    fn test_is_validation() {
        assert!(
            StorageError::EmptyUpdate {
                table: "Model".to_string()
            }
            .is_validation()
        );
        assert!(!StorageError::StatementFailed("boom".to_string()).is_validation());
    }
}
