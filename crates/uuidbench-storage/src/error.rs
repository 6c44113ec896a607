//! Storage error types.

use thiserror::Error;

/// Storage-specific errors.
///
/// `ConnectionTimeout`, `SchemaError`, `WriteError` and `ReadError` are the
/// failure kinds a benchmark run can end with; the rest are causes carried
/// inside them or rejected inputs.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The endpoint never accepted a connection within the attempt budget.
    #[error("database not ready after {attempts} connection attempts: {last_error}")]
    ConnectionTimeout { attempts: u32, last_error: String },

    /// The readiness wait was aborted by a shutdown signal.
    #[error("connection wait cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },

    /// A single connection attempt failed.
    #[error("database connection error: {message}")]
    ConnectionError { message: String },

    /// Dropping or creating the target table failed.
    #[error("schema error: {message}")]
    SchemaError { message: String },

    /// A write unit failed. Units before `unit_index` remain committed.
    #[error("write unit {unit_index} failed after {rows_attempted} rows attempted ({rows_committed} committed): {source}")]
    WriteError {
        /// 1-based index of the failing unit.
        unit_index: u64,
        /// Rows submitted so far, including the failing unit.
        rows_attempted: u64,
        /// Rows in the units that completed before the failure.
        rows_committed: u64,
        #[source]
        source: Box<StorageError>,
    },

    /// The primary key rejected an identifier that is already stored.
    #[error("duplicate identifier: {message}")]
    DuplicateIdentifier { message: String },

    /// Database query error.
    #[error("database query error: {message}")]
    QueryError { message: String },

    /// Counting rows failed; the run result is indeterminate.
    #[error("read error: {message}")]
    ReadError { message: String },

    /// Invalid input error.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl StorageError {
    /// Returns the 1-based failing unit index for a `WriteError`.
    pub fn failed_unit(&self) -> Option<u64> {
        match self {
            StorageError::WriteError { unit_index, .. } => Some(*unit_index),
            _ => None,
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
