//! IdentifierStore trait definition.

use async_trait::async_trait;
use uuidbench_domain::EncodedIdentifier;

use crate::error::{StorageError, StorageResult};

/// Default name of the benchmark table.
pub const DEFAULT_TABLE_NAME: &str = "uuid_records";

/// A single-table store of encoded identifiers behind one exclusive connection.
///
/// Methods take `&mut self`: a run owns exactly one connection and drives it
/// from a single writer, so no interior locking is involved.
#[async_trait]
pub trait IdentifierStore: Send {
    /// Drops the table if present and creates it empty.
    ///
    /// Fails with `StorageError::SchemaError`.
    async fn reset_table(&mut self) -> StorageResult<()>;

    /// Writes one unit of rows as a single statement.
    ///
    /// A unit either commits entirely or not at all. A duplicate key fails with
    /// `StorageError::DuplicateIdentifier`; other failures with `QueryError`.
    async fn insert_unit(&mut self, rows: &[EncodedIdentifier]) -> StorageResult<()>;

    /// Returns the number of rows in the table.
    ///
    /// Fails with `StorageError::ReadError`.
    async fn count_rows(&mut self) -> StorageResult<u64>;
}

/// Validates a table name for interpolation into DDL and DML.
///
/// SQL identifiers cannot be bound as parameters, so only
/// `[A-Za-z0-9_]` is accepted.
pub fn validate_table_name(name: &str) -> StorageResult<()> {
    if name.is_empty() {
        return Err(StorageError::InvalidInput {
            message: "table name cannot be empty".to_string(),
        });
    }
    if name.len() > 64 {
        return Err(StorageError::InvalidInput {
            message: format!("table name exceeds 64 characters: {}", name),
        });
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StorageError::InvalidInput {
            message: format!("invalid table name: {}", name),
        });
    }
    Ok(())
}
