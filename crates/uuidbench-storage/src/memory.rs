//! In-memory storage implementation for testing.
//!
//! Uses `HashSet<EncodedIdentifier>` so the primary-key check is O(1), and
//! records the size of every unit it receives so batching behaviour can be
//! asserted without a database. Failures can be injected per operation.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::instrument;
use uuidbench_domain::{EncodedIdentifier, Identifier};

use crate::error::{StorageError, StorageResult};
use crate::traits::IdentifierStore;

/// In-memory implementation of IdentifierStore.
///
/// The table does not exist until `reset_table` is called, as with a fresh
/// database.
#[derive(Debug, Default)]
pub struct MemoryIdentifierStore {
    table: Option<HashSet<EncodedIdentifier>>,
    /// Row count of every unit passed to `insert_unit`, in submission order.
    units: Vec<usize>,
    fail_unit: Option<u64>,
    fail_reset: bool,
    fail_count: bool,
}

impl MemoryIdentifierStore {
    /// Creates a new in-memory store with no table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the `unit`-th call to `insert_unit` (1-based) fail.
    pub fn fail_on_unit(mut self, unit: u64) -> Self {
        self.fail_unit = Some(unit);
        self
    }

    /// Makes `reset_table` fail as if DDL were rejected.
    pub fn fail_on_reset(mut self) -> Self {
        self.fail_reset = true;
        self
    }

    /// Makes `count_rows` fail.
    pub fn fail_on_count(mut self) -> Self {
        self.fail_count = true;
        self
    }

    /// Sizes of all units submitted so far, including a failed one.
    pub fn unit_sizes(&self) -> &[usize] {
        &self.units
    }

    /// Returns true if the identifier is stored.
    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.table
            .as_ref()
            .is_some_and(|rows| rows.contains(&identifier.encode()))
    }

    /// Returns the number of stored rows, or None if the table does not exist.
    pub fn len(&self) -> Option<usize> {
        self.table.as_ref().map(HashSet::len)
    }
}

#[async_trait]
impl IdentifierStore for MemoryIdentifierStore {
    #[instrument(skip(self))]
    async fn reset_table(&mut self) -> StorageResult<()> {
        if self.fail_reset {
            return Err(StorageError::SchemaError {
                message: "CREATE command denied (injected)".to_string(),
            });
        }
        self.table = Some(HashSet::new());
        Ok(())
    }

    async fn insert_unit(&mut self, rows: &[EncodedIdentifier]) -> StorageResult<()> {
        self.units.push(rows.len());
        let unit = self.units.len() as u64;

        let table = self.table.as_mut().ok_or_else(|| StorageError::QueryError {
            message: "table does not exist".to_string(),
        })?;

        if self.fail_unit == Some(unit) {
            return Err(StorageError::QueryError {
                message: format!("unit {} rejected (injected)", unit),
            });
        }

        // The unit commits atomically: check every key before inserting any.
        let mut seen = HashSet::with_capacity(rows.len());
        for row in rows {
            if table.contains(row) || !seen.insert(*row) {
                return Err(StorageError::DuplicateIdentifier {
                    message: format!(
                        "duplicate entry for key PRIMARY: {}",
                        uuidbench_domain::decode(row)
                    ),
                });
            }
        }
        table.extend(seen);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_rows(&mut self) -> StorageResult<u64> {
        if self.fail_count {
            return Err(StorageError::ReadError {
                message: "connection lost (injected)".to_string(),
            });
        }
        let table = self.table.as_ref().ok_or_else(|| StorageError::ReadError {
            message: "table does not exist".to_string(),
        })?;
        Ok(table.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(values: &[u128]) -> Vec<EncodedIdentifier> {
        values
            .iter()
            .map(|v| Identifier::from_u128(*v).encode())
            .collect()
    }

    #[tokio::test]
    async fn test_insert_before_reset_fails() {
        let mut store = MemoryIdentifierStore::new();
        let result = store.insert_unit(&encoded(&[1])).await;
        assert!(matches!(result, Err(StorageError::QueryError { .. })));
        assert!(matches!(
            store.count_rows().await,
            Err(StorageError::ReadError { .. })
        ));
    }

    #[tokio::test]
    async fn test_insert_and_count() {
        let mut store = MemoryIdentifierStore::new();
        store.reset_table().await.unwrap();
        store.insert_unit(&encoded(&[1, 2, 3])).await.unwrap();
        store.insert_unit(&encoded(&[4])).await.unwrap();

        assert_eq!(store.count_rows().await.unwrap(), 4);
        assert_eq!(store.unit_sizes(), &[3, 1]);
        assert!(store.contains(&Identifier::from_u128(4)));
        assert!(!store.contains(&Identifier::from_u128(5)));
    }

    #[tokio::test]
    async fn test_duplicate_rejects_whole_unit() {
        let mut store = MemoryIdentifierStore::new();
        store.reset_table().await.unwrap();
        store.insert_unit(&encoded(&[1, 2])).await.unwrap();

        let result = store.insert_unit(&encoded(&[3, 2])).await;
        assert!(matches!(
            result,
            Err(StorageError::DuplicateIdentifier { .. })
        ));
        // Row 3 must not have been written.
        assert_eq!(store.count_rows().await.unwrap(), 2);
        assert!(!store.contains(&Identifier::from_u128(3)));
    }

    #[tokio::test]
    async fn test_duplicate_within_unit_is_rejected() {
        let mut store = MemoryIdentifierStore::new();
        store.reset_table().await.unwrap();
        let result = store.insert_unit(&encoded(&[7, 7])).await;
        assert!(matches!(
            result,
            Err(StorageError::DuplicateIdentifier { .. })
        ));
        assert_eq!(store.len(), Some(0));
    }

    #[tokio::test]
    async fn test_reset_clears_rows() {
        let mut store = MemoryIdentifierStore::new();
        store.reset_table().await.unwrap();
        store.insert_unit(&encoded(&[1, 2])).await.unwrap();
        store.reset_table().await.unwrap();
        assert_eq!(store.count_rows().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let mut store = MemoryIdentifierStore::new().fail_on_reset();
        assert!(matches!(
            store.reset_table().await,
            Err(StorageError::SchemaError { .. })
        ));

        let mut store = MemoryIdentifierStore::new().fail_on_unit(2);
        store.reset_table().await.unwrap();
        store.insert_unit(&encoded(&[1])).await.unwrap();
        assert!(store.insert_unit(&encoded(&[2])).await.is_err());
        store.insert_unit(&encoded(&[3])).await.unwrap();
        assert_eq!(store.count_rows().await.unwrap(), 2);

        let mut store = MemoryIdentifierStore::new().fail_on_count();
        store.reset_table().await.unwrap();
        assert!(matches!(
            store.count_rows().await,
            Err(StorageError::ReadError { .. })
        ));
    }
}
