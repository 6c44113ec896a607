//! Batch-sized flushing of encoded identifiers.
//!
//! Batch size is the axis the benchmark varies, so it is a constructor
//! argument rather than a constant.

use tracing::{debug, info, instrument};
use uuidbench_domain::{EncodedIdentifier, Identifier};

use crate::error::{StorageError, StorageResult};
use crate::traits::IdentifierStore;

/// Rows per write unit when none is configured.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Outcome of a fully successful `insert_all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertSummary {
    /// Rows written.
    pub rows: u64,
    /// Write units submitted.
    pub units: u64,
}

/// Writes identifiers to an [`IdentifierStore`] in fixed-size units.
///
/// The writer owns the store, and with it the run's only connection, until
/// `into_inner` hands it back.
///
/// # Partial failure
///
/// Units are not wrapped in a surrounding transaction. If unit `k` fails,
/// units `1..k` remain committed and the returned `StorageError::WriteError`
/// names `k`. Failed units are not retried.
#[derive(Debug)]
pub struct BatchWriter<S> {
    store: S,
    batch_size: usize,
}

impl<S: IdentifierStore> BatchWriter<S> {
    /// Creates a writer flushing every `batch_size` rows.
    ///
    /// `batch_size` must be at least 1.
    pub fn new(store: S, batch_size: usize) -> StorageResult<Self> {
        if batch_size == 0 {
            return Err(StorageError::InvalidInput {
                message: "batch size must be at least 1".to_string(),
            });
        }
        Ok(Self { store, batch_size })
    }

    /// Creates a writer using [`DEFAULT_BATCH_SIZE`].
    pub fn with_default_batch_size(store: S) -> Self {
        Self {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Releases the store so the caller can close it.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Drops and recreates the target table.
    pub async fn reset_schema(&mut self) -> StorageResult<()> {
        info!("Resetting benchmark table");
        self.store.reset_table().await?;
        info!("Benchmark table created");
        Ok(())
    }

    /// Encodes and writes every identifier, in order.
    ///
    /// Submits exactly `ceil(n / batch_size)` units: every full batch as soon
    /// as it fills, then any non-empty remainder. An empty input submits
    /// nothing.
    #[instrument(skip(self, identifiers), fields(batch_size = self.batch_size))]
    pub async fn insert_all<I>(&mut self, identifiers: I) -> StorageResult<InsertSummary>
    where
        I: IntoIterator<Item = Identifier>,
    {
        let mut batch: Vec<EncodedIdentifier> = Vec::with_capacity(self.batch_size);
        let mut summary = InsertSummary::default();

        for identifier in identifiers {
            batch.push(identifier.encode());
            if batch.len() == self.batch_size {
                self.flush(&mut batch, &mut summary).await?;
            }
        }

        if !batch.is_empty() {
            self.flush(&mut batch, &mut summary).await?;
        }

        info!(
            rows = summary.rows,
            units = summary.units,
            "Identifiers inserted"
        );
        Ok(summary)
    }

    async fn flush(
        &mut self,
        batch: &mut Vec<EncodedIdentifier>,
        summary: &mut InsertSummary,
    ) -> StorageResult<()> {
        let unit_index = summary.units + 1;
        let unit_rows = batch.len() as u64;

        if let Err(source) = self.store.insert_unit(&batch[..]).await {
            return Err(StorageError::WriteError {
                unit_index,
                rows_attempted: summary.rows + unit_rows,
                rows_committed: summary.rows,
                source: Box::new(source),
            });
        }

        summary.units = unit_index;
        summary.rows += unit_rows;
        batch.clear();

        debug!(
            unit = unit_index,
            rows = unit_rows,
            total = summary.rows,
            "Write unit committed"
        );
        Ok(())
    }

    /// Returns the table's current row count.
    pub async fn count_rows(&mut self) -> StorageResult<u64> {
        let count = self.store.count_rows().await?;
        info!(count, "Counted rows in benchmark table");
        Ok(count)
    }
}
