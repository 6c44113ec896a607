//! Benchmark run orchestration.
//!
//! A run is strictly sequential over one connection:
//!
//! ```text
//! wait for readiness ─► reset table ─► generate ids ─► insert_all (timed) ─► count ─► verify
//! ```
//!
//! Only the readiness wait is cancellable. Once writing starts the run
//! completes or fails.

use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, instrument};
use uuidbench_domain::IdentifierGenerator;
use uuidbench_storage::{
    BatchWriter, ConnectionWaiter, IdentifierStore, StorageError, WaitPolicy,
};

use crate::config::BenchConfig;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// All writes succeeded but the table holds a different number of rows.
    #[error("row count mismatch: inserted {expected}, table holds {actual}")]
    CountMismatch { expected: u64, actual: u64 },
}

/// Measurements from a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub records: u64,
    pub batch_size: usize,
    pub units: u64,
    /// Wall time of `insert_all` only; generation and the count are excluded.
    pub elapsed: Duration,
    pub rows_counted: u64,
}

impl RunReport {
    /// Inserted rows per second, or None if no time was measured.
    pub fn records_per_second(&self) -> Option<f64> {
        if self.elapsed.is_zero() {
            None
        } else {
            Some(self.records as f64 / self.elapsed.as_secs_f64())
        }
    }
}

/// A finished run: the report plus the store, handed back for release.
#[derive(Debug)]
pub struct RunOutcome<S> {
    pub report: RunReport,
    pub store: S,
}

/// Runs the write benchmark.
#[derive(Debug, Clone)]
pub struct BenchmarkRunner {
    total_records: usize,
    batch_size: usize,
    policy: WaitPolicy,
    endpoint: String,
}

impl BenchmarkRunner {
    /// `endpoint` is used for logging only.
    pub fn new(
        total_records: usize,
        batch_size: usize,
        policy: WaitPolicy,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            total_records,
            batch_size,
            policy,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &BenchConfig) -> Self {
        Self::new(
            config.benchmark.total_records,
            config.benchmark.batch_size,
            config.wait_policy(),
            config.mysql_config().endpoint(),
        )
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Executes one run.
    ///
    /// `connect` opens the store and is retried by the readiness loop;
    /// `shutdown` cancels that loop. On error the store is dropped, which
    /// releases its connection.
    #[instrument(skip_all, fields(records = self.total_records, batch_size = self.batch_size))]
    pub async fn run<S, E, F, Fut, Sh>(
        &self,
        connect: F,
        shutdown: Sh,
    ) -> Result<RunOutcome<S>, RunError>
    where
        S: IdentifierStore,
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<S, E>>,
        Sh: Future<Output = ()>,
    {
        if self.batch_size == 0 {
            return Err(StorageError::InvalidInput {
                message: "batch size must be at least 1".to_string(),
            }
            .into());
        }

        info!(
            records = self.total_records,
            batch_size = self.batch_size,
            endpoint = %self.endpoint,
            "Starting write benchmark"
        );

        let store = ConnectionWaiter::new(self.policy)
            .wait_until_ready(&self.endpoint, connect, shutdown)
            .await?;
        let mut writer = BatchWriter::new(store, self.batch_size)?;

        writer.reset_schema().await?;

        info!(records = self.total_records, "Generating identifiers");
        let identifiers = IdentifierGenerator::new().generate(self.total_records);

        let start = Instant::now();
        let summary = writer.insert_all(identifiers).await?;
        let elapsed = start.elapsed();

        let rows_counted = writer.count_rows().await?;
        let expected = self.total_records as u64;
        if rows_counted != expected {
            return Err(RunError::CountMismatch {
                expected,
                actual: rows_counted,
            });
        }

        let report = RunReport {
            records: summary.rows,
            batch_size: self.batch_size,
            units: summary.units,
            elapsed,
            rows_counted,
        };

        info!(
            records = report.records,
            units = report.units,
            elapsed_ms = elapsed.as_millis() as u64,
            records_per_second = report.records_per_second().unwrap_or(0.0),
            "Write benchmark finished"
        );

        Ok(RunOutcome {
            report,
            store: writer.into_inner(),
        })
    }
}
