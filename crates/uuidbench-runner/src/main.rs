//! uuidbench binary
//!
//! Measures how fast a MySQL server absorbs batched inserts of 16-byte
//! random identifiers.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! uuidbench --config bench.yaml
//!
//! # With environment variables only
//! UUIDBENCH_DATABASE__HOST=127.0.0.1 uuidbench --records 1000000 --batch-size 5000
//! ```

use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use uuidbench_runner::logging::{init_logging, LoggingConfig};
use uuidbench_runner::{BenchConfig, BenchmarkRunner};
use uuidbench_storage::MySqlIdentifierStore;

/// uuidbench - MySQL batched insert throughput benchmark
#[derive(Parser, Debug)]
#[command(name = "uuidbench")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,

    /// Number of identifiers to insert (overrides benchmark.total_records)
    #[arg(long)]
    records: Option<usize>,

    /// Rows per write unit (overrides benchmark.batch_size)
    #[arg(long)]
    batch_size: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = if let Some(config_path) = &args.config {
        BenchConfig::load(config_path)?
    } else {
        BenchConfig::from_env()?
    };
    if let Some(records) = args.records {
        config.benchmark.total_records = records;
    }
    if let Some(batch_size) = args.batch_size {
        config.benchmark.batch_size = batch_size;
    }
    config.validate()?;

    init_logging(LoggingConfig::from_settings(&config.logging));

    info!(version = env!("CARGO_PKG_VERSION"), "Starting uuidbench");

    let mysql_config = config.mysql_config();
    let runner = BenchmarkRunner::from_config(&config);

    let outcome = runner
        .run(
            || MySqlIdentifierStore::connect(&mysql_config),
            shutdown_signal(),
        )
        .await
        .inspect_err(|e| error!(error = %e, "Benchmark failed"))?;

    outcome.store.close().await?;

    let report = &outcome.report;
    match report.records_per_second() {
        Some(rate) => println!(
            "Inserted {} records in {} units in {:.3}s ({:.0} records/second)",
            report.records,
            report.units,
            report.elapsed.as_secs_f64(),
            rate
        ),
        None => println!(
            "Inserted {} records in {} units",
            report.records, report.units
        ),
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, aborting connection wait");
        }
        _ = terminate => {
            info!("Received SIGTERM, aborting connection wait");
        }
    }
}
