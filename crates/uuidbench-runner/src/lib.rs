//! uuidbench-runner: Benchmark orchestration
//!
//! This crate wires the write path into a runnable benchmark:
//! - Configuration management (defaults, YAML file, environment)
//! - Structured logging setup
//! - BenchmarkRunner: readiness → reset → generate → timed insert → verify
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              uuidbench-runner                │
//! ├─────────────────────────────────────────────┤
//! │  config.rs  - Configuration management      │
//! │  logging.rs - tracing-subscriber setup      │
//! │  runner.rs  - Run orchestration and report  │
//! │  main.rs    - `uuidbench` binary            │
//! └─────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod logging;
pub mod runner;

// Re-exports for convenience
pub use config::{BenchConfig, ConfigLoadError};
pub use runner::{BenchmarkRunner, RunError, RunOutcome, RunReport};
