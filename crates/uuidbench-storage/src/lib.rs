//! uuidbench-storage: Batched identifier writes
//!
//! This crate provides the write path of the benchmark:
//! - IdentifierStore trait over a single exclusively-owned connection
//! - MySQL implementation (sqlx) and an in-memory implementation for tests
//! - BatchWriter, which flushes encoded identifiers in fixed-size units
//! - ConnectionWaiter, the readiness polling loop run before writing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              uuidbench-storage               │
//! ├─────────────────────────────────────────────┤
//! │  traits.rs    - IdentifierStore trait       │
//! │  writer.rs    - Batch-sized flushing        │
//! │  readiness.rs - Connection readiness loop   │
//! │  memory.rs    - In-memory implementation    │
//! │  mysql.rs     - MySQL implementation        │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod memory;
pub mod mysql;
pub mod readiness;
pub mod traits;
pub mod writer;

mod writer_proptest;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::MemoryIdentifierStore;
pub use mysql::{MySqlConfig, MySqlIdentifierStore};
pub use readiness::{ConnectionWaiter, WaitPolicy};
pub use traits::IdentifierStore;
pub use writer::{BatchWriter, InsertSummary, DEFAULT_BATCH_SIZE};
