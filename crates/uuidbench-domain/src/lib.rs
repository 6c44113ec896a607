//! uuidbench-domain: Identifier model for the write benchmark
//!
//! This crate contains everything about the values being written, and
//! nothing about where they are written:
//! - 128-bit identifier type
//! - Canonical 16-byte big-endian encoding (IdentifierEncoder)
//! - Random identifier generation (IdentifierGenerator)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              uuidbench-domain                │
//! ├─────────────────────────────────────────────┤
//! │  identifier.rs - Identifier + encode/decode │
//! │  generator.rs  - Random identifier source   │
//! │  error.rs      - Domain errors              │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod generator;
pub mod identifier;

mod identifier_proptest;

// Re-export commonly used types at the crate root
pub use error::{DomainError, DomainResult};
pub use generator::IdentifierGenerator;
pub use identifier::{decode, encode, EncodedIdentifier, Identifier, ENCODED_LEN};
