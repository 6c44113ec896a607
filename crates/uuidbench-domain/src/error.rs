//! Domain error types for identifier handling.

use thiserror::Error;

/// Domain-specific errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A stored identifier did not have the canonical encoded length.
    #[error("invalid identifier length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
