//! Property-based tests for batch flushing.
