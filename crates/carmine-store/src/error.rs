//! Error types for store operations.

use thiserror::Error;

/// Errors from the underlying store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure. Bubbled up unchanged to callers; the
    /// message carries whatever the client library reported.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A command addressed a key holding a different kind of value
    /// (e.g. an increment against a record hash).
    #[error("wrong value kind at {key:?}: expected {expected}")]
    WrongKind { key: String, expected: &'static str },
}

/// Convenience type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
