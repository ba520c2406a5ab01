//! Error types for model and key validation.

use thiserror::Error;

/// Errors from constructing or validating carmine types.
#[derive(Debug, Error)]
pub enum TypeError {
    /// The model name cannot be used in the key-space layout.
    #[error("invalid model name {name:?}: {reason}")]
    InvalidModelName { name: String, reason: String },

    /// The record id cannot be used in the key-space layout.
    #[error("invalid record id {id:?}: {reason}")]
    InvalidId { id: String, reason: String },
}

/// Convenience type alias for type-level validation.
pub type Result<T> = std::result::Result<T, TypeError>;
