//! Error types for accessor operations.

use thiserror::Error;

/// Errors from accessor operations.
///
/// Callers are expected to branch on `Conflict` and `NotFound` only; the
/// remaining kinds are fatal to the operation and propagate untranslated
/// beyond this tagging.
#[derive(Debug, Error)]
pub enum AccessError {
    /// A record with this id already exists, or a concurrent creator holds
    /// the create lease. The HTTP 409 analogue.
    #[error("conflict: duplicate id {id:?} for model {model:?}")]
    Conflict { model: String, id: String },

    /// No record at this id. The HTTP 404 analogue.
    #[error("not found: {model}:{id}")]
    NotFound { model: String, id: String },

    /// The id cannot be used in the key-space layout.
    #[error(transparent)]
    InvalidId(#[from] carmine_types::TypeError),

    /// Stored data contradicts the declared schema.
    #[error(transparent)]
    Codec(#[from] carmine_codec::CodecError),

    /// The store failed; bubbled up unchanged.
    #[error(transparent)]
    Store(#[from] carmine_store::StoreError),
}

/// Convenience type alias for accessor operations.
pub type AccessResult<T> = std::result::Result<T, AccessError>;
