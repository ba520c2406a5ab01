//! Error types for lock operations.

use thiserror::Error;

/// Errors from lease acquisition.
///
/// Release has no error surface: ownership mismatches are logged and
/// swallowed, since the caller's critical section already completed and the
/// TTL reclaims the key either way.
#[derive(Debug, Error)]
pub enum LockError {
    /// The resource is already held. Acquisition does not retry; callers
    /// that need to wait re-issue the request.
    #[error("lock contended: {resource}")]
    Contended { resource: String },

    /// The store failed while attempting the acquisition.
    #[error(transparent)]
    Store(#[from] carmine_store::StoreError),
}

/// Convenience type alias for lock operations.
pub type LockResult<T> = std::result::Result<T, LockError>;
