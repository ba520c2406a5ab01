//! Error types for connector operations.

use thiserror::Error;

/// Errors from the connector surface.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// No schema has been defined for this model name.
    #[error("unknown model: {model:?}")]
    UnknownModel { model: String },

    /// An accessor operation failed; see [`carmine_accessor::AccessError`].
    #[error(transparent)]
    Access(#[from] carmine_accessor::AccessError),

    /// A direct lock request failed; see [`carmine_lock::LockError`].
    #[error(transparent)]
    Lock(#[from] carmine_lock::LockError),
}

/// Convenience type alias for connector operations.
pub type ConnectorResult<T> = std::result::Result<T, ConnectorError>;
