//! Error types for codec operations.

use thiserror::Error;

/// Errors from decoding stored data back into typed values.
///
/// Encoding is infallible; only reads of data that contradicts the declared
/// schema can fail. Structural (`Complex`) fields never error — they fall
/// back to the raw string instead.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A field declared `Number` holds a non-numeric string.
    #[error("field {field:?} is not a number: {value:?}")]
    InvalidNumber { field: String, value: String },

    /// A field declared `Date` holds a string that is not a valid RFC 3339
    /// timestamp.
    #[error("field {field:?} is not a date: {value:?}")]
    InvalidDate { field: String, value: String },
}

/// Convenience type alias for codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;
