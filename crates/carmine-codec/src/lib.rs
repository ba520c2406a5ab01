//! Value codec for carmine.
//!
//! The store speaks strings only; the model layer speaks typed values. This
//! crate converts between the two, schema-driven and losslessly for every
//! declared type.
//!
//! # Encoding rules (in precedence order)
//!
//! 1. `Null` encodes as the empty string; an empty string decodes back to
//!    `Null` regardless of declared type.
//! 2. `String`/`Text` fields pass through verbatim.
//! 3. `Number` fields use the value's natural decimal form — `0.0` encodes
//!    as `"0"`, never empty.
//! 4. `Boolean` fields encode as `"true"`/`"false"`; decode also accepts
//!    `"1"` as true.
//! 5. `Date` fields encode as RFC 3339 with millisecond precision in UTC;
//!    instants are truncated to the millisecond on the wire.
//! 6. Everything else (`Complex` fields and fields without a schema entry)
//!    is serialized structurally as JSON. On decode, a structural value that
//!    fails to parse falls back to the raw string unchanged: malformed or
//!    legacy data never fails a read.

pub mod codec;
pub mod error;

pub use codec::{decode, encode};
pub use error::{CodecError, CodecResult};
