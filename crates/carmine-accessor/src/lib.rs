//! Key-value accessor for carmine.
//!
//! The accessor implements the object-persistence contract (create, save,
//! find, destroy, bulk-query) over a store that offers nothing but hashes
//! at keys: no secondary indexes, no multi-key transactions. Three rules
//! shape every operation:
//!
//! - **Create-time uniqueness** is enforced with a per-id lease: a create
//!   checks existence, takes the lease, re-checks under it, then writes.
//!   Lease contention is reported as [`AccessError::Conflict`], the same as
//!   a duplicate — a concurrent creator is presumed to be in progress.
//! - **Updates never lock.** `put` is an unconditional full-hash overwrite;
//!   last writer wins.
//! - **Bulk reads and deletes are best-effort.** A member that fails
//!   mid-batch is skipped and logged, never fatal to the batch.
//!
//! Query predicates are understood only when they restrict to an id set
//! (direct equality or `inq` membership); every other shape resolves to an
//! empty result rather than an error.

pub mod accessor;
pub mod error;
pub mod query;

pub use accessor::Accessor;
pub use error::{AccessError, AccessResult};
pub use query::IdQuery;
