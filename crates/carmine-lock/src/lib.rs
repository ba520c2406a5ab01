//! Lease-based distributed locking for carmine.
//!
//! A lease is an advisory mutual-exclusion token over a resource key,
//! acquired with a single atomic set-if-absent-with-expiry attempt. There is
//! no retry loop: contention fails fast and the caller decides whether to
//! re-issue. Release verifies token ownership, so a lease that expired and
//! was reacquired elsewhere can never be stolen back; a failed release is
//! logged and swallowed because the TTL makes the resource self-healing.

pub mod error;
pub mod manager;

pub use error::{LockError, LockResult};
pub use manager::{Lease, LockManager, DEFAULT_TTL};
