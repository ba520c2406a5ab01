//! Store capability surface for carmine.
//!
//! The accessor and lock manager never talk to a concrete client library;
//! they consume the abstract command set defined by [`StoreCommands`]. A
//! connector supplies an implementation bound to a real store connection;
//! [`InMemoryStore`] is the reference backend used by tests and embedding.
//!
//! # Capability Set
//!
//! The commands mirror what a hash-map key-value store offers natively:
//! existence checks, full-hash reads and overwrites, unconditional deletes,
//! trailing-glob key scans, atomic set-if-absent-with-expiry and
//! owner-checked delete (the lease primitives), an integer counter, and an
//! atomic scan-then-delete batch. There is no secondary indexing and no
//! cross-key transaction beyond the single batched scan-delete.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use traits::StoreCommands;
