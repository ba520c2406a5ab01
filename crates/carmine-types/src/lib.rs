//! Foundation types for carmine.
//!
//! This crate provides the value, schema, and key-layout types used
//! throughout the carmine record layer. Every other carmine crate depends on
//! `carmine-types`.
//!
//! # Key Types
//!
//! - [`FieldValue`] — A typed model field value (`Null`, string, number,
//!   boolean, date instant, or structural JSON)
//! - [`FieldType`] — The closed set of declared field types
//! - [`ModelSchema`] — Per-model mapping of field names to declared types
//! - [`Record`] — A field-name-to-value map; one stored entity
//! - [`IdStrategy`] — Id assignment on create: random token or counter
//!
//! The key-space layout (`"<model>:<id>"` records, `"locks:<model>:<id>"`
//! leases, `"id:<model>"` counters) is defined once in [`keys`] so every
//! crate agrees on the wire-format contract.

pub mod error;
pub mod keys;
pub mod schema;
pub mod value;

pub use error::TypeError;
pub use keys::{
    id_from_key, id_sequence_key, lock_key, namespace_pattern, record_key, validate_id,
};
pub use schema::{FieldType, IdStrategy, ModelSchema};
pub use value::{FieldValue, Record};
