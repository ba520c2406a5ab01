//! Connector host for carmine.
//!
//! The connector is the thin root of the stack: it owns the shared store
//! handle, carries the deployment configuration (lease TTL, id strategy),
//! keeps the model registry, and exposes the upstream persistence surface —
//! create, save, find, destroy, bulk-destroy — each call taking a model
//! name and returning a single eventual result.
//!
//! Connection establishment and teardown belong to whoever builds the
//! [`StoreCommands`](carmine_store::StoreCommands) handle passed in at
//! construction; the connector sees only the opaque command capability, and
//! every accessor it builds shares that one handle.

pub mod config;
pub mod connector;
pub mod error;

pub use config::ConnectorConfig;
pub use connector::Connector;
pub use error::{ConnectorError, ConnectorResult};
