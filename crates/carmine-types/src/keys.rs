//! The key-space layout: the wire-format contract with the store.
//!
//! - Record: `"<model>:<id>"`, a hash of field name to string value
//! - Lock: `"locks:<model>:<id>"`, owner token with a TTL
//! - Id sequence: `"id:<model>"`, integer counter (auto-increment strategy)
//!
//! Every carmine crate goes through these helpers so the layout is defined
//! exactly once.

use crate::error::{Result, TypeError};

/// Top-level namespaces that model names must not shadow.
pub const RESERVED_NAMESPACES: &[&str] = &["locks", "id"];

/// The store key for a record.
pub fn record_key(model: &str, id: &str) -> String {
    format!("{model}:{id}")
}

/// The store key for a record's create-path lease.
pub fn lock_key(model: &str, id: &str) -> String {
    format!("locks:{model}:{id}")
}

/// The store key for a model's auto-increment counter.
pub fn id_sequence_key(model: &str) -> String {
    format!("id:{model}")
}

/// The glob pattern matching every record key of a model.
pub fn namespace_pattern(model: &str) -> String {
    format!("{model}:*")
}

/// Extract the id from a record key of the given model.
///
/// Returns `None` when the key does not belong to the model's namespace.
/// Ids containing `:` survive intact — only the first separator splits.
pub fn id_from_key<'a>(model: &str, key: &'a str) -> Option<&'a str> {
    let rest = key.strip_prefix(model)?;
    rest.strip_prefix(':')
}

/// Validate a record id for use in the key-space layout.
///
/// Ids must be non-empty and must not contain the `*` glob, which would
/// corrupt pattern scans.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(TypeError::InvalidId {
            id: id.to_string(),
            reason: "id must not be empty".into(),
        });
    }
    if id.contains('*') {
        return Err(TypeError::InvalidId {
            id: id.to_string(),
            reason: "must not contain '*'".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_layout() {
        assert_eq!(record_key("person", "0"), "person:0");
        assert_eq!(lock_key("person", "0"), "locks:person:0");
        assert_eq!(id_sequence_key("person"), "id:person");
        assert_eq!(namespace_pattern("person"), "person:*");
    }

    #[test]
    fn id_from_key_strips_namespace() {
        assert_eq!(id_from_key("person", "person:42"), Some("42"));
        assert_eq!(id_from_key("person", "order:42"), None);
    }

    #[test]
    fn id_from_key_keeps_embedded_separators() {
        assert_eq!(id_from_key("person", "person:a:b:c"), Some("a:b:c"));
    }

    #[test]
    fn id_from_key_rejects_prefix_collision() {
        // "personx:1" starts with "person" but is a different namespace.
        assert_eq!(id_from_key("person", "personx:1"), None);
    }

    #[test]
    fn lock_keys_live_outside_model_namespaces() {
        // A namespace scan for "person" must never pick up its lock keys.
        let lock = lock_key("person", "1");
        assert!(!lock.starts_with("person:"));
    }

    #[test]
    fn validate_id_rejects_empty() {
        assert!(validate_id("").is_err());
        assert!(validate_id("0").is_ok());
    }

    #[test]
    fn validate_id_rejects_glob() {
        assert!(validate_id("a*").is_err());
    }

    #[test]
    fn validate_id_allows_separator() {
        assert!(validate_id("a:b").is_ok());
    }
}
