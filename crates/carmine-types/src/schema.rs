//! Model schemas: declared field types and id assignment strategy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TypeError};
use crate::keys::RESERVED_NAMESPACES;

/// The closed set of declared field types.
///
/// The codec dispatches on this tag, resolved once per field from the
/// schema. A field with no schema entry is treated as [`FieldType::Complex`]
/// and serialized structurally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// Short text, stored verbatim.
    String,
    /// Long text, stored verbatim. Distinct tag for upstream schema
    /// compatibility; codec-wise identical to `String`.
    Text,
    /// Numeric value, encoded as its decimal string.
    Number,
    /// Boolean value, encoded as `"true"` / `"false"`.
    Boolean,
    /// Date instant, encoded as RFC 3339 with millisecond precision in UTC.
    Date,
    /// Anything else: serialized generically as JSON.
    Complex,
}

/// Id assignment strategy for creates without an explicit id.
///
/// Pick one per deployment; callers relying on sequential ids are
/// incompatible with `Random` and vice versa.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// UUID v7 token. Collision probability is negligible by construction
    /// and is not re-checked against the store.
    #[default]
    Random,
    /// Auto-increment counter at `"id:<model>"`.
    Sequence,
}

/// Per-model field schema: a model name plus declared field types.
///
/// Supplied by the upstream model layer; the codec and accessor are
/// polymorphic over it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    name: String,
    fields: BTreeMap<String, FieldType>,
}

impl ModelSchema {
    /// Create a schema for the named model with no declared fields.
    ///
    /// Fails if the name would corrupt the key-space layout.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_model_name(&name)?;
        Ok(Self {
            name,
            fields: BTreeMap::new(),
        })
    }

    /// Declare a field type. Builder-style; later declarations win.
    pub fn with_field(mut self, field: impl Into<String>, ty: FieldType) -> Self {
        self.fields.insert(field.into(), ty);
        self
    }

    /// The model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type for a field.
    ///
    /// Fields without a schema entry are `Complex`: the caller never has to
    /// special-case schemaless data.
    pub fn field_type(&self, field: &str) -> FieldType {
        self.fields.get(field).copied().unwrap_or(FieldType::Complex)
    }

    /// Returns `true` if the field has an explicit schema entry.
    pub fn is_declared(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}

/// Validate a model name for use in the key-space layout.
///
/// Model names become key prefixes, so they must be non-empty, must not
/// contain the `:` separator or the `*` glob, and must not shadow the
/// reserved `locks`/`id` namespaces.
pub fn validate_model_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(TypeError::InvalidModelName {
            name: name.to_string(),
            reason: "model name must not be empty".into(),
        });
    }
    for ch in [':', '*'] {
        if name.contains(ch) {
            return Err(TypeError::InvalidModelName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }
    if name.chars().any(char::is_whitespace) {
        return Err(TypeError::InvalidModelName {
            name: name.to_string(),
            reason: "must not contain whitespace".into(),
        });
    }
    if RESERVED_NAMESPACES.contains(&name) {
        return Err(TypeError::InvalidModelName {
            name: name.to_string(),
            reason: "name is a reserved namespace".into(),
        });
    }
    Ok(())
}
