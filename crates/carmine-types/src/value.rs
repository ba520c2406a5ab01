use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A typed model field value.
///
/// `FieldValue` is the in-memory side of the codec: the store only ever sees
/// strings, while callers work with these variants. `Null` is a first-class
/// value — a field explicitly set to null is distinct from a field that was
/// never written.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Explicit null / absent value.
    Null,
    /// Plain text, stored verbatim.
    String(String),
    /// Numeric value. All numbers are `f64`, matching the upstream model
    /// layer's single numeric type.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
    /// A date instant in UTC.
    Date(DateTime<Utc>),
    /// Structural value serialized generically (arrays, objects, and any
    /// field without a schema entry).
    Complex(Value),
}

/// A single stored entity: field name to value.
///
/// `BTreeMap` keeps iteration deterministic, which keeps encoded hashes and
/// test assertions stable.
pub type Record = BTreeMap<String, FieldValue>;

impl FieldValue {
    /// Returns `true` for [`FieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// The string content, if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric content, if this is a `Number` value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean content, if this is a `Boolean` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The date content, if this is a `Date` value.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// The structural content, if this is a `Complex` value.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            FieldValue::Complex(v) => Some(v),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(d: DateTime<Utc>) -> Self {
        FieldValue::Date(d)
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::Complex(v)
    }
}
