//! Identifier extraction from query predicates.
//!
//! The store has no secondary indexing, so the only predicates the record
//! layer can answer are those that restrict to a concrete id set. Exactly
//! two shapes are understood: direct id equality and `inq`-style
//! membership. Everything else is [`IdQuery::Unsupported`] and resolves to
//! an empty result — a documented narrowing, not an error.

use serde_json::Value;

/// The id set a query predicate restricts to.
#[derive(Clone, Debug, PartialEq)]
pub enum IdQuery {
    /// Empty predicate: every record of the model.
    All,
    /// Direct id equality.
    One(String),
    /// `inq`-style membership: the id is one of these values.
    Many(Vec<String>),
    /// A predicate shape the extraction policy does not understand.
    Unsupported,
}

impl IdQuery {
    /// Classify a where-clause.
    ///
    /// `None` and the empty object both mean "everything". Numeric ids are
    /// accepted and carried as their decimal strings, matching how the
    /// upstream model layer coerces ids.
    pub fn from_where(where_clause: Option<&Value>) -> IdQuery {
        let Some(clause) = where_clause else {
            return IdQuery::All;
        };
        let Some(fields) = clause.as_object() else {
            return IdQuery::Unsupported;
        };
        if fields.is_empty() {
            return IdQuery::All;
        }
        // Conditions on anything but the id cannot be answered here.
        if fields.len() != 1 {
            return IdQuery::Unsupported;
        }
        let Some(condition) = fields.get("id") else {
            return IdQuery::Unsupported;
        };
        match condition {
            Value::String(_) | Value::Number(_) => match scalar_id(condition) {
                Some(id) => IdQuery::One(id),
                None => IdQuery::Unsupported,
            },
            Value::Object(ops) => {
                if ops.len() != 1 {
                    return IdQuery::Unsupported;
                }
                let Some(Value::Array(members)) = ops.get("inq") else {
                    return IdQuery::Unsupported;
                };
                let mut ids = Vec::with_capacity(members.len());
                for member in members {
                    match scalar_id(member) {
                        Some(id) => ids.push(id),
                        None => return IdQuery::Unsupported,
                    }
                }
                IdQuery::Many(ids)
            }
            _ => IdQuery::Unsupported,
        }
    }
}

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
