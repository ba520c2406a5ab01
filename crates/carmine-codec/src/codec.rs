use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use carmine_types::{FieldType, FieldValue, ModelSchema, Record};

use crate::error::{CodecError, CodecResult};

/// Encode a record into the store's flat string representation.
///
/// Dispatch is schema-driven: each field's declared type picks the encoding,
/// and a value that does not match its declared type is serialized
/// structurally rather than dropped.
pub fn encode(schema: &ModelSchema, record: &Record) -> BTreeMap<String, String> {
    record
        .iter()
        .map(|(field, value)| {
            (
                field.clone(),
                encode_value(schema.field_type(field), value),
            )
        })
        .collect()
}

/// Decode the store's flat string representation back into typed values.
pub fn decode(
    schema: &ModelSchema,
    data: &BTreeMap<String, String>,
) -> CodecResult<Record> {
    let mut record = Record::new();
    for (field, raw) in data {
        record.insert(
            field.clone(),
            decode_value(schema.field_type(field), field, raw)?,
        );
    }
    Ok(record)
}

fn encode_value(ty: FieldType, value: &FieldValue) -> String {
    // Null policy: explicit null writes an empty string. Falsy-but-defined
    // values (0, false, "") take the typed paths below and stay distinct.
    if value.is_null() {
        return String::new();
    }
    match (ty, value) {
        (FieldType::String | FieldType::Text, FieldValue::String(s)) => s.clone(),
        (FieldType::Number, FieldValue::Number(n)) => n.to_string(),
        (FieldType::Boolean, FieldValue::Boolean(b)) => b.to_string(),
        (FieldType::Date, FieldValue::Date(d)) => {
            d.to_rfc3339_opts(SecondsFormat::Millis, true)
        }
        _ => structural_json(value).to_string(),
    }
}

fn decode_value(ty: FieldType, field: &str, raw: &str) -> CodecResult<FieldValue> {
    if raw.is_empty() {
        return Ok(FieldValue::Null);
    }
    match ty {
        FieldType::String | FieldType::Text => Ok(FieldValue::String(raw.to_string())),
        FieldType::Number => raw
            .parse::<f64>()
            .map(FieldValue::Number)
            .map_err(|_| CodecError::InvalidNumber {
                field: field.to_string(),
                value: raw.to_string(),
            }),
        FieldType::Boolean => Ok(FieldValue::Boolean(raw == "true" || raw == "1")),
        FieldType::Date => DateTime::parse_from_rfc3339(raw)
            .map(|d| FieldValue::Date(d.with_timezone(&Utc)))
            .map_err(|_| CodecError::InvalidDate {
                field: field.to_string(),
                value: raw.to_string(),
            }),
        FieldType::Complex => Ok(match serde_json::from_str::<Value>(raw) {
            Ok(v) => FieldValue::Complex(v),
            // Malformed or legacy data: keep the raw string readable.
            Err(_) => FieldValue::String(raw.to_string()),
        }),
    }
}

/// Project any field value onto a JSON value for structural encoding.
///
/// Non-finite numbers have no JSON representation and carry their decimal
/// form as a string.
fn structural_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::String(s) => Value::String(s.clone()),
        FieldValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(n.to_string())),
        FieldValue::Boolean(b) => Value::Bool(*b),
        FieldValue::Date(d) => {
            Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        FieldValue::Complex(v) => v.clone(),
    }
}
