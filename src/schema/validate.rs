//! Record validation against declared schemas

use super::types::{Field, FieldType, StreamSchema};
use crate::error::{Error, Result};
use crate::types::{JsonValue, Record};
use chrono::{DateTime, NaiveDateTime};
use std::collections::HashMap;

/// Checks records before they are emitted
pub trait RecordValidator: Send + Sync {
    /// Validate one record of the named stream
    fn validate(&self, stream: &str, record: &Record) -> Result<()>;
}

/// Validator backed by the inline stream schemas
#[derive(Debug, Clone, Default)]
pub struct DeclaredSchemas {
    schemas: HashMap<String, StreamSchema>,
}

impl DeclaredSchemas {
    /// Create an empty validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema
    #[must_use]
    pub fn with_schema(mut self, schema: StreamSchema) -> Self {
        self.insert(schema);
        self
    }

    /// Register a schema, replacing one with the same stream name
    pub fn insert(&mut self, schema: StreamSchema) {
        self.schemas.insert(schema.stream().to_string(), schema);
    }

    /// Get the schema of a stream
    pub fn get(&self, stream: &str) -> Option<&StreamSchema> {
        self.schemas.get(stream)
    }
}

impl FromIterator<StreamSchema> for DeclaredSchemas {
    fn from_iter<I: IntoIterator<Item = StreamSchema>>(iter: I) -> Self {
        let mut schemas = Self::new();
        for schema in iter {
            schemas.insert(schema);
        }
        schemas
    }
}

impl RecordValidator for DeclaredSchemas {
    fn validate(&self, stream: &str, record: &Record) -> Result<()> {
        let schema = self
            .schemas
            .get(stream)
            .ok_or_else(|| Error::schema(stream, "no schema declared"))?;

        for field in schema.fields() {
            match record.get(field.name) {
                None | Some(JsonValue::Null) if field.required => {
                    return Err(Error::schema(
                        stream,
                        format!("required field '{}' is missing", field.name),
                    ));
                }
                None | Some(JsonValue::Null) => {}
                Some(value) => check_value(field.name, field.kind, value)
                    .map_err(|message| Error::schema(stream, message))?,
            }
        }

        Ok(())
    }
}

/// Check a non-null value against a declared type
fn check_value(path: &str, kind: FieldType, value: &JsonValue) -> std::result::Result<(), String> {
    let ok = match kind {
        FieldType::String => value.is_string(),
        FieldType::DateTime => value.as_str().is_some_and(is_datetime),
        FieldType::Integer => value.is_i64() || value.is_u64(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Object(fields) => match value.as_object() {
            Some(obj) => return check_nested(path, fields, obj),
            None => false,
        },
        FieldType::Array(items) => match value.as_array() {
            Some(values) => {
                for (index, item) in values.iter().enumerate() {
                    if !item.is_null() {
                        check_value(&format!("{path}[{index}]"), *items, item)?;
                    }
                }
                return Ok(());
            }
            None => false,
        },
    };

    if ok {
        Ok(())
    } else {
        Err(format!("field '{path}' expected {kind}, got {value}"))
    }
}

fn check_nested(
    path: &str,
    fields: &[Field],
    obj: &serde_json::Map<String, JsonValue>,
) -> std::result::Result<(), String> {
    for field in fields {
        match obj.get(field.name) {
            None | Some(JsonValue::Null) => {}
            Some(value) => check_value(&format!("{path}.{}", field.name), field.kind, value)?,
        }
    }
    Ok(())
}

/// Bitly sends `2024-01-01T00:00:00+0000`; RFC 3339 and naive forms are accepted too
fn is_datetime(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
}
