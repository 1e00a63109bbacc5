//! Schema types

use crate::types::{JsonObject, JsonValue, Record};
use serde_json::json;

/// Semantic type of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    DateTime,
    Integer,
    Boolean,
    /// Object with declared properties (may be empty)
    Object(&'static [Field]),
    /// Array of a single item type
    Array(&'static FieldType),
}

impl FieldType {
    /// JSON schema fragment for this type
    fn to_json_schema(self, nullable: bool) -> JsonValue {
        let base = match self {
            FieldType::String | FieldType::DateTime => "string",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Object(_) => "object",
            FieldType::Array(_) => "array",
        };

        let mut schema = JsonObject::new();
        schema.insert(
            "type".into(),
            if nullable {
                json!([base, "null"])
            } else {
                json!(base)
            },
        );

        match self {
            FieldType::DateTime => {
                schema.insert("format".into(), json!("date-time"));
            }
            FieldType::Object(fields) => {
                schema.insert("properties".into(), properties_schema(fields).into());
            }
            FieldType::Array(items) => {
                schema.insert("items".into(), items.to_json_schema(true));
            }
            _ => {}
        }

        JsonValue::Object(schema)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::DateTime => write!(f, "date-time"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Object(_) => write!(f, "object"),
            FieldType::Array(items) => write!(f, "array of {items}"),
        }
    }
}

/// One declared property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Property name
    pub name: &'static str,
    /// Semantic type
    pub kind: FieldType,
    /// Whether the property must be present and non-null
    pub required: bool,
    /// Human readable description
    pub description: Option<&'static str>,
}

impl Field {
    /// Create an optional field
    pub const fn new(name: &'static str, kind: FieldType) -> Self {
        Self {
            name,
            kind,
            required: false,
            description: None,
        }
    }

    /// Mark the field as required
    #[must_use]
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// Attach a description
    #[must_use]
    pub const fn describe(self, description: &'static str) -> Self {
        Self {
            description: Some(description),
            ..self
        }
    }
}

fn properties_schema(fields: &[Field]) -> JsonObject {
    fields
        .iter()
        .map(|field| {
            let mut schema = field.kind.to_json_schema(!field.required);
            if let (Some(description), JsonValue::Object(obj)) = (field.description, &mut schema) {
                obj.insert("description".into(), json!(description));
            }
            (field.name.to_string(), schema)
        })
        .collect()
}

/// Declared schema of one stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSchema {
    stream: String,
    fields: Vec<Field>,
}

impl StreamSchema {
    /// Create a schema from a field table
    pub fn new(stream: impl Into<String>, fields: &[Field]) -> Self {
        Self {
            stream: stream.into(),
            fields: fields.to_vec(),
        }
    }

    /// Stream name
    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a top-level property is declared
    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Names of required fields
    pub fn required(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect()
    }

    /// Render the Singer JSON schema
    pub fn to_json_schema(&self) -> JsonValue {
        let mut schema = JsonObject::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), properties_schema(&self.fields).into());
        let required = self.required();
        if !required.is_empty() {
            schema.insert("required".into(), json!(required));
        }
        JsonValue::Object(schema)
    }

    /// Remove undeclared top-level properties, returning their names
    pub fn conform(&self, record: &mut Record) -> Vec<String> {
        let undeclared: Vec<String> = record
            .keys()
            .filter(|key| !self.declares(key))
            .cloned()
            .collect();
        for key in &undeclared {
            record.remove(key);
        }
        undeclared
    }
}
