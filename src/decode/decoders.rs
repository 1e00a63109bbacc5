//! Decoder implementations

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use crate::types::Record;
use jsonpath_rust::JsonPath;
use serde_json::Value;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder extracting the objects of one array
#[derive(Debug, Clone)]
pub struct JsonDecoder {
    /// JSONPath to extract records
    record_path: String,
}

impl JsonDecoder {
    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: path.into(),
        }
    }

    /// Dotted path of the array a `$.a.b[*]` locator iterates over
    fn container_path(&self) -> &str {
        let path = self.record_path.trim_end_matches("[*]");
        path.strip_prefix("$.")
            .or_else(|| path.strip_prefix('$'))
            .unwrap_or(path)
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &Value) -> Result<Vec<Record>> {
        let container = crate::pagination::lookup_field(body, self.container_path())
            .ok_or_else(|| Error::extraction(&self.record_path, "records location is missing"))?;
        if !container.is_array() {
            return Err(Error::extraction(
                &self.record_path,
                "records location is not an array",
            ));
        }

        extract_with_jsonpath(body, &self.record_path)?
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::Object(record) => Ok(record),
                other => Err(Error::extraction(
                    &self.record_path,
                    format!("element {index} is not an object: {other}"),
                )),
            })
            .collect()
    }
}

// ============================================================================
// String List Decoder
// ============================================================================

/// Decoder for `{"field": ["a", "b"]}` bodies, producing `{key: "a"}` records
#[derive(Debug, Clone)]
pub struct StringListDecoder {
    field: String,
    key: String,
}

impl StringListDecoder {
    /// Create a new string list decoder
    pub fn new(field: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            key: key.into(),
        }
    }
}

impl RecordDecoder for StringListDecoder {
    fn decode(&self, body: &Value) -> Result<Vec<Record>> {
        let items = body
            .get(&self.field)
            .and_then(Value::as_array)
            .ok_or_else(|| Error::extraction(&self.field, "expected an array of strings"))?;

        items
            .iter()
            .map(|item| {
                let value = item.as_str().ok_or_else(|| {
                    Error::extraction(&self.field, format!("entry is not a string: {item}"))
                })?;
                let mut record = Record::new();
                record.insert(self.key.clone(), Value::String(value.to_string()));
                Ok(record)
            })
            .collect()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Extract values using jsonpath-rust
fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    let jp = JsonPath::try_from(path)
        .map_err(|e| Error::json_path(format!("Invalid JSONPath '{path}': {e}")))?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}
