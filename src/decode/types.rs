//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use super::decoders::{JsonDecoder, StringListDecoder};
use crate::error::Result;
use crate::types::Record;
use serde_json::Value;

/// Configuration for decoding responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderConfig {
    /// Array of objects located by a JSONPath such as `$.groups[*]`
    Json {
        /// JSONPath to extract records from response
        record_path: String,
    },

    /// Array of strings, one record per entry
    StringList {
        /// Top-level field holding the array
        field: String,
        /// Property the string is stored under in each record
        key: String,
    },
}

impl DecoderConfig {
    /// Create a JSON decoder config with a record path
    pub fn json(path: impl Into<String>) -> Self {
        Self::Json {
            record_path: path.into(),
        }
    }

    /// Create a string list decoder config
    pub fn string_list(field: impl Into<String>, key: impl Into<String>) -> Self {
        Self::StringList {
            field: field.into(),
            key: key.into(),
        }
    }

    /// Build the decoder for this config
    pub fn decoder(&self) -> Box<dyn RecordDecoder> {
        match self {
            Self::Json { record_path } => Box::new(JsonDecoder::with_path(record_path.clone())),
            Self::StringList { field, key } => {
                Box::new(StringListDecoder::new(field.clone(), key.clone()))
            }
        }
    }

    /// Human readable records location, used in error messages
    pub fn location(&self) -> &str {
        match self {
            Self::Json { record_path } => record_path,
            Self::StringList { field, .. } => field,
        }
    }
}

/// Trait for decoding response bodies into records
pub trait RecordDecoder: Send + Sync {
    /// Decode a parsed response body into a list of records
    fn decode(&self, body: &Value) -> Result<Vec<Record>>;
}
