//! Transport abstraction between the sync engine and the network

use crate::error::Result;
use crate::types::JsonValue;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// A single GET request against the API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRequest {
    /// Path relative to the API base URL, placeholders already substituted
    pub path: String,
    /// Query parameters
    pub query: BTreeMap<String, String>,
}

impl ApiRequest {
    /// Create a request for a path with no query parameters
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: BTreeMap::new(),
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

/// A successful response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl ApiResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON
    pub fn json(&self) -> Result<JsonValue> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Executes requests on behalf of the sync engine.
///
/// Implementations own retries, backoff, rate limiting and authentication.
/// An `Err` means the request failed for good and the current stream
/// context should be marked failed.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute a GET request
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;
}
