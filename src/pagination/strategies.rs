//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::types::{lookup_field, PageToken, Paginator};
use crate::error::{Error, Result};
use crate::types::scalar_to_string;
use serde_json::Value;
use tracing::warn;
use url::Url;

/// Terminate when the server hands back the token we just used
fn guard_repeat(next: PageToken, previous: Option<&PageToken>) -> Option<PageToken> {
    if previous == Some(&next) {
        warn!(token = %next, "Server repeated the previous page token, stopping pagination");
        return None;
    }
    Some(next)
}

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Cursor-based pagination
///
/// Reads a top-level field (default `next_page`) and sends its value back as
/// a query parameter of the same name. An absent, `null` or empty value ends
/// pagination.
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    /// Response field holding the cursor
    pub field: String,
    /// Query parameter name for cursor
    pub param: String,
}

impl CursorPaginator {
    /// Create a new cursor paginator
    pub fn new(field: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            param: param.into(),
        }
    }
}

impl Paginator for CursorPaginator {
    fn next_token(&self, body: &Value, previous: Option<&PageToken>) -> Result<Option<PageToken>> {
        let Some(raw) = lookup_field(body, &self.field) else {
            return Ok(None);
        };

        let cursor = scalar_to_string(raw).ok_or_else(|| {
            Error::page_token(format!("field '{}' is not a scalar: {raw}", self.field))
        })?;
        if cursor.is_empty() {
            return Ok(None);
        }

        Ok(guard_repeat(PageToken::cursor(&self.param, cursor), previous))
    }
}

// ============================================================================
// Next URL Pagination
// ============================================================================

/// Next URL pagination (HATEOAS)
///
/// The response body contains the URL for the next page at a nested path
/// (default `pagination.next`).
#[derive(Debug, Clone)]
pub struct NextUrlPaginator {
    /// Dotted path to the next URL
    pub path: String,
}

impl NextUrlPaginator {
    /// Create a new next URL paginator
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Paginator for NextUrlPaginator {
    fn next_token(&self, body: &Value, previous: Option<&PageToken>) -> Result<Option<PageToken>> {
        let Some(raw) = lookup_field(body, &self.path) else {
            return Ok(None);
        };

        let link = raw.as_str().ok_or_else(|| {
            Error::page_token(format!("'{}' is not a string: {raw}", self.path))
        })?;
        if link.is_empty() {
            return Ok(None);
        }

        let url = Url::parse(link)
            .map_err(|e| Error::page_token(format!("invalid next link '{link}': {e}")))?;

        Ok(guard_repeat(PageToken::NextUrl(url), previous))
    }
}
