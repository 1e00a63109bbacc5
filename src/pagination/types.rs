//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use crate::error::Result;
use serde_json::Value;
use url::Url;

/// Field the default strategy reads its cursor from
pub const DEFAULT_CURSOR_FIELD: &str = "next_page";

/// Location of the next-page link in HATEOAS responses
pub const DEFAULT_NEXT_URL_PATH: &str = "pagination.next";

/// Opaque cursor carried from one response to the next request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageToken {
    /// Full URL of the next page
    NextUrl(Url),
    /// Named cursor value sent back as a query parameter
    Cursor {
        /// Query parameter name
        param: String,
        /// Cursor value
        value: String,
    },
}

impl PageToken {
    /// Create a cursor token
    pub fn cursor(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Cursor {
            param: param.into(),
            value: value.into(),
        }
    }

    /// Query parameters this token contributes to the next request.
    ///
    /// A next-page URL contributes its own query string, so the request
    /// keeps going to the stream's path while picking up the server's paging
    /// parameters.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match self {
            Self::NextUrl(url) => url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            Self::Cursor { param, value } => vec![(param.clone(), value.clone())],
        }
    }
}

impl std::fmt::Display for PageToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NextUrl(url) => write!(f, "{url}"),
            Self::Cursor { param, value } => write!(f, "{param}={value}"),
        }
    }
}

/// Pagination strategy of a stream, fixed at definition time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationConfig {
    /// Cursor read from a top-level field and sent back under the same name
    Cursor {
        /// Response field holding the cursor
        field: String,
        /// Query parameter the cursor is sent as
        param: String,
    },

    /// Next URL in response body
    NextUrl {
        /// Dotted path to the next-page link
        path: String,
    },
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self::cursor(DEFAULT_CURSOR_FIELD, DEFAULT_CURSOR_FIELD)
    }
}

impl PaginationConfig {
    /// Create cursor pagination config
    pub fn cursor(field: impl Into<String>, param: impl Into<String>) -> Self {
        Self::Cursor {
            field: field.into(),
            param: param.into(),
        }
    }

    /// Create next URL pagination config
    pub fn next_url(path: impl Into<String>) -> Self {
        Self::NextUrl { path: path.into() }
    }

    /// The HATEOAS strategy used by paged listings (`pagination.next`)
    pub fn hateoas() -> Self {
        Self::next_url(DEFAULT_NEXT_URL_PATH)
    }

    /// Build the paginator for this config
    pub fn paginator(&self) -> Box<dyn Paginator> {
        match self {
            Self::Cursor { field, param } => {
                Box::new(super::CursorPaginator::new(field.clone(), param.clone()))
            }
            Self::NextUrl { path } => Box::new(super::NextUrlPaginator::new(path.clone())),
        }
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Compute the token for the page after the one in `body`.
    ///
    /// `previous` is the token that produced `body` (`None` for the first
    /// page). Returns `Ok(None)` when pagination is complete.
    fn next_token(&self, body: &Value, previous: Option<&PageToken>) -> Result<Option<PageToken>>;
}

/// Look up a value by dotted field path (`pagination.next`).
///
/// Returns `None` when any segment is missing or the value is `null`.
pub fn lookup_field<'a>(body: &'a Value, path: &str) -> Option<&'a Value> {
    let value = path
        .split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(body, |current, segment| current.get(segment))?;

    (!value.is_null()).then_some(value)
}
