//! Tap configuration
//!
//! The configuration is read once at startup (from a JSON file or an inline
//! JSON string), validated, and then passed around as a typed structure.
//!
//! | Field | Default | Meaning |
//! |---|---|---|
//! | `token` | required | Bitly API access token |
//! | `include_paid_streams` | `false` | Sync streams that need a paid plan (`webhooks`) |
//! | `start_date` | none | Bookmark floor for incremental streams |
//! | `api_url` | `https://api-ssl.bitly.com` | Base URL override |
//! | `page_size` | `100` | Page size for paged listings |
//! | `user_agent` | `tap-bitly/<version>` | User-Agent override |

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default Bitly API base URL
pub const DEFAULT_API_URL: &str = "https://api-ssl.bitly.com";

/// Default page size for paged listings
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest page size the API accepts
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Typed tap configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// API token for Bitly
    #[serde(default)]
    pub token: String,

    /// Whether to sync paid streams
    #[serde(default)]
    pub include_paid_streams: bool,

    /// Earliest datetime to get data from
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    /// Base URL override
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Page size for paged listings
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// User-Agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl TapConfig {
    /// Create a config with the given token and all defaults
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            include_paid_streams: false,
            start_date: None,
            api_url: default_api_url(),
            page_size: default_page_size(),
            user_agent: None,
        }
    }

    /// Include paid streams
    #[must_use]
    pub fn with_paid_streams(mut self, include: bool) -> Self {
        self.include_paid_streams = include;
        self
    }

    /// Set the start date
    #[must_use]
    pub fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Override the API base URL
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Parse and validate a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::missing_field("token"));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::invalid_value(
                "page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        url::Url::parse(&self.api_url)
            .map_err(|e| Error::invalid_value("api_url", e.to_string()))?;

        Ok(())
    }

    /// The User-Agent sent with every request
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("{}/{}", crate::NAME, crate::VERSION))
    }
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("token", &"<redacted>")
            .field("include_paid_streams", &self.include_paid_streams)
            .field("start_date", &self.start_date)
            .field("api_url", &self.api_url)
            .field("page_size", &self.page_size)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TapConfig::from_json(r#"{"token": "abc"}"#).unwrap();
        assert_eq!(config.token, "abc");
        assert!(!config.include_paid_streams);
        assert!(config.start_date.is_none());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.user_agent(), format!("tap-bitly/{}", crate::VERSION));
    }

    #[test]
    fn test_full_config() {
        let config = TapConfig::from_json(
            r#"{
                "token": "abc",
                "include_paid_streams": true,
                "start_date": "2024-01-01T00:00:00Z",
                "api_url": "http://localhost:8080",
                "page_size": 50,
                "user_agent": "custom/1.0"
            }"#,
        )
        .unwrap();
        assert!(config.include_paid_streams);
        assert_eq!(
            config.start_date.unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.user_agent(), "custom/1.0");
    }

    #[test]
    fn test_missing_token() {
        let err = TapConfig::from_json("{}").unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "token"));

        let err = TapConfig::from_json(r#"{"token": "   "}"#).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }

    #[test]
    fn test_invalid_values() {
        let err = TapConfig::new("t").with_page_size(0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "page_size"));

        let err = TapConfig::new("t").with_api_url("not a url").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "api_url"));

        assert!(TapConfig::from_json(r#"{"token": "t", "start_date": "yesterday"}"#).is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = TapConfig::new("super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"token": "file-token"}"#).unwrap();

        let config = TapConfig::from_file(&path).unwrap();
        assert_eq!(config.token, "file-token");

        let missing = TapConfig::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(Error::Config { .. })));
    }
}
