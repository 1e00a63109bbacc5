//! Stream contexts
//!
//! A [`Context`] carries the identifiers a child stream needs to build its
//! request path, e.g. `{group_guid: "Ga"}` for the bitlinks of one group.
//! One context is produced per parent record; root streams run once with
//! the empty context.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder name → value mapping derived from a parent record
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    /// The empty context used for root streams
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, replacing any previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a value by placeholder name
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether this is the empty (root) context
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate over `(placeholder, value)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Stable textual id, `key=value` pairs joined by `,`
    pub fn id(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.id())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.id(), "");
        assert_eq!(ctx.to_string(), "{}");
    }

    #[test]
    fn test_context_values_and_id() {
        let ctx = Context::new()
            .with("organization_guid", "Oa")
            .with("group_guid", "Ga");

        assert_eq!(ctx.get("group_guid"), Some("Ga"));
        assert_eq!(ctx.get("bitlink"), None);
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.id(), "group_guid=Ga,organization_guid=Oa");
        assert_eq!(ctx.to_string(), "{group_guid=Ga,organization_guid=Oa}");
    }

    #[test]
    fn test_context_serde_is_plain_object() {
        let ctx: Context = [("bitlink", "bit.ly/1")].into_iter().collect();
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json, serde_json::json!({"bitlink": "bit.ly/1"}));

        let back: Context = serde_json::from_value(json).unwrap();
        assert_eq!(back, ctx);
    }
}
