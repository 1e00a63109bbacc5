//! Path template interpolation
//!
//! Stream paths use `{placeholder}` segments, e.g.
//! `/v4/groups/{group_guid}/bitlinks`. Placeholders are bound from the
//! stream's [`Context`]; each value is percent-encoded as a single path
//! segment, so `bit.ly/abc` becomes `bit.ly%2Fabc`.

use crate::context::Context;
use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::form_urlencoded::byte_serialize;

/// Regex for matching path placeholders: {name}
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("valid placeholder regex"));

/// Render a path template with the given context.
///
/// Every placeholder must be bound; the first unbound one is reported as a
/// configuration error.
pub fn render_path(template: &str, ctx: &Context) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut last = 0;

    for cap in PLACEHOLDER_REGEX.captures_iter(template) {
        let (Some(full), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let value = ctx
            .get(name.as_str())
            .ok_or_else(|| Error::missing_placeholder(name.as_str(), template))?;

        result.push_str(&template[last..full.start()]);
        result.push_str(&encode_segment(value));
        last = full.end();
    }

    result.push_str(&template[last..]);
    Ok(result)
}

/// Extract all placeholder names from a template, in order of appearance
pub fn placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER_REGEX
        .captures_iter(template)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Percent-encode a value so it stays a single path segment
fn encode_segment(value: &str) -> String {
    byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_placeholders() {
        let result = render_path("/v4/groups", &Context::new()).unwrap();
        assert_eq!(result, "/v4/groups");
    }

    #[test]
    fn test_single_placeholder() {
        let ctx = Context::new().with("group_guid", "Ga");
        let result = render_path("/v4/groups/{group_guid}/bitlinks", &ctx).unwrap();
        assert_eq!(result, "/v4/groups/Ga/bitlinks");
    }

    #[test]
    fn test_value_is_encoded_as_one_segment() {
        let ctx = Context::new().with("bitlink", "bit.ly/3abc");
        let result = render_path("/v4/bitlinks/{bitlink}/clicks", &ctx).unwrap();
        assert_eq!(result, "/v4/bitlinks/bit.ly%2F3abc/clicks");

        let ctx = Context::new().with("name", "a b");
        assert_eq!(render_path("/x/{name}", &ctx).unwrap(), "/x/a%20b");
    }

    #[test]
    fn test_missing_placeholder_is_config_error() {
        let result = render_path("/v4/organizations/{organization_guid}/webhooks", &Context::new());
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            Error::MissingPlaceholder { ref placeholder, .. } if placeholder == "organization_guid"
        ));
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }

    #[test]
    fn test_extra_context_values_are_ignored() {
        let ctx = Context::new().with("group_guid", "Ga").with("unused", "x");
        let result = render_path("/v4/groups/{group_guid}", &ctx).unwrap();
        assert_eq!(result, "/v4/groups/Ga");
    }

    #[test]
    fn test_placeholders() {
        assert!(placeholders("/v4/bsds").is_empty());
        assert_eq!(
            placeholders("/v4/{a}/x/{b_2}"),
            vec!["a".to_string(), "b_2".to_string()]
        );
        assert!(placeholders("/v4/groups").is_empty());
    }
}
