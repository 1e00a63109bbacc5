//! The Bitly stream catalog
//!
//! ```text
//! organizations ──► webhooks (paid)
//! groups ──► bitlinks ──► daily_bitlink_clicks
//!                    └──► monthly_bitlink_clicks
//! bsds, campaigns, channels
//! ```

use crate::config::TapConfig;
use crate::decode::DecoderConfig;
use crate::error::Result;
use crate::pagination::PaginationConfig;
use crate::request::QueryStrategy;
use crate::schema::{catalog, StreamSchema};
use crate::stream::{validate_definitions, ChildContextMapping, StreamDefinition};

fn groups() -> StreamDefinition {
    StreamDefinition::new(
        "groups",
        "/v4/groups",
        StreamSchema::new("groups", catalog::GROUPS),
        DecoderConfig::json("$.groups[*]"),
    )
    .primary_key(["guid"])
    .with_child_context(ChildContextMapping::new().bind("group_guid", "guid"))
}

fn bitlinks() -> StreamDefinition {
    StreamDefinition::new(
        "bitlinks",
        "/v4/groups/{group_guid}/bitlinks",
        StreamSchema::new("bitlinks", catalog::BITLINKS),
        DecoderConfig::json("$.links[*]"),
    )
    .primary_key(["id"])
    .parent("groups")
    .pagination(PaginationConfig::hateoas())
    .query(QueryStrategy::PagedListing)
    .with_child_context(ChildContextMapping::new().bind("bitlink", "id"))
}

fn bsds() -> StreamDefinition {
    StreamDefinition::new(
        "bsds",
        "/v4/bsds",
        StreamSchema::new("bsds", catalog::BSDS),
        DecoderConfig::string_list("bsds", "domain"),
    )
    .primary_key(["domain"])
}

fn campaigns() -> StreamDefinition {
    StreamDefinition::new(
        "campaigns",
        "/v4/campaigns",
        StreamSchema::new("campaigns", catalog::CAMPAIGNS),
        DecoderConfig::json("$.campaigns[*]"),
    )
    .primary_key(["guid"])
}

fn channels() -> StreamDefinition {
    StreamDefinition::new(
        "channels",
        "/v4/channels",
        StreamSchema::new("channels", catalog::CHANNELS),
        DecoderConfig::json("$.channels[*]"),
    )
    .primary_key(["guid"])
}

fn organizations() -> StreamDefinition {
    StreamDefinition::new(
        "organizations",
        "/v4/organizations",
        StreamSchema::new("organizations", catalog::ORGANIZATIONS),
        DecoderConfig::json("$.organizations[*]"),
    )
    .primary_key(["guid"])
    .with_child_context(ChildContextMapping::new().bind("organization_guid", "guid"))
}

fn webhooks() -> StreamDefinition {
    StreamDefinition::new(
        "webhooks",
        "/v4/organizations/{organization_guid}/webhooks",
        StreamSchema::new("webhooks", catalog::WEBHOOKS),
        DecoderConfig::json("$.webhooks[*]"),
    )
    .primary_key(["guid"])
    .parent("organizations")
    .paid()
}

fn bitlink_clicks(name: &str, query: QueryStrategy) -> StreamDefinition {
    StreamDefinition::new(
        name,
        "/v4/bitlinks/{bitlink}/clicks",
        StreamSchema::new(name, catalog::BITLINK_CLICKS),
        DecoderConfig::json("$.link_clicks[*]"),
    )
    .primary_key(["date", "bitlink"])
    .parent("bitlinks")
    .query(query)
}

/// Every stream the tap knows, in declaration order
pub fn all_streams() -> Vec<StreamDefinition> {
    vec![
        groups(),
        bitlinks(),
        bsds(),
        campaigns(),
        channels(),
        organizations(),
        webhooks(),
        bitlink_clicks("daily_bitlink_clicks", QueryStrategy::Default),
        bitlink_clicks(
            "monthly_bitlink_clicks",
            QueryStrategy::fixed([("unit", "month")]),
        ),
    ]
}

/// The streams available under a configuration, validated
pub fn available_streams(config: &TapConfig) -> Result<Vec<StreamDefinition>> {
    let streams: Vec<_> = all_streams()
        .into_iter()
        .filter(|s| config.include_paid_streams || !s.requires_paid_plan)
        .collect();
    validate_definitions(&streams)?;
    Ok(streams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    fn names(streams: &[StreamDefinition]) -> Vec<&str> {
        streams.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_all_streams_declaration_order() {
        assert_eq!(
            names(&all_streams()),
            vec![
                "groups",
                "bitlinks",
                "bsds",
                "campaigns",
                "channels",
                "organizations",
                "webhooks",
                "daily_bitlink_clicks",
                "monthly_bitlink_clicks",
            ]
        );
        validate_definitions(&all_streams()).unwrap();
    }

    #[test]
    fn test_paid_streams_are_gated() {
        let free = available_streams(&TapConfig::new("t")).unwrap();
        assert!(!names(&free).contains(&"webhooks"));
        assert_eq!(free.len(), 8);

        let paid = available_streams(&TapConfig::new("t").with_paid_streams(true)).unwrap();
        assert!(names(&paid).contains(&"webhooks"));
    }

    #[test]
    fn test_click_streams_differ_only_by_query() {
        let streams = all_streams();
        let daily = streams.iter().find(|s| s.name == "daily_bitlink_clicks").unwrap();
        let monthly = streams.iter().find(|s| s.name == "monthly_bitlink_clicks").unwrap();

        assert_eq!(daily.path, monthly.path);
        assert_eq!(daily.primary_key, monthly.primary_key);
        assert_eq!(daily.pagination, monthly.pagination);
        assert_eq!(daily.decoder, monthly.decoder);
        assert_eq!(daily.schema.fields(), monthly.schema.fields());
        assert_ne!(daily.query, monthly.query);
    }

    #[test]
    fn test_validate_catalog_rejects_unbound_placeholder() {
        let mut streams = all_streams();
        streams[1].path = "/v4/groups/{group_id}/bitlinks".to_string();

        let err = validate_definitions(&streams).unwrap_err();
        assert!(matches!(err, Error::MissingPlaceholder { ref placeholder, .. } if placeholder == "group_id"));
    }

    #[test]
    fn test_validate_catalog_rejects_bad_shapes() {
        let mut streams = all_streams();
        streams[1].parent = Some("nope".into());
        assert!(validate_definitions(&streams).unwrap_err().to_string().contains("unknown parent"));

        let mut streams = all_streams();
        streams.push(bsds());
        assert!(validate_definitions(&streams).unwrap_err().to_string().contains("Duplicate"));

        let mut streams = all_streams();
        streams[2].parent = Some("groups".into());
        assert!(validate_definitions(&streams).unwrap_err().to_string().contains("no path placeholder"));

        let mut streams = all_streams();
        streams[0].path = "/v4/groups/{group_guid}".into();
        assert!(matches!(
            validate_definitions(&streams),
            Err(Error::MissingPlaceholder { .. })
        ));
    }
}
