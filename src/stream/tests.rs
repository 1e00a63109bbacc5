//! Tests for stream module

use super::*;
use crate::context::Context;
use crate::error::{Error, ErrorKind};
use crate::streams::all_streams;
use crate::types::{Record, ReplicationMethod};
use pretty_assertions::assert_eq;
use serde_json::json;

fn stream(name: &str) -> StreamDefinition {
    all_streams()
        .into_iter()
        .find(|s| s.name == name)
        .unwrap()
}

fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[test]
fn test_groups_page_and_child_context() {
    let groups = stream("groups");
    let body = json!({"groups": [{"guid": "Ga", "name": "x"}], "pagination": {"next": null}});

    let records = groups.parse_records(&body).unwrap();
    assert_eq!(records, vec![record(json!({"guid": "Ga", "name": "x"}))]);

    let paginator = groups.pagination.paginator();
    assert_eq!(paginator.next_token(&body, None).unwrap(), None);

    let ctx = groups.child_context(&records[0]).unwrap();
    assert_eq!(ctx, Some(Context::new().with("group_guid", "Ga")));
}

#[test]
fn test_bsds_records() {
    let records = stream("bsds")
        .parse_records(&json!({"bsds": ["bit.ly", "j.mp"]}))
        .unwrap();
    assert_eq!(
        records,
        vec![
            record(json!({"domain": "bit.ly"})),
            record(json!({"domain": "j.mp"}))
        ]
    );
}

#[test]
fn test_parse_records_conforms_to_schema() {
    let records = stream("daily_bitlink_clicks")
        .parse_records(&json!({
            "link_clicks": [{"clicks": 2, "date": "2024-01-01T00:00:00+0000"}],
            "units": -1,
            "unit": "day"
        }))
        .unwrap();
    assert_eq!(
        records,
        vec![record(json!({"clicks": 2, "date": "2024-01-01T00:00:00+0000"}))]
    );

    let records = stream("groups")
        .parse_records(&json!({"groups": [{"guid": "Ga", "extra": true}]}))
        .unwrap();
    assert!(!records[0].contains_key("extra"));
}

#[test]
fn test_parse_records_missing_location() {
    let err = stream("channels")
        .parse_records(&json!({"message": "FORBIDDEN"}))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_child_context_errors() {
    let groups = stream("groups");

    let err = groups.child_context(&record(json!({"name": "x"}))).unwrap_err();
    assert!(matches!(err, Error::ChildContext { ref field, .. } if field == "guid"));
    assert_eq!(err.kind(), ErrorKind::Parse);

    let err = groups
        .child_context(&record(json!({"guid": ["a"]})))
        .unwrap_err();
    assert!(err.to_string().contains("not a scalar"));
}

#[test]
fn test_leaf_stream_has_no_child_context() {
    let ctx = stream("campaigns")
        .child_context(&record(json!({"guid": "C1"})))
        .unwrap();
    assert_eq!(ctx, None);
}

#[test]
fn test_enrich_adds_missing_context_keys() {
    let clicks = stream("daily_bitlink_clicks");
    let ctx = Context::new().with("bitlink", "bit.ly/1");

    let mut rec = record(json!({"clicks": 1, "date": "2024-01-01T00:00:00+0000"}));
    clicks.enrich(&mut rec, &ctx);
    assert_eq!(rec["bitlink"], "bit.ly/1");

    let mut rec = record(json!({"bitlink": "other"}));
    clicks.enrich(&mut rec, &ctx);
    assert_eq!(rec["bitlink"], "other");
}

#[test]
fn test_definition_accessors() {
    let bitlinks = stream("bitlinks");
    assert!(!bitlinks.is_root());
    assert_eq!(bitlinks.placeholders(), vec!["group_guid".to_string()]);
    assert_eq!(bitlinks.replication_method(), ReplicationMethod::FullTable);
    assert!(stream("groups").is_root());
    assert!(stream("webhooks").requires_paid_plan);

    let custom = stream("campaigns").replication_key("modified");
    assert_eq!(custom.replication_method(), ReplicationMethod::Incremental);
}

#[test]
fn test_child_context_mapping() {
    let mapping = ChildContextMapping::new()
        .bind("organization_guid", "guid")
        .bind("group_guid", "group");

    assert_eq!(
        mapping.placeholders().collect::<Vec<_>>(),
        vec!["organization_guid", "group_guid"]
    );

    let ctx = mapping
        .context_for(&record(json!({"guid": "Oa", "group": 12})))
        .unwrap();
    assert_eq!(ctx.get("organization_guid"), Some("Oa"));
    assert_eq!(ctx.get("group_guid"), Some("12"));
}
