//! Tests for schema module

use super::*;
use crate::error::{Error, ErrorKind};
use pretty_assertions::assert_eq;
use serde_json::json;

fn record(value: serde_json::Value) -> crate::types::Record {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

fn validator() -> DeclaredSchemas {
    DeclaredSchemas::new()
        .with_schema(StreamSchema::new("groups", catalog::GROUPS))
        .with_schema(StreamSchema::new("bsds", catalog::BSDS))
        .with_schema(StreamSchema::new("daily_bitlink_clicks", catalog::BITLINK_CLICKS))
}

// ============================================================================
// JSON Schema Rendering
// ============================================================================

#[test]
fn test_click_schema_json() {
    let schema = StreamSchema::new("daily_bitlink_clicks", catalog::BITLINK_CLICKS);
    assert_eq!(
        schema.to_json_schema(),
        json!({
            "type": "object",
            "properties": {
                "clicks": {"type": ["integer", "null"], "description": "The number of clicks."},
                "date": {"type": ["string", "null"], "format": "date-time", "description": "The date."},
                "bitlink": {"type": ["string", "null"], "description": "The bitlink."}
            }
        })
    );
}

#[test]
fn test_required_fields_are_not_nullable() {
    let schema = StreamSchema::new("bsds", catalog::BSDS).to_json_schema();
    assert_eq!(schema["properties"]["domain"]["type"], json!("string"));
    assert_eq!(schema["required"], json!(["domain"]));
}

#[test]
fn test_nested_and_array_schema() {
    let schema = StreamSchema::new("groups", catalog::GROUPS).to_json_schema();
    assert_eq!(
        schema["properties"]["references"]["properties"]["organization"]["type"],
        json!(["string", "null"])
    );
    assert_eq!(
        schema["properties"]["bsds"]["items"],
        json!({"type": ["string", "null"]})
    );
    assert!(schema.get("required").is_none());
}

#[test]
fn test_schema_lookup() {
    let schema = StreamSchema::new("groups", catalog::GROUPS);
    assert_eq!(schema.stream(), "groups");
    assert!(schema.declares("guid"));
    assert!(!schema.declares("unknown"));
    assert_eq!(schema.field("is_active").unwrap().kind, FieldType::Boolean);
    assert!(schema.required().is_empty());
}

// ============================================================================
// Conform
// ============================================================================

#[test]
fn test_conform_drops_undeclared_properties() {
    let schema = StreamSchema::new("daily_bitlink_clicks", catalog::BITLINK_CLICKS);
    let mut rec = record(json!({
        "clicks": 3,
        "date": "2024-01-01T00:00:00+0000",
        "bitlink": "bit.ly/1",
        "unit": "day",
        "units": -1
    }));

    let mut dropped = schema.conform(&mut rec);
    dropped.sort();

    assert_eq!(dropped, vec!["unit".to_string(), "units".to_string()]);
    assert_eq!(rec.len(), 3);
    assert!(rec.contains_key("bitlink"));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_valid_records() {
    let v = validator();

    let group = record(json!({
        "guid": "Ga",
        "name": "x",
        "references": {"organization": "https://api-ssl.bitly.com/v4/organizations/Oa"},
        "created": "2020-01-01T00:00:00+0000",
        "bsds": ["bit.ly", "j.mp"],
        "is_active": true,
        "role": null
    }));
    v.validate("groups", &group).unwrap();

    let clicks = record(json!({"clicks": 5, "date": "2024-01-01T00:00:00Z", "bitlink": "bit.ly/1"}));
    v.validate("daily_bitlink_clicks", &clicks).unwrap();

    v.validate("groups", &record(json!({}))).unwrap();
}

#[test]
fn test_missing_required_field() {
    let err = validator()
        .validate("bsds", &record(json!({"domain": null})))
        .unwrap_err();
    assert!(matches!(err, Error::Schema { ref stream, .. } if stream == "bsds"));
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(err.to_string().contains("required field 'domain'"));
}

#[test]
fn test_type_mismatches() {
    let v = validator();

    let err = v
        .validate("daily_bitlink_clicks", &record(json!({"clicks": "many"})))
        .unwrap_err();
    assert!(err.to_string().contains("'clicks' expected integer"));

    let err = v
        .validate("groups", &record(json!({"created": "yesterday"})))
        .unwrap_err();
    assert!(err.to_string().contains("expected date-time"));

    let err = v
        .validate("groups", &record(json!({"bsds": ["bit.ly", 1]})))
        .unwrap_err();
    assert!(err.to_string().contains("bsds[1]"));

    let err = v
        .validate("groups", &record(json!({"references": {"organization": 7}})))
        .unwrap_err();
    assert!(err.to_string().contains("references.organization"));

    let err = v
        .validate("groups", &record(json!({"is_active": "yes"})))
        .unwrap_err();
    assert!(err.to_string().contains("expected boolean"));
}

#[test]
fn test_unknown_stream_is_schema_error() {
    let err = validator()
        .validate("nope", &record(json!({})))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn test_declared_schemas_from_iter() {
    let schemas: DeclaredSchemas = [
        StreamSchema::new("channels", catalog::CHANNELS),
        StreamSchema::new("webhooks", catalog::WEBHOOKS),
    ]
    .into_iter()
    .collect();

    assert!(schemas.get("channels").is_some());
    assert!(schemas.get("groups").is_none());
}
