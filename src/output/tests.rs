//! Tests for output module

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn record(value: serde_json::Value) -> crate::types::Record {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

fn lines(buf: &[u8]) -> Vec<serde_json::Value> {
    std::str::from_utf8(buf)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn test_singer_writer_lines() {
    let mut writer = SingerWriter::new(Vec::new());

    writer
        .schema(
            "groups",
            &json!({"type": "object"}),
            &["guid".to_string()],
            &[],
        )
        .unwrap();
    writer
        .record("groups", &record(json!({"guid": "Ga"})))
        .unwrap();
    writer
        .state(&json!({"bookmarks": {}}))
        .unwrap();

    let out = lines(&writer.into_inner());
    assert_eq!(out.len(), 3);
    assert_eq!(
        out[0],
        json!({"type": "SCHEMA", "stream": "groups", "schema": {"type": "object"}, "key_properties": ["guid"]})
    );
    assert_eq!(out[1]["type"], "RECORD");
    assert_eq!(out[1]["stream"], "groups");
    assert_eq!(out[1]["record"], json!({"guid": "Ga"}));
    assert!(out[1]["time_extracted"].is_string());
    assert_eq!(out[2], json!({"type": "STATE", "value": {"bookmarks": {}}}));
}

#[test]
fn test_schema_with_bookmark_properties() {
    let mut writer = SingerWriter::new(Vec::new());
    writer
        .schema(
            "campaigns",
            &json!({}),
            &["guid".to_string()],
            &["modified".to_string()],
        )
        .unwrap();

    let out = lines(&writer.into_inner());
    assert_eq!(out[0]["bookmark_properties"], json!(["modified"]));
}

#[test]
fn test_message_deserialize() {
    let message: Message =
        serde_json::from_str(r#"{"type": "RECORD", "stream": "bsds", "record": {"domain": "j.mp"}}"#)
            .unwrap();
    assert_eq!(message.stream(), Some("bsds"));
    assert!(matches!(message, Message::Record { time_extracted: None, .. }));

    let state: Message = serde_json::from_str(r#"{"type": "STATE", "value": {}}"#).unwrap();
    assert_eq!(state.stream(), None);
}

#[test]
fn test_memory_sink() {
    let mut sink = MemorySink::new();
    sink.schema("groups", &json!({}), &[], &[]).unwrap();
    sink.record("groups", &record(json!({"guid": "Ga"}))).unwrap();
    sink.schema("bsds", &json!({}), &[], &[]).unwrap();
    sink.record("bsds", &record(json!({"domain": "bit.ly"}))).unwrap();
    sink.record("groups", &record(json!({"guid": "Gb"}))).unwrap();
    sink.state(&json!({"bookmarks": {"groups": {}}})).unwrap();

    assert_eq!(sink.messages().len(), 6);
    assert_eq!(sink.record_count(), 3);
    assert_eq!(sink.schema_streams(), vec!["groups", "bsds"]);

    let guids: Vec<_> = sink
        .records("groups")
        .iter()
        .map(|r| r["guid"].clone())
        .collect();
    assert_eq!(guids, vec![json!("Ga"), json!("Gb")]);
    assert_eq!(sink.last_state(), Some(&json!({"bookmarks": {"groups": {}}})));
}
