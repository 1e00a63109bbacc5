//! Tests for StateManager

use super::*;
use crate::context::Context;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_state_manager_new() {
    let manager = StateManager::new("/tmp/tap-bitly-state.json");
    assert!(!manager.is_in_memory());
    assert_eq!(
        manager.path().to_str().unwrap(),
        "/tmp/tap-bitly-state.json"
    );
}

#[test]
fn test_state_manager_in_memory() {
    let manager = StateManager::in_memory();
    assert!(manager.is_in_memory());
}

#[tokio::test]
async fn test_from_json() {
    let manager = StateManager::from_json(
        r#"{"bookmarks": {"bitlinks": {"partitions": [{"context": {"group_guid": "Ga"}}]}}}"#,
    )
    .unwrap();
    assert!(manager.is_in_memory());

    let state = manager.state().await;
    let ctx = Context::new().with("group_guid", "Ga");
    assert!(state.get_stream("bitlinks").unwrap().get_partition(&ctx).is_some());
}

#[test]
fn test_from_json_invalid() {
    let err = StateManager::from_json("{not json").unwrap_err();
    assert!(matches!(err, crate::error::Error::State { .. }));
}

#[tokio::test]
async fn test_from_json_empty_document() {
    let manager = StateManager::from_json("  ").unwrap();
    assert_eq!(manager.snapshot().await, json!({"bookmarks": {}}));
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let manager = StateManager::new(&path);
    let ctx = Context::new().with("bitlink", "bit.ly/1");
    manager
        .mark_synced("daily_bitlink_clicks", Some("date"), &ctx, Some(json!("2024-01-01")))
        .await;
    assert!(!path.exists());

    manager.save().await.unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let reloaded = StateManager::from_file(&path).unwrap();
    assert_eq!(reloaded.snapshot().await, manager.snapshot().await);
    assert_eq!(
        reloaded.starting_value("daily_bitlink_clicks", &ctx, None).await,
        Some(json!("2024-01-01"))
    );
}

#[tokio::test]
async fn test_full_table_children_keep_state_file_small() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let manager = StateManager::new(&path);
    for i in 0..500 {
        let ctx = Context::new().with("bitlink", format!("bit.ly/{i}"));
        manager
            .mark_synced("daily_bitlink_clicks", None, &ctx, None)
            .await;
    }
    manager.save().await.unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved, json!({"bookmarks": {}}));
}

#[tokio::test]
async fn test_from_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let manager = StateManager::from_file(dir.path().join("missing.json")).unwrap();
    assert_eq!(manager.snapshot().await, json!({"bookmarks": {}}));
}

#[test]
fn test_from_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "[1, 2").unwrap();

    assert!(StateManager::from_file(&path).is_err());
}

#[tokio::test]
async fn test_in_memory_save_is_noop() {
    let manager = StateManager::in_memory();
    manager
        .mark_synced("campaigns", Some("modified"), &Context::new(), Some(json!("2024-01-01")))
        .await;
    manager.save().await.unwrap();
    assert_eq!(
        manager.snapshot().await["bookmarks"]["campaigns"]["replication_key_value"],
        json!("2024-01-01")
    );
}

#[tokio::test]
async fn test_clone_shares_state() {
    let manager = StateManager::in_memory();
    let clone = manager.clone();

    clone
        .mark_synced("campaigns", Some("modified"), &Context::new(), Some(json!("2024-03-01")))
        .await;
    assert_eq!(manager.snapshot().await, clone.snapshot().await);
}

// ============================================================================
// Bookmark Tests
// ============================================================================

#[tokio::test]
async fn test_starting_value_uses_start_date_floor() {
    let manager = StateManager::in_memory();
    let root = Context::new();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    assert_eq!(manager.starting_value("campaigns", &root, None).await, None);
    assert_eq!(
        manager.starting_value("campaigns", &root, Some(start)).await,
        Some(json!("2024-01-01T00:00:00Z"))
    );

    manager
        .mark_synced("campaigns", Some("modified"), &root, Some(json!("2024-06-01T00:00:00Z")))
        .await;
    assert_eq!(
        manager.starting_value("campaigns", &root, Some(start)).await,
        Some(json!("2024-06-01T00:00:00Z"))
    );

    let later = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(
        manager.starting_value("campaigns", &root, Some(later)).await,
        Some(json!("2025-01-01T00:00:00Z"))
    );
}
