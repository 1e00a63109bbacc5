//! State manager implementation
//!
//! Provides file-based state persistence with atomic writes. Updates stay
//! in memory until the engine checkpoints a finished stream.

use super::types::{is_newer, State};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// State manager for persisting and loading state
#[derive(Debug)]
pub struct StateManager {
    /// Path to the state file
    path: PathBuf,
    /// Current state (cached)
    state: Arc<RwLock<State>>,
}

impl StateManager {
    /// Create a new state manager with the given path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: Arc::new(RwLock::new(State::new())),
        }
    }

    /// Create an in-memory state manager (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(State::new())),
        }
    }

    /// Create a state manager from a file, loading existing state if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;
            parse_state(&contents)?
        } else {
            State::new()
        };

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Create a state manager from inline JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(parse_state(json)?)),
        })
    }

    /// Save current state to file
    pub async fn save(&self) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let contents = self.to_json_pretty().await?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::state(format!("Failed to write state file: {e}")))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to rename state file: {e}")))?;

        debug!(path = %self.path.display(), "State saved");
        Ok(())
    }

    /// Get a read lock on the current state
    pub async fn state(&self) -> tokio::sync::RwLockReadGuard<'_, State> {
        self.state.read().await
    }

    /// Current state as a JSON value
    pub async fn snapshot(&self) -> JsonValue {
        self.state.read().await.to_value()
    }

    /// Export state as pretty-printed JSON string
    pub async fn to_json_pretty(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string_pretty(&*state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))
    }

    /// Bookmark to resume a stream context from.
    ///
    /// The stored bookmark, floored at `start_date` when one is configured.
    pub async fn starting_value(
        &self,
        stream: &str,
        ctx: &Context,
        start_date: Option<DateTime<Utc>>,
    ) -> Option<JsonValue> {
        let state = self.state.read().await;
        let bookmark = state.bookmark(stream, ctx).cloned();
        let floor = start_date
            .map(|d| JsonValue::String(d.to_rfc3339_opts(SecondsFormat::Secs, true)));

        match (bookmark, floor) {
            (Some(bookmark), Some(floor)) if is_newer(&floor, &bookmark) => Some(floor),
            (Some(bookmark), _) => Some(bookmark),
            (None, floor) => floor,
        }
    }

    /// Record a finished stream context in memory.
    ///
    /// Nothing is written until [`save`](Self::save) runs.
    pub async fn mark_synced(
        &self,
        stream: &str,
        replication_key: Option<&str>,
        ctx: &Context,
        value: Option<JsonValue>,
    ) {
        self.state
            .write()
            .await
            .mark_synced(stream, replication_key, ctx, value);
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

/// Parse a state document, treating an empty document as empty state
fn parse_state(contents: &str) -> Result<State> {
    if contents.trim().is_empty() {
        return Ok(State::new());
    }
    serde_json::from_str(contents)
        .map_err(|e| Error::state(format!("Failed to parse state: {e}")))
}
