//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs:
//!
//! ```json
//! {"bookmarks": {"daily_bitlink_clicks": {"partitions": [
//!     {"context": {"bitlink": "bit.ly/1"}, "replication_key_value": "2024-01-01T00:00:00+0000"}
//! ]}}}
//! ```

use crate::context::Context;
use crate::types::JsonValue;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Complete state for the tap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: BTreeMap<String, StreamState>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get state for a stream
    pub fn get_stream(&self, stream: &str) -> Option<&StreamState> {
        self.bookmarks.get(stream)
    }

    /// Get mutable state for a stream, creating if needed
    pub fn get_stream_mut(&mut self, stream: &str) -> &mut StreamState {
        self.bookmarks.entry(stream.to_string()).or_default()
    }

    /// Bookmark value of a stream context
    pub fn bookmark(&self, stream: &str, ctx: &Context) -> Option<&JsonValue> {
        let stream_state = self.get_stream(stream)?;
        if ctx.is_empty() {
            stream_state.replication_key_value.as_ref()
        } else {
            stream_state
                .get_partition(ctx)?
                .replication_key_value
                .as_ref()
        }
    }

    /// Record a finished stream context.
    ///
    /// Full-table streams (no replication key and no value) leave no trace.
    pub fn mark_synced(
        &mut self,
        stream: &str,
        replication_key: Option<&str>,
        ctx: &Context,
        value: Option<JsonValue>,
    ) {
        if replication_key.is_none() && value.is_none() {
            return;
        }

        let stream_state = self.get_stream_mut(stream);
        if let Some(key) = replication_key {
            stream_state.replication_key = Some(key.to_string());
        }

        let Some(value) = value else {
            return;
        };
        if ctx.is_empty() {
            stream_state.replication_key_value = Some(value);
        } else {
            stream_state.get_partition_mut(ctx).replication_key_value = Some(value);
        }
    }

    /// The state as a JSON value
    pub fn to_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// State for a single stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "StreamStateDoc")]
pub struct StreamState {
    /// Replication key the bookmark refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    /// Bookmark of a root stream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key_value: Option<JsonValue>,

    /// One entry per bookmarked child context
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    partitions: Vec<PartitionState>,

    /// Position of each partition by context id
    #[serde(skip)]
    index: HashMap<String, usize>,
}

/// Serialized shape of [`StreamState`]
#[derive(Deserialize)]
struct StreamStateDoc {
    #[serde(default)]
    replication_key: Option<String>,
    #[serde(default)]
    replication_key_value: Option<JsonValue>,
    #[serde(default)]
    partitions: Vec<PartitionState>,
}

impl From<StreamStateDoc> for StreamState {
    fn from(doc: StreamStateDoc) -> Self {
        let mut state = Self {
            replication_key: doc.replication_key,
            replication_key_value: doc.replication_key_value,
            ..Self::default()
        };
        for partition in doc.partitions {
            let ctx = partition.context.clone();
            *state.get_partition_mut(&ctx) = partition;
        }
        state
    }
}

impl PartialEq for StreamState {
    fn eq(&self, other: &Self) -> bool {
        self.replication_key == other.replication_key
            && self.replication_key_value == other.replication_key_value
            && self.partitions == other.partitions
    }
}

impl StreamState {
    /// Create a new empty stream state
    pub fn new() -> Self {
        Self::default()
    }

    /// Partitions in the order they were first bookmarked
    pub fn partitions(&self) -> &[PartitionState] {
        &self.partitions
    }

    /// Get partition state
    pub fn get_partition(&self, ctx: &Context) -> Option<&PartitionState> {
        self.index.get(&ctx.id()).map(|&i| &self.partitions[i])
    }

    /// Get mutable partition state, creating if needed
    pub fn get_partition_mut(&mut self, ctx: &Context) -> &mut PartitionState {
        let next = self.partitions.len();
        let index = *self.index.entry(ctx.id()).or_insert(next);
        if index == next {
            self.partitions.push(PartitionState::new(ctx.clone()));
        }
        &mut self.partitions[index]
    }
}

/// State for a single child context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionState {
    /// Context the partition was synced with
    pub context: Context,

    /// Bookmark within this partition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key_value: Option<JsonValue>,
}

impl PartitionState {
    /// Create a new partition state
    pub fn new(context: Context) -> Self {
        Self {
            context,
            replication_key_value: None,
        }
    }
}

/// Whether `candidate` is a later bookmark than `current`.
///
/// Timestamps are compared as instants, other strings lexically, numbers
/// numerically. Values of different kinds never replace each other.
pub fn is_newer(candidate: &JsonValue, current: &JsonValue) -> bool {
    match (candidate, current) {
        (JsonValue::String(a), JsonValue::String(b)) => {
            match (parse_timestamp(a), parse_timestamp(b)) {
                (Some(a), Some(b)) => a > b,
                _ => a > b,
            }
        }
        (JsonValue::Number(a), JsonValue::Number(b)) => a
            .as_f64()
            .zip(b.as_f64())
            .and_then(|(a, b)| a.partial_cmp(&b))
            .is_some_and(|ord| ord == Ordering::Greater),
        _ => false,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}
