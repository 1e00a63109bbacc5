//! Engine types
//!
//! Configuration for a sync run and the summary it produces.

use crate::error::{Error, ErrorKind};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Configuration
// ============================================================================

/// What to do with a record that fails schema validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaPolicy {
    /// Drop the record, log a warning and count it
    #[default]
    DropAndReport,
    /// Fail the current context and skip the rest of the stream
    AbortStream,
}

/// Configuration for sync operation
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Handling of invalid records
    pub schema_policy: SchemaPolicy,
    /// Bookmark floor for streams with a replication key
    pub start_date: Option<DateTime<Utc>>,
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the schema policy
    #[must_use]
    pub fn with_schema_policy(mut self, policy: SchemaPolicy) -> Self {
        self.schema_policy = policy;
        self
    }

    /// Set the start date
    #[must_use]
    pub fn with_start_date(mut self, start_date: Option<DateTime<Utc>>) -> Self {
        self.start_date = start_date;
        self
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Outcome of a whole stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    /// Every context finished
    #[default]
    Succeeded,
    /// Some contexts finished, others failed or were skipped
    Partial,
    /// No context finished and at least one failed
    Failed,
    /// The run was stopped before the stream finished
    Aborted,
}

/// A context that ended in FAILED
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextFailure {
    /// Context id (`key=value,...`, empty for root streams)
    pub context: String,
    /// Error category
    pub kind: ErrorKind,
    /// Error message
    pub message: String,
}

impl ContextFailure {
    /// Describe a failed context
    pub fn new(context: impl Into<String>, error: &Error) -> Self {
        Self {
            context: context.into(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Counters for one stream of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamReport {
    /// Stream name
    pub stream: String,
    /// Whether records were emitted (false for implicit ancestors)
    pub selected: bool,
    /// Final status
    pub status: StreamStatus,
    /// Records decoded from responses
    pub records_read: usize,
    /// Records sent to the sink
    pub records_emitted: usize,
    /// Records dropped by schema validation
    pub records_dropped: usize,
    /// Pages fetched
    pub pages_fetched: usize,
    /// Contexts that reached DONE
    pub contexts_completed: usize,
    /// Contexts that reached FAILED
    pub contexts_failed: usize,
    /// Contexts never started (bad parent record or aborted stream)
    pub contexts_skipped: usize,
    /// Contexts stopped or never started because of the stop signal
    pub contexts_aborted: usize,
    /// Details of failed contexts
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ContextFailure>,
}

impl StreamReport {
    /// Create an empty report
    pub fn new(stream: impl Into<String>, selected: bool) -> Self {
        Self {
            stream: stream.into(),
            selected,
            ..Default::default()
        }
    }

    /// Record a failed context
    pub fn add_failure(&mut self, context: impl Into<String>, error: &Error) {
        self.contexts_failed += 1;
        self.failures.push(ContextFailure::new(context, error));
    }

    /// Compute the final status
    pub fn finalize(&mut self, run_aborted: bool) {
        self.status = if self.contexts_aborted > 0 || run_aborted {
            StreamStatus::Aborted
        } else if self.contexts_failed == 0 && self.contexts_skipped == 0 {
            StreamStatus::Succeeded
        } else if self.contexts_completed == 0 && self.contexts_failed > 0 {
            StreamStatus::Failed
        } else {
            StreamStatus::Partial
        };
    }
}

/// Summary of a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    /// Overall status
    pub status: StreamStatus,
    /// One report per planned stream, in plan order
    pub streams: Vec<StreamReport>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncSummary {
    /// Build the summary from finished reports
    pub fn new(streams: Vec<StreamReport>, duration_ms: u64) -> Self {
        let status = if streams.iter().any(|r| r.status == StreamStatus::Aborted) {
            StreamStatus::Aborted
        } else if streams.iter().all(|r| r.status == StreamStatus::Succeeded) {
            StreamStatus::Succeeded
        } else if streams.iter().all(|r| r.status == StreamStatus::Failed) {
            StreamStatus::Failed
        } else {
            StreamStatus::Partial
        };

        Self {
            status,
            streams,
            duration_ms,
        }
    }

    /// Whether every stream succeeded
    pub fn is_success(&self) -> bool {
        self.status == StreamStatus::Succeeded
    }

    /// Report of one stream
    pub fn report(&self, stream: &str) -> Option<&StreamReport> {
        self.streams.iter().find(|r| r.stream == stream)
    }

    /// Records emitted across all streams
    pub fn records_emitted(&self) -> usize {
        self.streams.iter().map(|r| r.records_emitted).sum()
    }

    /// Records dropped across all streams
    pub fn records_dropped(&self) -> usize {
        self.streams.iter().map(|r| r.records_dropped).sum()
    }

    /// Failed contexts across all streams
    pub fn contexts_failed(&self) -> usize {
        self.streams.iter().map(|r| r.contexts_failed).sum()
    }
}
