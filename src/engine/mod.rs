//! Execution engine module
//!
//! Main read loop and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncPlan` - Parent-before-child ordering of the selected streams
//! - `ContextPropagator` - Queues of child contexts built from parent records
//! - `SyncEngine` - Drives every (stream, context) pair to exhaustion
//! - `SyncSummary` - Per-stream counters and status of a run
//!
//! Each (stream, context) pair runs the loop
//! `build request → execute → parse → validate → emit → next token` and ends
//! in one of three states: DONE (no token), FAILED (request, parse or schema
//! error; other contexts and streams carry on) or ABORTED (stop signal,
//! checked before every page).

mod plan;
mod propagator;
mod types;

pub use plan::{PlanEntry, SyncPlan};
pub use propagator::ContextPropagator;
pub use types::{
    ContextFailure, SchemaPolicy, StreamReport, StreamStatus, SyncConfig, SyncSummary,
};

use crate::context::Context;
use crate::error::{Error, ErrorKind, Result};
use crate::http::HttpTransport;
use crate::output::MessageSink;
use crate::pagination::PageToken;
use crate::request::RequestBuilder;
use crate::schema::RecordValidator;
use crate::state::{is_newer, StateManager};
use crate::stream::StreamDefinition;
use crate::types::JsonValue;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How one (stream, context) traversal ended
#[derive(Debug)]
enum ContextOutcome {
    /// Pagination exhausted; carries the highest replication key value seen
    Done(Option<JsonValue>),
    /// Stopped by an error
    Failed(Error),
    /// Stopped by the stop signal
    Aborted,
}

/// Sync engine for orchestrating data extraction
pub struct SyncEngine<T: HttpTransport> {
    /// HTTP transport
    transport: T,
    /// Request construction
    requests: RequestBuilder,
    /// Record validation, defaults to the plan's declared schemas
    validator: Option<Box<dyn RecordValidator>>,
    /// State manager
    state: StateManager,
    /// Sync configuration
    config: SyncConfig,
}

impl<T: HttpTransport> SyncEngine<T> {
    /// Create a new sync engine with in-memory state
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            requests: RequestBuilder::default(),
            validator: None,
            state: StateManager::in_memory(),
            config: SyncConfig::default(),
        }
    }

    /// Set the request builder
    #[must_use]
    pub fn with_requests(mut self, requests: RequestBuilder) -> Self {
        self.requests = requests;
        self
    }

    /// Set the record validator
    #[must_use]
    pub fn with_validator(mut self, validator: impl RecordValidator + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Set the state manager
    #[must_use]
    pub fn with_state(mut self, state: StateManager) -> Self {
        self.state = state;
        self
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run every stream of the plan.
    ///
    /// Stream and context failures are reported in the summary. Only sink
    /// and state persistence errors abort the run with `Err`.
    pub async fn run(
        &self,
        plan: &SyncPlan,
        sink: &mut dyn MessageSink,
        cancel: &CancellationToken,
    ) -> Result<SyncSummary> {
        let start = Instant::now();
        let declared;
        let validator: &dyn RecordValidator = match &self.validator {
            Some(validator) => validator.as_ref(),
            None => {
                declared = plan.schemas();
                &declared
            }
        };

        let mut propagator = ContextPropagator::new(plan);
        let mut reports = Vec::with_capacity(plan.len());
        let mut aborted = false;

        for entry in plan.entries() {
            let stream = &entry.definition;
            let mut report = StreamReport::new(&stream.name, entry.emit);
            report.contexts_skipped = propagator.take_skipped(&stream.name);

            info!(
                stream = %stream.name,
                selected = entry.emit,
                contexts = propagator.pending(&stream.name),
                "Starting stream"
            );

            // Streams reached after a stop signal never start.
            let started = !aborted;
            if entry.emit && started {
                let bookmark_properties: Vec<String> =
                    stream.replication_key.iter().cloned().collect();
                sink.schema(
                    &stream.name,
                    &stream.schema.to_json_schema(),
                    &stream.primary_key,
                    &bookmark_properties,
                )?;
            }

            let mut halted = false;
            while let Some(ctx) = propagator.pop(&stream.name) {
                if aborted {
                    report.contexts_aborted += 1;
                    continue;
                }
                if halted {
                    report.contexts_skipped += 1;
                    continue;
                }

                let outcome = self
                    .sync_context(
                        stream,
                        entry.emit,
                        &ctx,
                        validator,
                        &mut propagator,
                        sink,
                        cancel,
                        &mut report,
                    )
                    .await?;

                match outcome {
                    ContextOutcome::Done(bookmark) => {
                        report.contexts_completed += 1;
                        if entry.emit {
                            self.state
                                .mark_synced(
                                    &stream.name,
                                    stream.replication_key.as_deref(),
                                    &ctx,
                                    bookmark,
                                )
                                .await;
                        }
                    }
                    ContextOutcome::Failed(error) => {
                        warn!(stream = %stream.name, context = %ctx, error = %error, "Context failed");
                        if error.kind() == ErrorKind::Schema
                            && self.config.schema_policy == SchemaPolicy::AbortStream
                        {
                            halted = true;
                        }
                        report.add_failure(ctx.id(), &error);
                    }
                    ContextOutcome::Aborted => {
                        warn!(stream = %stream.name, context = %ctx, "Sync aborted by stop signal");
                        report.contexts_aborted += 1;
                        aborted = true;
                    }
                }
            }

            if entry.emit && started {
                self.state.save().await?;
                sink.state(&self.state.snapshot().await)?;
            }

            report.finalize(aborted);
            info!(
                stream = %stream.name,
                status = ?report.status,
                records = report.records_emitted,
                dropped = report.records_dropped,
                pages = report.pages_fetched,
                failed_contexts = report.contexts_failed,
                "Finished stream"
            );
            reports.push(report);
        }

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;
        Ok(SyncSummary::new(reports, duration_ms))
    }

    /// Drive one (stream, context) pair to exhaustion
    #[allow(clippy::too_many_arguments)]
    async fn sync_context(
        &self,
        stream: &StreamDefinition,
        emit: bool,
        ctx: &Context,
        validator: &dyn RecordValidator,
        propagator: &mut ContextPropagator,
        sink: &mut dyn MessageSink,
        cancel: &CancellationToken,
        report: &mut StreamReport,
    ) -> Result<ContextOutcome> {
        let paginator = stream.pagination.paginator();
        let has_children = propagator.has_children(&stream.name);
        let mut token: Option<PageToken> = None;
        let mut bookmark = match &stream.replication_key {
            Some(_) => {
                self.state
                    .starting_value(&stream.name, ctx, self.config.start_date)
                    .await
            }
            None => None,
        };

        loop {
            if cancel.is_cancelled() {
                return Ok(ContextOutcome::Aborted);
            }

            let request = match self.requests.build(stream, ctx, token.as_ref()) {
                Ok(request) => request,
                Err(e) => return Ok(ContextOutcome::Failed(e)),
            };

            let body = match self.transport.execute(&request).await {
                Ok(response) => match response.json() {
                    Ok(body) => body,
                    Err(e) => return Ok(ContextOutcome::Failed(e)),
                },
                Err(e) => return Ok(ContextOutcome::Failed(e)),
            };
            report.pages_fetched += 1;

            let records = match stream.parse_records(&body) {
                Ok(records) => records,
                Err(e) => return Ok(ContextOutcome::Failed(e)),
            };
            debug!(
                stream = %stream.name,
                context = %ctx,
                path = %request.path,
                records = records.len(),
                "Fetched page"
            );

            for mut record in records {
                report.records_read += 1;
                stream.enrich(&mut record, ctx);

                if let Err(e) = validator.validate(&stream.name, &record) {
                    match self.config.schema_policy {
                        SchemaPolicy::DropAndReport => {
                            warn!(stream = %stream.name, context = %ctx, error = %e, "Dropping invalid record");
                            report.records_dropped += 1;
                            if has_children {
                                propagator.skip(&stream.name);
                            }
                            continue;
                        }
                        SchemaPolicy::AbortStream => return Ok(ContextOutcome::Failed(e)),
                    }
                }

                if has_children {
                    match stream.child_context(&record) {
                        Ok(Some(child)) => propagator.push(&stream.name, &child),
                        Ok(None) => {}
                        Err(e) => {
                            warn!(stream = %stream.name, error = %e, "Skipping child context");
                            propagator.skip(&stream.name);
                        }
                    }
                }

                if let Some(value) = stream
                    .replication_key
                    .as_ref()
                    .and_then(|key| record.get(key))
                    .filter(|v| !v.is_null())
                {
                    if bookmark.as_ref().map_or(true, |current| is_newer(value, current)) {
                        bookmark = Some(value.clone());
                    }
                }

                if emit {
                    sink.record(&stream.name, &record)?;
                    report.records_emitted += 1;
                }
            }

            token = match paginator.next_token(&body, token.as_ref()) {
                Ok(Some(next)) => Some(next),
                Ok(None) => return Ok(ContextOutcome::Done(bookmark)),
                Err(e) => return Ok(ContextOutcome::Failed(e)),
            };
        }
    }
}

impl<T: HttpTransport> std::fmt::Debug for SyncEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("requests", &self.requests)
            .field("has_validator", &self.validator.is_some())
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
