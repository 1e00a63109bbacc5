//! Stream definition and per-page record handling

use crate::context::Context;
use crate::decode::DecoderConfig;
use crate::error::{Error, Result};
use crate::pagination::PaginationConfig;
use crate::request::QueryStrategy;
use crate::schema::StreamSchema;
use crate::template;
use crate::types::{scalar_to_string, JsonValue, Record, ReplicationMethod};
use tracing::debug;

// ============================================================================
// Child Context Mapping
// ============================================================================

/// How a parent record becomes a child context: `placeholder ← record field`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildContextMapping {
    bindings: Vec<(String, String)>,
}

impl ChildContextMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a placeholder to a record field
    #[must_use]
    pub fn bind(mut self, placeholder: impl Into<String>, field: impl Into<String>) -> Self {
        self.bindings.push((placeholder.into(), field.into()));
        self
    }

    /// Placeholder names this mapping provides
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(p, _)| p.as_str())
    }

    /// Build the context for one record
    pub fn context_for(&self, record: &Record) -> Result<Context> {
        let mut ctx = Context::new();
        for (placeholder, field) in &self.bindings {
            let value = record
                .get(field)
                .ok_or_else(|| Error::child_context(field, "field is missing"))?;
            let value = scalar_to_string(value)
                .ok_or_else(|| Error::child_context(field, format!("not a scalar: {value}")))?;
            ctx.insert(placeholder, value);
        }
        Ok(ctx)
    }
}

// ============================================================================
// Stream Definition
// ============================================================================

/// Immutable descriptor of one stream
#[derive(Debug, Clone)]
pub struct StreamDefinition {
    /// Unique stream name
    pub name: String,
    /// Path template, may contain `{placeholder}`s
    pub path: String,
    /// Primary key fields, in order
    pub primary_key: Vec<String>,
    /// Declared schema
    pub schema: StreamSchema,
    /// Parent stream name
    pub parent: Option<String>,
    /// Field used for incremental bookmarks
    pub replication_key: Option<String>,
    /// Pagination strategy
    pub pagination: PaginationConfig,
    /// Query strategy
    pub query: QueryStrategy,
    /// Record decoder
    pub decoder: DecoderConfig,
    /// Context handed to child streams
    pub child_context: Option<ChildContextMapping>,
    /// Only available on paid plans
    pub requires_paid_plan: bool,
}

impl StreamDefinition {
    /// Create a root, full-table stream with default pagination and query
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        schema: StreamSchema,
        decoder: DecoderConfig,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            primary_key: Vec::new(),
            schema,
            parent: None,
            replication_key: None,
            pagination: PaginationConfig::default(),
            query: QueryStrategy::Default,
            decoder,
            child_context: None,
            requires_paid_plan: false,
        }
    }

    /// Set the primary key
    #[must_use]
    pub fn primary_key<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the parent stream
    #[must_use]
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the replication key
    #[must_use]
    pub fn replication_key(mut self, key: impl Into<String>) -> Self {
        self.replication_key = Some(key.into());
        self
    }

    /// Set the pagination strategy
    #[must_use]
    pub fn pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Set the query strategy
    #[must_use]
    pub fn query(mut self, query: QueryStrategy) -> Self {
        self.query = query;
        self
    }

    /// Set the child context mapping
    #[must_use]
    pub fn with_child_context(mut self, mapping: ChildContextMapping) -> Self {
        self.child_context = Some(mapping);
        self
    }

    /// Mark as paid-plan only
    #[must_use]
    pub fn paid(mut self) -> Self {
        self.requires_paid_plan = true;
        self
    }

    /// Whether this stream has no parent
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Placeholder names in the path template
    pub fn placeholders(&self) -> Vec<String> {
        template::placeholders(&self.path)
    }

    /// Replication method derived from the replication key
    pub fn replication_method(&self) -> ReplicationMethod {
        if self.replication_key.is_some() {
            ReplicationMethod::Incremental
        } else {
            ReplicationMethod::FullTable
        }
    }

    /// Decode one response page into schema-conformed records
    pub fn parse_records(&self, body: &JsonValue) -> Result<Vec<Record>> {
        let mut records = self.decoder.decoder().decode(body)?;
        for record in &mut records {
            let undeclared = self.schema.conform(record);
            if !undeclared.is_empty() {
                debug!(stream = %self.name, ?undeclared, "Removed undeclared properties");
            }
        }
        Ok(records)
    }

    /// Context for this record's children, `None` if the stream has no children
    pub fn child_context(&self, record: &Record) -> Result<Option<Context>> {
        self.child_context
            .as_ref()
            .map(|mapping| mapping.context_for(record))
            .transpose()
    }

    /// Add context values missing from a record
    pub fn enrich(&self, record: &mut Record, ctx: &Context) {
        for (key, value) in ctx.iter() {
            if !record.contains_key(key) {
                record.insert(key.to_string(), JsonValue::String(value.to_string()));
            }
        }
    }
}
