//! Connector trait and the Bitly connector
//!
//! Ties the stream catalog, the HTTP client, state and the sync engine
//! together behind the four operations the CLI exposes.

use crate::config::TapConfig;
use crate::engine::{SyncConfig, SyncEngine, SyncPlan, SyncSummary};
use crate::error::Result;
use crate::http::{ApiRequest, HttpClient, HttpTransport};
use crate::output::MessageSink;
use crate::request::RequestBuilder;
use crate::state::StateManager;
use crate::stream::StreamDefinition;
use crate::streams::available_streams;
use crate::types::{JsonValue, ReplicationMethod};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Endpoint used to verify credentials
pub const CHECK_PATH: &str = "/v4/user";

// ============================================================================
// Check Result
// ============================================================================

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Detail message
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Singer catalog produced by discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// One entry per available stream, in plan order
    pub streams: Vec<CatalogEntry>,
}

impl Catalog {
    /// Look up a stream
    pub fn get(&self, stream: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|s| s.tap_stream_id == stream)
    }
}

/// One stream of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stream identifier
    pub tap_stream_id: String,

    /// Stream name
    pub stream: String,

    /// JSON schema of the records
    pub schema: JsonValue,

    /// Primary key fields
    pub key_properties: Vec<String>,

    /// How the stream is replicated
    pub replication_method: ReplicationMethod,

    /// Bookmark field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    /// Stream whose records drive this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_stream: Option<String>,
}

impl From<&StreamDefinition> for CatalogEntry {
    fn from(stream: &StreamDefinition) -> Self {
        Self {
            tap_stream_id: stream.name.clone(),
            stream: stream.name.clone(),
            schema: stream.schema.to_json_schema(),
            key_properties: stream.primary_key.clone(),
            replication_method: stream.replication_method(),
            replication_key: stream.replication_key.clone(),
            parent_stream: stream.parent.clone(),
        }
    }
}

// ============================================================================
// Connector Trait
// ============================================================================

/// Operations every connector exposes
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connector name
    fn name(&self) -> &str;

    /// Tests if credentials and configuration are valid
    async fn check(&self) -> Result<CheckResult>;

    /// Lists available streams with their schemas
    fn discover(&self) -> Result<Catalog>;

    /// Available stream names in the order a full sync runs them
    fn streams(&self) -> Result<Vec<String>>;

    /// Syncs the selected streams (all when `None`) into the sink
    async fn sync(
        &self,
        selection: Option<&[String]>,
        sink: &mut dyn MessageSink,
        cancel: &CancellationToken,
    ) -> Result<SyncSummary>;
}

// ============================================================================
// Bitly Connector
// ============================================================================

/// The Bitly v4 connector
pub struct BitlyConnector<T: HttpTransport = HttpClient> {
    config: TapConfig,
    engine: SyncEngine<T>,
}

impl BitlyConnector<HttpClient> {
    /// Create the connector with the production HTTP client
    pub fn new(config: TapConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::from_tap_config(&config)?;
        Ok(Self::with_transport(config, client))
    }
}

impl<T: HttpTransport> BitlyConnector<T> {
    /// Create the connector over any transport
    pub fn with_transport(config: TapConfig, transport: T) -> Self {
        let engine = SyncEngine::new(transport)
            .with_requests(RequestBuilder::new(config.page_size))
            .with_config(SyncConfig::new().with_start_date(config.start_date));
        Self { config, engine }
    }

    /// Set the state manager
    #[must_use]
    pub fn with_state(mut self, state: StateManager) -> Self {
        self.engine = self.engine.with_state(state);
        self
    }

    /// Set sync configuration; `start_date` defaults to the tap config's
    #[must_use]
    pub fn with_sync_config(mut self, config: SyncConfig) -> Self {
        let config = if config.start_date.is_none() {
            config.with_start_date(self.config.start_date)
        } else {
            config
        };
        self.engine = self.engine.with_config(config);
        self
    }

    /// The tap configuration
    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    /// The state manager
    pub fn state(&self) -> &StateManager {
        self.engine.state()
    }

    /// Build the plan for a selection
    pub fn plan(&self, selection: Option<&[String]>) -> Result<SyncPlan> {
        SyncPlan::build(available_streams(&self.config)?, selection)
    }
}

#[async_trait]
impl<T: HttpTransport> Connector for BitlyConnector<T> {
    fn name(&self) -> &str {
        crate::NAME
    }

    async fn check(&self) -> Result<CheckResult> {
        match self.engine.transport().execute(&ApiRequest::new(CHECK_PATH)).await {
            Ok(response) => {
                let login = response
                    .json()
                    .ok()
                    .and_then(|body| body.get("login").and_then(|v| v.as_str()).map(String::from));
                let message = match login {
                    Some(login) => format!("Authenticated as {login}"),
                    None => "Connection successful".to_string(),
                };
                info!(message = %message, "Connection check succeeded");
                Ok(CheckResult::success(message))
            }
            Err(e) => {
                warn!(error = %e, "Connection check failed");
                Ok(CheckResult::failure(format!("Connection failed: {e}")))
            }
        }
    }

    fn discover(&self) -> Result<Catalog> {
        let plan = self.plan(None)?;
        Ok(Catalog {
            streams: plan
                .entries()
                .iter()
                .map(|e| CatalogEntry::from(&e.definition))
                .collect(),
        })
    }

    fn streams(&self) -> Result<Vec<String>> {
        Ok(self
            .plan(None)?
            .names()
            .into_iter()
            .map(String::from)
            .collect())
    }

    async fn sync(
        &self,
        selection: Option<&[String]>,
        sink: &mut dyn MessageSink,
        cancel: &CancellationToken,
    ) -> Result<SyncSummary> {
        let plan = self.plan(selection)?;
        info!(streams = ?plan.names(), "Starting sync");

        let summary = self.engine.run(&plan, sink, cancel).await?;
        if !self.engine.state().is_in_memory() {
            self.engine.state().save().await?;
        }

        info!(
            status = ?summary.status,
            records = summary.records_emitted(),
            duration_ms = summary.duration_ms,
            "Sync finished"
        );
        Ok(summary)
    }
}

impl<T: HttpTransport> std::fmt::Debug for BitlyConnector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitlyConnector")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StreamStatus;
    use crate::error::Error;
    use crate::http::HttpClientConfig;
    use crate::output::MemorySink;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn connector(server: &MockServer, config: TapConfig) -> BitlyConnector {
        let client = HttpClient::with_auth(
            HttpClientConfig::builder()
                .base_url(server.uri())
                .max_retries(0)
                .no_rate_limit()
                .build(),
            crate::auth::Authenticator::bearer(config.token.clone()),
        )
        .unwrap();
        BitlyConnector::with_transport(config, client)
    }

    #[test]
    fn test_check_result() {
        let ok = CheckResult::success("fine");
        assert!(ok.success);
        assert_eq!(ok.message.as_deref(), Some("fine"));

        let failed = CheckResult::failure("Connection failed");
        assert!(!failed.success);
    }

    #[tokio::test]
    async fn test_check_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/user"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "jane"})))
            .mount(&server)
            .await;

        let result = connector(&server, TapConfig::new("tok")).check().await.unwrap();
        assert_eq!(result, CheckResult::success("Authenticated as jane"));
    }

    #[tokio::test]
    async fn test_check_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/user"))
            .respond_with(ResponseTemplate::new(403).set_body_string("FORBIDDEN"))
            .mount(&server)
            .await;

        let result = connector(&server, TapConfig::new("bad")).check().await.unwrap();
        assert!(!result.success);
        assert!(result.message.unwrap().contains("403"));
    }

    #[tokio::test]
    async fn test_discover_and_streams() {
        let server = MockServer::start().await;
        let free = connector(&server, TapConfig::new("t"));

        let names = free.streams().unwrap();
        assert!(!names.contains(&"webhooks".to_string()));
        assert_eq!(names[0], "groups");

        let catalog = free.discover().unwrap();
        assert_eq!(catalog.streams.len(), names.len());
        let bitlinks = catalog.get("bitlinks").unwrap();
        assert_eq!(bitlinks.key_properties, vec!["id"]);
        assert_eq!(bitlinks.parent_stream.as_deref(), Some("groups"));
        assert_eq!(bitlinks.replication_method, ReplicationMethod::FullTable);
        assert_eq!(bitlinks.schema["type"], "object");

        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json["streams"][0].get("parent_stream").is_none());

        let paid = connector(&server, TapConfig::new("t").with_paid_streams(true));
        assert!(paid.streams().unwrap().contains(&"webhooks".to_string()));
    }

    #[tokio::test]
    async fn test_sync_rejects_unavailable_stream() {
        let server = MockServer::start().await;
        let free = connector(&server, TapConfig::new("t"));
        let mut sink = MemorySink::new();

        let selection = vec!["webhooks".to_string()];
        let err = free
            .sync(Some(&selection), &mut sink, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StreamNotFound { .. }));
    }

    #[tokio::test]
    async fn test_sync_saves_state_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/bsds"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bsds": ["bit.ly"]})))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let state_path = dir.path().join("state.json");
        let tap = connector(&server, TapConfig::new("t"))
            .with_state(StateManager::from_file(&state_path).unwrap());

        let selection = vec!["bsds".to_string()];
        let mut sink = MemorySink::new();
        let summary = tap
            .sync(Some(&selection), &mut sink, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.status, StreamStatus::Succeeded);
        assert_eq!(sink.records("bsds").len(), 1);
        let saved: JsonValue =
            serde_json::from_str(&std::fs::read_to_string(&state_path).unwrap()).unwrap();
        assert_eq!(saved, json!({"bookmarks": {}}));
    }
}
