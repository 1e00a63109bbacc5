//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TapConfig;
use crate::connector::{BitlyConnector, Connector};
use crate::engine::{SchemaPolicy, SyncConfig, SyncSummary};
use crate::error::{Error, Result, ResultExt};
use crate::output::SingerWriter;
use crate::state::StateManager;
use serde_json::{json, Value};
use std::io::{BufWriter, Write};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command.
    ///
    /// Returns an error when the command did not fully succeed; the caller
    /// maps that to a non-zero exit code.
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Discover => self.discover(),
            Commands::Sync { streams, strict } => self.sync(streams.as_deref(), *strict).await,
            Commands::Streams => self.streams(),
        }
    }

    /// Load configuration; inline JSON takes precedence over the file
    fn load_config(&self) -> Result<TapConfig> {
        if let Some(json_str) = &self.cli.config_json {
            return TapConfig::from_json(json_str);
        }

        if let Some(path) = &self.cli.config {
            return TapConfig::from_file(path);
        }

        Err(Error::config(
            "No configuration given (use --config or --config-json)",
        ))
    }

    /// Load state
    fn load_state(&self) -> Result<StateManager> {
        match &self.cli.state {
            Some(path) => StateManager::from_file(path),
            None => Ok(StateManager::in_memory()),
        }
    }

    fn connector(&self) -> Result<BitlyConnector> {
        BitlyConnector::new(self.load_config()?)
    }

    /// Check connection
    async fn check(&self) -> Result<()> {
        let connector = self.connector()?;
        let result = connector.check().await?;

        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": if result.success { "SUCCEEDED" } else { "FAILED" },
                "message": result.message
            }
        }));

        if result.success {
            Ok(())
        } else {
            Err(Error::Other("Connection check failed".to_string()))
        }
    }

    /// Discover streams
    fn discover(&self) -> Result<()> {
        let catalog = self.connector()?.discover()?;
        let value = serde_json::to_value(&catalog)?;
        self.output_message(&value);
        Ok(())
    }

    /// List stream names
    fn streams(&self) -> Result<()> {
        let connector = self.connector()?;
        let names = connector.streams()?;

        self.output_message(&json!({
            "type": "STREAMS",
            "streams": names,
            "connector": connector.name()
        }));

        Ok(())
    }

    /// Sync streams to stdout, summary to stderr
    async fn sync(&self, streams: Option<&str>, strict: bool) -> Result<()> {
        let cancel = CancellationToken::new();
        let signal_token = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping after the current page");
                signal_token.cancel();
            }
        });

        let (_, summary) = self
            .sync_to(
                streams,
                strict,
                BufWriter::new(std::io::stdout()),
                &mut std::io::stderr(),
                &cancel,
            )
            .await?;

        if summary.is_success() {
            Ok(())
        } else {
            Err(Error::Other(format!(
                "Sync finished with status {}",
                serde_json::to_value(summary.status)?
                    .as_str()
                    .unwrap_or("unknown")
            )))
        }
    }

    /// Run a sync writing Singer messages to `out` and the
    /// `SYNC_SUMMARY` line to `diagnostics`
    async fn sync_to<W: Write + Send>(
        &self,
        streams: Option<&str>,
        strict: bool,
        out: W,
        diagnostics: &mut dyn Write,
        cancel: &CancellationToken,
    ) -> Result<(W, SyncSummary)> {
        let policy = if strict {
            SchemaPolicy::AbortStream
        } else {
            SchemaPolicy::DropAndReport
        };
        let connector = self
            .connector()?
            .with_state(self.load_state()?)
            .with_sync_config(SyncConfig::new().with_schema_policy(policy));

        let selection = Commands::selection(streams);
        let mut writer = SingerWriter::new(out);
        let summary = connector
            .sync(selection.as_deref(), &mut writer, cancel)
            .await?;
        let mut out = writer.into_inner();
        out.flush().context("Failed to flush Singer output")?;

        if let Some(path) = &self.cli.state {
            info!(path = %path.display(), "State saved");
        }

        writeln!(
            diagnostics,
            "{}",
            self.render(&json!({
                "type": "SYNC_SUMMARY",
                "summary": summary
            }))
        )?;

        Ok((out, summary))
    }

    /// Output a message on stdout
    fn output_message(&self, msg: &Value) {
        println!("{}", self.render(msg));
    }

    fn render(&self, msg: &Value) -> String {
        match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg).unwrap_or_default(),
            OutputFormat::Pretty => serde_json::to_string_pretty(msg).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_sync_keeps_summary_off_singer_output() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/bsds"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bsds": ["bit.ly"]})))
            .mount(&server)
            .await;

        let config = json!({"token": "t", "api_url": server.uri()}).to_string();
        let cli = Cli::parse_from([
            "tap-bitly",
            "--config-json",
            config.as_str(),
            "sync",
            "--streams",
            "bsds",
        ]);
        let runner = Runner::new(cli);

        let mut diagnostics = Vec::new();
        let (out, summary) = runner
            .sync_to(
                Some("bsds"),
                false,
                Vec::new(),
                &mut diagnostics,
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(summary.is_success());

        let types: Vec<String> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).unwrap()["type"].to_string())
            .collect();
        assert_eq!(types, vec!["\"SCHEMA\"", "\"RECORD\"", "\"STATE\""]);

        let summary_line: Value =
            serde_json::from_str(String::from_utf8(diagnostics).unwrap().trim()).unwrap();
        assert_eq!(summary_line["type"], "SYNC_SUMMARY");
        assert_eq!(summary_line["summary"]["status"], "succeeded");
    }
}
