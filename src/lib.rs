// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # tap-bitly
//!
//! A Singer tap for the Bitly v4 link-management API.
//!
//! ## Features
//!
//! - **Stream catalog**: groups, bitlinks, click metrics, campaigns, channels,
//!   organizations, webhooks and branded short domains
//! - **Parent/child streams**: child requests are driven by parent records
//! - **Pagination**: `next_page` cursors and HATEOAS `pagination.next` links
//! - **Isolation**: a failing request fails one context, never the run
//! - **Singer output**: SCHEMA, RECORD and STATE messages on stdout
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tap_bitly::config::TapConfig;
//! use tap_bitly::connector::{BitlyConnector, Connector};
//! use tap_bitly::output::SingerWriter;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> tap_bitly::Result<()> {
//!     let connector = BitlyConnector::new(TapConfig::new("my-token"))?;
//!     let mut writer = SingerWriter::stdout();
//!     let summary = connector
//!         .sync(None, &mut writer, &CancellationToken::new())
//!         .await?;
//!     eprintln!("{:?}", summary.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Connector Interface                         │
//! │  check() → CheckResult   discover() → Catalog   sync() → Summary│
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//!                  SyncPlan ─► SyncEngine ◄─ ContextPropagator
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │  Request │   HTTP    │   Paginate    │  Decode   │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Template │ Retry     │ Cursor        │ JSONPath  │ Singer      │
//! │ Query    │ Rate Limit│ Next URL      │ Str list  │ Memory      │
//! │ Context  │ Bearer    │ Repeat guard  │ Schema    │ State       │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// Tap configuration
pub mod config;

/// Authentication
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Stream contexts
pub mod context;

/// Path templates
pub mod template;

/// Pagination strategies
pub mod pagination;

/// Response decoders
pub mod decode;

/// Stream schemas and record validation
pub mod schema;

/// Stream definitions
pub mod stream;

/// The Bitly stream catalog
pub mod streams;

/// Request construction
pub mod request;

/// State management and checkpointing
pub mod state;

/// Singer output
pub mod output;

/// Main execution engine
pub mod engine;

/// Connector trait and the Bitly connector
pub mod connector;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use connector::{BitlyConnector, Connector};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
