//! HTTP module
//!
//! The sync engine talks to the API only through the [`HttpTransport`]
//! trait: one GET request in, one decoded response out. [`HttpClient`] is
//! the production implementation.
//!
//! # Features
//!
//! - **Automatic Retries**: 429, 5xx, timeouts and connect errors with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Authentication**: Bearer token via the auth module
//! - **User-Agent**: `tap-bitly/<version>` unless overridden

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{ApiRequest, ApiResponse, HttpTransport};
