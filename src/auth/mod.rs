//! Authentication module
//!
//! Bitly authenticates every request with an OAuth access token sent as a
//! bearer `Authorization` header. The `Authenticator` attaches it to
//! outgoing requests; the token itself is never logged.

mod authenticator;

pub use authenticator::{AuthConfig, Authenticator};

#[cfg(test)]
mod tests;
