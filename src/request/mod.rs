//! Request construction
//!
//! Turns `(stream, context, page token)` into the next [`ApiRequest`]. The
//! path comes from the stream's template bound to the context; the query
//! comes from the stream's [`QueryStrategy`] and the page token.
//!
//! [`ApiRequest`]: crate::http::ApiRequest

mod builder;

pub use builder::{QueryStrategy, RequestBuilder};
