//! Response decoder module
//!
//! Supports: JSON arrays located by JSONPath, lists of strings
//!
//! # Overview
//!
//! A decoder turns the parsed body of one response page into records. The
//! records location is mandatory: a page that does not carry it is a parse
//! failure rather than an empty page.

mod decoders;
mod types;

pub use decoders::{JsonDecoder, StringListDecoder};
pub use types::{DecoderConfig, RecordDecoder};
