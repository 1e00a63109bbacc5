//! Output module
//!
//! Routes schemas, records and state checkpoints to a [`MessageSink`].
//!
//! # Overview
//!
//! This module provides:
//! - [`Message`] - the Singer `SCHEMA` / `RECORD` / `STATE` messages
//! - [`SingerWriter`] - JSON lines on any `io::Write` (stdout in the CLI)
//! - [`MemorySink`] - collects messages in memory

mod message;
mod writer;

pub use message::Message;
pub use writer::{MemorySink, MessageSink, SingerWriter};

#[cfg(test)]
mod tests;
