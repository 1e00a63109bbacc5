//! Message sinks

use super::message::Message;
use crate::error::{Error, Result};
use crate::types::{JsonValue, Record};
use chrono::Utc;
use std::io::{BufWriter, Stdout, Write};

/// Receives the tap's output. Ordering within a stream is preserved.
pub trait MessageSink: Send {
    /// Announce a stream's schema
    fn schema(
        &mut self,
        stream: &str,
        schema: &JsonValue,
        key_properties: &[String],
        bookmark_properties: &[String],
    ) -> Result<()>;

    /// Emit one record
    fn record(&mut self, stream: &str, record: &Record) -> Result<()>;

    /// Emit a state checkpoint
    fn state(&mut self, value: &JsonValue) -> Result<()>;
}

// ============================================================================
// Singer Writer
// ============================================================================

/// Writes Singer JSON lines
#[derive(Debug)]
pub struct SingerWriter<W: Write + Send> {
    out: W,
}

impl SingerWriter<BufWriter<Stdout>> {
    /// Writer on buffered stdout
    pub fn stdout() -> Self {
        Self::new(BufWriter::new(std::io::stdout()))
    }
}

impl<W: Write + Send> SingerWriter<W> {
    /// Create a writer
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the writer, returning the underlying output
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, message: &Message) -> Result<()> {
        serde_json::to_writer(&mut self.out, message)
            .map_err(|e| Error::output(format!("Failed to serialize message: {e}")))?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write + Send> MessageSink for SingerWriter<W> {
    fn schema(
        &mut self,
        stream: &str,
        schema: &JsonValue,
        key_properties: &[String],
        bookmark_properties: &[String],
    ) -> Result<()> {
        self.write(&Message::Schema {
            stream: stream.to_string(),
            schema: schema.clone(),
            key_properties: key_properties.to_vec(),
            bookmark_properties: bookmark_properties.to_vec(),
        })
    }

    fn record(&mut self, stream: &str, record: &Record) -> Result<()> {
        self.write(&Message::Record {
            stream: stream.to_string(),
            record: record.clone(),
            time_extracted: Some(Utc::now()),
        })
    }

    fn state(&mut self, value: &JsonValue) -> Result<()> {
        self.write(&Message::State {
            value: value.clone(),
        })?;
        // checkpoints must reach the target before more records do
        self.out.flush()?;
        Ok(())
    }
}

// ============================================================================
// Memory Sink
// ============================================================================

/// Collects messages in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Vec<Message>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in emission order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Records of one stream in emission order
    pub fn records(&self, stream: &str) -> Vec<&Record> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Record {
                    stream: s, record, ..
                } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Number of records across all streams
    pub fn record_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| matches!(m, Message::Record { .. }))
            .count()
    }

    /// Streams in the order their schemas were announced
    pub fn schema_streams(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Schema { stream, .. } => Some(stream.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The last state checkpoint
    pub fn last_state(&self) -> Option<&JsonValue> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::State { value } => Some(value),
            _ => None,
        })
    }
}

impl MessageSink for MemorySink {
    fn schema(
        &mut self,
        stream: &str,
        schema: &JsonValue,
        key_properties: &[String],
        bookmark_properties: &[String],
    ) -> Result<()> {
        self.messages.push(Message::Schema {
            stream: stream.to_string(),
            schema: schema.clone(),
            key_properties: key_properties.to_vec(),
            bookmark_properties: bookmark_properties.to_vec(),
        });
        Ok(())
    }

    fn record(&mut self, stream: &str, record: &Record) -> Result<()> {
        self.messages.push(Message::Record {
            stream: stream.to_string(),
            record: record.clone(),
            time_extracted: None,
        });
        Ok(())
    }

    fn state(&mut self, value: &JsonValue) -> Result<()> {
        self.messages.push(Message::State {
            value: value.clone(),
        });
        Ok(())
    }
}
