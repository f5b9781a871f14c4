//! Internal message representation
//!
//! [`AdapterMessage`] is the coordinator-side view of a message: an opaque
//! payload, a string metadata map, and a unique id. The provider's reply
//! destination travels as auxiliary context alongside the message rather
//! than inside the metadata map, so metadata stays a pure application
//! key/value space.

use std::collections::HashMap;

use bytes::Bytes;
use uuid::Uuid;

use crate::provider::Destination;

/// A message in its internal representation
#[derive(Debug, Clone)]
pub struct AdapterMessage {
    unique_id: String,
    payload: Bytes,
    metadata: HashMap<String, String>,
    reply_context: Option<Destination>,
}

impl AdapterMessage {
    /// Create a message with the given payload and a fresh unique id
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            unique_id: Uuid::new_v4().to_string(),
            payload: payload.into(),
            metadata: HashMap::new(),
            reply_context: None,
        }
    }

    /// Create a message with an explicit unique id
    pub fn with_unique_id(unique_id: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            unique_id: unique_id.into(),
            payload: payload.into(),
            metadata: HashMap::new(),
            reply_context: None,
        }
    }

    /// The message's unique id
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// The message payload
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Payload size in bytes
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Replace the payload
    pub fn set_payload(&mut self, payload: impl Into<Bytes>) {
        self.payload = payload.into();
    }

    /// All metadata entries
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Look up a single metadata value
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Add or replace a metadata entry
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// The provider reply destination attached during inbound delivery.
    ///
    /// This is auxiliary context, not metadata: it never round-trips
    /// through the metadata map.
    pub fn reply_context(&self) -> Option<&Destination> {
        self.reply_context.as_ref()
    }

    /// Attach a provider reply destination
    pub fn set_reply_context(&mut self, destination: Destination) {
        self.reply_context = Some(destination);
    }
}
