//! Provider boundary traits and wire-shaped message types
//!
//! This module defines the contract between the coordinator and the
//! underlying messaging provider. The coordinator never establishes
//! connections itself: an opened, started connection is supplied by an
//! external connection component, and everything the coordinator needs from
//! the provider is expressed through the [`Connection`], [`Session`],
//! [`MessageProducer`], and [`MessageConsumer`] traits.
//!
//! Messages on the provider side are plain data ([`ProviderMessage`]) rather
//! than trait objects: the coordinator reads and writes only the well-known
//! headers (correlation id, reply-to, delivery mode, priority, time-to-live)
//! and leaves body interpretation to the translator layer.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use bytes::Bytes;

use crate::error::{JmsError, Result};

/// Raw acknowledgment-mode values used by JMS-style providers
const RAW_AUTO_ACKNOWLEDGE: i32 = 1;
const RAW_CLIENT_ACKNOWLEDGE: i32 = 2;
const RAW_DUPS_OK_ACKNOWLEDGE: i32 = 3;

/// Acknowledgment mode for a session.
///
/// Resolved once per session at construction time; immutable thereafter.
/// Vendor-specific modes pass through as [`AckMode::Other`] raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckMode {
    /// Provider acknowledges automatically on receipt
    Auto,
    /// Client acknowledges explicitly after processing
    Client,
    /// Lazy acknowledgment; duplicates are possible after failure
    DupsOk,
    /// Vendor-specific raw mode, passed through untouched
    Other(i32),
}

impl AckMode {
    /// Parse an acknowledgment mode from its configuration string.
    ///
    /// Accepts the standard mode names (`AUTO_ACKNOWLEDGE`,
    /// `CLIENT_ACKNOWLEDGE`, `DUPS_OK_ACKNOWLEDGE`) or a raw integer for
    /// vendor extensions.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "AUTO_ACKNOWLEDGE" => Ok(AckMode::Auto),
            "CLIENT_ACKNOWLEDGE" => Ok(AckMode::Client),
            "DUPS_OK_ACKNOWLEDGE" => Ok(AckMode::DupsOk),
            other => other
                .trim()
                .parse::<i32>()
                .map(AckMode::from_raw)
                .map_err(|_| {
                    JmsError::InvalidConfig(format!("unknown acknowledgment mode: {}", other))
                }),
        }
    }

    /// Convert from the provider's raw integer representation
    pub fn from_raw(value: i32) -> Self {
        match value {
            RAW_AUTO_ACKNOWLEDGE => AckMode::Auto,
            RAW_CLIENT_ACKNOWLEDGE => AckMode::Client,
            RAW_DUPS_OK_ACKNOWLEDGE => AckMode::DupsOk,
            other => AckMode::Other(other),
        }
    }

    /// Convert to the provider's raw integer representation
    pub fn as_raw(self) -> i32 {
        match self {
            AckMode::Auto => RAW_AUTO_ACKNOWLEDGE,
            AckMode::Client => RAW_CLIENT_ACKNOWLEDGE,
            AckMode::DupsOk => RAW_DUPS_OK_ACKNOWLEDGE,
            AckMode::Other(raw) => raw,
        }
    }
}

impl Default for AckMode {
    fn default() -> Self {
        AckMode::Auto
    }
}

/// A provider destination: queue, topic, or provider-managed temporary
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Point-to-point queue
    Queue(String),
    /// Publish/subscribe topic
    Topic(String),
    /// Temporary destination scoped to the creating session
    Temporary(String),
}

impl Destination {
    /// Create a queue destination
    pub fn queue(name: impl Into<String>) -> Self {
        Destination::Queue(name.into())
    }

    /// Create a topic destination
    pub fn topic(name: impl Into<String>) -> Self {
        Destination::Topic(name.into())
    }

    /// The destination name without its kind
    pub fn name(&self) -> &str {
        match self {
            Destination::Queue(name) | Destination::Topic(name) | Destination::Temporary(name) => {
                name
            }
        }
    }

    /// Whether this is a provider-managed temporary destination
    pub fn is_temporary(&self) -> bool {
        matches!(self, Destination::Temporary(_))
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Queue(name) => write!(f, "queue:{}", name),
            Destination::Topic(name) => write!(f, "topic:{}", name),
            Destination::Temporary(name) => write!(f, "temp:{}", name),
        }
    }
}

/// Whether the provider persists a message before acknowledging the send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Message may be lost on broker restart
    NonPersistent,
    /// Message survives broker restart
    Persistent,
}

impl Default for DeliveryMode {
    fn default() -> Self {
        DeliveryMode::Persistent
    }
}

/// Body of a provider message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// Text message
    Text(String),
    /// Opaque byte message
    Bytes(Bytes),
    /// Message with no body
    Empty,
}

impl MessageBody {
    /// Body length in bytes
    pub fn len(&self) -> usize {
        match self {
            MessageBody::Text(text) => text.len(),
            MessageBody::Bytes(bytes) => bytes.len(),
            MessageBody::Empty => 0,
        }
    }

    /// Whether the body is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MessageBody {
    fn default() -> Self {
        MessageBody::Empty
    }
}

/// A message as the provider sees it.
///
/// Only well-known headers are modeled; provider-specific extensions travel
/// in the string property map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMessage {
    /// Provider-assigned message id
    pub message_id: Option<String>,
    /// Application-assigned token linking a reply to its request
    pub correlation_id: Option<String>,
    /// Destination replies should be sent to
    pub reply_to: Option<Destination>,
    /// Message body
    pub body: MessageBody,
    /// String properties (well-known names only; no new wire format)
    pub properties: HashMap<String, String>,
    /// Persistence of the message on the broker
    pub delivery_mode: DeliveryMode,
    /// Priority, 0 (lowest) through 9 (highest)
    pub priority: u8,
    /// Time-to-live in milliseconds; zero means the message never expires
    pub time_to_live_ms: u64,
    /// Set by the provider when this delivery is a redelivery
    pub redelivered: bool,
}

impl ProviderMessage {
    /// Create a message with the given body and default headers
    pub fn new(body: MessageBody) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }

    /// Body length in bytes
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

impl Default for ProviderMessage {
    fn default() -> Self {
        Self {
            message_id: None,
            correlation_id: None,
            reply_to: None,
            body: MessageBody::Empty,
            properties: HashMap::new(),
            delivery_mode: DeliveryMode::Persistent,
            priority: 4,
            time_to_live_ms: 0,
            redelivered: false,
        }
    }
}

/// An opened, started provider connection.
///
/// Connection establishment, retry-on-connect, and failover are the
/// connection component's job; the coordinator only asks an existing
/// connection for sessions.
pub trait Connection: Send + Sync {
    /// Create a provider session.
    ///
    /// `ack_mode` is ignored by providers when `transacted` is true.
    ///
    /// # Errors
    /// [`JmsError::Connection`] when the provider cannot produce a session
    /// (vendor or network failure). Never retried by the coordinator.
    fn create_session(&self, transacted: bool, ack_mode: AckMode) -> Result<Box<dyn Session>>;
}

/// A provider session: the conversation scope that owns acknowledgment mode
/// and transaction state.
///
/// A session and anything created from it must only ever be driven by one
/// thread at a time.
pub trait Session: Send {
    /// Whether this session is locally transacted
    fn is_transacted(&self) -> bool;

    /// The acknowledgment mode this session was created with
    fn ack_mode(&self) -> AckMode;

    /// Create a producer bound to `destination`
    fn create_producer(&mut self, destination: &Destination) -> Result<Box<dyn MessageProducer>>;

    /// Create a consumer bound to `destination`
    fn create_consumer(&mut self, destination: &Destination) -> Result<Box<dyn MessageConsumer>>;

    /// Create a temporary destination scoped to this session
    fn create_temporary_destination(&mut self) -> Result<Destination>;

    /// Delete a temporary destination previously created on this session
    fn delete_temporary_destination(&mut self, destination: &Destination) -> Result<()>;

    /// Commit the local transaction
    fn commit(&mut self) -> Result<()>;

    /// Roll back the local transaction
    fn rollback(&mut self) -> Result<()>;

    /// Acknowledge a delivered message (client-acknowledge modes)
    fn acknowledge(&mut self, message: &ProviderMessage) -> Result<()>;

    /// Release provider resources held by this session
    fn close(&mut self) -> Result<()>;
}

/// A provider producer bound to a destination
pub trait MessageProducer: Send {
    /// Send to the bound destination
    fn send(&mut self, message: ProviderMessage) -> Result<()>;

    /// Send to an explicit destination, overriding the bound one
    fn send_to(&mut self, destination: &Destination, message: ProviderMessage) -> Result<()>;

    /// Release provider resources held by this producer
    fn close(&mut self) -> Result<()>;
}

/// A provider consumer bound to a destination
pub trait MessageConsumer: Send {
    /// Receive the next message, waiting up to `timeout`.
    ///
    /// Returns `Ok(None)` when the timeout elapses without a message.
    fn receive(&mut self, timeout: Duration) -> Result<Option<ProviderMessage>>;

    /// Release provider resources held by this consumer
    fn close(&mut self) -> Result<()>;
}
