//! Session and acknowledgment coordination for JMS-style messaging
//! providers.
//!
//! This crate is the coordination core of a messaging bridge: it owns the
//! session lifecycle and the acknowledgment state machine that sit between
//! an internal message representation and a pluggable provider.
//!
//! Architecture Overview:
//! =====================
//!
//! Inbound, the provider (or the built-in poll loop) hands each raw
//! message to a [`consumer::DeliveryHandler`]:
//!
//! ```text
//! raw message → translate → correlation/reply context → listener dispatch
//!                                   │
//!                      success/failure outcome token
//!                                   │
//!            acknowledgment resolution (commit / rollback+wait /
//!                         acknowledge / no-op)
//! ```
//!
//! The callback is synchronous end to end: the provider does not advance
//! to the next message until resolution completes, which is what gives
//! at-least-once, in-order processing per session.
//!
//! Outbound, a [`producer::JmsProducer`] asks its session factory for a
//! session before every send; the configured [`producer::RefreshPolicy`]
//! decides whether the cached session/producer pair is reused or replaced.
//!
//! Connection establishment, translation internals, and listener logic are
//! external collaborators reached through the traits in [`provider`] and
//! [`translate`].

pub mod config;
pub mod consumer;
pub mod correlation;
pub mod error;
pub mod message;
pub mod producer;
pub mod provider;
pub mod session;
pub mod translate;

// Test utilities (only compiled in test builds)
#[cfg(test)]
pub mod testing;

// Re-export commonly used types for convenience
pub use config::{ConsumerConfig, ProducerConfig, SendOptions};
pub use consumer::{DeliveryHandler, MessageListener, OutcomeToken, PollingConsumer};
pub use correlation::CorrelationIdPolicy;
pub use error::{JmsError, Result};
pub use message::AdapterMessage;
pub use producer::{JmsProducer, ProducerSessionFactory, RefreshPolicy};
pub use provider::{
    AckMode, Connection, DeliveryMode, Destination, MessageBody, MessageConsumer, MessageProducer,
    ProviderMessage, Session,
};
pub use session::{resolve_acknowledgment, AckContext, DeliveryOutcome, SessionHandle};
pub use translate::{BytesTranslator, MessageTranslator, TextTranslator};
