//! Configuration for consumers and producers
//!
//! Configuration arrives via externally-loaded objects; these structs are
//! the plain in-process form with sensible defaults. Acknowledgment-mode
//! strings are parsed by [`AckMode::parse`]; refresh thresholds live in
//! [`RefreshPolicy`].

use std::time::Duration;

use crate::error::{JmsError, Result};
use crate::producer::RefreshPolicy;
use crate::provider::{AckMode, DeliveryMode};

/// Default pause inserted after rolling back a failed delivery, so provider
/// redelivery does not spin immediately
pub const DEFAULT_ROLLBACK_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Default per-poll receive timeout for polling consumers
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Highest priority a provider message can carry
pub const MAX_PRIORITY: u8 = 9;

/// Consumer-side session configuration
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Acknowledgment mode for sessions created by this consumer
    pub ack_mode: AckMode,
    /// Whether sessions are locally transacted
    pub transacted: bool,
    /// Whether the session participates in an externally managed (e.g. XA)
    /// transaction; when set, the coordinator never commits, rolls back, or
    /// acknowledges
    pub managed_transaction: bool,
    /// How long the delivery thread pauses after a rollback
    pub rollback_timeout: Duration,
    /// How long each poll waits for a message before re-checking shutdown
    pub receive_timeout: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            ack_mode: AckMode::Auto,
            transacted: false,
            managed_transaction: false,
            rollback_timeout: DEFAULT_ROLLBACK_TIMEOUT,
            receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
        }
    }
}

/// Per-send delivery headers applied by the producer
#[derive(Debug, Clone, Copy)]
pub struct SendOptions {
    /// Persistence of produced messages
    pub delivery_mode: DeliveryMode,
    /// Priority, 0 (lowest) through 9 (highest)
    pub priority: u8,
    /// Time-to-live; zero means messages never expire
    pub time_to_live: Duration,
}

impl SendOptions {
    /// Validate field ranges
    pub fn validate(&self) -> Result<()> {
        if self.priority > MAX_PRIORITY {
            return Err(JmsError::InvalidConfig(format!(
                "priority {} out of range 0..={}",
                self.priority, MAX_PRIORITY
            )));
        }
        Ok(())
    }
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            delivery_mode: DeliveryMode::Persistent,
            priority: 4,
            time_to_live: Duration::ZERO,
        }
    }
}

/// Producer-side session configuration
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Acknowledgment mode for sessions created by this producer
    pub ack_mode: AckMode,
    /// Whether sessions are locally transacted; transacted producer
    /// sessions are committed after each successful send
    pub transacted: bool,
    /// When the cached session/producer pair is replaced
    pub refresh: RefreshPolicy,
    /// Delivery headers stamped on every send
    pub send: SendOptions,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            ack_mode: AckMode::Auto,
            transacted: false,
            refresh: RefreshPolicy::Default,
            send: SendOptions::default(),
        }
    }
}
