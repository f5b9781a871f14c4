//! Producer session refresh policies
//!
//! Every outbound send asks its [`ProducerSessionFactory`] for a session
//! first. The factory keeps exactly one cached [`SessionHandle`] and
//! replaces it when the configured [`RefreshPolicy`] says so, closing the
//! old handle with errors suppressed.
//!
//! The count and size variants compare strictly greater-than, so the send
//! that lands exactly on the threshold still reuses the cached handle and
//! the refresh happens on the following send. This boundary behavior is
//! deliberate and covered by tests.

use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

use tracing::debug;

use crate::config::ProducerConfig;
use crate::error::{JmsError, Result};
use crate::message::AdapterMessage;
use crate::provider::{Connection, Destination};
use crate::session::handle::SessionHandle;

/// When a producer's cached session/producer pair is discarded and
/// recreated rather than reused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Replace before every send
    PerMessage,
    /// Create once, reuse until the producer is closed
    Default,
    /// Replace after the given number of sends on one handle
    MessageCount(u64),
    /// Replace once cumulative payload bytes on one handle would exceed
    /// the given volume
    ByteVolume(u64),
    /// Replace when the time since the last send exceeds the interval
    Inactivity(Duration),
    /// Replace when the outbound message carries a truthy value
    /// (`"true"` or `"1"`, ASCII case-insensitive) under the given
    /// metadata key
    MetadataTriggered(String),
}

fn is_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

impl RefreshPolicy {
    /// Whether the cached handle must be replaced before sending `message`
    fn should_refresh(&self, handle: &SessionHandle, message: &AdapterMessage) -> bool {
        match self {
            RefreshPolicy::PerMessage => true,
            RefreshPolicy::Default => false,
            RefreshPolicy::MessageCount(max) => handle.messages_sent() + 1 > *max,
            RefreshPolicy::ByteVolume(max) => {
                handle.bytes_sent() + message.payload_len() as u64 > *max
            }
            RefreshPolicy::Inactivity(interval) => handle
                .last_send()
                .is_some_and(|last| last.elapsed() > *interval),
            RefreshPolicy::MetadataTriggered(key) => message
                .metadata_value(key)
                .is_some_and(is_truthy),
        }
    }
}

/// Owns the one cached outbound [`SessionHandle`] for a producer and
/// applies the refresh policy on every send.
///
/// A factory instance must be driven by a single thread; this is asserted
/// in debug builds rather than locked around, because the cached handle is
/// never shared.
pub struct ProducerSessionFactory {
    connection: Arc<dyn Connection>,
    destination: Destination,
    config: ProducerConfig,
    handle: Option<SessionHandle>,
    owner: Option<ThreadId>,
}

impl ProducerSessionFactory {
    pub fn new(
        connection: Arc<dyn Connection>,
        destination: Destination,
        config: ProducerConfig,
    ) -> Self {
        Self {
            connection,
            destination,
            config,
            handle: None,
            owner: None,
        }
    }

    /// The destination this factory's producers are bound to
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Whether a live handle is currently cached
    pub fn has_cached_handle(&self) -> bool {
        self.handle.as_ref().is_some_and(SessionHandle::is_open)
    }

    /// Return the session to send `message` on, refreshing first when the
    /// policy requires it.
    ///
    /// The returned handle has already accumulated the message's
    /// contribution (one send, `payload_len` bytes); after a refresh the
    /// counters restart from exactly that contribution.
    ///
    /// # Errors
    /// Only [`JmsError::Connection`], propagated from opening the
    /// replacement handle. Closing the superseded handle never fails.
    pub fn obtain(&mut self, message: &AdapterMessage) -> Result<&mut SessionHandle> {
        self.assert_single_owner();

        let refresh = match &self.handle {
            Some(handle) if handle.is_open() => {
                self.config.refresh.should_refresh(handle, message)
            }
            _ => true,
        };

        if refresh {
            if let Some(mut stale) = self.handle.take() {
                debug!(destination = %self.destination, "refreshing producer session");
                stale.close();
            }
            let mut fresh = SessionHandle::open_producer(
                self.connection.as_ref(),
                &self.destination,
                self.config.transacted,
                self.config.ack_mode,
            )?;
            fresh.record_send(message.payload_len());
            self.handle = Some(fresh);
        } else if let Some(handle) = self.handle.as_mut() {
            handle.record_send(message.payload_len());
        }

        self.handle
            .as_mut()
            .ok_or_else(|| JmsError::Internal("no producer session after refresh".to_string()))
    }

    /// Close the cached handle, if any
    pub fn close(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.close();
        }
    }

    fn assert_single_owner(&mut self) {
        let current = thread::current().id();
        match self.owner {
            None => self.owner = Some(current),
            Some(owner) => debug_assert_eq!(
                owner, current,
                "a producer session factory must be driven by one thread"
            ),
        }
    }
}

impl Drop for ProducerSessionFactory {
    fn drop(&mut self) {
        self.close();
    }
}
