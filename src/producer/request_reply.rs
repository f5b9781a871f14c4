//! Temporary reply destination plumbing for request/reply sends
//!
//! A [`ReplyReceiver`] holds the temporary destination and consumer a
//! request blocks on. Cleanup is explicit and runs on the success, timeout,
//! and error paths alike; like all teardown in this crate it swallows
//! provider errors.

use std::time::Duration;

use tracing::warn;

use crate::error::{JmsError, Result};
use crate::provider::{Destination, MessageConsumer, ProviderMessage, Session};

/// A temporary destination plus the consumer waiting on it
pub(super) struct ReplyReceiver {
    destination: Destination,
    consumer: Box<dyn MessageConsumer>,
}

impl ReplyReceiver {
    /// Create a temporary destination on `session` and a consumer bound to
    /// it. On failure the temporary destination is deleted again before
    /// the error surfaces.
    pub(super) fn open(session: &mut dyn Session) -> Result<Self> {
        let destination = session.create_temporary_destination()?;
        match session.create_consumer(&destination) {
            Ok(consumer) => Ok(Self {
                destination,
                consumer,
            }),
            Err(err) => {
                if let Err(delete_err) = session.delete_temporary_destination(&destination) {
                    warn!("failed to delete temporary destination: {delete_err}");
                }
                Err(err)
            }
        }
    }

    /// The temporary destination replies should be addressed to
    pub(super) fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Block until a reply arrives or `timeout` elapses
    pub(super) fn wait_for_reply(&mut self, timeout: Duration) -> Result<ProviderMessage> {
        match self.consumer.receive(timeout)? {
            Some(reply) => Ok(reply),
            None => Err(JmsError::ReplyTimeout(timeout)),
        }
    }

    /// Close the reply consumer and delete the temporary destination,
    /// swallowing errors on both
    pub(super) fn cleanup(mut self, session: &mut dyn Session) {
        if let Err(err) = self.consumer.close() {
            warn!("failed to close reply consumer: {err}");
        }
        if let Err(err) = session.delete_temporary_destination(&self.destination) {
            warn!("failed to delete temporary destination: {err}");
        }
    }
}
