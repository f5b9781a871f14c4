//! Outbound send and request/reply surface
//!
//! [`JmsProducer`] translates internal messages to provider form, stamps
//! correlation ids and delivery headers, and sends on whatever session its
//! factory hands back. Transacted producer sessions are committed after
//! each successful send and rolled back when the send fails.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::ProducerConfig;
use crate::correlation::CorrelationIdPolicy;
use crate::error::{JmsError, Result};
use crate::message::AdapterMessage;
use crate::provider::{Connection, Destination, ProviderMessage};
use crate::translate::MessageTranslator;

use super::refresh::ProducerSessionFactory;
use super::request_reply::ReplyReceiver;

/// Outbound producer with policy-driven session reuse
pub struct JmsProducer {
    factory: ProducerSessionFactory,
    translator: Arc<dyn MessageTranslator>,
    correlation: CorrelationIdPolicy,
    config: ProducerConfig,
}

impl JmsProducer {
    pub fn new(
        connection: Arc<dyn Connection>,
        destination: Destination,
        translator: Arc<dyn MessageTranslator>,
        correlation: CorrelationIdPolicy,
        config: ProducerConfig,
    ) -> Result<Self> {
        config.send.validate()?;
        Ok(Self {
            factory: ProducerSessionFactory::new(connection, destination, config.clone()),
            translator,
            correlation,
            config,
        })
    }

    /// Translate, stamp headers, and apply the correlation policy
    fn prepare(&self, message: &AdapterMessage) -> Result<ProviderMessage> {
        let mut raw = self.translator.to_provider(message)?;
        self.correlation.apply_outbound(message, &mut raw);
        raw.delivery_mode = self.config.send.delivery_mode;
        raw.priority = self.config.send.priority;
        raw.time_to_live_ms = self.config.send.time_to_live.as_millis() as u64;
        Ok(raw)
    }

    /// Send one message.
    ///
    /// Obtains a session from the refresh policy, so a send may transparently
    /// open a fresh session/producer pair first.
    pub fn send(&mut self, message: &AdapterMessage) -> Result<()> {
        let raw = self.prepare(message)?;
        let handle = self.factory.obtain(message)?;
        let transacted = handle.is_transacted();

        match handle.producer()?.send(raw) {
            Ok(()) => {
                if transacted {
                    handle.session()?.commit().map_err(|err| {
                        JmsError::acknowledgment(format!("commit after send failed: {}", err))
                    })?;
                }
                debug!(destination = %self.factory.destination(), "message sent");
                Ok(())
            }
            Err(err) => {
                if transacted {
                    if let Err(rollback_err) = handle.session()?.rollback() {
                        warn!("rollback after failed send failed: {rollback_err}");
                    }
                }
                Err(err)
            }
        }
    }

    /// Send one message and block until a correlated reply arrives.
    ///
    /// A temporary destination and consumer are created for the reply and
    /// released again on the success, timeout, and error paths alike. The
    /// outbound message always carries a correlation id: when the
    /// configured policy does not provide one, the message's unique id is
    /// used.
    ///
    /// # Errors
    /// [`JmsError::ReplyTimeout`] when no reply arrives within `timeout`;
    /// otherwise whatever the send itself surfaced.
    pub fn request(
        &mut self,
        message: &AdapterMessage,
        timeout: Duration,
    ) -> Result<AdapterMessage> {
        let mut raw = self.prepare(message)?;
        if raw.correlation_id.is_none() {
            raw.correlation_id = Some(message.unique_id().to_string());
        }

        let handle = self.factory.obtain(message)?;
        let transacted = handle.is_transacted();
        let (session, producer) = handle.session_and_producer()?;

        let mut reply = ReplyReceiver::open(session)?;
        raw.reply_to = Some(reply.destination().clone());

        if let Err(err) = producer.send(raw) {
            if transacted {
                if let Err(rollback_err) = session.rollback() {
                    warn!("rollback after failed request failed: {rollback_err}");
                }
            }
            reply.cleanup(session);
            return Err(err);
        }
        if transacted {
            // The request is not visible to the responder until committed
            if let Err(err) = session.commit() {
                reply.cleanup(session);
                return Err(JmsError::acknowledgment(format!(
                    "commit after request failed: {}",
                    err
                )));
            }
        }

        let raw_reply = match reply.wait_for_reply(timeout) {
            Ok(raw_reply) => {
                reply.cleanup(session);
                raw_reply
            }
            Err(err) => {
                reply.cleanup(session);
                return Err(err);
            }
        };

        self.translator.to_internal(&raw_reply)
    }

    /// Release the cached session/producer pair, if any.
    ///
    /// Safe to call repeatedly; teardown errors are swallowed.
    pub fn close(&mut self) {
        self.factory.close();
    }
}
