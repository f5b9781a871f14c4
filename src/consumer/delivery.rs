//! Per-message inbound delivery pipeline
//!
//! [`DeliveryHandler::on_message`] is invoked once per raw message, on the
//! provider's delivery thread. It is deliberately synchronous: the provider
//! does not advance to the next message until translation, listener
//! dispatch, and acknowledgment resolution have all completed, which is
//! what preserves per-session ordering and backpressure against a slow
//! listener.
//!
//! The listener signals its outcome through an [`OutcomeToken`] that
//! consumes itself on first use, so signaling twice is structurally
//! impossible; signaling zero times is detected after dispatch returns and
//! handled as a listener contract violation.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::config::ConsumerConfig;
use crate::correlation::CorrelationIdPolicy;
use crate::error::{JmsError, Result};
use crate::message::AdapterMessage;
use crate::provider::{ProviderMessage, Session};
use crate::session::ack::{resolve_acknowledgment, AckContext, DeliveryOutcome};
use crate::translate::MessageTranslator;

#[derive(Default)]
struct OutcomeSlot {
    outcome: Mutex<Option<DeliveryOutcome>>,
}

/// Single-shot outcome signal handed to the listener.
///
/// Calling [`OutcomeToken::success`] or [`OutcomeToken::failure`] consumes
/// the token, so a listener can signal at most once.
pub struct OutcomeToken {
    slot: Arc<OutcomeSlot>,
}

impl OutcomeToken {
    /// Signal that the message was processed
    pub fn success(self) {
        *self.slot.outcome.lock() = Some(DeliveryOutcome::Success);
    }

    /// Signal that the message was rejected
    pub fn failure(self) {
        *self.slot.outcome.lock() = Some(DeliveryOutcome::Failure);
    }
}

impl fmt::Debug for OutcomeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutcomeToken").finish_non_exhaustive()
    }
}

/// Receives translated messages and signals an outcome for each.
///
/// Implementations must invoke the token exactly once per dispatch. The
/// listener is the workflow boundary; this crate only defines the contract
/// for invoking it and reacting to its outcome.
#[cfg_attr(test, mockall::automock)]
pub trait MessageListener: Send + Sync {
    /// Handle one translated message
    fn on_message(&self, message: AdapterMessage, outcome: OutcomeToken);
}

/// The callback invoked by the provider (or the poll loop) for each
/// inbound raw message
pub struct DeliveryHandler {
    translator: Arc<dyn MessageTranslator>,
    correlation: CorrelationIdPolicy,
    listener: Arc<dyn MessageListener>,
    config: ConsumerConfig,
}

impl DeliveryHandler {
    pub fn new(
        translator: Arc<dyn MessageTranslator>,
        correlation: CorrelationIdPolicy,
        listener: Arc<dyn MessageListener>,
        config: ConsumerConfig,
    ) -> Self {
        Self {
            translator,
            correlation,
            listener,
            config,
        }
    }

    /// The consumer configuration this handler was built with
    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    /// Process one raw message to completion.
    ///
    /// Returns `Ok(())` once the delivery is fully resolved, including the
    /// no-acknowledgment paths. An `Err` means the message was not
    /// resolved; callers use [`JmsError::is_fatal_for_delivery`] to decide
    /// between stopping the delivery thread and leaving the message for
    /// provider redelivery.
    pub fn on_message(&self, session: &mut dyn Session, raw: ProviderMessage) -> Result<()> {
        let mut message = match self.translator.to_internal(&raw) {
            Ok(message) => message,
            Err(err) => {
                // A transacted session must not hold the delivery open once
                // translation is known to be impossible
                if session.is_transacted() {
                    if let Err(rollback_err) = session.rollback() {
                        warn!("rollback after translation failure failed: {rollback_err}");
                    }
                }
                return Err(err);
            }
        };

        self.correlation.apply_inbound(&raw, &mut message);
        if let Some(reply_to) = raw.reply_to.clone() {
            message.set_reply_context(reply_to);
        }

        let slot = Arc::new(OutcomeSlot::default());
        let token = OutcomeToken {
            slot: Arc::clone(&slot),
        };
        let dispatch = catch_unwind(AssertUnwindSafe(|| {
            self.listener.on_message(message, token);
        }));
        let outcome = slot.outcome.lock().take();

        let outcome = match (dispatch, outcome) {
            (Ok(()), Some(outcome)) => outcome,
            (Err(_), Some(outcome)) => {
                warn!("listener panicked after signaling an outcome; resolving anyway");
                outcome
            }
            (Ok(()), None) => {
                return Err(JmsError::listener(
                    "listener returned without signaling an outcome",
                ));
            }
            (Err(_), None) => {
                return Err(JmsError::listener(
                    "listener panicked before signaling an outcome",
                ));
            }
        };

        let mut ctx = AckContext {
            session,
            raw: &raw,
            managed_transaction: self.config.managed_transaction,
            rollback_timeout: self.config.rollback_timeout,
        };
        if let Err(err) = resolve_acknowledgment(&mut ctx, outcome) {
            // Non-critical relative to message-loss risk; the provider's
            // redelivery semantics are the backstop
            warn!("acknowledgment resolution failed: {err}");
        }
        Ok(())
    }
}
