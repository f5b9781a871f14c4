//! Per-delivery acknowledgment resolution
//!
//! Every delivered message ends in exactly one acknowledgment action,
//! chosen by evaluating the strategies below in strict priority order,
//! first match wins:
//!
//! 1. **ManagedTransaction** — an external transaction manager owns
//!    commit/rollback; the coordinator does nothing.
//! 2. **CommitOrRollback** — locally transacted session: commit on
//!    success; on failure roll back, then pause the delivery thread for
//!    the configured rollback timeout so redelivery does not spin.
//! 3. **ExplicitAcknowledge** — non-transacted, non-auto mode: acknowledge
//!    on success; on failure leave the message for provider redelivery.
//! 4. **Implicit** — auto mode, non-transacted: the provider already
//!    acknowledged on receipt.
//!
//! The ordering is expressed as a fixed strategy list rather than
//! per-variant virtual dispatch, so the priority is visible in one place.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{JmsError, Result};
use crate::provider::{AckMode, ProviderMessage, Session};

/// Outcome of dispatching one message to the listener.
///
/// Produced exactly once per delivery, consumed exactly once by
/// acknowledgment resolution. Retrying failed messages is the surrounding
/// workflow's responsibility, not this module's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The listener processed the message
    Success,
    /// The listener rejected the message
    Failure,
}

/// Everything acknowledgment resolution needs about the current delivery
pub struct AckContext<'a> {
    /// The session the message arrived on
    pub session: &'a mut dyn Session,
    /// The raw message being resolved
    pub raw: &'a ProviderMessage,
    /// Whether an external transaction manager owns this session
    pub managed_transaction: bool,
    /// Pause after rollback before returning control to the provider
    pub rollback_timeout: Duration,
}

#[derive(Debug, Clone, Copy)]
enum AckStrategy {
    ManagedTransaction,
    CommitOrRollback,
    ExplicitAcknowledge,
    Implicit,
}

/// Priority order; first applicable strategy wins
const STRATEGY_ORDER: [AckStrategy; 4] = [
    AckStrategy::ManagedTransaction,
    AckStrategy::CommitOrRollback,
    AckStrategy::ExplicitAcknowledge,
    AckStrategy::Implicit,
];

impl AckStrategy {
    fn applies(self, ctx: &AckContext<'_>) -> bool {
        match self {
            AckStrategy::ManagedTransaction => ctx.managed_transaction,
            AckStrategy::CommitOrRollback => ctx.session.is_transacted(),
            AckStrategy::ExplicitAcknowledge => ctx.session.ack_mode() != AckMode::Auto,
            AckStrategy::Implicit => true,
        }
    }

    fn resolve(self, ctx: &mut AckContext<'_>, outcome: DeliveryOutcome) -> Result<()> {
        match self {
            AckStrategy::ManagedTransaction => {
                debug!("session is externally managed; leaving outcome to the transaction manager");
                Ok(())
            }
            AckStrategy::CommitOrRollback => match outcome {
                DeliveryOutcome::Success => ctx.session.commit().map_err(|err| {
                    JmsError::acknowledgment(format!("commit failed: {}", err))
                }),
                DeliveryOutcome::Failure => {
                    if let Err(err) = ctx.session.rollback() {
                        // A failed rollback is logged but never escalated;
                        // the provider's redelivery semantics are the backstop
                        warn!("rollback failed: {err}");
                    }
                    debug!(
                        "pausing delivery thread for {:?} after rollback",
                        ctx.rollback_timeout
                    );
                    thread::sleep(ctx.rollback_timeout);
                    Ok(())
                }
            },
            AckStrategy::ExplicitAcknowledge => match outcome {
                DeliveryOutcome::Success => ctx.session.acknowledge(ctx.raw).map_err(|err| {
                    JmsError::acknowledgment(format!("acknowledge failed: {}", err))
                }),
                // Leave the message unacknowledged; the provider redelivers
                DeliveryOutcome::Failure => Ok(()),
            },
            AckStrategy::Implicit => Ok(()),
        }
    }
}

/// Resolve the acknowledgment action for one delivered message.
///
/// Returns [`JmsError::Acknowledgment`] when the chosen commit/acknowledge
/// call itself fails; callers log and continue, since these failures are
/// non-critical relative to message-loss risk.
pub fn resolve_acknowledgment(ctx: &mut AckContext<'_>, outcome: DeliveryOutcome) -> Result<()> {
    for strategy in STRATEGY_ORDER {
        if strategy.applies(ctx) {
            return strategy.resolve(ctx, outcome);
        }
    }
    // Implicit always applies; the loop cannot fall through
    Ok(())
}
