// Inbound message handling
//
// delivery.rs holds the per-message pipeline invoked for every raw message
// (translation, correlation, listener dispatch, acknowledgment resolution).
// polling.rs drives that pipeline from a dedicated poll-loop thread for
// providers without push delivery.

pub mod delivery;
pub mod polling;

pub use delivery::{DeliveryHandler, MessageListener, OutcomeToken};
pub use polling::PollingConsumer;

#[cfg(test)]
pub use delivery::MockMessageListener;
