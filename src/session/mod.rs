// Session lifecycle and acknowledgment resolution
//
// This module owns the two session-scoped concerns of the coordinator:
// - handle.rs: creation and teardown of a session plus its producer or
//   consumer, with the all-or-nothing initialization invariant
// - ack.rs: the per-delivery acknowledgment state machine, evaluated in
//   strict priority order

pub mod ack;
pub mod handle;

pub use ack::{resolve_acknowledgment, AckContext, DeliveryOutcome};
pub use handle::SessionHandle;
