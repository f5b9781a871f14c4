// Outbound message handling
//
// refresh.rs decides when the cached session/producer pair is replaced
// rather than reused; sender.rs is the send and request/reply surface;
// request_reply.rs owns the temporary reply destination plumbing.

pub mod refresh;
pub mod request_reply;
pub mod sender;

pub use refresh::{ProducerSessionFactory, RefreshPolicy};
pub use sender::JmsProducer;
