//! Session handle lifecycle
//!
//! A [`SessionHandle`] bundles one provider session with the single producer
//! or consumer created on it, together with the counters the refresh
//! policies evaluate. A handle is either fully initialized (session and
//! endpoint both live) or fully closed; `open_*` unwinds partial
//! acquisition on failure, and `close` is idempotent and never surfaces
//! teardown errors.

use std::time::Instant;

use tracing::{debug, warn};

use crate::error::{JmsError, Result};
use crate::provider::{AckMode, Connection, Destination, MessageConsumer, MessageProducer, Session};

/// The single provider endpoint owned by a handle
enum Endpoint {
    Producer(Box<dyn MessageProducer>),
    Consumer(Box<dyn MessageConsumer>),
}

struct HandleInner {
    session: Box<dyn Session>,
    endpoint: Endpoint,
}

/// One provider session plus its producer or consumer.
///
/// Exclusively owned by a producer session factory (outbound) or a consumer
/// component (inbound); never shared across threads. Acknowledgment mode
/// and the transacted flag are fixed at open time.
pub struct SessionHandle {
    inner: Option<HandleInner>,
    transacted: bool,
    ack_mode: AckMode,
    created_at: Instant,
    messages_sent: u64,
    bytes_sent: u64,
    last_send: Option<Instant>,
}

/// Session and endpoint creation failures surface as connection errors
fn as_connection_error(err: JmsError) -> JmsError {
    match err {
        JmsError::Connection(_) => err,
        other => JmsError::Connection(other.to_string()),
    }
}

impl SessionHandle {
    /// Open a session and a producer bound to `destination`.
    ///
    /// # Errors
    /// [`JmsError::Connection`] when the session or producer cannot be
    /// created; any partially acquired session is released before
    /// returning.
    pub fn open_producer(
        connection: &dyn Connection,
        destination: &Destination,
        transacted: bool,
        ack_mode: AckMode,
    ) -> Result<Self> {
        let mut session = connection
            .create_session(transacted, ack_mode)
            .map_err(as_connection_error)?;
        let producer = match session.create_producer(destination) {
            Ok(producer) => producer,
            Err(err) => {
                // Unwind the partial acquisition before surfacing the error
                if let Err(close_err) = session.close() {
                    warn!("failed to close session after producer setup error: {close_err}");
                }
                return Err(as_connection_error(err));
            }
        };
        debug!(%destination, transacted, "opened producer session");
        Ok(Self::assemble(session, Endpoint::Producer(producer), transacted, ack_mode))
    }

    /// Open a session and a consumer bound to `destination`.
    ///
    /// Same contract as [`SessionHandle::open_producer`].
    pub fn open_consumer(
        connection: &dyn Connection,
        destination: &Destination,
        transacted: bool,
        ack_mode: AckMode,
    ) -> Result<Self> {
        let mut session = connection
            .create_session(transacted, ack_mode)
            .map_err(as_connection_error)?;
        let consumer = match session.create_consumer(destination) {
            Ok(consumer) => consumer,
            Err(err) => {
                if let Err(close_err) = session.close() {
                    warn!("failed to close session after consumer setup error: {close_err}");
                }
                return Err(as_connection_error(err));
            }
        };
        debug!(%destination, transacted, "opened consumer session");
        Ok(Self::assemble(session, Endpoint::Consumer(consumer), transacted, ack_mode))
    }

    fn assemble(
        session: Box<dyn Session>,
        endpoint: Endpoint,
        transacted: bool,
        ack_mode: AckMode,
    ) -> Self {
        Self {
            inner: Some(HandleInner { session, endpoint }),
            transacted,
            ack_mode,
            created_at: Instant::now(),
            messages_sent: 0,
            bytes_sent: 0,
            last_send: None,
        }
    }

    /// Whether the handle still owns live provider resources
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// Whether the underlying session is locally transacted
    pub fn is_transacted(&self) -> bool {
        self.transacted
    }

    /// The acknowledgment mode the session was created with
    pub fn ack_mode(&self) -> AckMode {
        self.ack_mode
    }

    /// When the handle was opened
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Messages recorded against this handle since it was opened
    pub fn messages_sent(&self) -> u64 {
        self.messages_sent
    }

    /// Bytes recorded against this handle since it was opened
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// When the last send was recorded, if any
    pub fn last_send(&self) -> Option<Instant> {
        self.last_send
    }

    /// Record one outbound message of `bytes` payload bytes
    pub fn record_send(&mut self, bytes: usize) {
        self.messages_sent += 1;
        self.bytes_sent += bytes as u64;
        self.last_send = Some(Instant::now());
    }

    /// The live session
    pub fn session(&mut self) -> Result<&mut dyn Session> {
        match self.inner.as_mut() {
            Some(inner) => Ok(inner.session.as_mut()),
            None => Err(JmsError::SessionClosed),
        }
    }

    /// The live producer endpoint
    pub fn producer(&mut self) -> Result<&mut dyn MessageProducer> {
        match self.inner.as_mut() {
            Some(HandleInner {
                endpoint: Endpoint::Producer(producer),
                ..
            }) => Ok(producer.as_mut()),
            Some(_) => Err(JmsError::Internal(
                "handle was opened for consuming, not producing".to_string(),
            )),
            None => Err(JmsError::SessionClosed),
        }
    }

    /// The live consumer endpoint
    pub fn consumer(&mut self) -> Result<&mut dyn MessageConsumer> {
        match self.inner.as_mut() {
            Some(HandleInner {
                endpoint: Endpoint::Consumer(consumer),
                ..
            }) => Ok(consumer.as_mut()),
            Some(_) => Err(JmsError::Internal(
                "handle was opened for producing, not consuming".to_string(),
            )),
            None => Err(JmsError::SessionClosed),
        }
    }

    /// Both the session and the producer, borrowed together.
    ///
    /// Needed by request/reply flows that create a reply consumer on the
    /// session while the producer sends the request.
    pub fn session_and_producer(
        &mut self,
    ) -> Result<(&mut dyn Session, &mut dyn MessageProducer)> {
        match self.inner.as_mut() {
            Some(HandleInner {
                session,
                endpoint: Endpoint::Producer(producer),
            }) => Ok((session.as_mut(), producer.as_mut())),
            Some(_) => Err(JmsError::Internal(
                "handle was opened for consuming, not producing".to_string(),
            )),
            None => Err(JmsError::SessionClosed),
        }
    }

    /// Release all provider resources.
    ///
    /// Idempotent; teardown errors are logged and swallowed so that close
    /// is always safe to call, including while a delivery or send is
    /// winding down.
    pub fn close(&mut self) {
        let Some(inner) = self.inner.take() else {
            return;
        };
        let HandleInner {
            mut session,
            endpoint,
        } = inner;
        match endpoint {
            Endpoint::Producer(mut producer) => {
                if let Err(err) = producer.close() {
                    warn!("error closing producer: {err}");
                }
            }
            Endpoint::Consumer(mut consumer) => {
                if let Err(err) = consumer.close() {
                    warn!("error closing consumer: {err}");
                }
            }
        }
        if let Err(err) = session.close() {
            warn!("error closing session: {err}");
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.close();
    }
}
