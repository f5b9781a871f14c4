//! Recording mock provider
//!
//! These mocks stand in for a real messaging provider. Every session,
//! producer, and consumer created from one [`MockConnection`] shares a
//! single [`CallLog`], so tests can assert on the exact sequence of
//! provider interactions. [`Failpoints`] make individual provider calls
//! fail on demand.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::{JmsError, Result};
use crate::provider::{
    AckMode, Connection, Destination, MessageConsumer, MessageProducer, ProviderMessage, Session,
};

/// Counts and ordered events for every provider interaction
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    pub sessions_opened: usize,
    pub sessions_closed: usize,
    pub producers_opened: usize,
    pub producers_closed: usize,
    pub consumers_opened: usize,
    pub consumers_closed: usize,
    pub commits: usize,
    pub rollbacks: usize,
    pub acknowledges: usize,
    pub temp_destinations_created: usize,
    pub temp_destinations_deleted: usize,
    /// Every message handed to a mock producer, in send order
    pub sent: Vec<ProviderMessage>,
    /// Interleaved event names, for ordering assertions
    pub events: Vec<String>,
}

impl CallLog {
    fn record(&mut self, event: &str) {
        self.events.push(event.to_string());
    }
}

/// Which provider calls should fail
#[derive(Debug, Clone, Copy, Default)]
pub struct Failpoints {
    pub create_session: bool,
    pub create_producer: bool,
    pub create_consumer: bool,
    pub commit: bool,
    pub rollback: bool,
    pub acknowledge: bool,
    pub send: bool,
    pub receive: bool,
}

struct Shared {
    log: Mutex<CallLog>,
    failpoints: Mutex<Failpoints>,
    inbound: Mutex<VecDeque<ProviderMessage>>,
}

/// Mock provider connection
pub struct MockConnection {
    shared: Arc<Shared>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                log: Mutex::new(CallLog::default()),
                failpoints: Mutex::new(Failpoints::default()),
                inbound: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// Snapshot of the call log
    pub fn log(&self) -> CallLog {
        self.shared.log.lock().clone()
    }

    /// Append a caller-defined event to the ordered event list
    pub fn push_event(&self, event: &str) {
        self.shared.log.lock().record(event);
    }

    /// Replace the active failpoints
    pub fn set_failpoints(&self, failpoints: Failpoints) {
        *self.shared.failpoints.lock() = failpoints;
    }

    /// Queue a message for mock consumers to receive
    pub fn push_inbound(&self, message: ProviderMessage) {
        self.shared.inbound.lock().push_back(message);
    }

    /// Number of queued inbound messages not yet received
    pub fn inbound_remaining(&self) -> usize {
        self.shared.inbound.lock().len()
    }
}

impl Default for MockConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection for MockConnection {
    fn create_session(&self, transacted: bool, ack_mode: AckMode) -> Result<Box<dyn Session>> {
        if self.shared.failpoints.lock().create_session {
            return Err(JmsError::connection("mock: create_session failed"));
        }
        let mut log = self.shared.log.lock();
        log.sessions_opened += 1;
        log.record("create_session");
        drop(log);
        Ok(Box::new(MockSession {
            shared: self.shared.clone(),
            transacted,
            ack_mode,
            closed: false,
        }))
    }
}

struct MockSession {
    shared: Arc<Shared>,
    transacted: bool,
    ack_mode: AckMode,
    closed: bool,
}

impl Session for MockSession {
    fn is_transacted(&self) -> bool {
        self.transacted
    }

    fn ack_mode(&self) -> AckMode {
        self.ack_mode
    }

    fn create_producer(&mut self, _destination: &Destination) -> Result<Box<dyn MessageProducer>> {
        if self.shared.failpoints.lock().create_producer {
            return Err(JmsError::connection("mock: create_producer failed"));
        }
        let mut log = self.shared.log.lock();
        log.producers_opened += 1;
        log.record("create_producer");
        drop(log);
        Ok(Box::new(MockProducer {
            shared: self.shared.clone(),
        }))
    }

    fn create_consumer(&mut self, _destination: &Destination) -> Result<Box<dyn MessageConsumer>> {
        if self.shared.failpoints.lock().create_consumer {
            return Err(JmsError::connection("mock: create_consumer failed"));
        }
        let mut log = self.shared.log.lock();
        log.consumers_opened += 1;
        log.record("create_consumer");
        drop(log);
        Ok(Box::new(MockConsumer {
            shared: self.shared.clone(),
        }))
    }

    fn create_temporary_destination(&mut self) -> Result<Destination> {
        let mut log = self.shared.log.lock();
        log.temp_destinations_created += 1;
        log.record("create_temporary_destination");
        Ok(Destination::Temporary(Uuid::new_v4().to_string()))
    }

    fn delete_temporary_destination(&mut self, _destination: &Destination) -> Result<()> {
        let mut log = self.shared.log.lock();
        log.temp_destinations_deleted += 1;
        log.record("delete_temporary_destination");
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.shared.failpoints.lock().commit {
            return Err(JmsError::acknowledgment("mock: commit failed"));
        }
        let mut log = self.shared.log.lock();
        log.commits += 1;
        log.record("commit");
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        if self.shared.failpoints.lock().rollback {
            return Err(JmsError::acknowledgment("mock: rollback failed"));
        }
        let mut log = self.shared.log.lock();
        log.rollbacks += 1;
        log.record("rollback");
        Ok(())
    }

    fn acknowledge(&mut self, _message: &ProviderMessage) -> Result<()> {
        if self.shared.failpoints.lock().acknowledge {
            return Err(JmsError::acknowledgment("mock: acknowledge failed"));
        }
        let mut log = self.shared.log.lock();
        log.acknowledges += 1;
        log.record("acknowledge");
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            let mut log = self.shared.log.lock();
            log.sessions_closed += 1;
            log.record("close_session");
        }
        Ok(())
    }
}

struct MockProducer {
    shared: Arc<Shared>,
}

impl MessageProducer for MockProducer {
    fn send(&mut self, message: ProviderMessage) -> Result<()> {
        if self.shared.failpoints.lock().send {
            return Err(JmsError::connection("mock: send failed"));
        }
        let mut log = self.shared.log.lock();
        log.record("send");
        log.sent.push(message);
        Ok(())
    }

    fn send_to(&mut self, _destination: &Destination, message: ProviderMessage) -> Result<()> {
        self.send(message)
    }

    fn close(&mut self) -> Result<()> {
        let mut log = self.shared.log.lock();
        log.producers_closed += 1;
        log.record("close_producer");
        Ok(())
    }
}

struct MockConsumer {
    shared: Arc<Shared>,
}

impl MessageConsumer for MockConsumer {
    fn receive(&mut self, timeout: Duration) -> Result<Option<ProviderMessage>> {
        if self.shared.failpoints.lock().receive {
            return Err(JmsError::connection("mock: receive failed"));
        }
        let next = self.shared.inbound.lock().pop_front();
        match next {
            Some(message) => {
                self.shared.log.lock().record("receive");
                Ok(Some(message))
            }
            None => {
                // Simulate the provider blocking for the full timeout
                std::thread::sleep(timeout);
                Ok(None)
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        let mut log = self.shared.log.lock();
        log.consumers_closed += 1;
        log.record("close_consumer");
        Ok(())
    }
}
