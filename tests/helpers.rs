// Shared mock provider for integration tests
//
// A lean recording provider built on the crate's public traits. Every
// session, producer, and consumer created from one MockConnection shares a
// single ordered event log, so tests can assert on the exact interleaving
// of provider interactions and listener activity.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jms_bridge::{
    AckMode, AdapterMessage, Connection, Destination, MessageConsumer, MessageListener,
    MessageProducer, OutcomeToken, ProviderMessage, Result, Session,
};

#[derive(Default)]
struct Shared {
    events: Mutex<Vec<String>>,
    inbound: Mutex<VecDeque<ProviderMessage>>,
    sent: Mutex<Vec<ProviderMessage>>,
    sessions_opened: AtomicUsize,
    sessions_closed: AtomicUsize,
    consumers_closed: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    acknowledges: AtomicUsize,
    temp_created: AtomicUsize,
    temp_deleted: AtomicUsize,
}

impl Shared {
    fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }
}

pub struct MockConnection {
    shared: Arc<Shared>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
        }
    }

    pub fn push_inbound(&self, message: ProviderMessage) {
        self.shared.inbound.lock().unwrap().push_back(message);
    }

    pub fn inbound_remaining(&self) -> usize {
        self.shared.inbound.lock().unwrap().len()
    }

    pub fn events(&self) -> Vec<String> {
        self.shared.events.lock().unwrap().clone()
    }

    pub fn push_event(&self, event: impl Into<String>) {
        self.shared.record(event);
    }

    pub fn sent(&self) -> Vec<ProviderMessage> {
        self.shared.sent.lock().unwrap().clone()
    }

    pub fn sessions_opened(&self) -> usize {
        self.shared.sessions_opened.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> usize {
        self.shared.sessions_closed.load(Ordering::SeqCst)
    }

    pub fn consumers_closed(&self) -> usize {
        self.shared.consumers_closed.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.shared.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.shared.rollbacks.load(Ordering::SeqCst)
    }

    pub fn acknowledges(&self) -> usize {
        self.shared.acknowledges.load(Ordering::SeqCst)
    }

    pub fn temp_created(&self) -> usize {
        self.shared.temp_created.load(Ordering::SeqCst)
    }

    pub fn temp_deleted(&self) -> usize {
        self.shared.temp_deleted.load(Ordering::SeqCst)
    }
}

impl Connection for MockConnection {
    fn create_session(&self, transacted: bool, ack_mode: AckMode) -> Result<Box<dyn Session>> {
        self.shared.sessions_opened.fetch_add(1, Ordering::SeqCst);
        self.shared.record("create_session");
        Ok(Box::new(MockSession {
            shared: self.shared.clone(),
            transacted,
            ack_mode,
        }))
    }
}

struct MockSession {
    shared: Arc<Shared>,
    transacted: bool,
    ack_mode: AckMode,
}

impl Session for MockSession {
    fn is_transacted(&self) -> bool {
        self.transacted
    }

    fn ack_mode(&self) -> AckMode {
        self.ack_mode
    }

    fn create_producer(&mut self, _destination: &Destination) -> Result<Box<dyn MessageProducer>> {
        self.shared.record("create_producer");
        Ok(Box::new(MockProducer {
            shared: self.shared.clone(),
        }))
    }

    fn create_consumer(&mut self, _destination: &Destination) -> Result<Box<dyn MessageConsumer>> {
        self.shared.record("create_consumer");
        Ok(Box::new(MockConsumer {
            shared: self.shared.clone(),
        }))
    }

    fn create_temporary_destination(&mut self) -> Result<Destination> {
        let n = self.shared.temp_created.fetch_add(1, Ordering::SeqCst);
        Ok(Destination::Temporary(format!("reply-{}", n)))
    }

    fn delete_temporary_destination(&mut self, _destination: &Destination) -> Result<()> {
        self.shared.temp_deleted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.shared.commits.fetch_add(1, Ordering::SeqCst);
        self.shared.record("commit");
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.shared.rollbacks.fetch_add(1, Ordering::SeqCst);
        self.shared.record("rollback");
        Ok(())
    }

    fn acknowledge(&mut self, _message: &ProviderMessage) -> Result<()> {
        self.shared.acknowledges.fetch_add(1, Ordering::SeqCst);
        self.shared.record("acknowledge");
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.shared.sessions_closed.fetch_add(1, Ordering::SeqCst);
        self.shared.record("close_session");
        Ok(())
    }
}

struct MockProducer {
    shared: Arc<Shared>,
}

impl MessageProducer for MockProducer {
    fn send(&mut self, message: ProviderMessage) -> Result<()> {
        self.shared.record("send");
        self.shared.sent.lock().unwrap().push(message);
        Ok(())
    }

    fn send_to(&mut self, _destination: &Destination, message: ProviderMessage) -> Result<()> {
        self.send(message)
    }

    fn close(&mut self) -> Result<()> {
        self.shared.record("close_producer");
        Ok(())
    }
}

struct MockConsumer {
    shared: Arc<Shared>,
}

impl MessageConsumer for MockConsumer {
    fn receive(&mut self, timeout: Duration) -> Result<Option<ProviderMessage>> {
        let next = self.shared.inbound.lock().unwrap().pop_front();
        match next {
            Some(message) => {
                self.shared.record("receive");
                Ok(Some(message))
            }
            None => {
                std::thread::sleep(timeout);
                Ok(None)
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.shared.consumers_closed.fetch_add(1, Ordering::SeqCst);
        self.shared.record("close_consumer");
        Ok(())
    }
}

/// Listener that records each dispatch into the connection's event log and
/// signals an outcome chosen per invocation
pub struct ScriptedListener {
    connection_events: Arc<dyn Fn(String) + Send + Sync>,
    /// outcome per invocation index; invocations beyond the script succeed
    script: Vec<ScriptedOutcome>,
    invocations: AtomicUsize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ScriptedOutcome {
    Success,
    Failure,
    /// Violate the contract: return without signaling
    Silent,
}

impl ScriptedListener {
    pub fn new(connection: &MockConnection, script: Vec<ScriptedOutcome>) -> Self {
        let shared = connection.shared.clone();
        Self {
            connection_events: Arc::new(move |event| shared.record(event)),
            script,
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

impl MessageListener for ScriptedListener {
    fn on_message(&self, message: AdapterMessage, outcome: OutcomeToken) {
        let index = self.invocations.fetch_add(1, Ordering::SeqCst);
        (self.connection_events)(format!(
            "deliver:{}",
            String::from_utf8_lossy(message.payload())
        ));
        match self.script.get(index).copied().unwrap_or(ScriptedOutcome::Success) {
            ScriptedOutcome::Success => outcome.success(),
            ScriptedOutcome::Failure => outcome.failure(),
            ScriptedOutcome::Silent => {}
        }
    }
}

/// Poll `condition` until it holds or `deadline` elapses
pub fn wait_until(deadline: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}

// Placeholder so this file also compiles as a standalone test crate; the
// real tests live in the files that declare `mod helpers`.
#[test]
fn mock_connection_starts_clean() {
    let connection = MockConnection::new();
    assert_eq!(connection.sessions_opened(), 0);
    assert_eq!(connection.inbound_remaining(), 0);
}
