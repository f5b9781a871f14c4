//! Polling consumer
//!
//! For providers without push delivery, a [`PollingConsumer`] owns a
//! dedicated thread that alternates between `receive(timeout)` and the
//! delivery pipeline. Within the loop delivery is strictly sequential: the
//! next message is not fetched until the prior delivery, including its
//! acknowledgment resolution and any rollback wait, has completed.
//!
//! Shutdown is signaled over a crossbeam channel checked between polls, so
//! a stop request never interrupts an in-flight delivery.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use tracing::{error, info, warn};

use super::delivery::DeliveryHandler;
use crate::error::{JmsError, Result};
use crate::provider::{Connection, Destination};
use crate::session::handle::SessionHandle;

/// A consumer driven by its own poll-loop thread
pub struct PollingConsumer {
    shutdown_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl PollingConsumer {
    /// Open a consumer session on `destination` and start the poll loop.
    ///
    /// # Errors
    /// [`JmsError::Connection`] when the session or consumer cannot be
    /// created; the loop is not started in that case.
    pub fn start(
        connection: &dyn Connection,
        destination: &Destination,
        handler: DeliveryHandler,
    ) -> Result<Self> {
        let config = handler.config();
        let handle = SessionHandle::open_consumer(
            connection,
            destination,
            config.transacted,
            config.ack_mode,
        )?;
        let (shutdown_tx, shutdown_rx) = bounded(1);
        let thread = thread::Builder::new()
            .name(format!("jms-consumer-{}", destination.name()))
            .spawn(move || poll_loop(handle, handler, shutdown_rx))?;
        Ok(Self {
            shutdown_tx,
            thread: Some(thread),
        })
    }

    /// Signal the poll loop to stop and wait for it to finish.
    ///
    /// Safe to call while a delivery is in flight: the loop finishes the
    /// current delivery before it exits, and teardown swallows errors.
    pub fn stop(&mut self) {
        let _ = self.shutdown_tx.try_send(());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("consumer poll thread panicked");
            }
        }
    }
}

impl Drop for PollingConsumer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn poll_loop(mut handle: SessionHandle, handler: DeliveryHandler, shutdown_rx: Receiver<()>) {
    let receive_timeout = handler.config().receive_timeout;
    let transacted = handle.is_transacted();
    info!("consumer poll loop started");

    loop {
        match shutdown_rx.try_recv() {
            Ok(()) => {
                info!("consumer poll loop received shutdown signal");
                break;
            }
            Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => {}
        }

        let received = match handle.consumer() {
            Ok(consumer) => consumer.receive(receive_timeout),
            Err(err) => {
                error!("consumer handle unusable: {err}");
                break;
            }
        };

        let raw = match received {
            Ok(Some(raw)) => raw,
            Ok(None) => continue,
            Err(err @ JmsError::Connection(_)) => {
                // Consumption halts until the connection component recovers
                error!("receive failed, stopping consumer: {err}");
                break;
            }
            Err(err) => {
                warn!("receive failed: {err}");
                continue;
            }
        };

        let session = match handle.session() {
            Ok(session) => session,
            Err(err) => {
                error!("consumer session unusable: {err}");
                break;
            }
        };

        if let Err(err) = handler.on_message(session, raw) {
            if err.is_fatal_for_delivery(transacted) {
                error!("fatal delivery error, stopping consumer: {err}");
                break;
            }
            warn!("delivery failed, message left for provider redelivery: {err}");
        }
    }

    handle.close();
    info!("consumer poll loop stopped");
}
