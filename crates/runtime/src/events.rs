//! Event plumbing shared by the session and the scheduler.
//!
//! - [`EventBus`] - Internal dispatcher combining broadcast channels with
//!   predicate-based waiters
//! - [`EventStream`] - Ergonomic wrapper around [`broadcast::Receiver`] with
//!   lag handling
//! - [`EventWaiter`] - One-shot event capture with timeout support
//!
//! Subscribers either poll an [`EventStream`] or wait for a single matching
//! event through an [`EventWaiter`]; the bus satisfies waiters before
//! broadcasting so `wait_for` style calls never lose their event to a
//! lagging receiver.
//!
//! [`broadcast::Receiver`]: tokio::sync::broadcast::Receiver

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{broadcast, oneshot};

use crate::error::{Error, Result};

struct WaiterEntry<E> {
    predicate: Box<dyn Fn(&E) -> bool + Send + Sync>,
    complete_tx: oneshot::Sender<E>,
}

/// Internal event bus combining broadcast channels with predicate-based waiters.
///
/// Provides two delivery mechanisms:
///
/// 1. **Broadcast**: All subscribers receive events via [`subscribe`](Self::subscribe)
/// 2. **Waiters**: One-shot receivers with predicates via [`register_waiter`](Self::register_waiter)
///
/// Waiters are checked first during [`emit`](Self::emit), ensuring guaranteed
/// delivery for `wait_for` patterns even when broadcast receivers are lagging.
pub(crate) struct EventBus<E: Clone + Send + 'static> {
    tx: broadcast::Sender<E>,
    waiters: Mutex<Vec<WaiterEntry<E>>>,
}

impl<E: Clone + Send + 'static> EventBus<E> {
    /// Creates a new [`EventBus`] with the specified broadcast channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Emits an event to all subscribers and matching waiters.
    ///
    /// Waiters with matching predicates receive the event first via oneshot
    /// channel and are removed from the registry. The event is then broadcast
    /// to all stream subscribers.
    pub fn emit(&self, event: E) {
        {
            let mut waiters = self.waiters.lock();
            let mut i = 0;
            while i < waiters.len() {
                if (waiters[i].predicate)(&event) {
                    let entry = waiters.swap_remove(i);
                    let _ = entry.complete_tx.send(event.clone());
                } else {
                    i += 1;
                }
            }
        }
        let _ = self.tx.send(event);
    }

    /// Subscribes to the event stream.
    ///
    /// Returns a [`broadcast::Receiver`] that will receive all future events.
    /// Events emitted before subscription are not received.
    ///
    /// [`broadcast::Receiver`]: tokio::sync::broadcast::Receiver
    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.tx.subscribe()
    }

    /// Registers a waiter that will receive the first matching event.
    ///
    /// Returns a [`oneshot::Receiver`] that completes when an event matching
    /// the `predicate` is emitted. The waiter is automatically removed after
    /// matching.
    ///
    /// [`oneshot::Receiver`]: tokio::sync::oneshot::Receiver
    pub fn register_waiter<F>(&self, predicate: F) -> oneshot::Receiver<E>
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let (complete_tx, complete_rx) = oneshot::channel();
        let entry = WaiterEntry {
            predicate: Box::new(predicate),
            complete_tx,
        };
        self.waiters.lock().push(entry);
        complete_rx
    }

    /// Returns the number of registered waiters.
    #[allow(dead_code)]
    pub fn waiter_count(&self) -> usize {
        self.waiters.lock().len()
    }
}

impl<E: Clone + Send + 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Ergonomic wrapper around [`broadcast::Receiver`] with automatic lag handling.
///
/// Unlike the raw receiver, [`EventStream`] handles [`RecvError::Lagged`] by
/// logging a warning and continuing to receive. This prevents lag errors from
/// breaking event processing loops.
///
/// [`broadcast::Receiver`]: tokio::sync::broadcast::Receiver
/// [`RecvError::Lagged`]: tokio::sync::broadcast::error::RecvError::Lagged
pub struct EventStream<E: Clone + Send + 'static> {
    rx: broadcast::Receiver<E>,
}

impl<E: Clone + Send + 'static> EventStream<E> {
    /// Creates a new [`EventStream`] wrapping the given broadcast receiver.
    pub(crate) fn new(rx: broadcast::Receiver<E>) -> Self {
        Self { rx }
    }

    /// Receives the next event, blocking until one is available.
    ///
    /// Returns `Some(event)` on success, or `None` when the channel closes
    /// (typically when the emitting side is dropped). Broadcast lag is
    /// handled internally by logging and continuing.
    pub async fn recv(&mut self) -> Option<E> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(dropped = n, "Event stream lagged, dropped events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `Some(event)` if one is immediately available, `None` otherwise.
    /// Like [`recv`](Self::recv), broadcast lag is handled internally.
    pub fn try_recv(&mut self) -> Option<E> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!(dropped = n, "Event stream lagged, dropped events");
                }
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => return None,
            }
        }
    }
}

/// One-shot event waiter with timeout support.
///
/// Created by the session's `wait_for` and completes when a matching event is
/// emitted. Supports two consumption patterns:
///
/// - **With timeout**: Call [`wait()`](Self::wait) for timeout support
/// - **Without timeout**: Use `.await` directly (implements [`Future`])
pub struct EventWaiter<E> {
    rx: oneshot::Receiver<E>,
    timeout: Duration,
}

impl<E: Send + 'static> EventWaiter<E> {
    /// Creates a new [`EventWaiter`] with the given receiver and timeout.
    pub(crate) fn new(rx: oneshot::Receiver<E>, timeout: Duration) -> Self {
        Self { rx, timeout }
    }

    /// Waits for the event with the configured timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if no matching event arrives within the timeout
    /// - [`Error::ChannelClosed`] if the event source is dropped
    pub async fn wait(self) -> Result<E> {
        tokio::time::timeout(self.timeout, self.rx)
            .await
            .map_err(|_| Error::Timeout("Timeout waiting for event".to_string()))?
            .map_err(|_| Error::ChannelClosed)
    }
}

impl<E: Send + 'static> Future for EventWaiter<E> {
    type Output = Result<E>;

    /// Polls the waiter without timeout. For timeout support, use [`wait()`](Self::wait).
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(event)) => Poll::Ready(Ok(event)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(Error::ChannelClosed)),
            Poll::Pending => Poll::Pending,
        }
    }
}
