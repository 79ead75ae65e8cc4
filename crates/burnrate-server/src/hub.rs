//! Broadcast hub fanning messages out to connected observers.
//!
//! The hub is an actor: one task owns the set of observers and every change
//! to it arrives as a message on one of three channels (register,
//! unregister, broadcast). Events are applied one at a time, so the set is
//! never touched concurrently.
//!
//! Each observer has a private bounded queue. A broadcast is offered to
//! every queue without waiting; an observer whose queue is full is treated
//! as unresponsive and evicted on the spot. Dropping its sender closes the
//! queue, which is the signal for the observer's write task to finish.

use std::collections::BTreeMap;

use burnrate_types::Envelope;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// Capacity of each observer's outbound queue.
pub const OBSERVER_QUEUE_CAPACITY: usize = 256;

/// Capacity of the hub's inbound control channels.
const CONTROL_CAPACITY: usize = 64;

/// Errors returned by [`HubHandle`].
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// The hub task has stopped.
    #[error("broadcast hub has shut down")]
    Closed,

    /// The envelope could not be encoded.
    #[error("failed to encode envelope: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Unique identifier of a connected observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(Uuid);

impl ObserverId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// The hub's side of an observer: its id and the sending half of its
/// queue.
#[derive(Debug)]
pub struct Observer {
    id: ObserverId,
    tx: mpsc::Sender<String>,
}

impl Observer {
    /// Create an observer with the default queue capacity.
    ///
    /// Returns the observer (to hand to [`HubHandle::register`]) and the
    /// receiving half of its queue (for the write task).
    pub fn channel() -> (Self, mpsc::Receiver<String>) {
        Self::channel_with_capacity(OBSERVER_QUEUE_CAPACITY)
    }

    /// Create an observer with a custom queue capacity.
    pub fn channel_with_capacity(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                id: ObserverId::new(),
                tx,
            },
            rx,
        )
    }

    /// This observer's identifier.
    pub const fn id(&self) -> ObserverId {
        self.id
    }
}

/// The observer set owned by the hub task.
#[derive(Debug, Default)]
pub struct Hub {
    observers: BTreeMap<ObserverId, mpsc::Sender<String>>,
}

impl Hub {
    /// Add an observer.
    pub fn register(&mut self, observer: Observer) {
        debug!(observer = %observer.id, "Observer registered");
        self.observers.insert(observer.id, observer.tx);
    }

    /// Remove an observer, closing its queue. Returns whether it was
    /// present.
    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let removed = self.observers.remove(&id).is_some();
        if removed {
            debug!(observer = %id, "Observer unregistered");
        }
        removed
    }

    /// Offer `message` to every observer without waiting.
    ///
    /// Observers whose queue is full or whose write task is gone are
    /// removed. Returns the number of observers the message was queued
    /// for.
    pub fn broadcast(&mut self, message: &str) -> usize {
        let mut delivered = 0_usize;
        self.observers.retain(|id, tx| match tx.try_send(message.to_owned()) {
            Ok(()) => {
                delivered = delivered.saturating_add(1);
                true
            }
            Err(TrySendError::Full(_)) => {
                debug!(observer = %id, "Observer queue full, evicting");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(observer = %id, "Observer queue closed, removing");
                false
            }
        });
        delivered
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Whether the observer is registered.
    pub fn contains(&self, id: ObserverId) -> bool {
        self.observers.contains_key(&id)
    }
}

/// Cloneable handle for sending events to the hub task.
#[derive(Debug, Clone)]
pub struct HubHandle {
    register: mpsc::Sender<Observer>,
    unregister: mpsc::Sender<ObserverId>,
    broadcast: mpsc::Sender<String>,
}

impl HubHandle {
    /// Add an observer to the set.
    ///
    /// # Errors
    ///
    /// [`HubError::Closed`] if the hub task has stopped.
    pub async fn register(&self, observer: Observer) -> Result<(), HubError> {
        self.register
            .send(observer)
            .await
            .map_err(|_closed| HubError::Closed)
    }

    /// Remove an observer and close its queue. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// [`HubError::Closed`] if the hub task has stopped.
    pub async fn unregister(&self, id: ObserverId) -> Result<(), HubError> {
        self.unregister
            .send(id)
            .await
            .map_err(|_closed| HubError::Closed)
    }

    /// Fan a raw message out to every observer.
    ///
    /// # Errors
    ///
    /// [`HubError::Closed`] if the hub task has stopped.
    pub async fn broadcast(&self, message: String) -> Result<(), HubError> {
        self.broadcast
            .send(message)
            .await
            .map_err(|_closed| HubError::Closed)
    }

    /// Encode an envelope as JSON and fan it out.
    ///
    /// # Errors
    ///
    /// [`HubError::Serialization`] if encoding fails, or
    /// [`HubError::Closed`] if the hub task has stopped.
    pub async fn publish(&self, envelope: &Envelope) -> Result<(), HubError> {
        let message = serde_json::to_string(envelope)?;
        self.broadcast(message).await
    }
}

/// Start the hub task.
///
/// The task runs until every [`HubHandle`] clone has been dropped.
pub fn spawn_hub() -> (HubHandle, JoinHandle<()>) {
    let (register_tx, register_rx) = mpsc::channel(CONTROL_CAPACITY);
    let (unregister_tx, unregister_rx) = mpsc::channel(CONTROL_CAPACITY);
    let (broadcast_tx, broadcast_rx) = mpsc::channel(CONTROL_CAPACITY);

    let handle = HubHandle {
        register: register_tx,
        unregister: unregister_tx,
        broadcast: broadcast_tx,
    };
    let task = tokio::spawn(run(Hub::default(), register_rx, unregister_rx, broadcast_rx));
    (handle, task)
}

async fn run(
    mut hub: Hub,
    mut register_rx: mpsc::Receiver<Observer>,
    mut unregister_rx: mpsc::Receiver<ObserverId>,
    mut broadcast_rx: mpsc::Receiver<String>,
) {
    loop {
        // Membership changes drain before broadcasts, so an observer that
        // registered before a broadcast was sent receives it.
        tokio::select! {
            biased;
            Some(observer) = register_rx.recv() => hub.register(observer),
            Some(id) = unregister_rx.recv() => {
                hub.unregister(id);
            }
            Some(message) = broadcast_rx.recv() => {
                hub.broadcast(&message);
            }
            else => break,
        }
    }
    debug!(observers = hub.len(), "Broadcast hub stopped");
}
