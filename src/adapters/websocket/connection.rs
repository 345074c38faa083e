//! One live client session bound to a user and a chat room.
//!
//! A connection is split in two halves when it is opened:
//!
//! ```text
//!            Connection (hub side)           OutboundQueue (pump side)
//!            ├── ConnectionKey               ├── ConnectionKey
//!            ├── mpsc::Sender ─── frames ──▶ ├── mpsc::Receiver
//!            └── ConnectionStatus ◀─shared─▶ └── ConnectionStatus
//! ```
//!
//! The hub owns the only sender. Dropping the `Connection` (on unregister,
//! eviction or shutdown) closes the queue, which is how the outbound pump
//! learns it must stop.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::domain::foundation::{ChatId, StateMachine, UserId};
use crate::ports::EventFrame;

/// Unique handle for a connection, generated server-side on admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a connection: who is listening, where, through which handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionKey {
    pub id: ConnectionId,
    pub user_id: UserId,
    pub chat_id: ChatId,
}

/// Lifecycle of a connection. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    /// Handshake accepted, identity resolved, not yet in the registry.
    Admitted = 0,
    /// In the registry; both pumps running.
    Registered = 1,
    /// Queue closed; no further frames are accepted.
    Unregistering = 2,
    /// Transport closed and both pumps exited.
    Closed = 3,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ConnectionState::Admitted,
            1 => ConnectionState::Registered,
            2 => ConnectionState::Unregistering,
            _ => ConnectionState::Closed,
        }
    }
}

impl StateMachine for ConnectionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            // Admitted → Closed when the hub refuses admission.
            ConnectionState::Admitted => {
                vec![ConnectionState::Registered, ConnectionState::Closed]
            }
            ConnectionState::Registered => vec![ConnectionState::Unregistering],
            ConnectionState::Unregistering => vec![ConnectionState::Closed],
            ConnectionState::Closed => vec![],
        }
    }
}

/// Shared, lock-free view of a connection's lifecycle state.
///
/// Leaving `Registered` also wakes every task parked in
/// [`closing`](Self::closing), so a write stuck on a stalled client can be
/// abandoned.
#[derive(Debug, Clone)]
pub struct ConnectionStatus(Arc<StatusCell>);

#[derive(Debug)]
struct StatusCell {
    state: AtomicU8,
    closing: Notify,
}

impl ConnectionStatus {
    fn new() -> Self {
        Self(Arc::new(StatusCell {
            state: AtomicU8::new(ConnectionState::Admitted as u8),
            closing: Notify::new(),
        }))
    }

    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.state.load(Ordering::Acquire))
    }

    /// True once the connection is `Unregistering` or `Closed`.
    pub fn is_closing(&self) -> bool {
        matches!(
            self.get(),
            ConnectionState::Unregistering | ConnectionState::Closed
        )
    }

    /// Resolves once the connection has started tearing down.
    pub async fn closing(&self) {
        loop {
            // Registered before the check so a concurrent advance is not missed.
            let notified = self.0.closing.notified();
            if self.is_closing() {
                return;
            }
            notified.await;
        }
    }

    /// Moves to `target` if that is a legal edge from the current state.
    ///
    /// Returns false when another party already moved the connection
    /// past the point where `target` applies.
    pub(crate) fn advance(&self, target: ConnectionState) -> bool {
        let mut current = self.0.state.load(Ordering::Acquire);
        loop {
            let state = ConnectionState::from_u8(current);
            if state.transition_to(target).is_err() {
                return false;
            }
            match self.0.state.compare_exchange(
                current,
                target as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }

        if matches!(
            target,
            ConnectionState::Unregistering | ConnectionState::Closed
        ) {
            self.0.closing.notify_waiters();
        }
        true
    }

    /// Marks the connection closed, walking through `Unregistering` if the
    /// hub never got to it.
    pub(crate) fn close(&self) {
        self.advance(ConnectionState::Unregistering);
        self.advance(ConnectionState::Closed);
    }
}

/// Why a frame could not be queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    /// Queue at capacity: the client is not keeping up.
    Full,
    /// The outbound pump is gone.
    Closed,
    /// The connection is already being torn down.
    NotAccepting,
}

/// Hub-side half of a connection.
#[derive(Debug)]
pub struct Connection {
    key: ConnectionKey,
    outbound: mpsc::Sender<EventFrame>,
    status: ConnectionStatus,
}

impl Connection {
    /// Creates both halves of a connection with a bounded outbound queue.
    pub fn open(user_id: UserId, chat_id: ChatId, capacity: usize) -> (Connection, OutboundQueue) {
        let key = ConnectionKey {
            id: ConnectionId::new(),
            user_id,
            chat_id,
        };
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let status = ConnectionStatus::new();

        let connection = Connection {
            key,
            outbound: tx,
            status: status.clone(),
        };
        let queue = OutboundQueue {
            key,
            inbox: rx,
            status,
        };
        (connection, queue)
    }

    pub fn key(&self) -> &ConnectionKey {
        &self.key
    }

    pub fn id(&self) -> ConnectionId {
        self.key.id
    }

    pub fn chat_id(&self) -> ChatId {
        self.key.chat_id
    }

    pub fn user_id(&self) -> UserId {
        self.key.user_id
    }

    pub fn state(&self) -> ConnectionState {
        self.status.get()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status.clone()
    }

    /// Non-blocking enqueue; never waits for queue space.
    pub fn try_enqueue(&self, frame: EventFrame) -> Result<(), EnqueueError> {
        if self.status.get() != ConnectionState::Registered {
            return Err(EnqueueError::NotAccepting);
        }
        self.outbound.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => EnqueueError::Full,
            TrySendError::Closed(_) => EnqueueError::Closed,
        })
    }

    pub(crate) fn mark_registered(&self) -> bool {
        self.status.advance(ConnectionState::Registered)
    }

    /// Stops accepting frames. The queue itself closes when `self` drops.
    pub(crate) fn begin_unregistering(&self) -> bool {
        self.status.advance(ConnectionState::Unregistering)
    }

    /// Second hub-side handle onto the same queue and status.
    #[cfg(test)]
    pub(crate) fn duplicate(&self) -> Connection {
        Connection {
            key: self.key,
            outbound: self.outbound.clone(),
            status: self.status.clone(),
        }
    }
}

/// Pump-side half of a connection: the receiving end of the outbound queue.
#[derive(Debug)]
pub struct OutboundQueue {
    key: ConnectionKey,
    inbox: mpsc::Receiver<EventFrame>,
    status: ConnectionStatus,
}

impl OutboundQueue {
    pub fn key(&self) -> &ConnectionKey {
        &self.key
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status.clone()
    }

    /// Next frame in FIFO order, or `None` once the hub closed the queue
    /// and everything already queued has been drained.
    pub async fn recv(&mut self) -> Option<EventFrame> {
        self.inbox.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<EventFrame> {
        self.inbox.try_recv().ok()
    }
}
