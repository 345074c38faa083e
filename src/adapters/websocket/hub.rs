//! Process-wide registry of live connections, grouped by chat room.
//!
//! # Architecture
//!
//! ```text
//! Room: chat-7         Room: chat-9
//! ├── conn-a (user 1)  ├── conn-d (user 4)
//! ├── conn-b (user 2)  └── conn-e (user 1)
//! └── conn-c (user 3)
//! ```
//!
//! A broadcast to chat-7 reaches a, b and c only.
//!
//! # Locking
//!
//! The registry sits behind one `RwLock`. Register/unregister take the
//! write half; broadcasts take the read half, so broadcasts to the same or
//! different rooms run concurrently. Enqueueing is `try_send`, so a
//! broadcast never waits on a client. Connections whose queue is full are
//! marked `Unregistering` while the read guard is held (which stops any
//! further frame reaching them) and removed after it is released.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{ChatId, UserId};
use crate::ports::{EventFrame, RoomBroadcaster};

use super::connection::{Connection, ConnectionId, ConnectionKey, EnqueueError, OutboundQueue};

/// Outbound queue depth used when none is configured.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

type Room = HashMap<ConnectionId, Connection>;

/// Registry + broadcaster for realtime chat events.
pub struct Hub {
    /// Map of chat_id → connections currently in that room. Rooms with no
    /// connections are removed.
    rooms: RwLock<HashMap<ChatId, Room>>,

    /// Outbound queue depth for connections opened through this hub.
    queue_capacity: usize,

    /// Set once by `shutdown`; later registrations are refused.
    shut_down: AtomicBool,
}

impl Hub {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            queue_capacity: queue_capacity.max(1),
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Creates a connection sized for this hub. It is not registered yet.
    pub fn open_connection(&self, user_id: UserId, chat_id: ChatId) -> (Connection, OutboundQueue) {
        Connection::open(user_id, chat_id, self.queue_capacity)
    }

    /// Adds a connection to its room, creating the room if needed.
    ///
    /// Returns false (and drops the connection, closing its queue) if the
    /// hub has been shut down. A second registration under a handle that
    /// is already present is ignored so a connection is never enqueued
    /// twice for the same broadcast.
    pub async fn register(&self, connection: Connection) -> bool {
        let mut rooms = self.rooms.write().await;

        if self.shut_down.load(Ordering::Acquire) {
            tracing::debug!(
                connection_id = %connection.id(),
                chat_id = %connection.chat_id(),
                "Hub is shut down, refusing connection"
            );
            connection.status().close();
            return false;
        }

        let room = rooms.entry(connection.chat_id()).or_default();
        if room.contains_key(&connection.id()) {
            tracing::warn!(
                connection_id = %connection.id(),
                chat_id = %connection.chat_id(),
                "Connection already registered, ignoring duplicate"
            );
            return false;
        }

        connection.mark_registered();
        tracing::info!(
            connection_id = %connection.id(),
            chat_id = %connection.chat_id(),
            user_id = %connection.user_id(),
            room_size = room.len() + 1,
            "Connection registered"
        );
        room.insert(connection.id(), connection);
        true
    }

    /// Removes a connection and closes its outbound queue.
    ///
    /// Idempotent: returns false if the connection was not registered,
    /// which happens whenever teardown paths race.
    pub async fn unregister(&self, key: &ConnectionKey) -> bool {
        let removed = {
            let mut rooms = self.rooms.write().await;
            let Some(room) = rooms.get_mut(&key.chat_id) else {
                return false;
            };
            let removed = room.remove(&key.id);
            if room.is_empty() {
                rooms.remove(&key.chat_id);
            }
            removed
        };

        match removed {
            Some(connection) => {
                connection.begin_unregistering();
                tracing::info!(
                    connection_id = %key.id,
                    chat_id = %key.chat_id,
                    user_id = %key.user_id,
                    "Connection unregistered"
                );
                // Dropping the hub's sender closes the queue.
                drop(connection);
                true
            }
            None => false,
        }
    }

    /// Queues `frame` on every connection in `chat_id`.
    ///
    /// Never waits on a client. A connection whose queue is full (or whose
    /// pump has gone away) is evicted; the rest of the room is unaffected.
    /// Returns the number of connections the frame was queued on.
    pub async fn broadcast_to_room(&self, chat_id: ChatId, frame: EventFrame) -> usize {
        let mut delivered = 0;
        let mut evicted: Vec<ConnectionKey> = Vec::new();

        {
            let rooms = self.rooms.read().await;
            let Some(room) = rooms.get(&chat_id) else {
                tracing::trace!(chat_id = %chat_id, "No listeners in room");
                return 0;
            };

            for connection in room.values() {
                match connection.try_enqueue(frame.clone()) {
                    Ok(()) => delivered += 1,
                    Err(EnqueueError::NotAccepting) => {}
                    Err(reason) => {
                        if connection.begin_unregistering() {
                            tracing::warn!(
                                connection_id = %connection.id(),
                                chat_id = %chat_id,
                                user_id = %connection.user_id(),
                                ?reason,
                                "Outbound queue unavailable, evicting connection"
                            );
                            evicted.push(*connection.key());
                        }
                    }
                }
            }
        }

        for key in &evicted {
            self.unregister(key).await;
        }

        tracing::trace!(
            chat_id = %chat_id,
            delivered,
            evicted = evicted.len(),
            "Broadcast complete"
        );
        delivered
    }

    /// Unregisters every connection and refuses further registrations.
    ///
    /// Each outbound queue is closed, so every pump terminates. Returns the
    /// number of connections that were drained.
    pub async fn shutdown(&self) -> usize {
        let drained: Vec<Connection> = {
            let mut rooms = self.rooms.write().await;
            self.shut_down.store(true, Ordering::Release);
            rooms.drain().flat_map(|(_, room)| room.into_values()).collect()
        };

        for connection in &drained {
            connection.begin_unregistering();
        }
        tracing::info!(connections = drained.len(), "Hub shut down");
        drained.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    /// Number of connections in a room (0 if the room does not exist).
    pub async fn connection_count(&self, chat_id: ChatId) -> usize {
        self.rooms
            .read()
            .await
            .get(&chat_id)
            .map(|room| room.len())
            .unwrap_or(0)
    }

    /// Returns true if the given handle is registered in its room.
    pub async fn is_registered(&self, key: &ConnectionKey) -> bool {
        self.rooms
            .read()
            .await
            .get(&key.chat_id)
            .is_some_and(|room| room.contains_key(&key.id))
    }

    /// Total connections across all rooms.
    pub async fn total_connections(&self) -> usize {
        self.rooms.read().await.values().map(|room| room.len()).sum()
    }

    /// Rooms that currently have at least one connection.
    pub async fn active_rooms(&self) -> Vec<ChatId> {
        self.rooms.read().await.keys().copied().collect()
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[async_trait]
impl RoomBroadcaster for Hub {
    async fn broadcast_to_room(&self, chat_id: ChatId, frame: EventFrame) -> usize {
        Hub::broadcast_to_room(self, chat_id, frame).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::websocket::connection::ConnectionState;
    use std::sync::Arc;

    fn chat(id: i64) -> ChatId {
        ChatId::from_raw(id)
    }

    fn user(id: i64) -> UserId {
        UserId::from_raw(id)
    }

    fn frame(text: &str) -> EventFrame {
        EventFrame::from(text)
    }

    async fn join(hub: &Hub, user_id: i64, chat_id: i64) -> (ConnectionKey, OutboundQueue) {
        let (connection, queue) = hub.open_connection(user(user_id), chat(chat_id));
        let key = *connection.key();
        assert!(hub.register(connection).await);
        (key, queue)
    }

    #[tokio::test]
    async fn register_creates_room_if_not_exists() {
        let hub = Hub::with_default_capacity();
        let (_key, _queue) = join(&hub, 1, 7).await;

        assert_eq!(hub.active_rooms().await, vec![chat(7)]);
        assert_eq!(hub.connection_count(chat(7)).await, 1);
    }

    #[tokio::test]
    async fn register_marks_connection_registered() {
        let hub = Hub::with_default_capacity();
        let (key, queue) = join(&hub, 1, 7).await;

        assert!(hub.is_registered(&key).await);
        assert_eq!(queue.status().get(), ConnectionState::Registered);
    }

    #[tokio::test]
    async fn broadcast_reaches_every_member_of_room() {
        let hub = Hub::with_default_capacity();
        let (_, mut a) = join(&hub, 1, 7).await;
        let (_, mut b) = join(&hub, 2, 7).await;
        let (_, mut c) = join(&hub, 3, 7).await;

        let delivered = hub.broadcast_to_room(chat(7), frame("hello")).await;

        assert_eq!(delivered, 3);
        for queue in [&mut a, &mut b, &mut c] {
            assert_eq!(queue.recv().await.as_deref(), Some("hello"));
        }
    }

    #[tokio::test]
    async fn broadcast_does_not_leak_into_other_rooms() {
        let hub = Hub::with_default_capacity();
        let (_, mut inside) = join(&hub, 1, 7).await;
        let (_, mut outside) = join(&hub, 1, 9).await;

        hub.broadcast_to_room(chat(7), frame("only-7")).await;

        assert_eq!(inside.try_recv().as_deref(), Some("only-7"));
        assert_eq!(outside.try_recv(), None);
    }

    #[tokio::test]
    async fn broadcast_to_empty_room_is_noop() {
        let hub = Hub::with_default_capacity();
        assert_eq!(hub.broadcast_to_room(chat(42), frame("x")).await, 0);
        assert!(hub.active_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn duplicate_registration_does_not_duplicate_delivery() {
        let hub = Hub::with_default_capacity();
        let (connection, mut queue) = hub.open_connection(user(1), chat(7));
        let duplicate = connection.duplicate();

        assert!(hub.register(connection).await);
        assert!(!hub.register(duplicate).await);

        assert_eq!(hub.broadcast_to_room(chat(7), frame("once")).await, 1);
        assert_eq!(queue.try_recv().as_deref(), Some("once"));
        assert_eq!(queue.try_recv(), None);
    }

    #[tokio::test]
    async fn unregister_closes_queue_and_removes_empty_room() {
        let hub = Hub::with_default_capacity();
        let (key, mut queue) = join(&hub, 1, 7).await;

        assert!(hub.unregister(&key).await);

        assert_eq!(queue.recv().await, None);
        assert!(hub.active_rooms().await.is_empty());
        assert_eq!(queue.status().get(), ConnectionState::Unregistering);
    }

    #[tokio::test]
    async fn unregister_keeps_room_with_remaining_members() {
        let hub = Hub::with_default_capacity();
        let (a, _qa) = join(&hub, 1, 7).await;
        let (_b, _qb) = join(&hub, 2, 7).await;

        hub.unregister(&a).await;

        assert_eq!(hub.connection_count(chat(7)).await, 1);
    }

    #[tokio::test]
    async fn unregister_twice_is_noop() {
        let hub = Hub::with_default_capacity();
        let (key, _queue) = join(&hub, 1, 7).await;

        assert!(hub.unregister(&key).await);
        assert!(!hub.unregister(&key).await);
    }

    #[tokio::test]
    async fn unregister_unknown_connection_is_noop() {
        let hub = Hub::with_default_capacity();
        let (connection, _queue) = hub.open_connection(user(1), chat(7));

        assert!(!hub.unregister(connection.key()).await);
    }

    #[tokio::test]
    async fn saturated_connection_is_evicted_without_affecting_others() {
        let hub = Hub::new(1);
        let (slow_key, mut slow) = join(&hub, 1, 7).await;
        let (_, mut fast) = join(&hub, 2, 7).await;

        assert_eq!(hub.broadcast_to_room(chat(7), frame("p1")).await, 2);
        assert_eq!(fast.recv().await.as_deref(), Some("p1"));

        // slow never drained p1, so p2 overflows its queue.
        assert_eq!(hub.broadcast_to_room(chat(7), frame("p2")).await, 1);
        assert!(!hub.is_registered(&slow_key).await);
        assert_eq!(fast.recv().await.as_deref(), Some("p2"));

        assert_eq!(hub.broadcast_to_room(chat(7), frame("p3")).await, 1);
        assert_eq!(fast.recv().await.as_deref(), Some("p3"));

        // The evicted client keeps what was queued before, then sees closure.
        assert_eq!(slow.recv().await.as_deref(), Some("p1"));
        assert_eq!(slow.recv().await, None);
    }

    #[tokio::test]
    async fn connection_with_vanished_pump_is_evicted() {
        let hub = Hub::with_default_capacity();
        let (key, queue) = join(&hub, 1, 7).await;
        drop(queue);

        assert_eq!(hub.broadcast_to_room(chat(7), frame("x")).await, 0);
        assert!(!hub.is_registered(&key).await);
        assert!(hub.active_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn sequential_broadcasts_arrive_in_order() {
        let hub = Hub::with_default_capacity();
        let (_, mut a) = join(&hub, 1, 7).await;
        let (_, mut b) = join(&hub, 2, 7).await;

        for n in 0..10 {
            hub.broadcast_to_room(chat(7), frame(&n.to_string())).await;
        }

        for queue in [&mut a, &mut b] {
            for n in 0..10 {
                assert_eq!(queue.recv().await.as_deref(), Some(n.to_string().as_str()));
            }
        }
    }

    #[tokio::test]
    async fn shutdown_drains_all_rooms_and_refuses_new_connections() {
        let hub = Hub::with_default_capacity();
        let (_, mut a) = join(&hub, 1, 7).await;
        let (_, mut b) = join(&hub, 2, 9).await;

        assert_eq!(hub.shutdown().await, 2);
        assert!(hub.is_shut_down());
        assert_eq!(a.recv().await, None);
        assert_eq!(b.recv().await, None);
        assert_eq!(hub.total_connections().await, 0);

        let (late, late_queue) = hub.open_connection(user(3), chat(7));
        assert!(!hub.register(late).await);
        assert_eq!(late_queue.status().get(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn concurrent_broadcasts_and_registrations_stay_consistent() {
        let hub = Arc::new(Hub::with_default_capacity());
        let mut queues = Vec::new();
        for n in 0..8 {
            let (_, queue) = join(&hub, n, 7).await;
            queues.push(queue);
        }

        let mut tasks = Vec::new();
        for n in 0..16 {
            let hub = hub.clone();
            tasks.push(tokio::spawn(async move {
                hub.broadcast_to_room(chat(7), frame(&format!("m{n}"))).await
            }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap(), 8);
        }

        for queue in &mut queues {
            let mut received = 0;
            while queue.try_recv().is_some() {
                received += 1;
            }
            assert_eq!(received, 16);
        }
    }

    #[tokio::test]
    async fn hub_works_through_room_broadcaster_port() {
        let hub = Hub::with_default_capacity();
        let (_, mut queue) = join(&hub, 1, 7).await;
        let port: &dyn RoomBroadcaster = &hub;

        assert_eq!(port.broadcast_to_room(chat(7), frame("via-port")).await, 1);
        assert_eq!(queue.recv().await.as_deref(), Some("via-port"));
    }
}
