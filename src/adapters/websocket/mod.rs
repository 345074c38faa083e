//! WebSocket adapters for realtime chat updates.
//!
//! Pushes message lifecycle events to clients listening on a chat room.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │              Message handlers (send / update / delete)              │
//! │   persist → build MessageEvent → serialize once → broadcast         │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ RoomBroadcaster::broadcast_to_room
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                               Hub                                   │
//! │   Room: chat-7          Room: chat-9          Room: chat-12         │
//! │   ├── conn-a            ├── conn-d            └── conn-g            │
//! │   ├── conn-b            └── conn-e                                  │
//! │   └── conn-c                                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ bounded per-connection queue
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │              outbound_pump ──▶ socket ──▶ inbound_pump              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`connection`] - Connection identity, lifecycle state and queue halves
//! - [`hub`] - Room registry and non-blocking fan-out
//! - [`pump`] - Per-connection read/write loops and their supervisor
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod connection;
pub mod handler;
pub mod hub;
pub mod pump;

pub use connection::{
    Connection, ConnectionId, ConnectionKey, ConnectionState, ConnectionStatus, EnqueueError,
    OutboundQueue,
};
pub use handler::{admit, websocket_router, ws_handler, AdmissionError, ConnectParams, WebSocketState};
pub use hub::{Hub, DEFAULT_QUEUE_CAPACITY};
pub use pump::{inbound_pump, outbound_pump, run_connection, InboundExit, OutboundExit};
