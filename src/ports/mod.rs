//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `MessageRepository` / `ChatRepository` / `UserRepository` - persistence collaborators
//! - `SessionValidator` - bearer token validation
//! - `RoomBroadcaster` - room-scoped realtime fan-out

mod chat_repository;
mod message_repository;
mod room_broadcaster;
mod session_validator;
mod user_repository;

pub use chat_repository::ChatRepository;
pub use message_repository::MessageRepository;
pub use room_broadcaster::{EventFrame, RoomBroadcaster};
pub use session_validator::SessionValidator;
pub use user_repository::UserRepository;
