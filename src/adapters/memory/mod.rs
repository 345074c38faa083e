//! In-memory persistence adapters.
//!
//! Back the repository ports with plain maps. Used by tests and for
//! running the server without a database.

mod chat_repository;
mod message_repository;
mod user_repository;

pub use chat_repository::InMemoryChatRepository;
pub use message_repository::InMemoryMessageRepository;
pub use user_repository::InMemoryUserRepository;
