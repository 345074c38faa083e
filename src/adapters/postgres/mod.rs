//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresMessageRepository` - Message persistence with sender nicknames
//! - `PostgresChatRepository` - Chat creation, lookup and membership
//! - `PostgresUserRepository` - User lookup and listing

mod chat_repository;
mod message_repository;
mod user_repository;

pub use chat_repository::PostgresChatRepository;
pub use message_repository::PostgresMessageRepository;
pub use user_repository::PostgresUserRepository;
