//! Chat repository port.
//!
//! Messaging and admission only read chats; chat management creates them
//! and lists them per member.

use async_trait::async_trait;

use crate::domain::chat::User;
use crate::domain::foundation::{ChatId, DomainError, UserId};
use crate::domain::message::Chat;

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Find a chat by id. Returns `None` if absent.
    async fn find_by_id(&self, id: ChatId) -> Result<Option<Chat>, DomainError>;

    /// Returns true if the user belongs to the chat.
    async fn is_member(&self, chat_id: ChatId, user_id: UserId) -> Result<bool, DomainError>;

    /// Create a chat together with its members, atomically.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure; no partial chat remains
    async fn create(&self, name: &str, members: &[UserId]) -> Result<Chat, DomainError>;

    /// Chats the user belongs to, newest first.
    async fn find_by_member(&self, user_id: UserId) -> Result<Vec<Chat>, DomainError>;

    /// Members of a chat ordered by nickname.
    async fn members(&self, chat_id: ChatId) -> Result<Vec<User>, DomainError>;
}
