//! Message repository port.
//!
//! The storage collaborator behind the message mutation workflow. The
//! realtime path only ever sees what this port returns after a write has
//! succeeded.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::foundation::{ChatId, DomainError, MessageId};
use crate::domain::message::{Message, NewMessage};

/// Repository port for chat message persistence.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a new message and return it with its assigned id and the
    /// sender's nickname.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, message: NewMessage) -> Result<Message, DomainError>;

    /// Find a message by id. Returns `None` if absent.
    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, DomainError>;

    /// Overwrite content and `updated_at` of an existing message.
    ///
    /// # Errors
    ///
    /// - `MessageNotFound` if no row was affected
    /// - `DatabaseError` on persistence failure
    async fn update(&self, message: &Message) -> Result<(), DomainError>;

    /// Remove a message.
    ///
    /// # Errors
    ///
    /// - `MessageNotFound` if no row was affected
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: MessageId) -> Result<(), DomainError>;

    /// Messages in a chat older than `cursor`, newest first.
    ///
    /// `None` starts from the newest message.
    async fn find_by_chat_id(
        &self,
        chat_id: ChatId,
        cursor: Option<MessageId>,
        limit: u32,
    ) -> Result<Vec<Message>, DomainError>;

    /// Id of the newest message in a chat, if any.
    async fn last_message_id(&self, chat_id: ChatId) -> Result<Option<MessageId>, DomainError>;

    /// Newest message of each given chat. Chats without messages are
    /// absent from the map.
    async fn latest_by_chats(
        &self,
        chat_ids: &[ChatId],
    ) -> Result<HashMap<ChatId, Message>, DomainError>;
}
