//! GetChatMessagesHandler - Query handler for paging through a chat's history.
//!
//! This is how a client catches up on events it missed while disconnected.

use std::sync::Arc;

use crate::domain::foundation::{ChatId, MessageId};
use crate::domain::message::{MessageError, MessagePage, MESSAGE_PAGE_SIZE};
use crate::ports::{ChatRepository, MessageRepository};

/// Query for one page of history.
#[derive(Debug, Clone)]
pub struct GetChatMessagesQuery {
    pub chat_id: ChatId,
    /// Return messages older than this one. `None` starts from the newest.
    pub cursor: Option<MessageId>,
}

pub struct GetChatMessagesHandler {
    messages: Arc<dyn MessageRepository>,
    chats: Arc<dyn ChatRepository>,
}

impl GetChatMessagesHandler {
    pub fn new(messages: Arc<dyn MessageRepository>, chats: Arc<dyn ChatRepository>) -> Self {
        Self { messages, chats }
    }

    pub async fn handle(&self, query: GetChatMessagesQuery) -> Result<MessagePage, MessageError> {
        let chat = self
            .chats
            .find_by_id(query.chat_id)
            .await?
            .ok_or(MessageError::ChatNotFound(query.chat_id))?;

        // One extra row tells us whether another page exists.
        let mut messages = self
            .messages
            .find_by_chat_id(chat.id, query.cursor, MESSAGE_PAGE_SIZE + 1)
            .await?;
        let has_more = messages.len() > MESSAGE_PAGE_SIZE as usize;
        messages.truncate(MESSAGE_PAGE_SIZE as usize);

        let last_message_id = match query.cursor {
            None => self.messages.last_message_id(chat.id).await?,
            Some(_) => None,
        };
        let next_cursor = messages.last().map(|m| m.id);

        Ok(MessagePage {
            chat_id: chat.id,
            messages,
            last_message_id,
            has_more,
            next_cursor,
        })
    }
}
