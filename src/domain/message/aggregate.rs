//! Persisted chat records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChatId, MessageId, Timestamp, UserId, ValidationError};

/// Maximum number of messages returned by one pagination request.
pub const MESSAGE_PAGE_SIZE: u32 = 50;

/// A chat room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: ChatId,
    pub name: String,
    pub created_at: Timestamp,
}

/// A message as stored, joined with the sender's nickname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub sender_id: UserId,
    pub sender_nickname: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Message {
    /// Returns true if `user_id` authored this message.
    pub fn is_sent_by(&self, user_id: &UserId) -> bool {
        self.sender_id == *user_id
    }

    /// Copy of this message with new content, keeping identity and
    /// `created_at`.
    pub fn edited(&self, content: String, at: Timestamp) -> Message {
        Message {
            content,
            updated_at: at,
            ..self.clone()
        }
    }
}

/// A message that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub chat_id: ChatId,
    pub sender_id: UserId,
    pub content: String,
    pub created_at: Timestamp,
}

impl NewMessage {
    pub fn new(chat_id: ChatId, sender_id: UserId, content: String) -> Result<Self, ValidationError> {
        Ok(Self {
            chat_id,
            sender_id,
            content: validate_content(content)?,
            created_at: Timestamp::now(),
        })
    }
}

/// Rejects content that is empty once surrounding whitespace is ignored.
pub fn validate_content(content: String) -> Result<String, ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::empty_field("content"));
    }
    Ok(content)
}

/// One page of a chat's history, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePage {
    pub chat_id: ChatId,
    pub messages: Vec<Message>,
    /// Newest message id in the chat; only reported on the first page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<MessageId>,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<MessageId>,
}
