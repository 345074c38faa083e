//! Users and chat list entries.

use serde::Serialize;

use crate::domain::foundation::{ChatId, Timestamp, UserId, ValidationError};
use crate::domain::message::{Chat, Message};

/// A registered user as other users see them. Credentials never leave
/// the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub nickname: String,
    pub created_at: Timestamp,
}

/// Preview of the newest message in a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub content: String,
    pub sender_id: UserId,
    pub sender_nickname: String,
    pub created_at: Timestamp,
}

impl From<Message> for LastMessage {
    fn from(message: Message) -> Self {
        Self {
            content: message.content,
            sender_id: message.sender_id,
            sender_nickname: message.sender_nickname,
            created_at: message.created_at,
        }
    }
}

/// One entry of a user's chat list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub id: ChatId,
    pub name: String,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<LastMessage>,
    /// Members ordered by nickname.
    pub users: Vec<User>,
}

impl ChatSummary {
    pub fn new(chat: Chat, last_message: Option<Message>, users: Vec<User>) -> Self {
        Self {
            id: chat.id,
            name: chat.name,
            created_at: chat.created_at,
            last_message: last_message.map(LastMessage::from),
            users,
        }
    }
}

/// Trims a group chat name, rejecting blank ones.
pub fn validate_chat_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    Ok(trimmed.to_string())
}

/// Member list of a new group chat: the creator first, then each invited
/// user once, in request order.
///
/// At least one invited user other than the creator is required.
pub fn group_members(creator: UserId, invited: &[UserId]) -> Result<Vec<UserId>, ValidationError> {
    let mut members = vec![creator];
    for user_id in invited {
        if !members.contains(user_id) {
            members.push(*user_id);
        }
    }
    if members.len() < 2 {
        return Err(ValidationError::invalid_format(
            "userIds",
            "at least one other user is required",
        ));
    }
    Ok(members)
}
