//! Request bodies and query parameters for message endpoints.
//!
//! Responses reuse the domain `Message` / `MessagePage` serialization
//! inside the shared envelope.

use serde::Deserialize;

use crate::domain::foundation::MessageId;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMessageRequest {
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesQuery {
    /// 0 or absent means "start from the newest message".
    #[serde(default)]
    pub cursor: i64,
}

impl MessagesQuery {
    pub fn cursor(&self) -> Option<MessageId> {
        MessageId::new(self.cursor).ok()
    }
}
