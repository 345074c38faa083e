//! Message lifecycle events pushed to room listeners.
//!
//! One `MessageEvent` is built per successful persistence operation and is
//! never modified afterwards. On the wire it travels inside a
//! [`RealtimeEnvelope`]:
//!
//! ```json
//! {
//!   "success": true,
//!   "code": 2000,
//!   "data": {
//!     "type": "message.created",
//!     "messageId": 12,
//!     "chatId": 7,
//!     "senderId": 3,
//!     "senderNickname": "bee",
//!     "content": "hi",
//!     "createdAt": "2024-01-15T10:30:00Z",
//!     "updatedAt": "2024-01-15T10:30:00Z"
//!   },
//!   "timestamp": "2024-01-15T10:30:00.012Z"
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChatId, MessageId, Timestamp, UserId};

use super::Message;

/// Status code carried by every realtime envelope.
pub const EVENT_SUCCESS_CODE: u16 = 2000;

/// Which lifecycle transition an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageEventKind {
    #[serde(rename = "message.created")]
    Created,
    #[serde(rename = "message.updated")]
    Updated,
    #[serde(rename = "message.deleted")]
    Deleted,
}

impl MessageEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageEventKind::Created => "message.created",
            MessageEventKind::Updated => "message.updated",
            MessageEventKind::Deleted => "message.deleted",
        }
    }
}

impl fmt::Display for MessageEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one message lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    #[serde(rename = "type")]
    kind: MessageEventKind,
    message_id: MessageId,
    chat_id: ChatId,
    sender_id: UserId,
    sender_nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl MessageEvent {
    /// Event for a freshly persisted message.
    pub fn created(message: &Message) -> Self {
        Self::with_content(MessageEventKind::Created, message)
    }

    /// Event for a message whose content was changed; carries the new state.
    pub fn updated(message: &Message) -> Self {
        Self::with_content(MessageEventKind::Updated, message)
    }

    /// Event for a removed message.
    ///
    /// Carries identity, room and sender as they were before removal; the
    /// content is dropped and `updated_at` records the deletion time.
    pub fn deleted(message: &Message, deleted_at: Timestamp) -> Self {
        Self {
            kind: MessageEventKind::Deleted,
            message_id: message.id,
            chat_id: message.chat_id,
            sender_id: message.sender_id,
            sender_nickname: message.sender_nickname.clone(),
            content: None,
            created_at: message.created_at,
            updated_at: deleted_at,
        }
    }

    fn with_content(kind: MessageEventKind, message: &Message) -> Self {
        Self {
            kind,
            message_id: message.id,
            chat_id: message.chat_id,
            sender_id: message.sender_id,
            sender_nickname: message.sender_nickname.clone(),
            content: Some(message.content.clone()),
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }

    pub fn kind(&self) -> MessageEventKind {
        self.kind
    }

    pub fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// Room the event must be broadcast to.
    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn sender_id(&self) -> UserId {
        self.sender_id
    }

    pub fn sender_nickname(&self) -> &str {
        &self.sender_nickname
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Serializes the event inside its envelope, ready for the hub.
    pub fn to_frame(&self) -> Result<Arc<str>, serde_json::Error> {
        let envelope = RealtimeEnvelope::new(self.clone());
        Ok(Arc::from(serde_json::to_string(&envelope)?))
    }
}

/// Unified response wrapper shared with the REST surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtimeEnvelope {
    pub success: bool,
    pub code: u16,
    pub data: MessageEvent,
    pub timestamp: Timestamp,
}

impl RealtimeEnvelope {
    pub fn new(data: MessageEvent) -> Self {
        Self {
            success: true,
            code: EVENT_SUCCESS_CODE,
            data,
            timestamp: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn at(rfc3339: &str) -> Timestamp {
        Timestamp::from_datetime(
            DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    fn message() -> Message {
        Message {
            id: MessageId::from_raw(12),
            chat_id: ChatId::from_raw(7),
            sender_id: UserId::from_raw(3),
            sender_nickname: "bee".to_string(),
            content: "hi".to_string(),
            created_at: at("2024-01-15T10:30:00Z"),
            updated_at: at("2024-01-15T10:30:00Z"),
        }
    }

    #[test]
    fn created_event_serializes_wire_shape() {
        let event = MessageEvent::created(&message());
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "message.created");
        assert_eq!(json["messageId"], 12);
        assert_eq!(json["chatId"], 7);
        assert_eq!(json["senderId"], 3);
        assert_eq!(json["senderNickname"], "bee");
        assert_eq!(json["content"], "hi");
        assert_eq!(json["createdAt"], "2024-01-15T10:30:00Z");
    }

    #[test]
    fn updated_event_carries_new_content_and_original_creation() {
        let original = message();
        let edited = original.edited("hello".to_string(), at("2024-01-15T11:00:00Z"));
        let event = MessageEvent::updated(&edited);

        assert_eq!(event.kind(), MessageEventKind::Updated);
        assert_eq!(event.message_id(), original.id);
        assert_eq!(event.content(), Some("hello"));
        assert_eq!(event.created_at(), original.created_at);
        assert_eq!(event.updated_at(), at("2024-01-15T11:00:00Z"));
    }

    #[test]
    fn deleted_event_omits_content_field() {
        let event = MessageEvent::deleted(&message(), at("2024-01-15T12:00:00Z"));
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "message.deleted");
        assert_eq!(json["messageId"], 12);
        assert_eq!(json["chatId"], 7);
        assert!(json.get("content").is_none());
        assert_eq!(json["updatedAt"], "2024-01-15T12:00:00Z");
    }

    #[test]
    fn frame_wraps_event_in_success_envelope() {
        let frame = MessageEvent::created(&message()).to_frame().unwrap();
        let envelope: RealtimeEnvelope = serde_json::from_str(&frame).unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.code, EVENT_SUCCESS_CODE);
        assert_eq!(envelope.data, MessageEvent::created(&message()));
    }

    #[test]
    fn kind_display_matches_wire_name() {
        assert_eq!(MessageEventKind::Deleted.to_string(), "message.deleted");
    }
}
