//! SendMessageHandler - Command handler for posting a message to a chat.

use std::sync::Arc;

use crate::domain::foundation::{ChatId, UserId};
use crate::domain::message::{Message, MessageError, MessageEvent, NewMessage};
use crate::ports::{ChatRepository, MessageRepository, RoomBroadcaster};

use super::broadcast_event;

/// Command to post a message.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub chat_id: ChatId,
    pub sender_id: UserId,
    pub content: String,
}

/// Result of a successful send.
#[derive(Debug, Clone)]
pub struct SendMessageResult {
    pub message: Message,
    pub event: MessageEvent,
    /// Connections the event was queued on.
    pub delivered: usize,
}

/// Handler for posting messages.
pub struct SendMessageHandler {
    messages: Arc<dyn MessageRepository>,
    chats: Arc<dyn ChatRepository>,
    broadcaster: Arc<dyn RoomBroadcaster>,
}

impl SendMessageHandler {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        chats: Arc<dyn ChatRepository>,
        broadcaster: Arc<dyn RoomBroadcaster>,
    ) -> Self {
        Self {
            messages,
            chats,
            broadcaster,
        }
    }

    pub async fn handle(&self, cmd: SendMessageCommand) -> Result<SendMessageResult, MessageError> {
        let new_message = NewMessage::new(cmd.chat_id, cmd.sender_id, cmd.content)?;

        self.chats
            .find_by_id(cmd.chat_id)
            .await?
            .ok_or(MessageError::ChatNotFound(cmd.chat_id))?;

        let message = self.messages.create(new_message).await.map_err(|e| {
            tracing::error!(chat_id = %cmd.chat_id, "Failed to create message: {}", e);
            MessageError::from(e)
        })?;

        let event = MessageEvent::created(&message);
        let delivered = broadcast_event(self.broadcaster.as_ref(), &event).await;

        Ok(SendMessageResult {
            message,
            event,
            delivered,
        })
    }
}
