//! UpdateMessageHandler - Command handler for editing a message.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, MessageId, Timestamp, UserId};
use crate::domain::message::{validate_content, Message, MessageError, MessageEvent};
use crate::ports::{MessageRepository, RoomBroadcaster};

use super::broadcast_event;

/// Command to replace a message's content.
#[derive(Debug, Clone)]
pub struct UpdateMessageCommand {
    pub message_id: MessageId,
    pub user_id: UserId,
    pub content: String,
}

/// Result of a successful edit.
#[derive(Debug, Clone)]
pub struct UpdateMessageResult {
    pub message: Message,
    pub event: MessageEvent,
    pub delivered: usize,
}

/// Handler for editing messages. Only the sender may edit.
pub struct UpdateMessageHandler {
    messages: Arc<dyn MessageRepository>,
    broadcaster: Arc<dyn RoomBroadcaster>,
}

impl UpdateMessageHandler {
    pub fn new(messages: Arc<dyn MessageRepository>, broadcaster: Arc<dyn RoomBroadcaster>) -> Self {
        Self {
            messages,
            broadcaster,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateMessageCommand,
    ) -> Result<UpdateMessageResult, MessageError> {
        // 1. Load and authorize
        let original = self
            .messages
            .find_by_id(cmd.message_id)
            .await?
            .ok_or(MessageError::NotFound(cmd.message_id))?;

        if !original.is_sent_by(&cmd.user_id) {
            tracing::debug!(
                message_id = %cmd.message_id,
                user_id = %cmd.user_id,
                "Rejected edit by non-sender"
            );
            return Err(MessageError::Forbidden);
        }

        // 2. Apply and persist
        let content = validate_content(cmd.content)?;
        let message = original.edited(content, Timestamp::now());

        self.messages.update(&message).await.map_err(|e| {
            if e.code == ErrorCode::MessageNotFound {
                MessageError::NotFound(cmd.message_id)
            } else {
                tracing::error!(message_id = %cmd.message_id, "Failed to update message: {}", e);
                MessageError::from(e)
            }
        })?;

        // 3. Notify the room
        let event = MessageEvent::updated(&message);
        let delivered = broadcast_event(self.broadcaster.as_ref(), &event).await;

        Ok(UpdateMessageResult {
            message,
            event,
            delivered,
        })
    }
}
