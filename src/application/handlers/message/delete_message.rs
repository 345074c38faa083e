//! DeleteMessageHandler - Command handler for removing a message.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, MessageId, Timestamp, UserId};
use crate::domain::message::{MessageError, MessageEvent};
use crate::ports::{MessageRepository, RoomBroadcaster};

use super::broadcast_event;

/// Command to remove a message.
#[derive(Debug, Clone)]
pub struct DeleteMessageCommand {
    pub message_id: MessageId,
    pub user_id: UserId,
}

/// Result of a successful deletion.
#[derive(Debug, Clone)]
pub struct DeleteMessageResult {
    pub event: MessageEvent,
    pub delivered: usize,
}

/// Handler for removing messages. Only the sender may delete.
pub struct DeleteMessageHandler {
    messages: Arc<dyn MessageRepository>,
    broadcaster: Arc<dyn RoomBroadcaster>,
}

impl DeleteMessageHandler {
    pub fn new(messages: Arc<dyn MessageRepository>, broadcaster: Arc<dyn RoomBroadcaster>) -> Self {
        Self {
            messages,
            broadcaster,
        }
    }

    pub async fn handle(
        &self,
        cmd: DeleteMessageCommand,
    ) -> Result<DeleteMessageResult, MessageError> {
        let message = self
            .messages
            .find_by_id(cmd.message_id)
            .await?
            .ok_or(MessageError::NotFound(cmd.message_id))?;

        if !message.is_sent_by(&cmd.user_id) {
            return Err(MessageError::Forbidden);
        }

        self.messages.delete(cmd.message_id).await.map_err(|e| {
            if e.code == ErrorCode::MessageNotFound {
                MessageError::NotFound(cmd.message_id)
            } else {
                tracing::error!(message_id = %cmd.message_id, "Failed to delete message: {}", e);
                MessageError::from(e)
            }
        })?;

        // The event describes the message as it was before removal.
        let event = MessageEvent::deleted(&message, Timestamp::now());
        let delivered = broadcast_event(self.broadcaster.as_ref(), &event).await;

        Ok(DeleteMessageResult { event, delivered })
    }
}
