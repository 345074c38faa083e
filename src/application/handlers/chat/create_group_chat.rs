//! CreateGroupChatHandler - Command handler for named multi-member chats.

use std::sync::Arc;

use crate::domain::chat::{group_members, validate_chat_name, ChatError};
use crate::domain::foundation::UserId;
use crate::domain::message::Chat;
use crate::ports::{ChatRepository, UserRepository};

/// Command to create a group chat. The creator always becomes a member.
#[derive(Debug, Clone)]
pub struct CreateGroupChatCommand {
    pub creator_id: UserId,
    pub name: String,
    pub user_ids: Vec<UserId>,
}

pub struct CreateGroupChatHandler {
    users: Arc<dyn UserRepository>,
    chats: Arc<dyn ChatRepository>,
}

impl CreateGroupChatHandler {
    pub fn new(users: Arc<dyn UserRepository>, chats: Arc<dyn ChatRepository>) -> Self {
        Self { users, chats }
    }

    pub async fn handle(&self, cmd: CreateGroupChatCommand) -> Result<Chat, ChatError> {
        let name = validate_chat_name(&cmd.name)?;
        let members = group_members(cmd.creator_id, &cmd.user_ids)?;

        for user_id in &members {
            if self.users.find_by_id(*user_id).await?.is_none() {
                return Err(ChatError::UserNotFound(*user_id));
            }
        }

        let chat = self.chats.create(&name, &members).await.map_err(|e| {
            tracing::error!(creator_id = %cmd.creator_id, "Failed to create group chat: {}", e);
            ChatError::from(e)
        })?;

        tracing::info!(
            chat_id = %chat.id,
            creator_id = %cmd.creator_id,
            members = members.len(),
            "Group chat created"
        );
        Ok(chat)
    }
}
