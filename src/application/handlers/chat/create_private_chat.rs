//! CreatePrivateChatHandler - Command handler for one-to-one chats.

use std::sync::Arc;

use crate::domain::chat::{ChatError, User};
use crate::domain::foundation::{UserId, ValidationError};
use crate::domain::message::Chat;
use crate::ports::{ChatRepository, UserRepository};

/// Command to open a chat between the caller and one other user.
#[derive(Debug, Clone)]
pub struct CreatePrivateChatCommand {
    pub user_id: UserId,
    pub target_id: UserId,
}

pub struct CreatePrivateChatHandler {
    users: Arc<dyn UserRepository>,
    chats: Arc<dyn ChatRepository>,
}

impl CreatePrivateChatHandler {
    pub fn new(users: Arc<dyn UserRepository>, chats: Arc<dyn ChatRepository>) -> Self {
        Self { users, chats }
    }

    /// Creates the chat, named `"{caller}-{target}"` after both nicknames.
    pub async fn handle(&self, cmd: CreatePrivateChatCommand) -> Result<Chat, ChatError> {
        if cmd.user_id == cmd.target_id {
            return Err(ValidationError::invalid_format(
                "targetId",
                "cannot open a private chat with yourself",
            )
            .into());
        }

        let caller = self.existing_user(cmd.user_id).await?;
        let target = self.existing_user(cmd.target_id).await?;

        let name = format!("{}-{}", caller.nickname, target.nickname);
        let chat = self
            .chats
            .create(&name, &[caller.id, target.id])
            .await
            .map_err(|e| {
                tracing::error!(
                    user_id = %caller.id,
                    target_id = %target.id,
                    "Failed to create private chat: {}",
                    e
                );
                ChatError::from(e)
            })?;

        tracing::info!(
            chat_id = %chat.id,
            user_id = %caller.id,
            target_id = %target.id,
            "Private chat created"
        );
        Ok(chat)
    }

    async fn existing_user(&self, id: UserId) -> Result<User, ChatError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ChatError::UserNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::chat::test_support::{uid, Directory, ANN, BOB, GHOST};

    fn handler(dir: &Directory) -> CreatePrivateChatHandler {
        CreatePrivateChatHandler::new(dir.users.clone(), dir.chats.clone())
    }

    fn cmd(user: i64, target: i64) -> CreatePrivateChatCommand {
        CreatePrivateChatCommand {
            user_id: uid(user),
            target_id: uid(target),
        }
    }

    #[tokio::test]
    async fn names_chat_after_both_users_and_adds_them() {
        let dir = Directory::new().await;

        let chat = handler(&dir).handle(cmd(ANN, BOB)).await.unwrap();

        assert_eq!(chat.name, "ann-bob");
        assert!(dir.chats.is_member(chat.id, uid(ANN)).await.unwrap());
        assert!(dir.chats.is_member(chat.id, uid(BOB)).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_target_is_user_not_found_and_creates_nothing() {
        let dir = Directory::new().await;

        let err = handler(&dir).handle(cmd(ANN, GHOST)).await.unwrap_err();

        assert!(matches!(err, ChatError::UserNotFound(id) if id == uid(GHOST)));
        assert!(dir.chats.find_by_member(uid(ANN)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn chat_with_yourself_is_rejected() {
        let dir = Directory::new().await;

        let err = handler(&dir).handle(cmd(ANN, ANN)).await.unwrap_err();

        assert!(matches!(err, ChatError::ValidationFailed { ref field, .. } if field == "targetId"));
    }
}
