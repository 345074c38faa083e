//! GetUserChatsHandler - Query handler for a user's chat list.

use std::sync::Arc;

use crate::domain::chat::{ChatError, ChatSummary};
use crate::domain::foundation::{ChatId, UserId};
use crate::ports::{ChatRepository, MessageRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct GetUserChatsQuery {
    pub user_id: UserId,
}

pub struct GetUserChatsHandler {
    users: Arc<dyn UserRepository>,
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl GetUserChatsHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        chats: Arc<dyn ChatRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            users,
            chats,
            messages,
        }
    }

    /// Chats the user belongs to, newest first, each with its latest
    /// message and its members.
    ///
    /// A chat whose member list cannot be read is still listed, with no
    /// members.
    pub async fn handle(&self, query: GetUserChatsQuery) -> Result<Vec<ChatSummary>, ChatError> {
        self.users
            .find_by_id(query.user_id)
            .await?
            .ok_or(ChatError::UserNotFound(query.user_id))?;

        let chats = self.chats.find_by_member(query.user_id).await?;
        let chat_ids: Vec<ChatId> = chats.iter().map(|c| c.id).collect();
        let mut latest = self.messages.latest_by_chats(&chat_ids).await?;

        let mut summaries = Vec::with_capacity(chats.len());
        for chat in chats {
            let users = match self.chats.members(chat.id).await {
                Ok(users) => users,
                Err(e) => {
                    tracing::warn!(chat_id = %chat.id, "Failed to load chat members: {}", e);
                    Vec::new()
                }
            };
            let last_message = latest.remove(&chat.id);
            summaries.push(ChatSummary::new(chat, last_message, users));
        }
        Ok(summaries)
    }
}
