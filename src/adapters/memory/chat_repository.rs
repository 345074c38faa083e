//! In-memory chat and membership store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::InMemoryUserRepository;
use crate::domain::chat::User;
use crate::domain::foundation::{ChatId, DomainError, Timestamp, UserId};
use crate::domain::message::Chat;
use crate::ports::ChatRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryChatRepository {
    chats: Arc<RwLock<HashMap<ChatId, Chat>>>,
    members: Arc<RwLock<HashSet<(ChatId, UserId)>>>,
    users: InMemoryUserRepository,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves chat members against a shared user directory.
    pub fn with_users(users: InMemoryUserRepository) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    /// Creates a chat and adds the given users to it.
    pub async fn add_chat(&self, id: ChatId, name: impl Into<String>, members: &[UserId]) {
        self.chats.write().await.insert(
            id,
            Chat {
                id,
                name: name.into(),
                created_at: Timestamp::now(),
            },
        );
        let mut all = self.members.write().await;
        for user_id in members {
            all.insert((id, *user_id));
        }
    }

    pub async fn add_member(&self, chat_id: ChatId, user_id: UserId) {
        self.members.write().await.insert((chat_id, user_id));
    }

    pub async fn remove_member(&self, chat_id: ChatId, user_id: UserId) {
        self.members.write().await.remove(&(chat_id, user_id));
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn find_by_id(&self, id: ChatId) -> Result<Option<Chat>, DomainError> {
        Ok(self.chats.read().await.get(&id).cloned())
    }

    async fn is_member(&self, chat_id: ChatId, user_id: UserId) -> Result<bool, DomainError> {
        Ok(self.members.read().await.contains(&(chat_id, user_id)))
    }

    async fn create(&self, name: &str, members: &[UserId]) -> Result<Chat, DomainError> {
        let chat = {
            let mut chats = self.chats.write().await;
            let next = chats.keys().map(ChatId::as_i64).max().unwrap_or(0) + 1;
            let chat = Chat {
                id: ChatId::from_raw(next),
                name: name.to_string(),
                created_at: Timestamp::now(),
            };
            chats.insert(chat.id, chat.clone());
            chat
        };

        let mut all = self.members.write().await;
        for user_id in members {
            all.insert((chat.id, *user_id));
        }
        Ok(chat)
    }

    async fn find_by_member(&self, user_id: UserId) -> Result<Vec<Chat>, DomainError> {
        let joined: HashSet<ChatId> = self
            .members
            .read()
            .await
            .iter()
            .filter(|(_, member)| *member == user_id)
            .map(|(chat_id, _)| *chat_id)
            .collect();

        let chats = self.chats.read().await;
        let mut found: Vec<Chat> = joined
            .iter()
            .filter_map(|id| chats.get(id).cloned())
            .collect();
        found.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(found)
    }

    async fn members(&self, chat_id: ChatId) -> Result<Vec<User>, DomainError> {
        let ids: Vec<UserId> = self
            .members
            .read()
            .await
            .iter()
            .filter(|(chat, _)| *chat == chat_id)
            .map(|(_, user_id)| *user_id)
            .collect();

        let mut users = self.users.snapshot(ids).await;
        users.sort_by(|a, b| a.nickname.cmp(&b.nickname));
        Ok(users)
    }
}
