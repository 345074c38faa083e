//! In-memory message store with sequential ids.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::InMemoryUserRepository;
use crate::domain::foundation::{ChatId, DomainError, ErrorCode, MessageId, UserId};
use crate::domain::message::{Message, NewMessage};
use crate::ports::MessageRepository;

/// Messages keyed by id; ids are handed out in insertion order starting at 1.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageRepository {
    messages: Arc<RwLock<BTreeMap<MessageId, Message>>>,
    users: InMemoryUserRepository,
    last_id: Arc<AtomicI64>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves sender nicknames against a shared user directory.
    pub fn with_users(users: InMemoryUserRepository) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    /// Registers a user so messages they send resolve a nickname.
    pub async fn add_user(&self, user_id: UserId, nickname: impl Into<String>) {
        self.users.add_user(user_id, nickname).await;
    }

    pub async fn message_count(&self) -> usize {
        self.messages.read().await.len()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: NewMessage) -> Result<Message, DomainError> {
        let nickname = self
            .users
            .nickname(message.sender_id)
            .await
            .ok_or_else(|| {
                DomainError::new(ErrorCode::UserNotFound, "Sender not found")
                    .with_detail("user_id", message.sender_id.to_string())
            })?;

        let id = MessageId::from_raw(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let stored = Message {
            id,
            chat_id: message.chat_id,
            sender_id: message.sender_id,
            sender_nickname: nickname,
            content: message.content,
            created_at: message.created_at,
            updated_at: message.created_at,
        };
        self.messages.write().await.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, DomainError> {
        Ok(self.messages.read().await.get(&id).cloned())
    }

    async fn update(&self, message: &Message) -> Result<(), DomainError> {
        let mut messages = self.messages.write().await;
        match messages.get_mut(&message.id) {
            Some(stored) => {
                stored.content = message.content.clone();
                stored.updated_at = message.updated_at;
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::MessageNotFound, "Message not found")),
        }
    }

    async fn delete(&self, id: MessageId) -> Result<(), DomainError> {
        match self.messages.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DomainError::new(ErrorCode::MessageNotFound, "Message not found")),
        }
    }

    async fn find_by_chat_id(
        &self,
        chat_id: ChatId,
        cursor: Option<MessageId>,
        limit: u32,
    ) -> Result<Vec<Message>, DomainError> {
        let messages = self.messages.read().await;
        Ok(messages
            .values()
            .rev()
            .filter(|m| m.chat_id == chat_id)
            .filter(|m| cursor.map_or(true, |c| m.id < c))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn last_message_id(&self, chat_id: ChatId) -> Result<Option<MessageId>, DomainError> {
        let messages = self.messages.read().await;
        Ok(messages
            .values()
            .rev()
            .find(|m| m.chat_id == chat_id)
            .map(|m| m.id))
    }

    async fn latest_by_chats(
        &self,
        chat_ids: &[ChatId],
    ) -> Result<HashMap<ChatId, Message>, DomainError> {
        let messages = self.messages.read().await;
        let mut latest = HashMap::new();
        for message in messages.values().rev() {
            if chat_ids.contains(&message.chat_id) {
                latest.entry(message.chat_id).or_insert_with(|| message.clone());
            }
        }
        Ok(latest)
    }
}
