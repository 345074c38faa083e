//! Shared in-memory directory for the chat and user handler tests.

use std::sync::Arc;

use crate::adapters::memory::{
    InMemoryChatRepository, InMemoryMessageRepository, InMemoryUserRepository,
};
use crate::domain::foundation::{ChatId, UserId};
use crate::domain::message::NewMessage;
use crate::ports::MessageRepository;

pub const ANN: i64 = 1;
pub const BOB: i64 = 2;
pub const CAT: i64 = 3;
pub const GHOST: i64 = 99;

pub fn uid(raw: i64) -> UserId {
    UserId::from_raw(raw)
}

pub struct Directory {
    pub users: Arc<InMemoryUserRepository>,
    pub chats: Arc<InMemoryChatRepository>,
    pub messages: Arc<InMemoryMessageRepository>,
}

impl Directory {
    /// Ann, Bob and Cat, registered in that order, with no chats.
    pub async fn new() -> Self {
        let users = InMemoryUserRepository::new();
        for (id, nickname) in [(ANN, "ann"), (BOB, "bob"), (CAT, "cat")] {
            users.add_user(uid(id), nickname).await;
        }

        Self {
            chats: Arc::new(InMemoryChatRepository::with_users(users.clone())),
            messages: Arc::new(InMemoryMessageRepository::with_users(users.clone())),
            users: Arc::new(users),
        }
    }

    pub async fn post(&self, chat_id: ChatId, sender: i64, content: &str) {
        let message = NewMessage::new(chat_id, uid(sender), content.to_string()).unwrap();
        self.messages.create(message).await.unwrap();
    }
}
