//! Shared fakes for the message handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::adapters::memory::{
    InMemoryChatRepository, InMemoryMessageRepository, InMemoryUserRepository,
};
use crate::domain::foundation::{ChatId, MessageId, UserId};
use crate::domain::message::{Message, NewMessage, RealtimeEnvelope};
use crate::ports::{EventFrame, MessageRepository, RoomBroadcaster};

pub const ROOM: i64 = 7;
pub const ALICE: i64 = 1;
pub const BOB: i64 = 2;

/// Records every frame it is asked to broadcast.
#[derive(Default)]
pub struct RecordingBroadcaster {
    frames: Mutex<Vec<(ChatId, EventFrame)>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn envelopes(&self) -> Vec<(ChatId, RealtimeEnvelope)> {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .map(|(chat, frame)| (*chat, serde_json::from_str(frame).unwrap()))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }
}

#[async_trait]
impl RoomBroadcaster for RecordingBroadcaster {
    async fn broadcast_to_room(&self, chat_id: ChatId, frame: EventFrame) -> usize {
        self.frames.lock().unwrap().push((chat_id, frame));
        1
    }
}

pub struct Fixture {
    pub messages: Arc<InMemoryMessageRepository>,
    pub chats: Arc<InMemoryChatRepository>,
    pub broadcaster: Arc<RecordingBroadcaster>,
}

impl Fixture {
    /// Room 7 with Alice and Bob as members.
    pub async fn new() -> Self {
        let users = InMemoryUserRepository::new();
        users.add_user(UserId::from_raw(ALICE), "alice").await;
        users.add_user(UserId::from_raw(BOB), "bob").await;

        let messages = Arc::new(InMemoryMessageRepository::with_users(users.clone()));
        let chats = Arc::new(InMemoryChatRepository::with_users(users));
        chats
            .add_chat(
                ChatId::from_raw(ROOM),
                "general",
                &[UserId::from_raw(ALICE), UserId::from_raw(BOB)],
            )
            .await;

        Self {
            messages,
            chats,
            broadcaster: Arc::new(RecordingBroadcaster::new()),
        }
    }

    /// Stores a message from `sender` directly, bypassing the handlers.
    pub async fn seed(&self, sender: i64, content: &str) -> Message {
        let new = NewMessage::new(
            ChatId::from_raw(ROOM),
            UserId::from_raw(sender),
            content.to_string(),
        )
        .unwrap();
        self.messages.create(new).await.unwrap()
    }

    pub async fn stored(&self, id: MessageId) -> Option<Message> {
        self.messages.find_by_id(id).await.unwrap()
    }
}
