//! End-to-end fan-out scenarios.
//!
//! Drives the message handlers against in-memory repositories and a real
//! `Hub`, reading what each listener's outbound queue would have written
//! to its socket.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::Value;

use realtime_chat::adapters::memory::{
    InMemoryChatRepository, InMemoryMessageRepository, InMemoryUserRepository,
};
use realtime_chat::adapters::websocket::{Hub, OutboundQueue};
use realtime_chat::application::{
    CreateGroupChatCommand, CreateGroupChatHandler, DeleteMessageCommand, DeleteMessageHandler,
    GetUserChatsHandler, GetUserChatsQuery, SendMessageCommand, SendMessageHandler,
    UpdateMessageCommand, UpdateMessageHandler,
};
use realtime_chat::domain::foundation::{ChatId, MessageId, UserId};
use realtime_chat::domain::message::MessageError;
use realtime_chat::ports::EventFrame;

// =============================================================================
// Test Infrastructure
// =============================================================================

const ROOM: i64 = 7;
const OTHER_ROOM: i64 = 8;
const ANN: i64 = 1;
const BOB: i64 = 2;
const CAT: i64 = 3;

struct World {
    hub: Arc<Hub>,
    send: SendMessageHandler,
    update: UpdateMessageHandler,
    delete: DeleteMessageHandler,
    create_group: CreateGroupChatHandler,
    chat_list: GetUserChatsHandler,
}

impl World {
    async fn new(queue_capacity: usize) -> Self {
        let users = InMemoryUserRepository::new();
        users.add_user(UserId::from_raw(ANN), "ann").await;
        users.add_user(UserId::from_raw(BOB), "bob").await;
        users.add_user(UserId::from_raw(CAT), "cat").await;

        let messages = Arc::new(InMemoryMessageRepository::with_users(users.clone()));
        let chats = Arc::new(InMemoryChatRepository::with_users(users.clone()));
        let users = Arc::new(users);
        chats
            .add_chat(
                ChatId::from_raw(ROOM),
                "general",
                &[UserId::from_raw(ANN), UserId::from_raw(BOB), UserId::from_raw(CAT)],
            )
            .await;
        chats
            .add_chat(ChatId::from_raw(OTHER_ROOM), "random", &[UserId::from_raw(CAT)])
            .await;

        let hub = Arc::new(Hub::new(queue_capacity));

        Self {
            send: SendMessageHandler::new(messages.clone(), chats.clone(), hub.clone()),
            update: UpdateMessageHandler::new(messages.clone(), hub.clone()),
            delete: DeleteMessageHandler::new(messages.clone(), hub.clone()),
            create_group: CreateGroupChatHandler::new(users.clone(), chats.clone()),
            chat_list: GetUserChatsHandler::new(users, chats, messages),
            hub,
        }
    }

    async fn listen(&self, user: i64, room: i64) -> OutboundQueue {
        let (connection, queue) = self
            .hub
            .open_connection(UserId::from_raw(user), ChatId::from_raw(room));
        assert!(self.hub.register(connection).await);
        queue
    }

    async fn say(&self, sender: i64, content: &str) -> MessageId {
        self.send
            .handle(SendMessageCommand {
                chat_id: ChatId::from_raw(ROOM),
                sender_id: UserId::from_raw(sender),
                content: content.to_string(),
            })
            .await
            .unwrap()
            .message
            .id
    }
}

/// Next queued frame, parsed, or `None` if nothing is waiting.
fn next_event(queue: &mut OutboundQueue) -> Option<Value> {
    queue
        .try_recv()
        .map(|frame| serde_json::from_str(&frame).unwrap())
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn listener_sees_created_event_for_anothers_message() {
    let world = World::new(16).await;
    let mut ann = world.listen(ANN, ROOM).await;

    let result = world
        .send
        .handle(SendMessageCommand {
            chat_id: ChatId::from_raw(ROOM),
            sender_id: UserId::from_raw(BOB),
            content: "hi".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(result.delivered, 1);
    let frame = next_event(&mut ann).expect("ann should receive the event");
    assert_eq!(frame["success"], true);
    assert_eq!(frame["code"], 2000);
    assert_eq!(frame["data"]["type"], "message.created");
    assert_eq!(frame["data"]["chatId"], ROOM);
    assert_eq!(frame["data"]["senderId"], BOB);
    assert_eq!(frame["data"]["senderNickname"], "bob");
    assert_eq!(frame["data"]["content"], "hi");
    assert!(next_event(&mut ann).is_none());
}

#[tokio::test]
async fn new_group_chat_fans_out_and_lists_its_latest_message() {
    let world = World::new(16).await;
    let chat = world
        .create_group
        .handle(CreateGroupChatCommand {
            creator_id: UserId::from_raw(ANN),
            name: "Launch".to_string(),
            user_ids: vec![UserId::from_raw(BOB)],
        })
        .await
        .unwrap();
    let mut bob = world.listen(BOB, chat.id.as_i64()).await;
    let mut cat = world.listen(CAT, ROOM).await;

    world
        .send
        .handle(SendMessageCommand {
            chat_id: chat.id,
            sender_id: UserId::from_raw(ANN),
            content: "kickoff".to_string(),
        })
        .await
        .unwrap();

    let frame = next_event(&mut bob).expect("bob listens on the new chat");
    assert_eq!(frame["data"]["chatId"], chat.id.as_i64());
    assert!(next_event(&mut cat).is_none());

    let listed = world
        .chat_list
        .handle(GetUserChatsQuery {
            user_id: UserId::from_raw(BOB),
        })
        .await
        .unwrap();
    let launch = listed.iter().find(|c| c.id == chat.id).expect("bob is a member");
    assert_eq!(
        launch.last_message.as_ref().map(|m| m.content.as_str()),
        Some("kickoff")
    );
}

#[tokio::test]
async fn edit_then_delete_arrive_in_order_with_stable_identity() {
    let world = World::new(16).await;
    let mut ann = world.listen(ANN, ROOM).await;

    let id = world.say(BOB, "hi").await;
    world
        .update
        .handle(UpdateMessageCommand {
            message_id: id,
            user_id: UserId::from_raw(BOB),
            content: "hello".to_string(),
        })
        .await
        .unwrap();
    world
        .delete
        .handle(DeleteMessageCommand {
            message_id: id,
            user_id: UserId::from_raw(BOB),
        })
        .await
        .unwrap();

    let created = next_event(&mut ann).unwrap();
    let updated = next_event(&mut ann).unwrap();
    let deleted = next_event(&mut ann).unwrap();

    assert_eq!(updated["data"]["type"], "message.updated");
    assert_eq!(updated["data"]["messageId"], created["data"]["messageId"]);
    assert_eq!(updated["data"]["content"], "hello");
    assert_eq!(updated["data"]["createdAt"], created["data"]["createdAt"]);

    assert_eq!(deleted["data"]["type"], "message.deleted");
    assert_eq!(deleted["data"]["messageId"], created["data"]["messageId"]);
    assert_eq!(deleted["data"]["chatId"], ROOM);
    assert_eq!(deleted["data"]["senderId"], BOB);
    assert!(deleted["data"].get("content").is_none());
}

#[tokio::test]
async fn events_stay_inside_their_room() {
    let world = World::new(16).await;
    let mut ann = world.listen(ANN, ROOM).await;
    let mut cat_elsewhere = world.listen(CAT, OTHER_ROOM).await;

    world.say(BOB, "only for room seven").await;

    assert!(next_event(&mut ann).is_some());
    assert!(next_event(&mut cat_elsewhere).is_none());
}

#[tokio::test]
async fn sender_with_two_tabs_hears_own_message_twice() {
    let world = World::new(16).await;
    let mut tab_one = world.listen(BOB, ROOM).await;
    let mut tab_two = world.listen(BOB, ROOM).await;

    world.say(BOB, "echo").await;

    assert_eq!(next_event(&mut tab_one).unwrap()["data"]["content"], "echo");
    assert_eq!(next_event(&mut tab_two).unwrap()["data"]["content"], "echo");
}

#[tokio::test]
async fn rejected_mutations_broadcast_nothing() {
    let world = World::new(16).await;
    let mut ann = world.listen(ANN, ROOM).await;
    let id = world.say(BOB, "mine").await;
    next_event(&mut ann).unwrap();

    let empty = world
        .send
        .handle(SendMessageCommand {
            chat_id: ChatId::from_raw(ROOM),
            sender_id: UserId::from_raw(BOB),
            content: "   ".to_string(),
        })
        .await;
    assert!(matches!(empty, Err(MessageError::ValidationFailed { .. })));

    let hijack = world
        .update
        .handle(UpdateMessageCommand {
            message_id: id,
            user_id: UserId::from_raw(ANN),
            content: "not yours".to_string(),
        })
        .await;
    assert!(matches!(hijack, Err(MessageError::Forbidden)));

    let missing = world
        .delete
        .handle(DeleteMessageCommand {
            message_id: MessageId::from_raw(999),
            user_id: UserId::from_raw(BOB),
        })
        .await;
    assert!(matches!(missing, Err(MessageError::NotFound(_))));

    assert!(next_event(&mut ann).is_none());
}

#[tokio::test]
async fn saturated_listener_is_evicted_without_blocking_the_room() {
    let world = World::new(1).await;
    let mut stalled = world.listen(ANN, ROOM).await;
    let mut healthy = world.listen(CAT, ROOM).await;

    world.say(BOB, "one").await;
    assert!(next_event(&mut healthy).is_some());

    // stalled still holds "one"; the second frame overflows its queue
    let second = world
        .send
        .handle(SendMessageCommand {
            chat_id: ChatId::from_raw(ROOM),
            sender_id: UserId::from_raw(BOB),
            content: "two".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(second.delivered, 1);
    assert_eq!(next_event(&mut healthy).unwrap()["data"]["content"], "two");
    assert_eq!(world.hub.connection_count(ChatId::from_raw(ROOM)).await, 1);

    // The evicted queue drains what it had, then reports closure.
    assert_eq!(stalled.recv().await.as_deref().map(|f| f.contains("\"one\"")), Some(true));
    assert!(stalled.recv().await.is_none());

    world.say(BOB, "three").await;
    assert_eq!(next_event(&mut healthy).unwrap()["data"]["content"], "three");
}

#[tokio::test]
async fn shutdown_closes_queues_and_refuses_newcomers() {
    let world = World::new(16).await;
    let mut ann = world.listen(ANN, ROOM).await;

    assert_eq!(world.hub.shutdown().await, 1);
    assert!(ann.recv().await.is_none());

    let (late, _queue) = world
        .hub
        .open_connection(UserId::from_raw(CAT), ChatId::from_raw(ROOM));
    assert!(!world.hub.register(late).await);

    let after = world
        .send
        .handle(SendMessageCommand {
            chat_id: ChatId::from_raw(ROOM),
            sender_id: UserId::from_raw(BOB),
            content: "still persisted".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(after.delivered, 0);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn broadcast_reaches_exactly_the_rooms_listeners(in_room in 0usize..12, elsewhere in 0usize..6) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let hub = Hub::new(4);
            let mut listeners = Vec::new();
            let mut bystanders = Vec::new();

            for user in 0..in_room {
                let (connection, queue) =
                    hub.open_connection(UserId::from_raw(user as i64 + 1), ChatId::from_raw(ROOM));
                hub.register(connection).await;
                listeners.push(queue);
            }
            for user in 0..elsewhere {
                let (connection, queue) =
                    hub.open_connection(UserId::from_raw(user as i64 + 1), ChatId::from_raw(OTHER_ROOM));
                hub.register(connection).await;
                bystanders.push(queue);
            }

            let delivered = hub
                .broadcast_to_room(ChatId::from_raw(ROOM), EventFrame::from("frame"))
                .await;

            prop_assert_eq!(delivered, in_room);
            for queue in &mut listeners {
                let received = queue.try_recv();
                prop_assert_eq!(received.as_deref(), Some("frame"));
                prop_assert!(queue.try_recv().is_none());
            }
            for queue in &mut bystanders {
                prop_assert!(queue.try_recv().is_none());
            }
            prop_assert_eq!(hub.total_connections().await, in_room + elsewhere);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
