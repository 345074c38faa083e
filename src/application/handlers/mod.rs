//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod chat;
pub mod message;
pub mod user;

pub use chat::{
    CreateGroupChatCommand, CreateGroupChatHandler, CreatePrivateChatCommand,
    CreatePrivateChatHandler, GetUserChatsHandler, GetUserChatsQuery,
};
pub use message::{
    broadcast_event, DeleteMessageCommand, DeleteMessageHandler, DeleteMessageResult,
    GetChatMessagesHandler, GetChatMessagesQuery, SendMessageCommand, SendMessageHandler,
    SendMessageResult, UpdateMessageCommand, UpdateMessageHandler, UpdateMessageResult,
};
pub use user::{ListUsersHandler, ListUsersQuery};
