//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Message command handlers (send/update/delete) write and then notify the
//! room; chat management and the read queries never broadcast.

pub mod handlers;

pub use handlers::{
    CreateGroupChatCommand, CreateGroupChatHandler, CreatePrivateChatCommand,
    CreatePrivateChatHandler, DeleteMessageCommand, DeleteMessageHandler, DeleteMessageResult,
    GetChatMessagesHandler, GetChatMessagesQuery, GetUserChatsHandler, GetUserChatsQuery,
    ListUsersHandler, ListUsersQuery, SendMessageCommand, SendMessageHandler, SendMessageResult,
    UpdateMessageCommand, UpdateMessageHandler, UpdateMessageResult,
};
