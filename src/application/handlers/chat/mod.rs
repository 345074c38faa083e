//! Chat management handlers.
//!
//! Creating a chat only writes; nothing is broadcast, because a new chat
//! has no listeners until its members connect.

mod create_group_chat;
mod create_private_chat;
mod get_user_chats;

#[cfg(test)]
pub(crate) mod test_support;

pub use create_group_chat::{CreateGroupChatCommand, CreateGroupChatHandler};
pub use create_private_chat::{CreatePrivateChatCommand, CreatePrivateChatHandler};
pub use get_user_chats::{GetUserChatsHandler, GetUserChatsQuery};
