//! Message command and query handlers.
//!
//! The three commands share one shape:
//!
//! ```text
//! authorize → persist → MessageEvent → serialize once → broadcast_to_room → result
//! ```
//!
//! Nothing reaches the room until the write has succeeded, and nothing on
//! the broadcast side can turn a successful write into an error.

mod broadcast;
mod delete_message;
mod get_chat_messages;
mod send_message;
mod update_message;

#[cfg(test)]
pub(crate) mod test_support;

pub use broadcast::broadcast_event;
pub use delete_message::{DeleteMessageCommand, DeleteMessageHandler, DeleteMessageResult};
pub use get_chat_messages::{GetChatMessagesHandler, GetChatMessagesQuery};
pub use send_message::{SendMessageCommand, SendMessageHandler, SendMessageResult};
pub use update_message::{UpdateMessageCommand, UpdateMessageHandler, UpdateMessageResult};
