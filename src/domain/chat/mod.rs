//! Chat management domain module.
//!
//! Creating private and group chats, and the per-user chat list with each
//! chat's latest message and members.

mod aggregate;
mod errors;

pub use aggregate::{group_members, validate_chat_name, ChatSummary, LastMessage, User};
pub use errors::ChatError;
