//! HTTP adapter for chat management endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreateGroupChatRequest, CreatePrivateChatRequest};
pub use handlers::ChatHandlers;
pub(crate) use handlers::handle_chat_error;
pub use routes::chat_routes;
