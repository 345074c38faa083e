//! HTTP adapter for message endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{MessagesQuery, SendMessageRequest, UpdateMessageRequest};
pub use handlers::MessageHandlers;
pub use routes::message_routes;
