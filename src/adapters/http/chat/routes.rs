//! HTTP routes for chat management endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_group_chat, create_private_chat, list_chats, ChatHandlers};

/// Creates the chat router, meant to be nested under `/api`.
///
/// - `GET /chats`
/// - `POST /chats/private`
/// - `POST /chats/group`
pub fn chat_routes(handlers: ChatHandlers) -> Router {
    Router::new()
        .route("/chats", get(list_chats))
        .route("/chats/private", post(create_private_chat))
        .route("/chats/group", post(create_group_chat))
        .with_state(handlers)
}
