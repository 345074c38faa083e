//! HTTP routes for message endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    delete_message, get_chat_messages, send_message, update_message, MessageHandlers,
};

/// Creates the message router, meant to be nested under `/api`.
///
/// - `POST /messages`
/// - `PUT /messages/:id`
/// - `DELETE /messages/:id`
/// - `GET /chats/:chat_id/messages?cursor=N`
pub fn message_routes(handlers: MessageHandlers) -> Router {
    Router::new()
        .route("/messages", post(send_message))
        .route("/messages/:id", put(update_message).delete(delete_message))
        .route("/chats/:chat_id/messages", get(get_chat_messages))
        .with_state(handlers)
}
