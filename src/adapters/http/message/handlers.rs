//! HTTP handlers for message endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::response::{codes, ApiError, ApiResponse};
use crate::application::handlers::message::{
    DeleteMessageCommand, DeleteMessageHandler, GetChatMessagesHandler, GetChatMessagesQuery,
    SendMessageCommand, SendMessageHandler, UpdateMessageCommand, UpdateMessageHandler,
};
use crate::domain::foundation::{ChatId, MessageId};
use crate::domain::message::MessageError;

use super::dto::{MessagesQuery, SendMessageRequest, UpdateMessageRequest};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct MessageHandlers {
    send_handler: Arc<SendMessageHandler>,
    update_handler: Arc<UpdateMessageHandler>,
    delete_handler: Arc<DeleteMessageHandler>,
    list_handler: Arc<GetChatMessagesHandler>,
}

impl MessageHandlers {
    pub fn new(
        send_handler: Arc<SendMessageHandler>,
        update_handler: Arc<UpdateMessageHandler>,
        delete_handler: Arc<DeleteMessageHandler>,
        list_handler: Arc<GetChatMessagesHandler>,
    ) -> Self {
        Self {
            send_handler,
            update_handler,
            delete_handler,
            list_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/messages - Send a message to a chat
pub async fn send_message(
    State(handlers): State<MessageHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<SendMessageRequest>,
) -> Response {
    let Ok(chat_id) = ChatId::new(req.chat_id) else {
        return ApiError::bad_request("Invalid chat ID").into_response();
    };

    let cmd = SendMessageCommand {
        chat_id,
        sender_id: user.id,
        content: req.content,
    };

    match handlers.send_handler.handle(cmd).await {
        Ok(result) => (StatusCode::CREATED, Json(ApiResponse::created(result.message))).into_response(),
        Err(e) => handle_message_error(e),
    }
}

/// PUT /api/messages/:id - Edit one of the caller's messages
pub async fn update_message(
    State(handlers): State<MessageHandlers>,
    RequireAuth(user): RequireAuth,
    Path(message_id): Path<String>,
    Json(req): Json<UpdateMessageRequest>,
) -> Response {
    let Ok(message_id) = message_id.parse::<MessageId>() else {
        return ApiError::bad_request("Invalid message ID").into_response();
    };

    let cmd = UpdateMessageCommand {
        message_id,
        user_id: user.id,
        content: req.content,
    };

    match handlers.update_handler.handle(cmd).await {
        Ok(result) => Json(ApiResponse::ok(result.message)).into_response(),
        Err(e) => handle_message_error(e),
    }
}

/// DELETE /api/messages/:id - Remove one of the caller's messages
pub async fn delete_message(
    State(handlers): State<MessageHandlers>,
    RequireAuth(user): RequireAuth,
    Path(message_id): Path<String>,
) -> Response {
    let Ok(message_id) = message_id.parse::<MessageId>() else {
        return ApiError::bad_request("Invalid message ID").into_response();
    };

    let cmd = DeleteMessageCommand {
        message_id,
        user_id: user.id,
    };

    match handlers.delete_handler.handle(cmd).await {
        Ok(_) => Json(ApiResponse::ok("Message deleted")).into_response(),
        Err(e) => handle_message_error(e),
    }
}

/// GET /api/chats/:chat_id/messages?cursor=N - Page through history
pub async fn get_chat_messages(
    State(handlers): State<MessageHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(chat_id): Path<String>,
    Query(params): Query<MessagesQuery>,
) -> Response {
    let Ok(chat_id) = chat_id.parse::<ChatId>() else {
        return ApiError::bad_request("Invalid chat ID").into_response();
    };

    let query = GetChatMessagesQuery {
        chat_id,
        cursor: params.cursor(),
    };

    match handlers.list_handler.handle(query).await {
        Ok(page) => Json(ApiResponse::ok(page)).into_response(),
        Err(e) => handle_message_error(e),
    }
}

fn handle_message_error(error: MessageError) -> Response {
    let api_error = match error {
        MessageError::ChatNotFound(_) => {
            ApiError::new(StatusCode::NOT_FOUND, codes::CHAT_NOT_FOUND, "Chat not found")
        }
        MessageError::NotFound(_) => ApiError::new(
            StatusCode::NOT_FOUND,
            codes::MESSAGE_NOT_FOUND,
            "Message not found",
        ),
        MessageError::Forbidden => ApiError::forbidden("Permission denied"),
        MessageError::ValidationFailed { field, message } => {
            ApiError::bad_request(format!("Validation failed for {}: {}", field, message))
        }
        MessageError::Infrastructure(msg) => {
            tracing::error!("Message request failed: {}", msg);
            ApiError::internal()
        }
    };
    api_error.into_response()
}
