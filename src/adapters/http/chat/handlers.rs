//! HTTP handlers for chat management endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::response::{codes, ApiError, ApiResponse};
use crate::application::handlers::chat::{
    CreateGroupChatCommand, CreateGroupChatHandler, CreatePrivateChatCommand,
    CreatePrivateChatHandler, GetUserChatsHandler, GetUserChatsQuery,
};
use crate::domain::chat::ChatError;

use super::dto::{CreateGroupChatRequest, CreatePrivateChatRequest};

#[derive(Clone)]
pub struct ChatHandlers {
    private_handler: Arc<CreatePrivateChatHandler>,
    group_handler: Arc<CreateGroupChatHandler>,
    list_handler: Arc<GetUserChatsHandler>,
}

impl ChatHandlers {
    pub fn new(
        private_handler: Arc<CreatePrivateChatHandler>,
        group_handler: Arc<CreateGroupChatHandler>,
        list_handler: Arc<GetUserChatsHandler>,
    ) -> Self {
        Self {
            private_handler,
            group_handler,
            list_handler,
        }
    }
}

/// GET /api/chats - The caller's chats with previews and members
pub async fn list_chats(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let query = GetUserChatsQuery { user_id: user.id };

    match handlers.list_handler.handle(query).await {
        Ok(chats) => Json(ApiResponse::ok(chats)).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

/// POST /api/chats/private - Open a one-to-one chat with another user
pub async fn create_private_chat(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreatePrivateChatRequest>,
) -> Response {
    let target_id = match req.target() {
        Ok(id) => id,
        Err(e) => return handle_chat_error(e.into()),
    };

    let cmd = CreatePrivateChatCommand {
        user_id: user.id,
        target_id,
    };

    match handlers.private_handler.handle(cmd).await {
        Ok(chat) => (StatusCode::CREATED, Json(ApiResponse::created(chat))).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

/// POST /api/chats/group - Create a named chat with several users
pub async fn create_group_chat(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateGroupChatRequest>,
) -> Response {
    let user_ids = match req.invited() {
        Ok(ids) => ids,
        Err(e) => return handle_chat_error(e.into()),
    };

    let cmd = CreateGroupChatCommand {
        creator_id: user.id,
        name: req.name,
        user_ids,
    };

    match handlers.group_handler.handle(cmd).await {
        Ok(chat) => (StatusCode::CREATED, Json(ApiResponse::created(chat))).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

pub(crate) fn handle_chat_error(error: ChatError) -> Response {
    let api_error = match error {
        ChatError::UserNotFound(_) => {
            ApiError::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, "User not found")
        }
        ChatError::ValidationFailed { field, message } => {
            ApiError::bad_request(format!("Validation failed for {}: {}", field, message))
        }
        ChatError::Infrastructure(msg) => {
            tracing::error!("Chat request failed: {}", msg);
            ApiError::internal()
        }
    };
    api_error.into_response()
}
