//! HTTP handlers for the user directory.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::chat::handle_chat_error;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::response::ApiResponse;
use crate::application::handlers::user::{ListUsersHandler, ListUsersQuery};

#[derive(Clone)]
pub struct UserHandlers {
    list_handler: Arc<ListUsersHandler>,
}

impl UserHandlers {
    pub fn new(list_handler: Arc<ListUsersHandler>) -> Self {
        Self { list_handler }
    }
}

/// GET /api/users - Everyone except the caller
pub async fn list_users(
    State(handlers): State<UserHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let query = ListUsersQuery { requester: user.id };

    match handlers.list_handler.handle(query).await {
        Ok(users) => Json(ApiResponse::ok(users)).into_response(),
        Err(e) => handle_chat_error(e),
    }
}
