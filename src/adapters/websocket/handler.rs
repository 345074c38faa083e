//! WebSocket upgrade handler for chat room listeners.
//!
//! Handles the HTTP → WebSocket upgrade and hands the socket to the hub:
//! 1. Resolve the caller from the `token` query parameter or Bearer header
//! 2. Check the chat exists and the caller is a member
//! 3. Upgrade to WebSocket and register with the hub
//! 4. Run both pumps until either side goes away
//!
//! The channel is push-only. Anything the client sends is read and dropped.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ws::WebSocket, Path, Query, State, WebSocketUpgrade},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use serde::Deserialize;

use crate::domain::foundation::{AuthError, AuthenticatedUser, ChatId};
use crate::ports::{ChatRepository, SessionValidator};

use super::hub::Hub;
use super::pump::run_connection;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub hub: Arc<Hub>,
    pub validator: Arc<dyn SessionValidator>,
    pub chats: Arc<dyn ChatRepository>,
    /// How long the outbound pump may take to flush its close frame.
    pub close_grace: Duration,
}

impl WebSocketState {
    pub fn new(
        hub: Arc<Hub>,
        validator: Arc<dyn SessionValidator>,
        chats: Arc<dyn ChatRepository>,
    ) -> Self {
        Self {
            hub,
            validator,
            chats,
            close_grace: Duration::from_secs(5),
        }
    }

    pub fn with_close_grace(mut self, close_grace: Duration) -> Self {
        self.close_grace = close_grace;
        self
    }
}

/// Query parameters accepted on the upgrade request.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    pub token: Option<String>,
}

/// Why an upgrade request was turned away before the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    Unauthenticated(AuthError),
    InvalidChatId,
    ChatNotFound,
    NotMember,
    Unavailable,
    NotUpgradable,
}

impl IntoResponse for AdmissionError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AdmissionError::Unauthenticated(AuthError::ServiceUnavailable(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AUTH_ERROR",
                "Authentication service unavailable",
            ),
            AdmissionError::Unauthenticated(AuthError::MissingToken) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "Authentication required",
            ),
            AdmissionError::Unauthenticated(_) => {
                (StatusCode::UNAUTHORIZED, "AUTH_ERROR", "Invalid or expired token")
            }
            AdmissionError::InvalidChatId => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", "Invalid chat ID")
            }
            AdmissionError::ChatNotFound => {
                (StatusCode::NOT_FOUND, "CHAT_NOT_FOUND", "Chat not found")
            }
            AdmissionError::NotMember => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Not a member of this chat",
            ),
            AdmissionError::Unavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Could not verify chat access",
            ),
            AdmissionError::NotUpgradable => (
                StatusCode::UPGRADE_REQUIRED,
                "UPGRADE_REQUIRED",
                "WebSocket upgrade required",
            ),
        };

        (
            status,
            Json(serde_json::json!({
                "success": false,
                "error": message,
                "code": code
            })),
        )
            .into_response()
    }
}

/// Checks identity and room access for an upgrade request.
pub async fn admit(
    state: &WebSocketState,
    headers: &HeaderMap,
    params: &ConnectParams,
    raw_chat_id: &str,
) -> Result<(AuthenticatedUser, ChatId), AdmissionError> {
    let token = params
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .or_else(|| {
            headers
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
        })
        .ok_or(AdmissionError::Unauthenticated(AuthError::MissingToken))?;

    let user = state.validator.validate(token).await.map_err(|e| {
        if let AuthError::ServiceUnavailable(msg) = &e {
            tracing::error!("Auth service unavailable: {}", msg);
        }
        AdmissionError::Unauthenticated(e)
    })?;

    let chat_id = raw_chat_id
        .parse::<ChatId>()
        .map_err(|_| AdmissionError::InvalidChatId)?;

    let chat = state.chats.find_by_id(chat_id).await.map_err(|e| {
        tracing::error!(chat_id = %chat_id, "Chat lookup failed: {}", e);
        AdmissionError::Unavailable
    })?;
    if chat.is_none() {
        return Err(AdmissionError::ChatNotFound);
    }

    let is_member = state.chats.is_member(chat_id, user.id).await.map_err(|e| {
        tracing::error!(chat_id = %chat_id, "Membership lookup failed: {}", e);
        AdmissionError::Unavailable
    })?;
    if !is_member {
        tracing::debug!(chat_id = %chat_id, user_id = %user.id, "Rejected non-member");
        return Err(AdmissionError::NotMember);
    }

    Ok((user, chat_id))
}

/// Handle WebSocket upgrade requests for a chat room.
///
/// Route: `GET /ws/chats/:chat_id`
pub async fn ws_handler(
    ws: Option<WebSocketUpgrade>,
    Path(chat_id): Path<String>,
    Query(params): Query<ConnectParams>,
    headers: HeaderMap,
    State(state): State<WebSocketState>,
) -> Response {
    let (user, chat_id) = match admit(&state, &headers, &params, &chat_id).await {
        Ok(admitted) => admitted,
        Err(e) => return e.into_response(),
    };

    let Some(ws) = ws else {
        return AdmissionError::NotUpgradable.into_response();
    };

    ws.on_upgrade(move |socket| handle_socket(socket, user, chat_id, state))
}

/// Runs an established connection until it closes.
async fn handle_socket(
    socket: WebSocket,
    user: AuthenticatedUser,
    chat_id: ChatId,
    state: WebSocketState,
) {
    let (connection, queue) = state.hub.open_connection(user.id, chat_id);

    if !state.hub.register(connection).await {
        tracing::debug!(chat_id = %chat_id, user_id = %user.id, "Hub refused connection");
        let _ = socket.close().await;
        return;
    }

    let (sink, stream) = socket.split();
    run_connection(state.hub.clone(), queue, sink, stream, state.close_grace).await;
}

/// Create axum router for the WebSocket endpoint.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .merge(websocket_router().with_state(ws_state));
/// ```
pub fn websocket_router() -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new().route("/ws/chats/:chat_id", get(ws_handler))
}
