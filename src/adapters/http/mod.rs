//! HTTP adapters - REST API and the composed application router.
//!
//! ```text
//! /health                      liveness probe
//! /api/...                     message, chat and user REST endpoints
//!                              (auth_middleware, timeout)
//! /ws/chats/:chat_id           realtime listener upgrade
//! ```

pub mod chat;
pub mod message;
pub mod middleware;
pub mod response;
pub mod user;

pub use chat::{chat_routes, ChatHandlers};
pub use message::{message_routes, MessageHandlers};
pub use middleware::{auth_middleware, AuthRejection, AuthState, RequireAuth};
pub use response::{codes, ApiError, ApiResponse};
pub use user::{user_routes, UserHandlers};

use std::time::Duration;

use axum::{routing::get, Json, Router};
use http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::adapters::websocket::{websocket_router, WebSocketState};
use crate::config::ServerConfig;

/// Handler state for every route under `/api`.
#[derive(Clone)]
pub struct ApiHandlers {
    pub messages: MessageHandlers,
    pub chats: ChatHandlers,
    pub users: UserHandlers,
}

/// Builds the full application router.
///
/// The request timeout applies to the REST routes only; WebSocket sessions
/// outlive any request deadline.
pub fn app_router(
    api: ApiHandlers,
    auth: AuthState,
    websocket: WebSocketState,
    server: &ServerConfig,
) -> Router {
    let api = message_routes(api.messages)
        .merge(chat_routes(api.chats))
        .merge(user_routes(api.users))
        .layer(axum::middleware::from_fn_with_state(auth, auth_middleware))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_secs,
        )));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .merge(websocket_router().with_state(websocket))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer(&server.cors_origins_list())),
        )
}

async fn health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::ok("ok"))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
