//! HTTP routes for the user directory.

use axum::{routing::get, Router};

use super::handlers::{list_users, UserHandlers};

/// Creates the user router, meant to be nested under `/api`.
///
/// - `GET /users`
pub fn user_routes(handlers: UserHandlers) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .with_state(handlers)
}
