//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - Session token validation (HS256 JWT, mock)
//! - `http` - REST endpoints, middleware and the application router
//! - `memory` - Map-backed repositories
//! - `postgres` - sqlx repositories
//! - `websocket` - Connection hub and realtime listener endpoint

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod websocket;

pub use auth::{JwtConfig, JwtSessionValidator, MockSessionValidator};
pub use http::{app_router, ApiHandlers, ChatHandlers, MessageHandlers, UserHandlers};
pub use memory::{InMemoryChatRepository, InMemoryMessageRepository, InMemoryUserRepository};
pub use postgres::{PostgresChatRepository, PostgresMessageRepository, PostgresUserRepository};
pub use websocket::{Hub, WebSocketState};
