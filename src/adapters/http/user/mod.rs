//! HTTP adapter for the user directory.

mod handlers;
mod routes;

pub use handlers::UserHandlers;
pub use routes::user_routes;
