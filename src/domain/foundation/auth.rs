//! Authentication types for the domain layer.
//!
//! An `AuthenticatedUser` is what the `SessionValidator` port hands back
//! after verifying a bearer token. Nothing downstream re-validates it.

use super::UserId;
use thiserror::Error;

/// Authenticated user extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    /// Display name shown next to the user's messages.
    pub nickname: String,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, email: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            nickname: nickname.into(),
        }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No token was supplied with the request.
    #[error("Authentication required")]
    MissingToken,

    /// The token is malformed or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The validator could not be reached or is misconfigured.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}
