//! In-process `SessionValidator` keyed by literal token strings.
//!
//! ```ignore
//! let validator = MockSessionValidator::new()
//!     .with_test_user("ann-token", 1)
//!     .with_user("bob-token", 2, "bob");
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    outage: Option<AuthError>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `token` as the given chat user.
    pub fn with_user(self, token: impl Into<String>, user_id: i64, nickname: impl Into<String>) -> Self {
        let nickname = nickname.into();
        let user = AuthenticatedUser::new(
            UserId::from_raw(user_id),
            format!("{}@chat.test", nickname),
            nickname,
        );
        self.tokens.write().unwrap().insert(token.into(), user);
        self
    }

    /// Accepts `token` as user `user_id`, nicknamed `user{id}`.
    pub fn with_test_user(self, token: impl Into<String>, user_id: i64) -> Self {
        self.with_user(token, user_id, format!("user{}", user_id))
    }

    /// Every validation fails with `error`, whatever the token.
    pub fn with_error(mut self, error: AuthError) -> Self {
        self.outage = Some(error);
        self
    }

    /// Stops accepting `token`, as if its session was revoked.
    pub fn revoke(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = &self.outage {
            return Err(error.clone());
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
