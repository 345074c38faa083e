//! ListUsersHandler - Query handler for picking someone to chat with.

use std::sync::Arc;

use crate::domain::chat::{ChatError, User};
use crate::domain::foundation::UserId;
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct ListUsersQuery {
    /// The caller, left out of the result.
    pub requester: UserId,
}

pub struct ListUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl ListUsersHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Every other user, newest account first.
    pub async fn handle(&self, query: ListUsersQuery) -> Result<Vec<User>, ChatError> {
        self.users
            .find_all_except(query.requester)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %query.requester, "Failed to list users: {}", e);
                ChatError::from(e)
            })
    }
}
