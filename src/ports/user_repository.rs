//! User repository port (read-only; accounts are created elsewhere).

use async_trait::async_trait;

use crate::domain::chat::User;
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id. Returns `None` if absent.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Every user except `excluded`, newest account first.
    async fn find_all_except(&self, excluded: UserId) -> Result<Vec<User>, DomainError>;
}
