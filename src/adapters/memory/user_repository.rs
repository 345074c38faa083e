//! In-memory user directory.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::chat::User;
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::ports::UserRepository;

/// Users keyed by id. Clones share the same directory, so the chat and
/// message stores can resolve members and nicknames from one place.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user; the email is derived from the nickname.
    pub async fn add_user(&self, id: UserId, nickname: impl Into<String>) {
        let nickname = nickname.into();
        let user = User {
            id,
            email: format!("{}@example.com", nickname),
            nickname,
            created_at: Timestamp::now(),
        };
        self.users.write().await.insert(id, user);
    }

    pub async fn nickname(&self, id: UserId) -> Option<String> {
        self.users.read().await.get(&id).map(|u| u.nickname.clone())
    }

    pub(crate) async fn snapshot(&self, ids: impl IntoIterator<Item = UserId>) -> Vec<User> {
        let users = self.users.read().await;
        ids.into_iter().filter_map(|id| users.get(&id).cloned()).collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_all_except(&self, excluded: UserId) -> Result<Vec<User>, DomainError> {
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.id != excluded)
            .cloned()
            .collect();
        users.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(users)
    }
}
