//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::chat::User;
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::ports::UserRepository;

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query("SELECT id, email, nickname, created_at FROM users WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_all_except(&self, excluded: UserId) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, nickname, created_at
            FROM users
            WHERE id <> $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(excluded.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }
}

/// Maps a row with `id, email, nickname, created_at` columns.
pub(super) fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::database(format!("Failed to get id: {}", e)))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| DomainError::database(format!("Failed to get email: {}", e)))?;
    let nickname: String = row
        .try_get("nickname")
        .map_err(|e| DomainError::database(format!("Failed to get nickname: {}", e)))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::database(format!("Failed to get created_at: {}", e)))?;

    Ok(User {
        id: UserId::from_raw(id),
        email,
        nickname,
        created_at: Timestamp::from_datetime(created_at),
    })
}
