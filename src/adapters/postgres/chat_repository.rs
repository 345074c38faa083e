//! PostgreSQL implementation of ChatRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::user_repository::row_to_user;
use crate::domain::chat::User;
use crate::domain::foundation::{ChatId, DomainError, Timestamp, UserId};
use crate::domain::message::Chat;
use crate::ports::ChatRepository;

#[derive(Clone)]
pub struct PostgresChatRepository {
    pool: PgPool,
}

impl PostgresChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PostgresChatRepository {
    async fn find_by_id(&self, id: ChatId) -> Result<Option<Chat>, DomainError> {
        let row = sqlx::query("SELECT id, name, created_at FROM chats WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch chat: {}", e)))?;

        row.as_ref().map(row_to_chat).transpose()
    }

    async fn is_member(&self, chat_id: ChatId, user_id: UserId) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM chat_members WHERE chat_id = $1 AND user_id = $2)",
        )
        .bind(chat_id.as_i64())
        .bind(user_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to check membership: {}", e)))
    }

    async fn create(&self, name: &str, members: &[UserId]) -> Result<Chat, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database(format!("Failed to begin transaction: {}", e)))?;

        let row = sqlx::query("INSERT INTO chats (name) VALUES ($1) RETURNING id, name, created_at")
            .bind(name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to insert chat: {}", e)))?;
        let chat = row_to_chat(&row)?;

        let member_ids: Vec<i64> = members.iter().map(UserId::as_i64).collect();
        sqlx::query(
            r#"
            INSERT INTO chat_members (chat_id, user_id)
            SELECT $1, member FROM UNNEST($2::BIGINT[]) AS member
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(chat.id.as_i64())
        .bind(member_ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to add chat members: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database(format!("Failed to commit chat: {}", e)))?;

        Ok(chat)
    }

    async fn find_by_member(&self, user_id: UserId) -> Result<Vec<Chat>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.name, c.created_at
            FROM chats c
            JOIN chat_members cm ON cm.chat_id = c.id
            WHERE cm.user_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list chats: {}", e)))?;

        rows.iter().map(row_to_chat).collect()
    }

    async fn members(&self, chat_id: ChatId) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.email, u.nickname, u.created_at
            FROM users u
            JOIN chat_members cm ON cm.user_id = u.id
            WHERE cm.chat_id = $1
            ORDER BY u.nickname
            "#,
        )
        .bind(chat_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list chat members: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }
}

fn row_to_chat(row: &PgRow) -> Result<Chat, DomainError> {
    let raw_id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::database(format!("Failed to get id: {}", e)))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| DomainError::database(format!("Failed to get name: {}", e)))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::database(format!("Failed to get created_at: {}", e)))?;

    Ok(Chat {
        id: ChatId::from_raw(raw_id),
        name,
        created_at: Timestamp::from_datetime(created_at),
    })
}
