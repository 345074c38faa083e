//! PostgreSQL implementation of MessageRepository.
//!
//! Every read joins `users` so returned messages carry the sender's
//! nickname, which the realtime events need.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{ChatId, DomainError, ErrorCode, MessageId, Timestamp, UserId};
use crate::domain::message::{Message, NewMessage};
use crate::ports::MessageRepository;

const MESSAGE_COLUMNS: &str = r#"
    m.id, m.chat_id, m.sender_id, u.nickname AS sender_nickname,
    m.content, m.created_at, m.updated_at
"#;

/// PostgreSQL implementation of MessageRepository.
#[derive(Clone)]
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn create(&self, message: NewMessage) -> Result<Message, DomainError> {
        let sql = format!(
            r#"
            WITH m AS (
                INSERT INTO messages (chat_id, sender_id, content, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $4)
                RETURNING *
            )
            SELECT {MESSAGE_COLUMNS}
            FROM m
            JOIN users u ON u.id = m.sender_id
            "#
        );

        let row = sqlx::query(&sql)
            .bind(message.chat_id.as_i64())
            .bind(message.sender_id.as_i64())
            .bind(&message.content)
            .bind(message.created_at.as_datetime())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to insert message: {}", e)))?;

        row_to_message(&row)
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, DomainError> {
        let sql = format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE m.id = $1
            "#
        );

        let row = sqlx::query(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch message: {}", e)))?;

        row.as_ref().map(row_to_message).transpose()
    }

    async fn update(&self, message: &Message) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE messages SET
                content = $2,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(message.id.as_i64())
        .bind(&message.content)
        .bind(message.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update message: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::MessageNotFound,
                format!("Message not found: {}", message.id),
            ));
        }

        Ok(())
    }

    async fn delete(&self, id: MessageId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to delete message: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::MessageNotFound,
                format!("Message not found: {}", id),
            ));
        }

        Ok(())
    }

    async fn find_by_chat_id(
        &self,
        chat_id: ChatId,
        cursor: Option<MessageId>,
        limit: u32,
    ) -> Result<Vec<Message>, DomainError> {
        let sql = format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE m.chat_id = $1
              AND ($2::BIGINT IS NULL OR m.id < $2)
            ORDER BY m.id DESC
            LIMIT $3
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(chat_id.as_i64())
            .bind(cursor.map(|c| c.as_i64()))
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch messages: {}", e)))?;

        rows.iter().map(row_to_message).collect()
    }

    async fn last_message_id(&self, chat_id: ChatId) -> Result<Option<MessageId>, DomainError> {
        let id: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM messages WHERE chat_id = $1")
            .bind(chat_id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to fetch last message id: {}", e))
            })?;

        Ok(id.map(MessageId::from_raw))
    }

    async fn latest_by_chats(
        &self,
        chat_ids: &[ChatId],
    ) -> Result<HashMap<ChatId, Message>, DomainError> {
        if chat_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            r#"
            SELECT DISTINCT ON (m.chat_id) {MESSAGE_COLUMNS}
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE m.chat_id = ANY($1)
            ORDER BY m.chat_id, m.id DESC
            "#
        );
        let ids: Vec<i64> = chat_ids.iter().map(ChatId::as_i64).collect();

        let rows = sqlx::query(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch latest messages: {}", e)))?;

        rows.iter()
            .map(|row| row_to_message(row).map(|m| (m.chat_id, m)))
            .collect()
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(format!("Failed to get {}: {}", name, e)))
}

fn row_to_message(row: &PgRow) -> Result<Message, DomainError> {
    let created_at: chrono::DateTime<chrono::Utc> = column(row, "created_at")?;
    let updated_at: chrono::DateTime<chrono::Utc> = column(row, "updated_at")?;

    Ok(Message {
        id: MessageId::from_raw(column(row, "id")?),
        chat_id: ChatId::from_raw(column(row, "chat_id")?),
        sender_id: UserId::from_raw(column(row, "sender_id")?),
        sender_nickname: column(row, "sender_nickname")?,
        content: column(row, "content")?,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}
