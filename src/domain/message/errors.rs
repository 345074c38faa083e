//! Message workflow errors.

use thiserror::Error;

use crate::domain::foundation::{ChatId, DomainError, ErrorCode, MessageId, ValidationError};

/// Failures of a message mutation or read.
///
/// Every variant describes the caller's own request; delivery problems on
/// the realtime fan-out path never appear here.
#[derive(Debug, Clone, Error)]
pub enum MessageError {
    #[error("Chat not found: {0}")]
    ChatNotFound(ChatId),

    #[error("Message not found: {0}")]
    NotFound(MessageId),

    /// Caller is not the sender of the message.
    #[error("Not allowed to modify this message")]
    Forbidden,

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl MessageError {
    pub fn infrastructure(message: impl Into<String>) -> Self {
        MessageError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            MessageError::ChatNotFound(_) => ErrorCode::ChatNotFound,
            MessageError::NotFound(_) => ErrorCode::MessageNotFound,
            MessageError::Forbidden => ErrorCode::Forbidden,
            MessageError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MessageError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<ValidationError> for MessageError {
    fn from(err: ValidationError) -> Self {
        MessageError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for MessageError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => MessageError::Forbidden,
            ErrorCode::ValidationFailed => MessageError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.to_string(),
            },
            _ => MessageError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_by_variant() {
        assert_eq!(
            MessageError::NotFound(MessageId::from_raw(1)).code(),
            ErrorCode::MessageNotFound
        );
        assert_eq!(MessageError::Forbidden.code(), ErrorCode::Forbidden);
        assert_eq!(
            MessageError::infrastructure("boom").code(),
            ErrorCode::DatabaseError
        );
    }

    #[test]
    fn validation_error_converts_with_field() {
        let err: MessageError = ValidationError::empty_field("content").into();
        match err {
            MessageError::ValidationFailed { field, .. } => assert_eq!(field, "content"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn database_error_becomes_infrastructure() {
        let err: MessageError = DomainError::database("connection reset").into();
        assert!(matches!(err, MessageError::Infrastructure(_)));
        assert!(err.to_string().contains("connection reset"));
    }
}
