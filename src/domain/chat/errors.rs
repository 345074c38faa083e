//! Chat management errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, UserId, ValidationError};

/// Failures of chat creation and chat or user listing.
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl ChatError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ChatError::UserNotFound(_) => ErrorCode::UserNotFound,
            ChatError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ChatError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<ValidationError> for ChatError {
    fn from(err: ValidationError) -> Self {
        ChatError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for ChatError {
    fn from(err: DomainError) -> Self {
        ChatError::Infrastructure(err.to_string())
    }
}
