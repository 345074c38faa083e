//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, authentication types, and error
//! types that form the vocabulary of the chat domain.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ChatId, MessageId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
