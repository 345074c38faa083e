//! Strongly-typed identifier value objects.
//!
//! Chat storage keys are database-assigned integers, so every identifier
//! wraps an `i64` and serializes as a bare JSON number.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an identifier, rejecting non-positive values.
            pub fn new(value: i64) -> Result<Self, ValidationError> {
                if value <= 0 {
                    return Err(ValidationError::out_of_range($field, 1, i64::MAX, value));
                }
                Ok(Self(value))
            }

            /// Wraps a value read back from storage without validation.
            pub fn from_raw(value: i64) -> Self {
                Self(value)
            }

            /// Returns the inner integer.
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            /// Parses a path segment, applying the same checks as `new`.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .parse::<i64>()
                    .map_err(|e| ValidationError::invalid_format($field, e.to_string()))?;
                Self::new(value)
            }
        }
    };
}

integer_id!(
    /// Identifier of a registered user.
    UserId,
    "user_id"
);

integer_id!(
    /// Identifier of a chat room; the unit of broadcast scoping.
    ChatId,
    "chat_id"
);

integer_id!(
    /// Identifier of a persisted chat message.
    MessageId,
    "message_id"
);
