//! Message domain module.
//!
//! Persisted message records and the events emitted when one is created,
//! edited or removed.
//!
//! # Events
//!
//! - `message.created` - a message was persisted
//! - `message.updated` - a message's content changed
//! - `message.deleted` - a message was removed

mod aggregate;
mod errors;
mod events;

pub use aggregate::{validate_content, Chat, Message, MessagePage, NewMessage, MESSAGE_PAGE_SIZE};
pub use errors::MessageError;
pub use events::{MessageEvent, MessageEventKind, RealtimeEnvelope, EVENT_SUCCESS_CODE};
