//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, auth, errors)
//! - `chat` - Users, chat creation rules and the chat list
//! - `message` - Chat messages, their mutation errors, and lifecycle events

pub mod chat;
pub mod foundation;
pub mod message;
