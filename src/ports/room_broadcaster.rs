//! RoomBroadcaster port - how the message workflow reaches live listeners.
//!
//! The WebSocket hub is the production implementation. Delivery is
//! best-effort: the port cannot fail, so a mutation that has already been
//! persisted can never be turned into an error by the fan-out path.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::ChatId;

/// A serialized event, shared by every connection it is queued on.
pub type EventFrame = Arc<str>;

#[async_trait]
pub trait RoomBroadcaster: Send + Sync {
    /// Queue `frame` on every connection currently in `chat_id`.
    ///
    /// Returns how many connections accepted the frame. Zero members is
    /// not an error.
    async fn broadcast_to_room(&self, chat_id: ChatId, frame: EventFrame) -> usize;
}
