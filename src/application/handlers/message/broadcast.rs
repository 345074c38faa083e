//! Hand-off from a persisted mutation to the room's listeners.

use crate::domain::message::MessageEvent;
use crate::ports::RoomBroadcaster;

/// Serializes `event` once and queues it on every connection in its room.
///
/// Returns how many connections accepted it. Serialization failures are
/// logged and reported as zero deliveries.
pub async fn broadcast_event(broadcaster: &dyn RoomBroadcaster, event: &MessageEvent) -> usize {
    let frame = match event.to_frame() {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!(
                event_type = %event.kind(),
                message_id = %event.message_id(),
                "Failed to serialize message event: {}",
                e
            );
            return 0;
        }
    };

    let delivered = broadcaster.broadcast_to_room(event.chat_id(), frame).await;
    tracing::debug!(
        event_type = %event.kind(),
        chat_id = %event.chat_id(),
        message_id = %event.message_id(),
        delivered,
        "Broadcast message event"
    );
    delivered
}
