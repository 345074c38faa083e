//! The two per-connection pumps and the task that supervises them.
//!
//! ```text
//!   transport ──read──▶ inbound_pump ──(close/error)──▶ hub.unregister
//!                                                          │ drops sender
//!   transport ◀─write── outbound_pump ◀── OutboundQueue ◀──┘ (None ⇒ stop)
//! ```
//!
//! Both pumps are generic over the transport halves so they run the same
//! against an axum `WebSocket` split and against in-memory channels.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use futures::{Sink, SinkExt, Stream, StreamExt};

use super::connection::{ConnectionKey, ConnectionStatus, OutboundQueue};
use super::hub::Hub;

/// Why the outbound pump stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundExit {
    /// The hub closed the queue; a close frame was written.
    QueueClosed,
    /// Writing to the transport failed.
    TransportError,
    /// The connection was torn down while a write was still pending.
    WriteAbandoned,
}

/// Outcome of a single write raced against teardown.
enum Write<E> {
    Done(Result<(), E>),
    Abandoned,
}

/// Writes one message unless the connection starts closing first.
///
/// A write that completes without waiting always wins; only a write still
/// pending when teardown begins is given up.
async fn write_or_abandon<S>(sink: &mut S, message: Message, status: &ConnectionStatus) -> Write<S::Error>
where
    S: Sink<Message> + Unpin,
{
    tokio::select! {
        biased;
        result = sink.send(message) => Write::Done(result),
        _ = status.closing() => Write::Abandoned,
    }
}

/// Why the inbound pump stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundExit {
    /// The peer sent a close frame.
    PeerClosed,
    /// Reading from the transport failed.
    ReadError,
    /// The transport ended without a close frame.
    StreamEnded,
}

/// Writes queued frames to the transport in FIFO order.
///
/// Stops on the first write error or once the queue is closed, closing the
/// transport either way. A write that is still pending when the connection
/// starts tearing down (eviction, unregister, shutdown) is abandoned, so a
/// client that stopped reading cannot hold the pump open. Never touches
/// the registry.
pub async fn outbound_pump<S>(mut sink: S, mut queue: OutboundQueue) -> OutboundExit
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let key = *queue.key();
    let status = queue.status();

    let exit = loop {
        let Some(frame) = queue.recv().await else {
            match write_or_abandon(&mut sink, Message::Close(None), &status).await {
                Write::Done(Err(e)) => {
                    tracing::trace!(connection_id = %key.id, "Close frame not delivered: {}", e);
                }
                Write::Abandoned => {
                    tracing::debug!(connection_id = %key.id, "Close frame abandoned, client not reading");
                    break OutboundExit::WriteAbandoned;
                }
                Write::Done(Ok(())) => {}
            }
            break OutboundExit::QueueClosed;
        };

        match write_or_abandon(&mut sink, Message::Text(frame.to_string()), &status).await {
            Write::Done(Ok(())) => {}
            Write::Done(Err(e)) => {
                tracing::debug!(
                    connection_id = %key.id,
                    chat_id = %key.chat_id,
                    "Send error, closing connection: {}",
                    e
                );
                break OutboundExit::TransportError;
            }
            Write::Abandoned => {
                tracing::debug!(
                    connection_id = %key.id,
                    chat_id = %key.chat_id,
                    "Connection closing with a write pending, abandoning it"
                );
                break OutboundExit::WriteAbandoned;
            }
        }
    };

    // A stalled transport would block a graceful close as well; dropping
    // the sink releases it.
    if exit != OutboundExit::WriteAbandoned {
        if let Err(e) = sink.close().await {
            tracing::trace!(connection_id = %key.id, "Transport close failed: {}", e);
        }
    }
    exit
}

/// Reads from the transport until the peer goes away, discarding payloads.
///
/// Clients push nothing over this channel; reads exist only to notice
/// disconnects. On exit the connection is unregistered, which closes its
/// queue and in turn stops the outbound pump.
pub async fn inbound_pump<St, E>(mut stream: St, hub: Arc<Hub>, key: ConnectionKey) -> InboundExit
where
    St: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let exit = loop {
        match stream.next().await {
            Some(Ok(Message::Close(_))) => {
                tracing::debug!(connection_id = %key.id, "Client sent close frame");
                break InboundExit::PeerClosed;
            }
            Some(Ok(_)) => {
                tracing::trace!(connection_id = %key.id, "Discarding inbound frame");
            }
            Some(Err(e)) => {
                tracing::debug!(connection_id = %key.id, "Receive error: {}", e);
                break InboundExit::ReadError;
            }
            None => break InboundExit::StreamEnded,
        }
    };

    hub.unregister(&key).await;
    exit
}

/// Runs a registered connection until both pumps have stopped.
///
/// If the inbound side ends first, the outbound pump gets `close_grace` to
/// flush the close frame. If the outbound side ends first (write failure,
/// eviction, or a write abandoned on a stalled client), reading is
/// abandoned and the connection is unregistered. Both transport halves are
/// dropped and the connection is `Closed` when this returns.
pub async fn run_connection<Si, St, E>(
    hub: Arc<Hub>,
    queue: OutboundQueue,
    sink: Si,
    stream: St,
    close_grace: Duration,
) where
    Si: Sink<Message> + Unpin + Send + 'static,
    Si::Error: Display + Send,
    St: Stream<Item = Result<Message, E>> + Unpin + Send + 'static,
    E: Display + Send + 'static,
{
    let key = *queue.key();
    let status = queue.status();

    let mut outbound = tokio::spawn(outbound_pump(sink, queue));
    let mut inbound = tokio::spawn(inbound_pump(stream, hub.clone(), key));

    tokio::select! {
        result = &mut inbound => {
            if let Ok(exit) = result {
                tracing::debug!(connection_id = %key.id, ?exit, "Inbound pump stopped");
            }
            if tokio::time::timeout(close_grace, &mut outbound).await.is_err() {
                tracing::debug!(connection_id = %key.id, "Outbound pump did not finish in time");
                outbound.abort();
            }
        }
        result = &mut outbound => {
            if let Ok(exit) = result {
                tracing::debug!(connection_id = %key.id, ?exit, "Outbound pump stopped");
            }
            inbound.abort();
            hub.unregister(&key).await;
        }
    }

    status.close();
    tracing::debug!(
        connection_id = %key.id,
        chat_id = %key.chat_id,
        user_id = %key.user_id,
        "Connection closed"
    );
}
