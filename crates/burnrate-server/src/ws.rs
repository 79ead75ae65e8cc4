//! `WebSocket` endpoint for real-time observers.
//!
//! Clients connect to `GET /ws` and become observers of the broadcast hub.
//! Every connection runs two independent loops:
//!
//! - a **write task** that drains the observer's private queue into the
//!   socket and sends a close frame once the hub closes the queue, and
//! - a **read loop** that republishes every inbound text or binary frame
//!   to the hub, so a message from any observer reaches all of them
//!   (including the sender).
//!
//! Pings are answered by the transport and are not republished. The
//! connection ends when either loop finishes; the observer is then
//! unregistered.

use std::fmt::Display;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::hub::{HubHandle, Observer, ObserverId};
use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` observer connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_observer(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

async fn handle_socket(socket: WebSocket, hub: HubHandle) {
    let (observer, queue) = Observer::channel();
    let id = observer.id();
    if hub.register(observer).await.is_err() {
        debug!("Hub unavailable, dropping WebSocket connection");
        return;
    }
    debug!(observer = %id, "WebSocket observer connected");

    let (sink, stream) = socket.split();
    let mut writer = tokio::spawn(write_pump(sink, queue));

    let writer_finished = tokio::select! {
        () = read_pump(stream, &hub, id) => false,
        _ = &mut writer => true,
    };

    let _ = hub.unregister(id).await;
    if !writer_finished {
        // Unregistering closes the queue; the writer sends a close frame.
        let _ = writer.await;
    }
    debug!(observer = %id, "WebSocket observer disconnected");
}

/// Forward queued messages to the socket until the queue closes or a
/// write fails. A closed queue ends with a close frame.
pub(crate) async fn write_pump<S>(mut sink: S, mut queue: mpsc::Receiver<String>)
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    while let Some(text) = queue.recv().await {
        if let Err(e) = sink.send(Message::Text(text.into())).await {
            debug!("WebSocket write failed: {e}");
            return;
        }
    }
    let _ = sink.send(Message::Close(None)).await;
}

/// Republish inbound frames to the hub until the client closes or the
/// read fails.
pub(crate) async fn read_pump<S, E>(mut stream: S, hub: &HubHandle, id: ObserverId)
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    while let Some(frame) = stream.next().await {
        let message = match frame {
            Ok(Message::Text(text)) => text.as_str().to_owned(),
            Ok(Message::Binary(bytes)) => match String::from_utf8(bytes.to_vec()) {
                Ok(text) => text,
                Err(_) => {
                    debug!(observer = %id, "Ignoring non-UTF-8 binary frame");
                    continue;
                }
            },
            Ok(Message::Ping(_) | Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => return,
            Err(e) => {
                debug!(observer = %id, "WebSocket read failed: {e}");
                return;
            }
        };
        if hub.broadcast(message).await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Bytes;
    use futures::stream;

    use super::*;
    use crate::hub::spawn_hub;

    #[tokio::test]
    async fn write_pump_forwards_then_closes() {
        let (queue_tx, queue_rx) = mpsc::channel(4);
        let (sink, mut written) = futures::channel::mpsc::unbounded::<Message>();
        queue_tx.send("a".to_owned()).await.unwrap();
        queue_tx.send("b".to_owned()).await.unwrap();
        drop(queue_tx);

        write_pump(sink, queue_rx).await;

        let frames: Vec<Message> = (&mut written).collect().await;
        assert_eq!(frames.len(), 3);
        assert!(matches!(frames.first(), Some(Message::Text(t)) if t.as_str() == "a"));
        assert!(matches!(frames.get(1), Some(Message::Text(t)) if t.as_str() == "b"));
        assert!(matches!(frames.get(2), Some(Message::Close(None))));
    }

    #[tokio::test]
    async fn write_pump_stops_when_socket_write_fails() {
        let (queue_tx, queue_rx) = mpsc::channel(4);
        let (sink, written) = futures::channel::mpsc::unbounded::<Message>();
        drop(written);
        queue_tx.send("lost".to_owned()).await.unwrap();

        let finished =
            tokio::time::timeout(std::time::Duration::from_secs(5), write_pump(sink, queue_rx))
                .await;

        // The sender is still alive, so only the failed write ended the task.
        assert!(finished.is_ok());
        drop(queue_tx);
    }

    #[tokio::test]
    async fn read_pump_echoes_text_and_binary_only() {
        let (hub, _task) = spawn_hub();
        let (listener, mut rx) = Observer::channel();
        hub.register(listener).await.unwrap();

        let frames = stream::iter(vec![
            Ok::<_, axum::Error>(Message::Text("hello".into())),
            Ok(Message::Ping(Bytes::from_static(b"ping"))),
            Ok(Message::Binary(Bytes::from_static(b"bytes"))),
            Ok(Message::Close(None)),
            Ok(Message::Text("after close".into())),
        ]);
        read_pump(frames, &hub, ObserverId::new()).await;

        assert_eq!(rx.recv().await.unwrap(), "hello");
        assert_eq!(rx.recv().await.unwrap(), "bytes");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn read_pump_stops_on_error() {
        let (hub, _task) = spawn_hub();
        let (listener, mut rx) = Observer::channel();
        hub.register(listener).await.unwrap();

        let frames = stream::iter(vec![
            Err(axum::Error::new(std::io::Error::other("reset"))),
            Ok(Message::Text("never".into())),
        ]);
        read_pump(frames, &hub, ObserverId::new()).await;

        hub.broadcast("marker".to_owned()).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), "marker");
    }
}
