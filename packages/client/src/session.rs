//! WebSocket client session management.
//!
//! A session owns one transport connection. It identifies first, then
//! forwards decoded server messages to the app loop and writes queued
//! outbound messages. Every event carries the generation of the session that
//! produced it so the app loop can ignore a replaced transport.

use futures_util::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use morsecast_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};

use crate::error::ClientError;

#[derive(Debug)]
pub enum SessionEventKind {
    /// Transport is open and `identify` has been queued
    Connected,
    /// Decoded server message
    Message(ServerMessage),
    /// Transport could not be opened or was lost
    Disconnected(ClientError),
}

#[derive(Debug)]
pub struct SessionEvent {
    pub generation: u64,
    pub kind: SessionEventKind,
}

#[derive(Debug, Clone)]
struct EventSink {
    generation: u64,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventSink {
    fn emit(&self, kind: SessionEventKind) -> bool {
        self.tx
            .send(SessionEvent {
                generation: self.generation,
                kind,
            })
            .is_ok()
    }
}

/// Handle to a running session task. Dropping it tears the transport down.
pub struct Session {
    generation: u64,
    outbound: mpsc::UnboundedSender<ClientMessage>,
    task: JoinHandle<()>,
}

impl Session {
    /// Connect to `url` in the background and identify with `token`.
    pub fn spawn(
        generation: u64,
        url: String,
        token: String,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let sink = EventSink {
            generation,
            tx: events,
        };

        let task = tokio::spawn(async move {
            tracing::info!("Attempting to connect to {} (session {})", url, generation);
            let error = match run_session(&url, token, outbound_rx, &sink).await {
                Ok(()) => ClientError::ConnectionError("Connection closed".to_string()),
                Err(e) => e,
            };
            sink.emit(SessionEventKind::Disconnected(error));
        });

        Self {
            generation,
            outbound,
            task,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Queue a message for the server. Returns `false` once the session is gone.
    pub fn send(&self, message: ClientMessage) -> bool {
        self.outbound.send(message).is_ok()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn encode(message: &ClientMessage) -> Result<String, ClientError> {
    serde_json::to_string(message).map_err(|e| ClientError::ConnectionError(e.to_string()))
}

/// Decode one text frame; malformed frames are logged and dropped.
pub fn decode(text: &str) -> Option<ServerMessage> {
    match serde_json::from_str::<ServerMessage>(text) {
        Ok(message) => Some(message),
        Err(e) => {
            tracing::warn!("Dropping malformed server message: {}", e);
            None
        }
    }
}

async fn run_session(
    url: &str,
    token: String,
    mut outbound_rx: mpsc::UnboundedReceiver<ClientMessage>,
    sink: &EventSink,
) -> Result<(), ClientError> {
    let (ws_stream, _) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to relay at {}", url);

    let (mut write, mut read) = ws_stream.split();

    // identify must be the first frame on the connection
    let identify = encode(&ClientMessage::Identify { uuid: token })?;
    write
        .send(Message::Text(identify.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    sink.emit(SessionEventKind::Connected);

    // Both halves run inside this task so that aborting the session closes the socket
    let read_loop = async {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    tracing::debug!("Received: {}", text.as_str());
                    if let Some(message) = decode(text.as_str())
                        && !sink.emit(SessionEventKind::Message(message))
                    {
                        break;
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    };

    let write_loop = async {
        while let Some(message) = outbound_rx.recv().await {
            let json = match encode(&message) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                break;
            }
        }
    };

    // If either half completes, the session is over
    tokio::select! {
        _ = read_loop => {},
        _ = write_loop => {},
    }

    Err(ClientError::ConnectionError("Connection lost".to_string()))
}
