//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, ParticipantId, ParticipantToken, PusherChannel},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
};

/// Per-connection protocol state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionState {
    /// Accepted, no identify seen yet
    Unidentified,
    /// Bound (or once bound) to a participant
    Identified(ParticipantId),
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let connection_id = ConnectionIdFactory::generate();
    tracing::info!("Connection {} accepted", connection_id);
    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: events addressed to this connection
/// (via rx channel) are written to the WebSocket in the order they were queued.
///
/// # Arguments
///
/// * `rx` - Channel receiver for outbound messages
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Handle one decoded client message and return the next connection state.
async fn dispatch(
    state: &AppState,
    connection_id: ConnectionId,
    current: ConnectionState,
    tx: &PusherChannel,
    message: ClientMessage,
) -> ConnectionState {
    match (current, message) {
        (ConnectionState::Unidentified, ClientMessage::Identify { uuid }) => {
            // Convert String -> ParticipantToken (Domain Model)
            let token = match ParticipantToken::try_from(uuid) {
                Ok(token) => token,
                Err(e) => {
                    tracing::warn!("Connection {} sent invalid token: {}", connection_id, e);
                    return current;
                }
            };

            match state
                .identify_participant_usecase
                .execute(connection_id, token, tx.clone())
                .await
            {
                Ok(outcome) => {
                    tracing::info!(
                        "Connection {} identified as participant {} ({:?})",
                        connection_id,
                        outcome.participant.id,
                        outcome.status
                    );
                    ConnectionState::Identified(outcome.participant.id)
                }
                Err(e) => {
                    tracing::warn!("Failed to identify connection {}: {}", connection_id, e);
                    current
                }
            }
        }
        (ConnectionState::Identified(participant_id), ClientMessage::Identify { .. }) => {
            tracing::debug!(
                "Connection {} is already identified as participant {}, ignoring identify",
                connection_id,
                participant_id
            );
            current
        }
        (ConnectionState::Unidentified, ClientMessage::Morse { .. }) => {
            tracing::debug!(
                "Connection {} sent morse before identify, ignoring",
                connection_id
            );
            current
        }
        (ConnectionState::Identified(participant_id), ClientMessage::Morse { state: pressed }) => {
            match state
                .relay_signal_usecase
                .execute(participant_id, pressed)
                .await
            {
                Ok(delivered) => {
                    tracing::debug!(
                        "Relayed signal {} from participant {} to {} connection(s)",
                        pressed,
                        participant_id,
                        delivered
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to relay signal from {}: {}", participant_id, e);
                }
            }
            current
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    let state_clone = state.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        let mut connection_state = ConnectionState::Unidentified;

        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on connection {}: {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text on connection {}: {}", connection_id, text);

                    let client_msg = match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(msg) => msg,
                        Err(e) => {
                            tracing::warn!(
                                "Dropping malformed message on connection {}: {}",
                                connection_id,
                                e
                            );
                            continue;
                        }
                    };

                    connection_state =
                        dispatch(&state_clone, connection_id, connection_state, &tx, client_msg)
                            .await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection {} requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push queued messages to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    match state
        .disconnect_connection_usecase
        .execute(connection_id)
        .await
    {
        Some(participant_id) => {
            tracing::info!(
                "Connection {} closed, participant {} is now offline",
                connection_id,
                participant_id
            );
        }
        None => {
            tracing::info!(
                "Connection {} closed (unidentified or superseded)",
                connection_id
            );
        }
    }
}
