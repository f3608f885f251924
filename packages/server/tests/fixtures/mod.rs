//! Test fixtures for integration tests.

#![allow(dead_code)]

use std::{collections::BTreeMap, net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::{net::TcpStream, sync::Mutex, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use morsecast_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryParticipantRegistry,
    },
    ui::Server,
    usecase::{
        DisconnectConnectionUseCase, IdentifyParticipantUseCase, ListParticipantsUseCase,
        RelaySignalUseCase,
    },
};
use morsecast_shared::time::{Clock, SystemClock};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE_WINDOW: Duration = Duration::from_millis(300);

/// In-process relay server bound to an ephemeral port
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a fresh server with an empty registry
    pub async fn start() -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let registry = Arc::new(InMemoryParticipantRegistry::new(clock.clone()));
        let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            BTreeMap::new(),
        ))));

        let server = Server::new(
            Arc::new(IdentifyParticipantUseCase::new(
                registry.clone(),
                message_pusher.clone(),
            )),
            Arc::new(RelaySignalUseCase::new(message_pusher.clone(), clock)),
            Arc::new(DisconnectConnectionUseCase::new(message_pusher.clone())),
            Arc::new(ListParticipantsUseCase::new(registry, message_pusher)),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let router = server.into_router();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server failed");
        });

        TestServer { addr, handle }
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Get the HTTP base URL for this server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Thin WebSocket client speaking the JSON protocol
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Open a connection without identifying
    pub async fn connect(url: &str) -> Self {
        let (stream, _) = connect_async(url).await.expect("Failed to connect");
        TestClient { stream }
    }

    /// Open a connection, identify with `token`, and return the init message
    pub async fn identify(url: &str, token: &str) -> (Self, Value) {
        let mut client = Self::connect(url).await;
        client
            .send_json(serde_json::json!({"type": "identify", "uuid": token}))
            .await;
        let init = client.recv_json().await;
        assert_eq!(init["type"], "init", "first message must be init: {init}");
        (client, init)
    }

    pub async fn send_text(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send");
    }

    pub async fn send_json(&mut self, value: Value) {
        self.send_text(&value.to_string()).await;
    }

    pub async fn send_morse(&mut self, state: bool) {
        self.send_json(serde_json::json!({"type": "morse", "state": state}))
            .await;
    }

    /// Wait for the next text frame and decode it as JSON
    pub async fn recv_json(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for message")
                .expect("Connection closed")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("Invalid JSON from server");
            }
        }
    }

    /// Assert that no text frame arrives within a short window
    pub async fn expect_silence(&mut self) {
        let deadline = tokio::time::Instant::now() + SILENCE_WINDOW;
        loop {
            match tokio::time::timeout_at(deadline, self.stream.next()).await {
                Err(_) => return,
                Ok(Some(Ok(Message::Text(text)))) => {
                    panic!("Expected silence, received: {}", text.as_str())
                }
                Ok(Some(Ok(_))) => continue,
                Ok(_) => return,
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
