//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{
    DisconnectConnectionUseCase, IdentifyParticipantUseCase, ListParticipantsUseCase,
    RelaySignalUseCase,
};

use super::{
    handler::{health_check, list_participants, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Morse relay server
///
/// This struct encapsulates the server wiring and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     identify_participant_usecase,
///     relay_signal_usecase,
///     disconnect_connection_usecase,
///     list_participants_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 3000).await?;
/// ```
pub struct Server {
    /// IdentifyParticipantUseCase（参加者識別のユースケース）
    identify_participant_usecase: Arc<IdentifyParticipantUseCase>,
    /// RelaySignalUseCase（信号中継のユースケース）
    relay_signal_usecase: Arc<RelaySignalUseCase>,
    /// DisconnectConnectionUseCase（接続切断のユースケース）
    disconnect_connection_usecase: Arc<DisconnectConnectionUseCase>,
    /// ListParticipantsUseCase（参加者一覧取得のユースケース）
    list_participants_usecase: Arc<ListParticipantsUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        identify_participant_usecase: Arc<IdentifyParticipantUseCase>,
        relay_signal_usecase: Arc<RelaySignalUseCase>,
        disconnect_connection_usecase: Arc<DisconnectConnectionUseCase>,
        list_participants_usecase: Arc<ListParticipantsUseCase>,
    ) -> Self {
        Self {
            identify_participant_usecase,
            relay_signal_usecase,
            disconnect_connection_usecase,
            list_participants_usecase,
        }
    }

    /// Build the router with every endpoint mounted
    pub fn into_router(self) -> Router {
        let app_state = Arc::new(AppState {
            identify_participant_usecase: self.identify_participant_usecase,
            relay_signal_usecase: self.relay_signal_usecase,
            disconnect_connection_usecase: self.disconnect_connection_usecase,
            list_participants_usecase: self.list_participants_usecase,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/participants", get(list_participants))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let app = self.into_router();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Run the relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 3000)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Morse relay server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await?;

        Ok(())
    }
}
