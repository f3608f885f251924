//! Morse key relay server.
//!
//! Accepts WebSocket connections, identifies each one by a durable participant
//! token and relays key on/off edges to every other connected participant.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin morsecast-server
//! cargo run --bin morsecast-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{collections::BTreeMap, sync::Arc};

use clap::Parser;
use tokio::sync::Mutex;

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
use morsecast_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "morsecast-server")]
#[command(about = "WebSocket relay server for shared morse keying", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 1. Create Registry (in-memory, lives for the process lifetime)
    let registry = Arc::new(InMemoryParticipantRegistry::new(clock.clone()));

    // 2. Create MessagePusher (WebSocket implementation)
    let bindings = Arc::new(Mutex::new(BTreeMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(bindings));

    // 3. Create UseCases
    let identify_participant_usecase = Arc::new(IdentifyParticipantUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let relay_signal_usecase = Arc::new(RelaySignalUseCase::new(
        message_pusher.clone(),
        clock.clone(),
    ));
    let disconnect_connection_usecase =
        Arc::new(DisconnectConnectionUseCase::new(message_pusher.clone()));
    let list_participants_usecase = Arc::new(ListParticipantsUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));

    // 4. Create and run the server
    let server = Server::new(
        identify_participant_usecase,
        relay_signal_usecase,
        disconnect_connection_usecase,
        list_participants_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
