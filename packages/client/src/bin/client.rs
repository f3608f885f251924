//! Terminal morse key client.
//!
//! Connects to a morsecast relay, keys your signal with the space bar and
//! shows every participant's signal as a scrolling waveform. Reconnects every
//! 3 seconds after the connection drops, keeping the same identity.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin morsecast-client
//! cargo run --bin morsecast-client -- --url ws://127.0.0.1:3000/ws --token my-key
//! cargo run --features audio --bin morsecast-client
//! ```

use std::path::PathBuf;

use clap::Parser;
use uuid::Uuid;

use morsecast_client::{ClientConfig, run_client};
use morsecast_shared::logger::setup_file_logger;

#[derive(Parser, Debug)]
#[command(name = "morsecast-client")]
#[command(about = "Terminal morse key client for a morsecast relay", long_about = None)]
#[cfg_attr(
    not(feature = "audio"),
    command(
        after_help = "Audio: this build has no sound output and tones stay silent. Rebuild with `--features audio` to hear them."
    )
)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3000/ws")]
    url: String,

    /// Durable participant token (a fresh one is generated when omitted)
    #[arg(short = 't', long)]
    token: Option<String>,

    /// Waveform scroll speed in columns per second
    #[arg(long, default_value_t = 20.0)]
    px_per_second: f64,

    /// Log file (the terminal is taken over by the UI)
    #[arg(long, default_value = "morsecast-client.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    if let Err(e) = setup_file_logger(env!("CARGO_BIN_NAME"), "info", &args.log_file) {
        eprintln!("Failed to open log file {}: {}", args.log_file.display(), e);
        std::process::exit(1);
    }

    if args.px_per_second <= 0.0 {
        eprintln!("--px-per-second must be positive");
        std::process::exit(1);
    }

    let token = args.token.unwrap_or_else(|| Uuid::new_v4().to_string());
    tracing::info!("Using participant token {}", token);

    let config = ClientConfig {
        url: args.url,
        token,
        px_per_second: args.px_per_second,
    };

    // Run the client
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        eprintln!("Client error: {}", e);
        std::process::exit(1);
    }
}
