//! Client execution logic with reconnection support.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use ratatui::DefaultTerminal;
use tokio::{sync::mpsc, time::MissedTickBehavior};

use crate::{
    app::{App, ConnectionStatus},
    audio::ToneGenerator,
    error::ClientError,
    input::{self, KeyAction, KeyMode},
    reconnect::{RECONNECT_DELAY, Reconnector},
    render,
    session::{Session, SessionEvent, SessionEventKind},
};

/// 60 frames per second
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Client settings resolved from the command line
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub url: String,
    /// Durable participant token, reused on every reconnection
    pub token: String,
    pub px_per_second: f64,
}

/// Run the terminal client until the user quits.
///
/// The terminal is restored on every exit path.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let mut terminal = ratatui::try_init()?;
    let key_mode = input::enable_key_reporting();

    let result = run_loop(&mut terminal, config, key_mode).await;

    input::disable_key_reporting(key_mode);
    ratatui::restore();

    result
}

fn open_tone_generator() -> ToneGenerator {
    #[cfg(feature = "audio")]
    {
        match ToneGenerator::with_default_device() {
            Ok(tones) => return tones,
            Err(e) => tracing::warn!("Falling back to silent output: {}", e),
        }
    }
    #[cfg(not(feature = "audio"))]
    tracing::warn!("Built without the `audio` feature, tones are silent");
    ToneGenerator::null()
}

fn relay_key(app: &mut App, session: Option<&Session>, down: bool) {
    let Some(message) = app.set_key(down) else {
        return;
    };
    match session {
        Some(session) if app.status() == ConnectionStatus::Connected => {
            if !session.send(message) {
                tracing::debug!("Session closed, key edge not relayed");
            }
        }
        _ => tracing::debug!("Not connected, key edge kept local"),
    }
}

async fn run_loop(
    terminal: &mut DefaultTerminal,
    config: ClientConfig,
    key_mode: KeyMode,
) -> Result<(), ClientError> {
    let mut app = App::new(config.px_per_second, open_tone_generator(), key_mode);

    // Keyboard events come from a blocking thread
    let running = Arc::new(AtomicBool::new(true));
    let (key_tx, mut key_rx) = mpsc::unbounded_channel();
    let input_thread = input::spawn_input_thread(key_mode, key_tx, running.clone());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<SessionEvent>();
    let mut reconnector = Reconnector::new(RECONNECT_DELAY);
    let mut session = Some(Session::spawn(
        reconnector.generation(),
        config.url.clone(),
        config.token.clone(),
        event_tx.clone(),
    ));

    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            _ = frames.tick() => {
                let size = match terminal.size() {
                    Ok(size) => size,
                    Err(e) => break Err(e.into()),
                };
                app.on_frame(Instant::now(), render::wave_width(size.width));
                if let Err(e) = terminal.draw(|frame| render::draw(frame, &app)) {
                    break Err(e.into());
                }
            }
            Some(event) = event_rx.recv() => {
                if !reconnector.accepts(event.generation) {
                    tracing::debug!("Ignoring event from replaced session {}", event.generation);
                    continue;
                }
                match event.kind {
                    SessionEventKind::Connected => {
                        reconnector.cancel();
                        app.set_status(ConnectionStatus::Connected);
                    }
                    SessionEventKind::Message(message) => app.on_server_message(message),
                    SessionEventKind::Disconnected(e) => {
                        tracing::warn!("{}", e);
                        tracing::info!("Reconnecting in {} ms", RECONNECT_DELAY.as_millis());
                        session = None;
                        app.set_status(ConnectionStatus::Disconnected);
                        reconnector.arm();
                    }
                }
            }
            action = key_rx.recv() => match action {
                Some(KeyAction::Press) => relay_key(&mut app, session.as_ref(), true),
                Some(KeyAction::Release) => relay_key(&mut app, session.as_ref(), false),
                Some(KeyAction::Quit) => break Ok(()),
                None => {
                    tracing::warn!("Input thread stopped");
                    break Ok(());
                }
            },
            generation = reconnector.wait(), if reconnector.is_armed() => {
                app.set_status(ConnectionStatus::Connecting);
                session = Some(Session::spawn(
                    generation,
                    config.url.clone(),
                    config.token.clone(),
                    event_tx.clone(),
                ));
            }
        }
    };

    running.store(false, Ordering::SeqCst);
    drop(session);
    match tokio::task::spawn_blocking(move || input_thread.join()).await {
        Ok(Ok(Err(e))) => tracing::warn!("Input thread failed: {}", e),
        Ok(Err(_)) | Err(_) => tracing::warn!("Input thread panicked"),
        Ok(Ok(Ok(()))) => {}
    }
    tracing::info!("Client stopped");

    result
}
