//! Client application state.
//!
//! Owns everything the frame loop draws and sounds. All mutation happens
//! through the handlers below, called from a single task, so timeline
//! updates and rendering never interleave.

use std::time::Instant;

use morsecast_server::{
    domain::{Color, ParticipantId},
    infrastructure::dto::websocket::{ClientMessage, ServerMessage},
};
use morsecast_shared::time::get_epoch_millis;

use crate::{
    audio::ToneGenerator,
    domain::{FrameClock, Roster, SignalEdge},
    input::KeyMode,
    render::{DEFAULT_WAVE_WIDTH, Viewport},
};

/// Transport state shown in the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
}

pub struct App {
    roster: Roster,
    clock: FrameClock,
    viewport: Viewport,
    px_per_second: f64,
    tones: ToneGenerator,
    status: ConnectionStatus,
    key_mode: KeyMode,
    key_down: bool,
}

impl App {
    pub fn new(px_per_second: f64, tones: ToneGenerator, key_mode: KeyMode) -> Self {
        Self {
            roster: Roster::new(),
            clock: FrameClock::new(),
            viewport: Viewport::new(DEFAULT_WAVE_WIDTH, px_per_second),
            px_per_second,
            tones,
            status: ConnectionStatus::Connecting,
            key_mode,
            key_down: false,
        }
    }

    /// Advance local time for a frame drawn `wave_width` columns wide.
    pub fn on_frame(&mut self, at: Instant, wave_width: u16) {
        let now_ms = self.clock.tick(at);
        if wave_width != self.viewport.width {
            self.viewport = Viewport::new(wave_width, self.px_per_second);
        }
        self.roster
            .prune_idle(now_ms, self.viewport.visible_duration_ms());
    }

    pub fn on_server_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Init { user_id, color } => {
                let Some((id, color)) = participant(user_id, color) else {
                    return;
                };
                tracing::info!("Identified as participant {} ({})", id, color);
                self.roster.set_local(id, color);
            }
            ServerMessage::UserJoined { user_id, color } => {
                let Some((id, color)) = participant(user_id, color) else {
                    return;
                };
                tracing::info!("Participant {} joined ({})", id, color);
                self.roster.join(id, color);
            }
            ServerMessage::UserLeft { user_id } => {
                let Ok(id) = ParticipantId::new(user_id) else {
                    tracing::warn!("Ignoring userLeft with invalid id {}", user_id);
                    return;
                };
                if self.roster.leave(id) {
                    tracing::info!("Participant {} left", id);
                }
                self.tones.remove(id);
            }
            ServerMessage::Morse {
                user_id,
                state,
                timestamp,
            } => {
                let Ok(id) = ParticipantId::new(user_id) else {
                    tracing::warn!("Ignoring morse with invalid id {}", user_id);
                    return;
                };
                self.apply_edge(id, state, timestamp);
            }
        }
    }

    /// Local key edge. Returns the message to relay when the key state changed.
    pub fn set_key(&mut self, down: bool) -> Option<ClientMessage> {
        if self.key_down == down {
            return None;
        }
        self.key_down = down;

        // the relay never echoes our own edges back, so record them here
        if let Some(local_id) = self.roster.local().map(|local| local.id) {
            self.apply_edge(local_id, down, get_epoch_millis());
        }

        Some(ClientMessage::Morse { state: down })
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        if self.status != status {
            tracing::info!("Connection status: {:?} -> {:?}", self.status, status);
        }
        self.status = status;
    }

    fn apply_edge(&mut self, id: ParticipantId, state: bool, timestamp: i64) {
        let edge = SignalEdge {
            state,
            timestamp,
            local_arrival_ms: self.clock.now_ms(),
        };
        let recorded = self.roster.record(
            id,
            edge,
            self.clock.now_ms(),
            self.viewport.visible_duration_ms(),
        );
        if recorded {
            self.tones.set_signal(id, state);
        } else {
            tracing::debug!("Ignoring signal from unknown participant {}", id);
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn key_mode(&self) -> KeyMode {
        self.key_mode
    }

    pub fn key_down(&self) -> bool {
        self.key_down
    }

    pub fn tones(&self) -> &ToneGenerator {
        &self.tones
    }
}

fn participant(user_id: u64, color: String) -> Option<(ParticipantId, Color)> {
    let id = match ParticipantId::new(user_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Ignoring participant with invalid id {}: {}", user_id, e);
            return None;
        }
    };
    match Color::new(color) {
        Ok(color) => Some((id, color)),
        Err(e) => {
            tracing::warn!("Ignoring participant {} with invalid color: {}", id, e);
            None
        }
    }
}
