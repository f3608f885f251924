//! Local clock advanced by frame deltas.

use std::time::{Duration, Instant};

/// Monotonic local time in milliseconds, advanced once per rendered frame.
///
/// Every timeline position is measured against this clock rather than
/// against server timestamps, so the waveform scrolls at the local frame rate.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    now_ms: f64,
    last_frame: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current local time in milliseconds since the first frame.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Advance by an explicit delta.
    pub fn advance(&mut self, delta: Duration) {
        self.now_ms += delta.as_secs_f64() * 1000.0;
    }

    /// Advance to the frame observed at `at`. The first frame only records
    /// the reference instant.
    pub fn tick(&mut self, at: Instant) -> f64 {
        if let Some(last) = self.last_frame {
            self.advance(at.saturating_duration_since(last));
        }
        self.last_frame = Some(at);
        self.now_ms
    }
}
