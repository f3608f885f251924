//! Tone generation.
//!
//! Each participant owns one sine voice at a fixed frequency. A voice is a
//! two-state machine (`Silent`, `Sounding`) whose gain follows a short linear
//! envelope so that keying never clicks. The [`ToneBank`] mixes every voice
//! into interleaved f32 frames; an output backend pulls from it.

mod bank;
#[cfg(feature = "audio")]
mod device;
mod voice;

use std::sync::{Arc, Mutex, PoisonError};

use morsecast_server::domain::ParticipantId;

pub use bank::ToneBank;
pub use voice::{ToneVoice, VoiceState};

#[cfg(feature = "audio")]
pub use device::CpalOutput;

/// Lowest participant tone, in Hz.
pub const BASE_FREQUENCY_HZ: f32 = 550.0;
/// Spacing between adjacent participant tones, in Hz.
pub const FREQUENCY_STEP_HZ: f32 = 55.0;
/// Number of distinct tones before frequencies repeat.
pub const DISTINCT_TONES: u64 = 8;
/// Attack and release ramp length, in milliseconds.
pub const RAMP_MS: f32 = 10.0;
/// Sample rate assumed when no device dictates one.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// `550 Hz + ((id - 1) mod 8) * 55 Hz`
pub fn tone_frequency(id: ParticipantId) -> f32 {
    let slot = (id.value() - 1) % DISTINCT_TONES;
    BASE_FREQUENCY_HZ + slot as f32 * FREQUENCY_STEP_HZ
}

/// Bank shared between the app loop and the audio callback.
pub type SharedToneBank = Arc<Mutex<ToneBank>>;

enum Output {
    /// Voices change state but nothing is played
    Null,
    /// Held only to keep the device stream running
    #[cfg(feature = "audio")]
    Cpal { _stream: CpalOutput },
}

/// Front end used by the app loop: key participants on and off.
pub struct ToneGenerator {
    bank: SharedToneBank,
    output: Output,
}

impl ToneGenerator {
    /// Generator with no audio device attached.
    pub fn null() -> Self {
        Self {
            bank: Arc::new(Mutex::new(ToneBank::new(DEFAULT_SAMPLE_RATE))),
            output: Output::Null,
        }
    }

    /// Generator playing through the default output device.
    ///
    /// # Errors
    ///
    /// Returns an error if no device is available or the stream cannot start.
    #[cfg(feature = "audio")]
    pub fn with_default_device() -> Result<Self, crate::error::ClientError> {
        let bank = Arc::new(Mutex::new(ToneBank::new(DEFAULT_SAMPLE_RATE)));
        let output = CpalOutput::start(bank.clone())?;
        Ok(Self {
            bank,
            output: Output::Cpal { _stream: output },
        })
    }

    /// Whether an audio device is attached.
    pub fn is_audible(&self) -> bool {
        !matches!(self.output, Output::Null)
    }

    /// Drive a participant's voice from its latest edge.
    pub fn set_signal(&self, id: ParticipantId, on: bool) {
        self.with_bank(|bank| bank.set_signal(id, on));
    }

    /// Fade out and drop a participant's voice.
    pub fn remove(&self, id: ParticipantId) {
        self.with_bank(|bank| bank.remove(id));
    }

    pub fn voice_state(&self, id: ParticipantId) -> VoiceState {
        self.with_bank(|bank| bank.voice_state(id))
    }

    fn with_bank<T>(&self, f: impl FnOnce(&mut ToneBank) -> T) -> T {
        let mut bank = self.bank.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut bank)
    }
}
