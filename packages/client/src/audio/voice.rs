//! Single participant tone voice.

use std::f32::consts::TAU;

use super::RAMP_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceState {
    #[default]
    Silent,
    Sounding,
}

/// Sine oscillator with a linear attack/release envelope.
///
/// The state flips immediately on a key edge; the gain then ramps towards
/// the new target over [`RAMP_MS`].
#[derive(Debug, Clone)]
pub struct ToneVoice {
    frequency: f32,
    sample_rate: u32,
    phase: f32,
    gain: f32,
    gain_step: f32,
    state: VoiceState,
}

impl ToneVoice {
    pub fn new(frequency: f32, sample_rate: u32) -> Self {
        let mut voice = Self {
            frequency,
            sample_rate,
            phase: 0.0,
            gain: 0.0,
            gain_step: 0.0,
            state: VoiceState::Silent,
        };
        voice.set_sample_rate(sample_rate);
        voice
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate.max(1);
        let ramp_samples = (RAMP_MS / 1000.0 * self.sample_rate as f32).max(1.0);
        self.gain_step = 1.0 / ramp_samples;
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// `SILENT -> SOUNDING` on press, `SOUNDING -> SILENT` on release.
    pub fn set_on(&mut self, on: bool) {
        self.state = if on {
            VoiceState::Sounding
        } else {
            VoiceState::Silent
        };
    }

    /// Silent and fully ramped down.
    pub fn is_idle(&self) -> bool {
        self.state == VoiceState::Silent && self.gain <= 0.0
    }

    /// Produce the next mono sample in `[-1, 1]`.
    pub fn next_sample(&mut self) -> f32 {
        match self.state {
            VoiceState::Sounding => self.gain = (self.gain + self.gain_step).min(1.0),
            VoiceState::Silent => self.gain = (self.gain - self.gain_step).max(0.0),
        }

        if self.gain <= 0.0 {
            // restart from a zero crossing on the next attack
            self.phase = 0.0;
            return 0.0;
        }

        let sample = (self.phase * TAU).sin() * self.gain;
        self.phase = (self.phase + self.frequency / self.sample_rate as f32).fract();
        sample
    }
}
