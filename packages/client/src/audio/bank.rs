//! Mixer over all participant voices.

use std::collections::BTreeMap;

use morsecast_server::domain::ParticipantId;

use super::{ToneVoice, VoiceState, tone_frequency};

/// Per-voice amplitude in the mix; eight simultaneous voices stay below full scale.
const VOICE_AMPLITUDE: f32 = 0.12;

#[derive(Debug, Clone)]
struct Slot {
    voice: ToneVoice,
    /// Drop once the release ramp has finished
    retired: bool,
}

#[derive(Debug, Clone)]
pub struct ToneBank {
    sample_rate: u32,
    slots: BTreeMap<ParticipantId, Slot>,
}

impl ToneBank {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            slots: BTreeMap::new(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Adopt the device rate. Existing voices keep their phase.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
        for slot in self.slots.values_mut() {
            slot.voice.set_sample_rate(sample_rate);
        }
    }

    pub fn set_signal(&mut self, id: ParticipantId, on: bool) {
        let sample_rate = self.sample_rate;
        let slot = self.slots.entry(id).or_insert_with(|| Slot {
            voice: ToneVoice::new(tone_frequency(id), sample_rate),
            retired: false,
        });
        slot.retired = false;
        slot.voice.set_on(on);
    }

    /// Release the voice and forget it after the ramp.
    pub fn remove(&mut self, id: ParticipantId) {
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.voice.set_on(false);
            slot.retired = true;
        }
    }

    pub fn voice_state(&self, id: ParticipantId) -> VoiceState {
        self.slots
            .get(&id)
            .map(|slot| slot.voice.state())
            .unwrap_or_default()
    }

    pub fn voice_count(&self) -> usize {
        self.slots.len()
    }

    /// Fill interleaved `out` with `channels` copies of the mono mix.
    pub fn fill(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in out.chunks_mut(channels) {
            let mixed: f32 = self
                .slots
                .values_mut()
                .map(|slot| slot.voice.next_sample() * VOICE_AMPLITUDE)
                .sum();
            let sample = mixed.clamp(-1.0, 1.0);
            for channel in frame.iter_mut() {
                *channel = sample;
            }
        }
        self.slots
            .retain(|_, slot| !(slot.retired && slot.voice.is_idle()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(value: u64) -> ParticipantId {
        ParticipantId::new(value).unwrap()
    }

    #[test]
    fn test_silent_bank_outputs_zeros() {
        // テスト項目: 何も鳴っていなければ無音を出力する
        // given (前提条件):
        let mut bank = ToneBank::new(48_000);
        bank.set_signal(pid(1), false);
        let mut out = vec![1.0; 256];

        // when (操作):
        bank.fill(&mut out, 2);

        // then (期待する結果):
        assert!(out.iter().all(|sample| *sample == 0.0));
    }

    #[test]
    fn test_sounding_voice_writes_same_sample_to_every_channel() {
        // テスト項目: 鳴っている声はステレオの両チャンネルに同じ値で書き込まれる
        // given (前提条件):
        let mut bank = ToneBank::new(48_000);
        bank.set_signal(pid(1), true);
        let mut out = vec![0.0; 2 * 2_000];

        // when (操作):
        bank.fill(&mut out, 2);

        // then (期待する結果):
        assert!(out.iter().any(|sample| *sample != 0.0));
        for frame in out.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
    }

    #[test]
    fn test_removed_voice_is_dropped_after_release() {
        // テスト項目: userLeft で外した声は、減衰が終わった後に破棄される
        // given (前提条件):
        let mut bank = ToneBank::new(48_000);
        bank.set_signal(pid(1), true);
        let mut out = vec![0.0; 1_000];
        bank.fill(&mut out, 1);

        // when (操作):
        bank.remove(pid(1));

        // then (期待する結果):
        assert_eq!(bank.voice_state(pid(1)), VoiceState::Silent);
        assert_eq!(bank.voice_count(), 1);
        bank.fill(&mut out, 1);
        assert_eq!(bank.voice_count(), 0);
    }
}
