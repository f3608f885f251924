//! Domain factories for creating identifiers and derived attributes.

use std::num::NonZeroU64;

use uuid::Uuid;

use super::value_object::{Color, ConnectionId, ParticipantId};

/// Fixed display palette; participants cycle through it in id order.
pub const PALETTE: [&str; 7] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FECA57", "#FF9FF3", "#54A0FF",
];

/// Factory for generating ConnectionId instances.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    pub fn generate() -> ConnectionId {
        ConnectionId::new(Uuid::new_v4())
    }
}

/// Deterministic mapping from participant id to display color.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorPalette;

impl ColorPalette {
    /// `palette[(id - 1) mod len(palette)]`
    pub fn color_for(&self, id: ParticipantId) -> Color {
        let index = ((id.value() - 1) % PALETTE.len() as u64) as usize;
        Color::from_palette(PALETTE[index])
    }
}

/// Monotonic id allocator: 1, 2, 3, ... with no gaps and no reuse.
#[derive(Debug, Clone)]
pub struct ParticipantIdSequence {
    next: NonZeroU64,
}

impl ParticipantIdSequence {
    pub fn new() -> Self {
        Self {
            next: NonZeroU64::MIN,
        }
    }

    /// Hand out the next id.
    pub fn next_id(&mut self) -> ParticipantId {
        let id = ParticipantId::from(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

impl Default for ParticipantIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_factory_generate_uniqueness() {
        // テスト項目: ConnectionIdFactory::generate() は毎回異なる ID を生成する
        // when (操作):
        let id1 = ConnectionIdFactory::generate();
        let id2 = ConnectionIdFactory::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
        assert_eq!(id1.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn test_color_palette_cycles_by_id() {
        // テスト項目: 色は (id - 1) mod 7 でパレットから選ばれ、一巡すると先頭に戻る
        // given (前提条件):
        let palette = ColorPalette;

        // when (操作):
        let first = palette.color_for(ParticipantId::new(1).unwrap());
        let seventh = palette.color_for(ParticipantId::new(7).unwrap());
        let eighth = palette.color_for(ParticipantId::new(8).unwrap());

        // then (期待する結果):
        assert_eq!(first.as_str(), "#FF6B6B");
        assert_eq!(seventh.as_str(), "#54A0FF");
        assert_eq!(eighth, first);
    }

    #[test]
    fn test_participant_id_sequence_is_gapless() {
        // テスト項目: ID は 1 から欠番なく昇順に払い出される
        // given (前提条件):
        let mut sequence = ParticipantIdSequence::new();

        // when (操作):
        let ids: Vec<u64> = (0..5).map(|_| sequence.next_id().value()).collect();

        // then (期待する結果):
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
