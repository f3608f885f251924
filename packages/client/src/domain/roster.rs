//! Known participants and their timelines.

use std::collections::BTreeMap;

use morsecast_server::domain::{Color, ParticipantId};

use super::timeline::{SignalEdge, SignalTimeline};

/// Identity assigned to this client by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIdentity {
    pub id: ParticipantId,
    pub color: Color,
}

/// One row of the display.
#[derive(Debug, Clone)]
pub struct Member {
    pub color: Color,
    pub timeline: SignalTimeline,
}

impl Member {
    fn new(color: Color) -> Self {
        Self {
            color,
            timeline: SignalTimeline::new(),
        }
    }
}

/// Participants currently shown, in id order, plus the local identity once known.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    local: Option<LocalIdentity>,
    members: BTreeMap<ParticipantId, Member>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the identity from `init`; the local participant gets its own row.
    pub fn set_local(&mut self, id: ParticipantId, color: Color) {
        self.join(id, color.clone());
        self.local = Some(LocalIdentity { id, color });
    }

    /// Add a participant. A known id keeps its timeline and only takes the new color.
    pub fn join(&mut self, id: ParticipantId, color: Color) {
        self.members
            .entry(id)
            .and_modify(|member| member.color = color.clone())
            .or_insert_with(|| Member::new(color));
    }

    /// Remove a participant. Returns `false` when it was not known.
    pub fn leave(&mut self, id: ParticipantId) -> bool {
        self.members.remove(&id).is_some()
    }

    /// Append an edge to a known participant's timeline.
    ///
    /// Returns `false` (and records nothing) for an unknown participant.
    pub fn record(
        &mut self,
        id: ParticipantId,
        edge: SignalEdge,
        now_ms: f64,
        window_ms: f64,
    ) -> bool {
        match self.members.get_mut(&id) {
            Some(member) => {
                member.timeline.append(edge, now_ms, window_ms);
                true
            }
            None => false,
        }
    }

    /// Evict stale edges of participants whose key is up. A held key keeps its press.
    pub fn prune_idle(&mut self, now_ms: f64, window_ms: f64) {
        for member in self.members.values_mut() {
            if !member.timeline.current_state() {
                member.timeline.prune(now_ms, window_ms);
            }
        }
    }

    pub fn local(&self) -> Option<&LocalIdentity> {
        self.local.as_ref()
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Member> {
        self.members.get(&id)
    }

    pub fn members(&self) -> impl Iterator<Item = (ParticipantId, &Member)> {
        self.members.iter().map(|(id, member)| (*id, member))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(value: u64) -> ParticipantId {
        ParticipantId::new(value).unwrap()
    }

    fn color(hex: &str) -> Color {
        Color::new(hex.to_string()).unwrap()
    }

    fn press(at: f64) -> SignalEdge {
        SignalEdge {
            state: true,
            timestamp: 0,
            local_arrival_ms: at,
        }
    }

    #[test]
    fn test_rejoin_keeps_timeline() {
        // テスト項目: 既知の ID への userJoined はタイムラインを保持する
        // given (前提条件):
        let mut roster = Roster::new();
        roster.join(pid(1), color("#FF6B6B"));
        assert!(roster.record(pid(1), press(10.0), 10.0, 5_000.0));

        // when (操作):
        roster.join(pid(1), color("#FF6B6B"));

        // then (期待する結果):
        assert_eq!(roster.get(pid(1)).unwrap().timeline.len(), 1);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_record_for_unknown_participant_is_ignored() {
        // テスト項目: 未知の参加者の信号は記録されない
        // given (前提条件):
        let mut roster = Roster::new();

        // when (操作):
        let recorded = roster.record(pid(9), press(0.0), 0.0, 5_000.0);

        // then (期待する結果):
        assert!(!recorded);
        assert!(roster.is_empty());
    }

    #[test]
    fn test_set_local_adds_own_row() {
        // テスト項目: init で自分自身の行が追加される
        // given (前提条件):
        let mut roster = Roster::new();
        roster.join(pid(1), color("#FF6B6B"));

        // when (操作):
        roster.set_local(pid(2), color("#4ECDC4"));

        // then (期待する結果):
        assert_eq!(roster.local().unwrap().id, pid(2));
        let ids: Vec<_> = roster.members().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![pid(1), pid(2)]);
    }

    #[test]
    fn test_leave_removes_member() {
        // テスト項目: userLeft で参加者が名簿から消える
        // given (前提条件):
        let mut roster = Roster::new();
        roster.join(pid(1), color("#FF6B6B"));

        // when (操作):
        let removed = roster.leave(pid(1));

        // then (期待する結果):
        assert!(removed);
        assert!(!roster.leave(pid(1)));
        assert!(roster.get(pid(1)).is_none());
    }

    #[test]
    fn test_prune_idle_keeps_held_press() {
        // テスト項目: 押し続けている参加者の press はウィンドウ外でも残る
        // given (前提条件):
        let mut roster = Roster::new();
        roster.join(pid(1), color("#FF6B6B"));
        roster.join(pid(2), color("#4ECDC4"));
        roster.record(pid(1), press(0.0), 0.0, 5_000.0);
        roster.record(
            pid(2),
            SignalEdge {
                state: false,
                timestamp: 0,
                local_arrival_ms: 0.0,
            },
            0.0,
            5_000.0,
        );

        // when (操作):
        roster.prune_idle(10_000.0, 5_000.0);

        // then (期待する結果):
        assert_eq!(roster.get(pid(1)).unwrap().timeline.len(), 1);
        assert!(roster.get(pid(2)).unwrap().timeline.is_empty());
    }
}
