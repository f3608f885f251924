//! InMemory Participant Registry 実装
//!
//! ドメイン層が定義する ParticipantRegistry trait の具体的な実装。
//! HashMap / BTreeMap をインメモリ DB として使用します。
//! プロセスの再起動でのみリセットされ、参加者の削除・期限切れはありません。

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use morsecast_shared::time::Clock;

use crate::domain::{
    ColorPalette, Participant, ParticipantId, ParticipantIdSequence, ParticipantRegistry,
    ParticipantToken, ResolveStatus, Timestamp,
};

#[derive(Default)]
struct RegistryState {
    /// token → id
    ids_by_token: HashMap<ParticipantToken, ParticipantId>,
    /// id → participant（ID 順）
    participants: BTreeMap<ParticipantId, Participant>,
    sequence: ParticipantIdSequence,
}

/// インメモリ Participant Registry 実装
///
/// マルチスレッドランタイム上で使うため、状態は 1 つの Mutex で保護します。
/// resolve は「検索 → 採番 → 登録」を 1 回のロック内で行います。
pub struct InMemoryParticipantRegistry {
    state: Mutex<RegistryState>,
    palette: ColorPalette,
    clock: Arc<dyn Clock>,
}

impl InMemoryParticipantRegistry {
    /// 新しい InMemoryParticipantRegistry を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            palette: ColorPalette,
            clock,
        }
    }
}

#[async_trait]
impl ParticipantRegistry for InMemoryParticipantRegistry {
    async fn resolve(&self, token: ParticipantToken) -> (Participant, ResolveStatus) {
        let mut state = self.state.lock().await;

        if let Some(participant) = state
            .ids_by_token
            .get(&token)
            .and_then(|id| state.participants.get(id))
        {
            return (participant.clone(), ResolveStatus::Existing);
        }

        let id = state.sequence.next_id();
        let participant = Participant::new(
            id,
            token.clone(),
            self.palette.color_for(id),
            Timestamp::new(self.clock.now_millis()),
        );
        state.ids_by_token.insert(token, id);
        state.participants.insert(id, participant.clone());
        tracing::debug!(
            "Registered participant {} with color {}",
            id,
            participant.color
        );

        (participant, ResolveStatus::Created)
    }

    async fn find(&self, id: ParticipantId) -> Option<Participant> {
        let state = self.state.lock().await;
        state.participants.get(&id).cloned()
    }

    async fn list(&self) -> Vec<Participant> {
        let state = self.state.lock().await;
        state.participants.values().cloned().collect()
    }

    async fn count(&self) -> usize {
        let state = self.state.lock().await;
        state.participants.len()
    }
}
