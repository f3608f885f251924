//! UseCase: 参加者一覧取得

use std::sync::Arc;

use crate::domain::{MessagePusher, Participant, ParticipantRegistry};

/// 参加者と、その時点でライブ接続があるかどうか
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantPresence {
    pub participant: Participant,
    pub online: bool,
}

/// 参加者一覧取得のユースケース
pub struct ListParticipantsUseCase {
    registry: Arc<dyn ParticipantRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ListParticipantsUseCase {
    pub fn new(
        registry: Arc<dyn ParticipantRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 登録済みの全参加者を ID 順で返す
    pub async fn execute(&self) -> Vec<ParticipantPresence> {
        let online = self.message_pusher.bound_participants().await;
        self.registry
            .list()
            .await
            .into_iter()
            .map(|participant| ParticipantPresence {
                online: online.contains(&participant.id),
                participant,
            })
            .collect()
    }
}
