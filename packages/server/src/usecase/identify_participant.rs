//! UseCase: 参加者識別処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - IdentifyParticipantUseCase::execute() メソッド
//! - トークン解決 → 接続のバインド → init 送信 → 参加通知 → 名簿の再送
//!
//! ### なぜこのテストが必要か
//! - 初回識別でのみ他の参加者に userJoined が配信されることを保証
//! - 再接続（同じトークン）では ID・色が変わらず、他の参加者に通知が飛ばないことを保証
//! - 新しい接続が既存参加者の名簿を受け取れることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加者の識別
//! - 正常系：既存参加者の再接続（古い接続の置き換え）
//! - エッジケース：最初の参加者（名簿も通知対象も空）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, Participant, ParticipantRegistry, ParticipantToken,
    PusherChannel, RelayEvent, ResolveStatus,
};

use super::error::IdentifyError;

/// 識別の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifyOutcome {
    pub participant: Participant,
    pub status: ResolveStatus,
    /// 置き換えられた（黙って切り離された）以前の接続
    pub superseded: Option<ConnectionId>,
}

/// 参加者識別のユースケース
pub struct IdentifyParticipantUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn ParticipantRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl IdentifyParticipantUseCase {
    /// 新しい IdentifyParticipantUseCase を作成
    pub fn new(
        registry: Arc<dyn ParticipantRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 参加者識別を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 識別を要求した接続
    /// * `token` - クライアントが提示した永続トークン（Domain Model）
    /// * `sender` - その接続へのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(IdentifyOutcome)` - 識別成功
    /// * `Err(IdentifyError)` - init / 名簿の送信に失敗（接続が既に閉じている）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        token: ParticipantToken,
        sender: PusherChannel,
    ) -> Result<IdentifyOutcome, IdentifyError> {
        // 1. トークンを参加者に解決
        let (participant, status) = self.registry.resolve(token).await;

        // 2. 接続をバインド（同じ参加者の古い接続は置き換え）
        //    init と名簿はバインディングではなくこの接続のチャンネルに直接送る
        let channel = sender.clone();
        let superseded = self
            .message_pusher
            .bind(participant.id, connection_id, sender)
            .await;
        if let Some(previous) = superseded {
            tracing::info!(
                "Connection {} superseded by {} for participant {}",
                previous,
                connection_id,
                participant.id
            );
        }

        // 3. 識別した接続に init を送信
        self.message_pusher
            .push(&channel, &RelayEvent::Init(participant.clone()))
            .await?;

        // 4. 既存の参加者を userJoined として再送（この接続のみ）
        for other in self.registry.list().await {
            if other.id == participant.id {
                continue;
            }
            self.message_pusher
                .push(&channel, &RelayEvent::ParticipantJoined(other))
                .await?;
        }

        // 5. 初回識別のときだけ他の接続に参加を通知
        if status == ResolveStatus::Created {
            let notified = self
                .message_pusher
                .broadcast(
                    &RelayEvent::ParticipantJoined(participant.clone()),
                    Some(participant.id),
                )
                .await?;
            tracing::info!(
                "Broadcasted userJoined for participant {} to {} connection(s)",
                participant.id,
                notified
            );
        }

        Ok(IdentifyOutcome {
            participant,
            status,
            superseded,
        })
    }
}
