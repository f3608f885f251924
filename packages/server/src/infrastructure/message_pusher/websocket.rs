//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 参加者 ID → 現在の接続（ConnectionId + `UnboundedSender`）のバインディング管理
//! - 参加者単位の送信（send）、接続単位の送信（push）、全接続への配信（broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 送信チャンネルが閉じている接続は「書き込み不可」とみなし、配信対象から外します。

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, ParticipantId, PusherChannel, RelayEvent},
    infrastructure::dto::websocket::ServerMessage,
};

/// 1 参加者に対するライブ接続
pub struct Binding {
    pub connection_id: ConnectionId,
    pub sender: PusherChannel,
}

/// バインディングのマップ（参加者 ID 順に配信される）
pub type Bindings = Arc<Mutex<BTreeMap<ParticipantId, Binding>>>;

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new(Arc::new(Mutex::new(BTreeMap::new())));
///
/// pusher.bind(participant_id, connection_id, tx).await;
/// pusher.broadcast(&event, Some(participant_id)).await?;
/// ```
pub struct WebSocketMessagePusher {
    bindings: Bindings,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(bindings: Bindings) -> Self {
        Self { bindings }
    }

    fn encode(event: &RelayEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerMessage::from(event))
            .map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn bind(
        &self,
        participant_id: ParticipantId,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Option<ConnectionId> {
        let mut bindings = self.bindings.lock().await;
        let previous = bindings.insert(
            participant_id,
            Binding {
                connection_id,
                sender,
            },
        );
        tracing::debug!(
            "Connection {} bound to participant {}",
            connection_id,
            participant_id
        );

        previous
            .map(|binding| binding.connection_id)
            .filter(|previous_id| *previous_id != connection_id)
    }

    async fn unbind(&self, connection_id: ConnectionId) -> Option<ParticipantId> {
        let mut bindings = self.bindings.lock().await;
        let participant_id = bindings
            .iter()
            .find(|(_, binding)| binding.connection_id == connection_id)
            .map(|(participant_id, _)| *participant_id)?;
        bindings.remove(&participant_id);
        tracing::debug!(
            "Connection {} unbound from participant {}",
            connection_id,
            participant_id
        );
        Some(participant_id)
    }

    async fn send(
        &self,
        participant_id: ParticipantId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let bindings = self.bindings.lock().await;

        let Some(binding) = bindings.get(&participant_id) else {
            tracing::debug!(
                "Participant {} has no live connection, dropping message",
                participant_id
            );
            return Ok(());
        };

        binding
            .sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to participant {}", participant_id);
        Ok(())
    }

    async fn push(
        &self,
        channel: &PusherChannel,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        channel
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to a single connection");
        Ok(())
    }

    async fn broadcast(
        &self,
        event: &RelayEvent,
        exclude: Option<ParticipantId>,
    ) -> Result<usize, MessagePushError> {
        let content = Self::encode(event)?;
        let bindings = self.bindings.lock().await;

        let mut delivered = 0;
        for (participant_id, binding) in bindings.iter() {
            if Some(*participant_id) == exclude {
                continue;
            }
            if binding.sender.is_closed() {
                tracing::debug!(
                    "Connection {} of participant {} is not writable, skipping",
                    binding.connection_id,
                    participant_id
                );
                continue;
            }
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = binding.sender.send(content.clone()) {
                tracing::warn!(
                    "Failed to push message to participant {}: {}",
                    participant_id,
                    e
                );
            } else {
                delivered += 1;
            }
        }

        Ok(delivered)
    }

    async fn bound_participants(&self) -> Vec<ParticipantId> {
        let bindings = self.bindings.lock().await;
        bindings.keys().copied().collect()
    }
}
