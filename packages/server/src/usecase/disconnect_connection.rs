//! UseCase: 接続切断処理
//!
//! 切断は「離脱」ではなく一時的なオフラインとして扱う。
//! バインディングを外すだけで、参加者は削除せず userLeft も配信しない。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, ParticipantId};

/// 接続切断のユースケース
pub struct DisconnectConnectionUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectConnectionUseCase {
    /// 新しい DisconnectConnectionUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続切断を実行
    ///
    /// # Returns
    ///
    /// * `Some(ParticipantId)` - この接続が現在のバインディングだったので解除した
    /// * `None` - 未識別の接続、または既に新しい接続に置き換えられていた
    pub async fn execute(&self, connection_id: ConnectionId) -> Option<ParticipantId> {
        self.message_pusher.unbind(connection_id).await
    }
}
