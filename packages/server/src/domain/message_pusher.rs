//! MessagePusher trait 定義
//!
//! 参加者とライブ接続の対応（バインディング）を管理し、
//! バインドされた接続へイベントを配信するためのインターフェース。
//!
//! ## 設計ノート
//!
//! - 1 参加者につきアクティブな接続は高々 1 つ
//! - 新しい接続をバインドすると、同じ参加者の古いバインディングは黙って外れる
//!   （古い接続自体は閉じない）
//! - バインディングが無くなっても参加者は削除されない（一時的なオフライン扱い）

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, ParticipantId, RelayEvent};

/// 接続ごとの送信チャンネル
///
/// 受信側は UI 層の pusher loop が WebSocket に書き出す。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Connection Multiplexer + Fan-out の抽象化
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// `connection_id` を `participant_id` の現在の接続として登録する
    ///
    /// 既に別の接続がバインドされていた場合はそれを外し、その接続 ID を返す。
    async fn bind(
        &self,
        participant_id: ParticipantId,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Option<ConnectionId>;

    /// 接続のクローズ時にバインディングを解除する
    ///
    /// `connection_id` がまだその参加者の現在の接続である場合のみ解除し、
    /// 解除した参加者の ID を返す。既に新しい接続に置き換えられていれば何もしない。
    async fn unbind(&self, connection_id: ConnectionId) -> Option<ParticipantId>;

    /// 特定の参加者の現在の接続にイベントを送信する
    ///
    /// バインディングが無い場合は黙って破棄する（エラーにはならない）。
    async fn send(
        &self,
        participant_id: ParticipantId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError>;

    /// 特定の接続のチャンネルへ直接イベントを送信する
    ///
    /// バインディングを経由しないため、送信までの間に同じ参加者の
    /// 別の接続がバインドされても宛先は変わらない。
    async fn push(
        &self,
        channel: &PusherChannel,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError>;

    /// バインド中の全接続にイベントを配信する
    ///
    /// `exclude` に指定した参加者の接続には送らない。
    /// イベントのエンコードは 1 回だけ行い、配信できた接続数を返す。
    async fn broadcast(
        &self,
        event: &RelayEvent,
        exclude: Option<ParticipantId>,
    ) -> Result<usize, MessagePushError>;

    /// 現在バインディングを持つ参加者の ID 一覧（ID 順）
    async fn bound_participants(&self) -> Vec<ParticipantId>;
}
