//! Repository trait 定義
//!
//! ドメイン層が必要とする参加者レジストリのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Participant, ParticipantId, ParticipantToken, ResolveStatus};

/// Identity Registry trait
///
/// 永続トークンから参加者（ID・色）への対応を保持する。
/// 参加者はプロセスの生存期間中ずっと保持され、削除されない。
///
/// ## 不変条件
///
/// - id ↔ token は全単射
/// - id は初回登録順に 1, 2, 3, ... と欠番なく払い出され、再利用されない
#[async_trait]
pub trait ParticipantRegistry: Send + Sync {
    /// トークンを参加者に解決する
    ///
    /// 未知のトークンなら新しい参加者を作成して `ResolveStatus::Created` を返し、
    /// 既知のトークンなら既存の参加者を `ResolveStatus::Existing` で返す。
    async fn resolve(&self, token: ParticipantToken) -> (Participant, ResolveStatus);

    /// ID から参加者を取得
    async fn find(&self, id: ParticipantId) -> Option<Participant>;

    /// 全参加者を ID 順で取得
    async fn list(&self) -> Vec<Participant>;

    /// 登録済みの参加者数を取得
    async fn count(&self) -> usize;
}
