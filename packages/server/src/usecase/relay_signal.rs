//! UseCase: 信号中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelaySignalUseCase::execute() メソッド
//! - サーバー時刻の付与と、送信者以外へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者自身に信号がエコーされないことを保証
//! - タイムスタンプがサーバー側の時計で付与されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：押下 / 解放の中継
//! - 異常系：エンコード失敗

use std::sync::Arc;

use morsecast_shared::time::Clock;

use crate::domain::{MessagePusher, ParticipantId, RelayEvent, SignalChange, Timestamp};

use super::error::RelayError;

/// 信号中継のユースケース
pub struct RelaySignalUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl RelaySignalUseCase {
    /// 新しい RelaySignalUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_pusher,
            clock,
        }
    }

    /// 信号中継を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 信号を送った参加者
    /// * `state` - `true` = 押下, `false` = 解放
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 配信できた接続数
    /// * `Err(RelayError)` - ブロードキャスト失敗
    pub async fn execute(&self, from: ParticipantId, state: bool) -> Result<usize, RelayError> {
        let change = SignalChange {
            participant_id: from,
            state,
            timestamp: Timestamp::new(self.clock.now_millis()),
        };

        let delivered = self
            .message_pusher
            .broadcast(&RelayEvent::Signal(change), Some(from))
            .await?;

        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessagePushError, message_pusher::MockMessagePusher};
    use morsecast_shared::time::FixedClock;

    fn pid(value: u64) -> ParticipantId {
        ParticipantId::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_relay_broadcasts_stamped_signal_excluding_sender() {
        // テスト項目: 信号はサーバー時刻を付与され、送信者を除外してブロードキャストされる
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        let expected = RelayEvent::Signal(SignalChange {
            participant_id: pid(1),
            state: true,
            timestamp: Timestamp::new(5000),
        });
        pusher
            .expect_broadcast()
            .withf(move |event, exclude| *event == expected && *exclude == Some(pid(1)))
            .times(1)
            .returning(|_, _| Ok(2));
        let usecase = RelaySignalUseCase::new(Arc::new(pusher), Arc::new(FixedClock::new(5000)));

        // when (操作):
        let result = usecase.execute(pid(1), true).await;

        // then (期待する結果):
        assert_eq!(result, Ok(2));
    }

    #[tokio::test]
    async fn test_relay_release_is_forwarded() {
        // テスト項目: 解放（false）も同じように中継される
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(|event, _| matches!(event, RelayEvent::Signal(change) if !change.state))
            .times(1)
            .returning(|_, _| Ok(0));
        pusher.expect_send().never();
        pusher.expect_push().never();
        let usecase = RelaySignalUseCase::new(Arc::new(pusher), Arc::new(FixedClock::new(0)));

        // when (操作):
        let result = usecase.execute(pid(3), false).await;

        // then (期待する結果): 他に接続が無くても成功扱い
        assert_eq!(result, Ok(0));
    }

    #[tokio::test]
    async fn test_relay_propagates_encode_failure() {
        // テスト項目: エンコード失敗は RelayError として返される
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .returning(|_, _| Err(MessagePushError::EncodeFailed("boom".to_string())));
        let usecase = RelaySignalUseCase::new(Arc::new(pusher), Arc::new(FixedClock::new(0)));

        // when (操作):
        let result = usecase.execute(pid(1), true).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RelayError::BroadcastFailed(MessagePushError::EncodeFailed(
                "boom".to_string()
            )))
        );
    }
}
