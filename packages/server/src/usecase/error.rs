//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::MessagePushError;

/// 参加者識別のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifyError {
    /// init などの送信に失敗
    #[error("Failed to notify connection: {0}")]
    NotifyFailed(#[from] MessagePushError),
}

/// 信号中継のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("Failed to broadcast signal: {0}")]
    BroadcastFailed(#[from] MessagePushError),
}
