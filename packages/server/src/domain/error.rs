//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ParticipantToken validation error
    #[error("ParticipantToken cannot be empty")]
    TokenEmpty,

    /// ParticipantToken too long error
    #[error("ParticipantToken cannot exceed {max} bytes (got {actual})")]
    TokenTooLong { max: usize, actual: usize },

    /// ParticipantId must start at 1
    #[error("ParticipantId must be greater than zero")]
    ParticipantIdZero,

    /// Color must be `#RRGGBB`
    #[error("Color must be a #RRGGBB hex string (got: {0})")]
    ColorInvalidFormat(String),
}

/// Errors raised while delivering relay events to connections
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagePushError {
    /// The event could not be encoded for the wire
    #[error("Failed to encode event: {0}")]
    EncodeFailed(String),

    /// The bound connection's outbound channel is gone
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
