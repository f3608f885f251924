//! Error types for the morsecast client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Terminal setup, drawing or restore failed
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Audio device could not be opened or started
    #[error("Audio error: {0}")]
    Audio(String),
}
