//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::{fmt, num::NonZeroU64};

use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum accepted length of a participant token, in bytes.
pub const MAX_TOKEN_LEN: usize = 256;

/// Durable, opaque participant token supplied by the client.
///
/// One token identifies one logical user across any number of connections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticipantToken(String);

impl ParticipantToken {
    /// Create a new ParticipantToken.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or longer than [`MAX_TOKEN_LEN`].
    pub fn new(token: String) -> Result<Self, ValueObjectError> {
        if token.is_empty() {
            return Err(ValueObjectError::TokenEmpty);
        }
        let len = token.len();
        if len > MAX_TOKEN_LEN {
            return Err(ValueObjectError::TokenTooLong {
                max: MAX_TOKEN_LEN,
                actual: len,
            });
        }
        Ok(Self(token))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ParticipantToken {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stable numeric participant identifier, assigned once per token starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(NonZeroU64);

impl ParticipantId {
    /// Create a new ParticipantId.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is zero.
    pub fn new(value: u64) -> Result<Self, ValueObjectError> {
        NonZeroU64::new(value)
            .map(Self)
            .ok_or(ValueObjectError::ParticipantIdZero)
    }

    /// Get the inner u64 value.
    pub fn value(&self) -> u64 {
        self.0.get()
    }
}

impl From<NonZeroU64> for ParticipantId {
    fn from(value: NonZeroU64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display color of a participant, as a `#RRGGBB` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    /// Create a new Color.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not a `#RRGGBB` hex string.
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let valid = value.len() == 7
            && value.starts_with('#')
            && value[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(ValueObjectError::ColorInvalidFormat(value));
        }
        Ok(Self(value))
    }

    /// Palette entries are `#RRGGBB` literals and skip validation.
    pub(crate) fn from_palette(value: &'static str) -> Self {
        Self(value.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one accepted transport connection.
///
/// A participant may be represented by many connections over its lifetime,
/// but by at most one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_token_new_success() {
        // テスト項目: 有効なトークンから ParticipantToken を作成できる
        // given (前提条件):
        let token = "5f0c6f5e-2d0b-4c59-9d7c-1f1a0b1f3c2e".to_string();

        // when (操作):
        let result = ParticipantToken::new(token.clone());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), token);
    }

    #[test]
    fn test_participant_token_empty_fails() {
        // テスト項目: 空のトークンは作成できない
        // given (前提条件):
        let token = String::new();

        // when (操作):
        let result = ParticipantToken::try_from(token);

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::TokenEmpty);
    }

    #[test]
    fn test_participant_token_too_long_fails() {
        // テスト項目: 上限を超える長さのトークンは作成できない
        // given (前提条件):
        let token = "a".repeat(MAX_TOKEN_LEN + 1);

        // when (操作):
        let result = ParticipantToken::new(token);

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::TokenTooLong {
                max: MAX_TOKEN_LEN,
                actual: MAX_TOKEN_LEN + 1,
            }
        );
    }

    #[test]
    fn test_participant_id_rejects_zero() {
        // テスト項目: 0 は ParticipantId として扱えない
        // when (操作):
        let zero = ParticipantId::new(0);
        let one = ParticipantId::new(1);

        // then (期待する結果):
        assert_eq!(zero.unwrap_err(), ValueObjectError::ParticipantIdZero);
        assert_eq!(one.unwrap().value(), 1);
    }

    #[test]
    fn test_participant_id_ordering() {
        // テスト項目: ParticipantId は数値順に並ぶ
        // given (前提条件):
        let id1 = ParticipantId::new(1).unwrap();
        let id2 = ParticipantId::new(2).unwrap();

        // then (期待する結果):
        assert!(id1 < id2);
    }

    #[test]
    fn test_color_validation() {
        // テスト項目: #RRGGBB 形式の文字列だけが Color になる
        // then (期待する結果):
        assert!(Color::new("#4ECDC4".to_string()).is_ok());
        assert!(Color::new("#4ecdc4".to_string()).is_ok());
        assert_eq!(
            Color::new("4ECDC4".to_string()).unwrap_err(),
            ValueObjectError::ColorInvalidFormat("4ECDC4".to_string())
        );
        assert!(Color::new("#4ECDCZ".to_string()).is_err());
        assert!(Color::new("#FFF".to_string()).is_err());
    }
}
