//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Participant entry for the participant list endpoint
///
/// The durable token is deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub user_id: u64,
    pub color: String,
    /// Whether a live connection is currently bound
    pub online: bool,
    pub created_at: String, // RFC 3339
}
