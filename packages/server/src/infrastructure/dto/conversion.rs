//! Conversion logic between DTOs and domain entities.

use crate::domain::RelayEvent;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&RelayEvent> for dto::ServerMessage {
    fn from(event: &RelayEvent) -> Self {
        match event {
            RelayEvent::Init(participant) => Self::Init {
                user_id: participant.id.value(),
                color: participant.color.as_str().to_string(),
            },
            RelayEvent::ParticipantJoined(participant) => Self::UserJoined {
                user_id: participant.id.value(),
                color: participant.color.as_str().to_string(),
            },
            RelayEvent::Signal(change) => Self::Morse {
                user_id: change.participant_id.value(),
                state: change.state,
                timestamp: change.timestamp.value(),
            },
        }
    }
}
