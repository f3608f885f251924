//! Domain entities for the relay server.

use super::value_object::{Color, ParticipantId, ParticipantToken, Timestamp};

/// A logical user identified by a durable token, independent of any connection.
///
/// Created the first time its token is seen and kept for the lifetime of the
/// server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub token: ParticipantToken,
    pub color: Color,
    pub created_at: Timestamp,
}

impl Participant {
    pub fn new(
        id: ParticipantId,
        token: ParticipantToken,
        color: Color,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            token,
            color,
            created_at,
        }
    }
}

/// Whether resolving a token allocated a new participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStatus {
    /// First time this token was seen; joining must be announced.
    Created,
    /// The token already maps to a participant.
    Existing,
}

/// A single on/off transition of a participant's key, stamped by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalChange {
    pub participant_id: ParticipantId,
    pub state: bool,
    pub timestamp: Timestamp,
}

/// Events the server pushes to bound connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// Sent once per successful identification to the identifying connection.
    Init(Participant),
    /// Announces a participant to connections that may not know it yet.
    ParticipantJoined(Participant),
    /// Relayed key state transition.
    Signal(SignalChange),
}
