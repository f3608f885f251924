//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by its `type` field; field names are
//! camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Messages sent from a client to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Must be the first message on a connection.
    ///
    /// A missing `uuid` decodes as empty and is rejected during identification.
    Identify {
        #[serde(default)]
        uuid: String,
    },
    /// Key state change of the sending participant
    Morse { state: bool },
}

/// Messages sent from the server to a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Identity assigned to the receiving connection
    Init { user_id: u64, color: String },
    /// A participant the receiver should add to its roster
    UserJoined { user_id: u64, color: String },
    /// Permanent departure (never emitted for a plain disconnect)
    UserLeft { user_id: u64 },
    /// Relayed key state change, `timestamp` in epoch milliseconds
    Morse {
        user_id: u64,
        state: bool,
        timestamp: i64,
    },
}
