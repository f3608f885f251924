//! Domain layer for the relay server.
//!
//! This module contains business rules that are independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{Participant, RelayEvent, ResolveStatus, SignalChange};
pub use error::{MessagePushError, ValueObjectError};
pub use factory::{ColorPalette, ConnectionIdFactory, ParticipantIdSequence};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::ParticipantRegistry;
pub use value_object::{Color, ConnectionId, ParticipantId, ParticipantToken, Timestamp};
