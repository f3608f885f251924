//! Infrastructure layer: wire DTOs, in-memory registry and WebSocket delivery.

pub mod dto;
pub mod message_pusher;
pub mod repository;
