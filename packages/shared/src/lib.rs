//! Utilities shared by the morsecast server and client.

pub mod logger;
pub mod time;
