//! morsecast relay server library.
//!
//! Maps durable participant tokens to stable numeric ids, binds live
//! WebSocket connections to those participants, and fans key on/off edges
//! out to every other bound connection.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
