//! morsecast terminal client library.
//!
//! Reconstructs every participant's key signal from the relayed on/off edges,
//! draws it as a scrolling waveform and gates one tone per participant.

pub mod app;
pub mod audio;
pub mod domain;
pub mod error;
pub mod input;
pub mod reconnect;
pub mod render;
pub mod runner;
pub mod session;

pub use runner::{ClientConfig, run_client};
