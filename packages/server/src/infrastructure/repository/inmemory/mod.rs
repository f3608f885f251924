//! InMemory 実装

pub mod registry;

pub use registry::InMemoryParticipantRegistry;
