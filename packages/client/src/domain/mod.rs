//! Client-side domain models.
//!
//! Pure state with no I/O: per-participant signal timelines, the roster that
//! owns them, and the frame-driven local clock they are measured against.

pub mod clock;
pub mod roster;
pub mod timeline;

pub use clock::FrameClock;
pub use roster::{LocalIdentity, Member, Roster};
pub use timeline::{ActiveInterval, SignalEdge, SignalTimeline};
