//! Clipcue Core - trim windows, playback boundaries and playlist sequencing
//!
//! Everything in this crate is synchronous and free of I/O on the playback
//! path. The host media element drives the engine by reporting position
//! ticks and end-of-media events; the engine answers with declarative state
//! (indicator geometry, the active item) and [`playback::PlaybackCommand`]s.

pub mod config;
pub mod error;
pub mod playback;
pub mod playlist;
pub mod timecode;
pub mod trim;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use timecode::Timecode;
pub use trim::{TrimWindow, ViolationKind};
pub use types::*;
