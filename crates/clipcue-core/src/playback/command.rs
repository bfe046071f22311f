//! Commands issued to the host media player
//!
//! The engine never holds a reference to the player. Methods that need to
//! drive it take a `&mut impl PlayerHandle` for the duration of the call, so
//! there is no long-lived player cell that can go stale between events.

use crate::types::Seconds;

/// A transport command for the host player
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    /// Switch the player to another source and show its poster
    Load {
        source_id: String,
        poster_url: Option<String>,
    },
    /// Move the playhead
    SeekTo(Seconds),
    /// Pause playback
    Pause,
    /// Ask the player to start playing (it may refuse, e.g. autoplay policy)
    RequestPlay,
}

/// Receiver of playback commands
pub trait PlayerHandle {
    fn dispatch(&mut self, command: PlaybackCommand);
}

/// Recording handle: collects commands in order
impl PlayerHandle for Vec<PlaybackCommand> {
    fn dispatch(&mut self, command: PlaybackCommand) {
        self.push(command);
    }
}
