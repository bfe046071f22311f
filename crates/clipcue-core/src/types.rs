//! Common types for Clipcue
//!
//! Playable items and the units shared by the trim, playback and playlist
//! modules.

use serde::{Deserialize, Serialize};

use crate::trim::{TrimWindow, ViolationKind};

/// Time in seconds
///
/// Media durations, playhead positions and trim bounds all use this unit.
pub type Seconds = f64;

/// Percentage in the range 0.0 to 100.0 (for overlay geometry)
pub type Percent = f64;

/// One entry of a playlist (or the single item of a standalone player)
///
/// Everything except the trim window is fixed once the item is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayableItem {
    /// Identifier the host player uses to load the media
    pub source_id: String,
    /// Display title
    pub title: String,
    /// Full media duration in seconds
    pub duration: Seconds,
    /// Poster image shown before and between playback
    pub poster_url: Option<String>,
    /// Trim window restricting playback
    trim_window: TrimWindow,
}

impl PlayableItem {
    /// Create an item with no trim window
    pub fn new(source_id: impl Into<String>, title: impl Into<String>, duration: Seconds) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.into(),
            duration,
            poster_url: None,
            trim_window: TrimWindow::UNBOUNDED,
        }
    }

    /// Builder: attach a poster URL
    pub fn with_poster(mut self, url: impl Into<String>) -> Self {
        self.poster_url = Some(url.into());
        self
    }

    /// Builder: attach a trim window (violations are logged, not enforced)
    pub fn with_trim_window(mut self, window: TrimWindow) -> Self {
        self.set_trim_window(window);
        self
    }

    /// Current trim window
    pub fn trim_window(&self) -> TrimWindow {
        self.trim_window
    }

    /// Adopt a new trim window
    ///
    /// The window is validated against this item's duration and adopted
    /// regardless of the outcome; the violations are returned so the caller
    /// can warn the user.
    pub fn set_trim_window(&mut self, window: TrimWindow) -> Vec<ViolationKind> {
        let violations = window.validate(self.duration);
        for v in &violations {
            log::warn!("set_trim_window: {} on {:?}: {}", window, self.source_id, v);
        }
        self.trim_window = window;
        violations
    }

    /// Adopt a new trim window only if it has no violations
    ///
    /// Used by save flows that block on invalid input.
    pub fn set_trim_window_checked(
        &mut self,
        window: TrimWindow,
    ) -> Result<(), Vec<ViolationKind>> {
        let violations = window.validate(self.duration);
        if violations.is_empty() {
            self.trim_window = window;
            Ok(())
        } else {
            Err(violations)
        }
    }
}
