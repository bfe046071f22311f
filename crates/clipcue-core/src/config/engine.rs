//! Playback and playlist settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::playback::BoundaryAction;

/// Root engine configuration (`engine.yaml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub playback: PlaybackConfig,
    pub playlist: PlaylistConfig,
}

/// Standalone (single item) playback settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// What happens when the playhead reaches the trim window end
    /// Default: stop (pause and rewind to the window start)
    pub boundary_action: BoundaryAction,
}

/// Playlist sequencing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    /// Pause between the end of one item and the start of the next
    /// Default: 2000 ms
    pub advance_delay_ms: u64,

    /// Continue from the first item after the last one finishes
    /// Default: false (playback stops at the end of the list)
    pub wrap_around: bool,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            advance_delay_ms: 2000,
            wrap_around: false,
        }
    }
}

impl PlaylistConfig {
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.playback.boundary_action, BoundaryAction::Stop);
        assert_eq!(config.playlist.advance_delay(), Duration::from_secs(2));
        assert!(!config.playlist.wrap_around);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: EngineConfig =
            serde_yaml::from_str("playback:\n  boundary_action: loop\n").unwrap();
        assert_eq!(config.playback.boundary_action, BoundaryAction::Loop);
        assert_eq!(config.playlist, PlaylistConfig::default());
    }
}
