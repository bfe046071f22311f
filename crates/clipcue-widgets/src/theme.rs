//! Waveform colours and display settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::waveform::DEFAULT_EPSILON;

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `#RRGGBBAA` hex string
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

/// Bars left of the playhead
pub const PLAYED_COLOR: Rgba = Rgba::rgb(255, 153, 0); // Orange (#FF9900)

/// Bars right of the playhead
pub const UNPLAYED_COLOR: Rgba = Rgba::rgb(128, 128, 128); // Grey (#808080)

/// Waveform display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformConfig {
    /// Number of bars across the waveform
    pub bar_count: usize,
    /// Bias keeping the quietest bar visible (fraction of the dynamic range)
    pub epsilon: f64,
    /// Time between redraws while playing
    /// Default: 1000 ms (enough for a progress-style display)
    pub redraw_interval_ms: u64,
    pub played_color: Rgba,
    pub unplayed_color: Rgba,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            bar_count: 100,
            epsilon: DEFAULT_EPSILON,
            redraw_interval_ms: 1000,
            played_color: PLAYED_COLOR,
            unplayed_color: UNPLAYED_COLOR,
        }
    }
}

impl WaveformConfig {
    /// Redraw period, never shorter than 1 ms
    pub fn redraw_interval(&self) -> Duration {
        Duration::from_millis(self.redraw_interval_ms.max(1))
    }
}
