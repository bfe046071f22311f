//! Amplitude bars for waveform display
//!
//! Downsamples a loudness-over-time analysis into a fixed number of bars:
//!
//! 1. Split the samples into `bar_count` contiguous index ranges of (nearly)
//!    equal length and average each one. With fewer samples than bars some
//!    ranges are empty and average to 0.
//! 2. Rescale the averages against their own min/max so quiet material still
//!    fills the display. An `epsilon` bias keeps the quietest bar above zero.
//! 3. Mark every bar whose start lies before the playhead as played.

use clipcue_core::Seconds;

use crate::error::{RenderError, RenderResult};
use crate::theme::{Rgba, WaveformConfig};

/// Default bias added to every bar before normalization
pub const DEFAULT_EPSILON: f64 = 0.02;

/// One bar of the waveform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedBar {
    /// Position from the left, 0-based
    pub index: usize,
    /// Bar height as a fraction of the full height (0.0 to 1.0)
    pub height_ratio: f64,
    /// Whether the playhead has passed this bar
    pub played: bool,
}

impl RenderedBar {
    /// Fill colour for this bar
    pub fn color(&self, config: &WaveformConfig) -> Rgba {
        if self.played {
            config.played_color
        } else {
            config.unplayed_color
        }
    }
}

/// Compute bars with the default epsilon
pub fn compute_bars(
    samples: &[f32],
    bar_count: usize,
    played_ratio: f64,
) -> RenderResult<Vec<RenderedBar>> {
    compute_bars_with_epsilon(samples, bar_count, played_ratio, DEFAULT_EPSILON)
}

/// Compute bars from amplitude samples and a playback progress ratio
///
/// Samples are loudness magnitudes; negative values are taken by magnitude
/// and non-finite ones count as silence. Empty input gives flat bars (height
/// 0) that still carry the played flag. When every bar has the same level the
/// dynamic range is zero: bars are full height, or 0 for pure silence.
///
/// Fails with [`RenderError::InvalidBarCount`] when `bar_count` is 0.
pub fn compute_bars_with_epsilon(
    samples: &[f32],
    bar_count: usize,
    played_ratio: f64,
    epsilon: f64,
) -> RenderResult<Vec<RenderedBar>> {
    if bar_count == 0 {
        return Err(RenderError::InvalidBarCount(bar_count));
    }

    let means = segment_means(samples, bar_count);
    let min = means.iter().copied().fold(f64::INFINITY, f64::min);
    let max = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let epsilon = epsilon.max(0.0);

    let bars = means
        .iter()
        .enumerate()
        .map(|(index, &mean)| {
            let height_ratio = if samples.is_empty() {
                0.0
            } else if range <= 0.0 {
                if max > 0.0 { 1.0 } else { 0.0 }
            } else {
                ((mean - min + epsilon) / (range + epsilon)).clamp(0.0, 1.0)
            };

            RenderedBar {
                index,
                height_ratio,
                played: is_played(index, bar_count, played_ratio),
            }
        })
        .collect();

    Ok(bars)
}

/// Mean magnitude of each of `bar_count` contiguous sample ranges
fn segment_means(samples: &[f32], bar_count: usize) -> Vec<f64> {
    let len = samples.len();
    (0..bar_count)
        .map(|bar| {
            let start = bar * len / bar_count;
            let end = (bar + 1) * len / bar_count;
            if start >= end {
                return 0.0;
            }
            let sum: f64 = samples[start..end].iter().map(|&s| magnitude(s)).sum();
            sum / (end - start) as f64
        })
        .collect()
}

fn magnitude(sample: f32) -> f64 {
    if sample.is_finite() {
        sample.abs() as f64
    } else {
        0.0
    }
}

/// A bar counts as played once the playhead is past its left edge
///
/// Strict comparison: at ratio 0.3 with 100 bars, bars 0..30 are played and
/// bar 30 (which starts exactly at the playhead) is not.
fn is_played(index: usize, bar_count: usize, played_ratio: f64) -> bool {
    (index as f64 / bar_count as f64) < played_ratio
}

/// Playback progress over the whole media, clamped to 0.0..=1.0
///
/// Returns 0 while the duration is unknown.
pub fn played_ratio(position: Seconds, total_duration: Seconds) -> f64 {
    if !(total_duration.is_finite() && total_duration > 0.0) || !position.is_finite() {
        return 0.0;
    }
    (position / total_duration).clamp(0.0, 1.0)
}
