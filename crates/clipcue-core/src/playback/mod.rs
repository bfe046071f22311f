//! Trim window enforcement during playback
//!
//! [`PlaybackWindowController`] owns the trim window of the active item. It
//! classifies every position tick reported by the host player and turns the
//! window into overlay geometry; it never seeks or pauses on its own.
//!
//! # States
//!
//! ```text
//!              set_window(bounded)
//!   Unbounded ──────────────────────► Bounded ◄──┐
//!       ▲                               │        │ tick inside window
//!       │ set_window(unbounded)         │ tick ≥ end (BoundaryReached)
//!       │                               ▼        │
//!       └─────────────────────────── AtBoundary ─┘
//! ```
//!
//! The signal fires once per crossing. Ticks past the end while already
//! `AtBoundary` are ignored until the playhead comes back inside the window
//! (a rewind or loop), which re-arms the controller.
//!
//! Callers decide what a crossing means: [`TrimmedPlayback`] stops, loops or
//! just reports it for a single item, and the playlist sequencer treats it as
//! the end of the active item.

mod command;
mod standalone;

pub use command::{PlaybackCommand, PlayerHandle};
pub use standalone::{BoundaryAction, TrimmedPlayback};

use crate::trim::{TrimWindow, ViolationKind};
use crate::types::{Percent, PlayableItem, Seconds};

/// Window classification state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// No bound set; playback runs to the natural end of the media
    Unbounded,
    /// Window set, playhead has not crossed the end
    Bounded,
    /// Playhead crossed the end and the crossing has been reported
    AtBoundary,
}

/// Emitted when the playhead crosses the effective end of the window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryReached {
    /// Position reported by the tick that crossed the boundary
    pub position: Seconds,
    /// Effective start of the window (rewind target)
    pub start: Seconds,
    /// Effective end that was crossed
    pub end: Seconds,
}

/// Position of the cue indicator overlay, as percentages of the duration
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorGeometry {
    pub left_percent: Percent,
    pub width_percent: Percent,
}

impl IndicatorGeometry {
    /// Zero-size geometry used while the duration is unknown
    pub const HIDDEN: IndicatorGeometry = IndicatorGeometry {
        left_percent: 0.0,
        width_percent: 0.0,
    };

    /// Whether the overlay should be drawn at all
    pub fn is_visible(&self) -> bool {
        self.width_percent > 0.0
    }

    /// Compute geometry for a window over a total duration
    ///
    /// A zero or unknown duration hides the indicator instead of dividing by
    /// zero. An inverted window collapses to zero width. Bounds outside the
    /// media are clamped to it, so the overlay never leaves the track.
    pub fn compute(window: &TrimWindow, total_duration: Seconds) -> Self {
        if !duration_known(total_duration) {
            return Self::HIDDEN;
        }
        let start = window.effective_start().clamp(0.0, total_duration);
        let end = window.effective_end(total_duration).clamp(0.0, total_duration);
        let width = (end - start).max(0.0);

        Self {
            left_percent: start / total_duration * 100.0,
            width_percent: width / total_duration * 100.0,
        }
    }
}

fn duration_known(duration: Seconds) -> bool {
    duration.is_finite() && duration > 0.0
}

/// Owns one active item's trim window and watches the playhead against it
#[derive(Debug, Clone)]
pub struct PlaybackWindowController {
    window: TrimWindow,
    total_duration: Seconds,
    state: WindowState,
    /// Violations found by the last `set_window`
    violations: Vec<ViolationKind>,
    geometry: IndicatorGeometry,
}

impl PlaybackWindowController {
    /// Create an unbounded controller for media of the given duration
    ///
    /// Pass 0.0 when the duration is not known yet; the first position tick
    /// carrying a real duration fills it in.
    pub fn new(total_duration: Seconds) -> Self {
        Self {
            window: TrimWindow::UNBOUNDED,
            total_duration,
            state: WindowState::Unbounded,
            violations: Vec::new(),
            geometry: IndicatorGeometry::compute(&TrimWindow::UNBOUNDED, total_duration),
        }
    }

    /// Create a controller that has adopted an item's trim window
    pub fn for_item(item: &PlayableItem) -> Self {
        let mut controller = Self::new(item.duration);
        controller.set_window(item.trim_window());
        controller
    }

    /// Adopt a trim window
    ///
    /// The window is validated, but violations are only reported: the window
    /// is adopted either way. Any previous boundary crossing is forgotten.
    pub fn set_window(&mut self, window: TrimWindow) -> &[ViolationKind] {
        self.violations = window.validate(self.total_duration);
        for v in &self.violations {
            log::warn!("set_window: {}: {}", window, v);
        }

        self.window = window;
        self.state = if window.is_bounded() {
            WindowState::Bounded
        } else {
            WindowState::Unbounded
        };
        self.geometry = IndicatorGeometry::compute(&self.window, self.total_duration);

        log::debug!("set_window: adopted {} -> {:?}", window, self.state);
        &self.violations
    }

    /// Classify a playhead position reported by the host player
    ///
    /// `total_duration` updates the stored duration when it carries a usable
    /// value; players often report NaN or 0 until metadata has loaded.
    ///
    /// Returns `Some` exactly once per crossing of the effective end.
    pub fn on_position_tick(
        &mut self,
        position: Seconds,
        total_duration: Seconds,
    ) -> Option<BoundaryReached> {
        self.set_total_duration(total_duration);

        let end = self.boundary_end()?;
        match self.state {
            WindowState::Unbounded => None,
            WindowState::Bounded if position >= end => {
                self.state = WindowState::AtBoundary;
                log::debug!("on_position_tick: boundary {} crossed at {}", end, position);
                Some(BoundaryReached {
                    position,
                    start: self.effective_start(),
                    end,
                })
            }
            WindowState::Bounded => None,
            WindowState::AtBoundary => {
                if position < end {
                    self.state = WindowState::Bounded;
                    log::debug!("on_position_tick: re-armed at {}", position);
                }
                None
            }
        }
    }

    /// Update the total duration if the new value is usable
    pub fn set_total_duration(&mut self, total_duration: Seconds) {
        if duration_known(total_duration) && total_duration != self.total_duration {
            self.total_duration = total_duration;
            self.geometry = IndicatorGeometry::compute(&self.window, total_duration);
        }
    }

    /// End that a tick is checked against, if one can be evaluated yet
    fn boundary_end(&self) -> Option<Seconds> {
        match self.window.end {
            Some(end) => Some(end),
            None if duration_known(self.total_duration) => Some(self.total_duration),
            None => None,
        }
    }

    /// Overlay geometry for the current window
    pub fn indicator_geometry(&self) -> IndicatorGeometry {
        self.geometry
    }

    pub fn window(&self) -> TrimWindow {
        self.window
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    /// Violations reported by the last `set_window`
    pub fn violations(&self) -> &[ViolationKind] {
        &self.violations
    }

    pub fn total_duration(&self) -> Seconds {
        self.total_duration
    }

    /// Start bound, defaulting to 0
    pub fn effective_start(&self) -> Seconds {
        self.window.effective_start()
    }

    /// End bound, defaulting to the total duration
    pub fn effective_end(&self) -> Seconds {
        self.window.effective_end(self.total_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timecode;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_geometry_for_bounded_window() {
        let mut controller = PlaybackWindowController::new(100.0);
        controller.set_window(TrimWindow::between(5.0, 15.0));

        let geometry = controller.indicator_geometry();
        assert!(approx(geometry.left_percent, 5.0));
        assert!(approx(geometry.width_percent, 10.0));
        assert_eq!(controller.state(), WindowState::Bounded);
    }

    #[test]
    fn test_geometry_hidden_for_unknown_duration() {
        let mut controller = PlaybackWindowController::new(0.0);
        controller.set_window(TrimWindow::between(5.0, 15.0));
        assert_eq!(controller.indicator_geometry(), IndicatorGeometry::HIDDEN);
        assert!(!controller.indicator_geometry().is_visible());

        // A tick carrying the real duration fills it in
        controller.on_position_tick(0.0, 100.0);
        assert!(approx(controller.indicator_geometry().width_percent, 10.0));
    }

    #[test]
    fn test_geometry_inverted_window_clamps_width() {
        let geometry = IndicatorGeometry::compute(&TrimWindow::between(60.0, 20.0), 100.0);
        assert!(approx(geometry.left_percent, 60.0));
        assert_eq!(geometry.width_percent, 0.0);
    }

    #[test]
    fn test_geometry_clamped_to_track() {
        let geometry = IndicatorGeometry::compute(&TrimWindow::between(50.0, 70.0), 60.0);
        assert!(approx(geometry.left_percent, 50.0 / 60.0 * 100.0));
        assert!(approx(geometry.left_percent + geometry.width_percent, 100.0));

        let geometry = IndicatorGeometry::compute(&TrimWindow::between(80.0, 90.0), 60.0);
        assert!(approx(geometry.left_percent, 100.0));
        assert_eq!(geometry.width_percent, 0.0);
        assert!(!geometry.is_visible());

        let geometry = IndicatorGeometry::compute(&TrimWindow::between(-5.0, 30.0), 60.0);
        assert_eq!(geometry.left_percent, 0.0);
        assert!(approx(geometry.width_percent, 50.0));
    }

    #[test]
    fn test_boundary_reported_once_per_crossing() {
        let mut controller = PlaybackWindowController::new(100.0);
        controller.set_window(TrimWindow::between(5.0, 15.0));

        assert!(controller.on_position_tick(10.0, 100.0).is_none());

        let signal = controller.on_position_tick(15.0, 100.0).unwrap();
        assert_eq!(signal.end, 15.0);
        assert_eq!(signal.start, 5.0);
        assert_eq!(controller.state(), WindowState::AtBoundary);

        assert!(controller.on_position_tick(15.2, 100.0).is_none());
        assert!(controller.on_position_tick(16.0, 100.0).is_none());
        assert_eq!(controller.state(), WindowState::AtBoundary);
    }

    #[test]
    fn test_rewind_rearms_boundary() {
        let mut controller = PlaybackWindowController::new(100.0);
        controller.set_window(TrimWindow::between(5.0, 15.0));

        assert!(controller.on_position_tick(15.0, 100.0).is_some());
        assert!(controller.on_position_tick(5.0, 100.0).is_none());
        assert_eq!(controller.state(), WindowState::Bounded);
        assert!(controller.on_position_tick(15.1, 100.0).is_some());
    }

    #[test]
    fn test_unbounded_never_signals() {
        let mut controller = PlaybackWindowController::new(100.0);
        assert_eq!(controller.state(), WindowState::Unbounded);
        assert!(controller.on_position_tick(100.0, 100.0).is_none());
        assert!(approx(controller.indicator_geometry().width_percent, 100.0));
    }

    #[test]
    fn test_open_end_uses_total_duration() {
        let mut controller = PlaybackWindowController::new(0.0);
        controller.set_window(TrimWindow::new(Some(30.0), None));

        // Duration still unknown: nothing to compare against
        assert!(controller.on_position_tick(45.0, f64::NAN).is_none());

        assert!(controller.on_position_tick(59.0, 60.0).is_none());
        let signal = controller.on_position_tick(60.0, 60.0).unwrap();
        assert_eq!(signal.end, 60.0);
    }

    #[test]
    fn test_set_window_reports_but_adopts_violations() {
        let mut controller = PlaybackWindowController::new(100.0);
        let violations = controller.set_window(TrimWindow::between(50.0, 20.0)).to_vec();
        assert_eq!(violations.len(), 1);
        assert_eq!(controller.window(), TrimWindow::between(50.0, 20.0));
        assert_eq!(controller.state(), WindowState::Bounded);
    }

    #[test]
    fn test_set_window_resets_boundary_state() {
        let mut controller = PlaybackWindowController::new(100.0);
        controller.set_window(TrimWindow::between(5.0, 15.0));
        controller.on_position_tick(20.0, 100.0);
        assert_eq!(controller.state(), WindowState::AtBoundary);

        controller.set_window(TrimWindow::UNBOUNDED);
        assert_eq!(controller.state(), WindowState::Unbounded);
    }

    #[test]
    fn test_timecode_window_geometry() {
        let start = timecode::parse("00:00:10").unwrap().seconds();
        let end = timecode::parse("00:01:00").unwrap().seconds();
        let item = PlayableItem::new("talk", "Talk", 120.0)
            .with_trim_window(TrimWindow::between(start, end));

        let geometry = PlaybackWindowController::for_item(&item).indicator_geometry();
        assert!((geometry.left_percent - 8.333_333).abs() < 1e-4);
        assert!((geometry.width_percent - 41.666_666).abs() < 1e-4);
    }
}
