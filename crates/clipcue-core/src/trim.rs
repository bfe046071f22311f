//! Trim windows and their validation
//!
//! A trim window restricts playback of one item to a sub-range of its
//! duration. Either side may be left open: an unset start means "from the
//! beginning" and an unset end means "until the media ends".
//!
//! Validation is advisory. [`validate`] reports every rule a candidate window
//! breaks and leaves it to the caller to decide whether to block a save or
//! merely show a warning.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::timecode::{self, Timecode};
use crate::types::Seconds;

/// Start/end bounds of a trim window, in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimWindow {
    /// Playback start (None = start of media)
    pub start: Option<Seconds>,
    /// Playback end (None = end of media)
    pub end: Option<Seconds>,
}

impl TrimWindow {
    /// Window with neither bound set
    pub const UNBOUNDED: TrimWindow = TrimWindow { start: None, end: None };

    pub fn new(start: Option<Seconds>, end: Option<Seconds>) -> Self {
        Self { start, end }
    }

    /// Window with both bounds set
    pub fn between(start: Seconds, end: Seconds) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Build a window from user-entered timecode text
    ///
    /// Blank fields leave that side unbounded; anything else must be a valid
    /// `HH:MM:SS[.fff]` timecode.
    pub fn from_timecodes(start: &str, end: &str) -> EngineResult<Self> {
        Ok(Self {
            start: parse_optional(start)?,
            end: parse_optional(end)?,
        })
    }

    /// True if at least one bound is set
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Start bound, defaulting to 0
    pub fn effective_start(&self) -> Seconds {
        self.start.unwrap_or(0.0)
    }

    /// End bound, defaulting to the full duration
    pub fn effective_end(&self, duration: Seconds) -> Seconds {
        self.end.unwrap_or(duration)
    }

    /// Whether a playhead position lies inside `[start, end)`
    pub fn contains(&self, position: Seconds, duration: Seconds) -> bool {
        position >= self.effective_start() && position < self.effective_end(duration)
    }

    /// Validate this window against a media duration
    pub fn validate(&self, duration: Seconds) -> Vec<ViolationKind> {
        validate(self.start, self.end, duration)
    }
}

impl fmt::Display for TrimWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |bound: Option<Seconds>| bound.map(show).unwrap_or_else(|| "-".to_string());
        write!(f, "[{} .. {}]", side(self.start), side(self.end))
    }
}

fn parse_optional(text: &str) -> EngineResult<Option<Seconds>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    timecode::parse(text).map(|tc| Some(tc.seconds()))
}

/// A rule broken by a candidate trim window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViolationKind {
    /// Start bound below zero
    NegativeStart { start: Seconds },
    /// End bound below zero
    NegativeEnd { end: Seconds },
    /// Start bound past the end of the media
    StartBeyondDuration { start: Seconds, duration: Seconds },
    /// End bound past the end of the media
    EndBeyondDuration { end: Seconds, duration: Seconds },
    /// Both bounds set with the end before the start
    EndBeforeStart { start: Seconds, end: Seconds },
    /// Both bounds set to the same time
    ZeroLength { at: Seconds },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ViolationKind::NegativeStart { .. } => write!(f, "Start time cannot be negative"),
            ViolationKind::NegativeEnd { .. } => write!(f, "End time cannot be negative"),
            ViolationKind::StartBeyondDuration { start, duration } => write!(
                f,
                "Start time {} is after the end of the media ({})",
                show(start),
                show(duration)
            ),
            ViolationKind::EndBeyondDuration { end, duration } => write!(
                f,
                "End time {} is after the end of the media ({})",
                show(end),
                show(duration)
            ),
            ViolationKind::EndBeforeStart { start, end } => write!(
                f,
                "Start time {} must be before end time {}",
                show(start),
                show(end)
            ),
            ViolationKind::ZeroLength { at } => {
                write!(f, "Start and end are both {}; the window is empty", show(at))
            }
        }
    }
}

/// Whole seconds print as `HH:MM:SS`, anything finer keeps milliseconds
fn show(seconds: Seconds) -> String {
    if seconds.fract() == 0.0 {
        Timecode::from_seconds(seconds).to_string()
    } else {
        timecode::format_precise(seconds)
    }
}

/// Check a candidate trim window against a media duration
///
/// Rules:
/// - neither bound may be negative
/// - neither bound may exceed `duration`
/// - when both bounds are set, start must be strictly before end; equal bounds
///   are reported once, as [`ViolationKind::ZeroLength`]
///
/// A `duration` that is zero, negative or not finite means "not known yet" and
/// disables the duration checks.
///
/// Returns an empty list when the window is acceptable.
pub fn validate(
    start: Option<Seconds>,
    end: Option<Seconds>,
    duration: Seconds,
) -> Vec<ViolationKind> {
    let mut violations = Vec::new();
    let duration_known = duration.is_finite() && duration > 0.0;

    if let Some(start) = start {
        if start < 0.0 {
            violations.push(ViolationKind::NegativeStart { start });
        } else if duration_known && start > duration {
            violations.push(ViolationKind::StartBeyondDuration { start, duration });
        }
    }

    if let Some(end) = end {
        if end < 0.0 {
            violations.push(ViolationKind::NegativeEnd { end });
        } else if duration_known && end > duration {
            violations.push(ViolationKind::EndBeyondDuration { end, duration });
        }
    }

    if let (Some(start), Some(end)) = (start, end) {
        if start == end {
            violations.push(ViolationKind::ZeroLength { at: start });
        } else if start > end {
            violations.push(ViolationKind::EndBeforeStart { start, end });
        }
    }

    violations
}
