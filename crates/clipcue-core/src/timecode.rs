//! Timecode parsing and formatting
//!
//! User-facing times are written as `HH:MM:SS` with an optional fractional
//! part on the seconds field (`00:01:02.250`). Internally every time is a
//! plain count of seconds; [`Timecode`] is the non-negative value type that
//! sits between the two.

use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};
use crate::types::Seconds;

/// Names of the three fields, used in error messages
const FIELD_NAMES: [&str; 3] = ["hours", "minutes", "seconds"];

/// A non-negative count of seconds
///
/// Displays as zero-padded `HH:MM:SS` and parses from the same form.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Timecode(Seconds);

impl Timecode {
    /// Zero seconds
    pub const ZERO: Timecode = Timecode(0.0);

    /// Create a timecode from seconds
    ///
    /// Negative input is taken by magnitude and non-finite input becomes zero,
    /// so the result always satisfies the non-negative invariant.
    pub fn from_seconds(seconds: Seconds) -> Self {
        if seconds.is_finite() {
            Self(seconds.abs())
        } else {
            Self::ZERO
        }
    }

    /// Seconds represented by this timecode
    #[inline]
    pub fn seconds(self) -> Seconds {
        self.0
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(self.0))
    }
}

impl FromStr for Timecode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parse `HH:MM:SS[.fff]` into a timecode
///
/// Exactly three colon-separated fields are required. Each field must be a
/// finite, non-negative number; only the seconds field is expected to carry a
/// fractional part but fractional hours or minutes are accepted and scaled.
///
/// # Example
///
/// ```
/// use clipcue_core::timecode::parse;
///
/// assert_eq!(parse("01:01:01").unwrap().seconds(), 3661.0);
/// assert_eq!(parse("00:00:02.5").unwrap().seconds(), 2.5);
/// assert!(parse("01:01").is_err());
/// ```
pub fn parse(text: &str) -> EngineResult<Timecode> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.len() != FIELD_NAMES.len() {
        return Err(EngineError::malformed(
            text,
            format!("expected 3 fields, found {}", parts.len()),
        ));
    }

    let mut fields = [0.0; 3];
    for ((slot, part), name) in fields.iter_mut().zip(&parts).zip(FIELD_NAMES) {
        *slot = parse_field(text, part, name)?;
    }

    let [hours, minutes, seconds] = fields;
    Ok(Timecode(hours * 3600.0 + minutes * 60.0 + seconds))
}

/// Parse a timecode, treating malformed input as "no value"
///
/// Used by form fields where an unparseable entry means the bound is unset
/// rather than an error worth surfacing. Blank input is also `None`.
pub fn parse_lenient(text: &str) -> Option<Timecode> {
    if text.trim().is_empty() {
        return None;
    }
    match parse(text) {
        Ok(tc) => Some(tc),
        Err(e) => {
            log::debug!("parse_lenient: ignoring input: {}", e);
            None
        }
    }
}

fn parse_field(input: &str, part: &str, name: &str) -> EngineResult<Seconds> {
    let part = part.trim();
    let value: Seconds = part.parse().map_err(|_| {
        EngineError::malformed(input, format!("{} field {:?} is not numeric", name, part))
    })?;

    if !value.is_finite() {
        return Err(EngineError::malformed(input, format!("{} field is not finite", name)));
    }
    // is_sign_negative also rejects "-0"
    if value.is_sign_negative() {
        return Err(EngineError::malformed(input, format!("{} field is negative", name)));
    }
    Ok(value)
}

/// Format seconds as zero-padded `HH:MM:SS`
///
/// The sign is dropped and the value is floored to whole seconds, so
/// `parse(&format(n))` gives back `floor(n)`. Hours are not wrapped and grow
/// past two digits for very long media.
///
/// ```
/// use clipcue_core::timecode::format;
///
/// assert_eq!(format(0.0), "00:00:00");
/// assert_eq!(format(3661.0), "01:01:01");
/// assert_eq!(format(-75.9), "00:01:15");
/// ```
pub fn format(seconds: Seconds) -> String {
    let whole = magnitude(seconds).floor() as u64;
    format!("{:02}:{:02}:{:02}", whole / 3600, (whole % 3600) / 60, whole % 60)
}

/// Format seconds as `HH:MM:SS.fff` (millisecond precision, rounded)
pub fn format_precise(seconds: Seconds) -> String {
    let millis = (magnitude(seconds) * 1000.0).round() as u64;
    let whole = millis / 1000;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        whole / 3600,
        (whole % 3600) / 60,
        whole % 60,
        millis % 1000
    )
}

fn magnitude(seconds: Seconds) -> Seconds {
    if seconds.is_finite() {
        seconds.abs()
    } else {
        0.0
    }
}
