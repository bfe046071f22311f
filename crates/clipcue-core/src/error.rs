//! Engine error types

use thiserror::Error;

/// Errors raised by the trim and playlist engine
///
/// All of these are recoverable rejections of bad arguments; none of them
/// should end a playback session. Trim window violations are not errors and
/// are reported as [`crate::trim::ViolationKind`] lists instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Timecode text is not `HH:MM:SS[.fff]` or has a non-numeric field
    #[error("Malformed timecode {input:?}: {reason}")]
    MalformedTimecode { input: String, reason: String },

    /// Playlist navigation to an index that does not exist
    #[error("Playlist index {index} out of range (playlist has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },
}

impl EngineError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTimecode {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
