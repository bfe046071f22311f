//! Waveform rendering error types

use thiserror::Error;

/// Errors from waveform computation and redraw scheduling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Bar count must be at least 1
    #[error("Invalid bar count: {0} (must be at least 1)")]
    InvalidBarCount(usize),

    /// Redraw task requested outside of a tokio runtime
    #[error("No tokio runtime available to drive waveform redraws")]
    NoRuntime,
}

/// Result type for waveform operations
pub type RenderResult<T> = Result<T, RenderError>;
