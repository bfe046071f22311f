//! Waveform widgets for clipcue playback views
//!
//! This crate turns precomputed amplitude samples into bars ready to paint
//! and keeps them fresh while media plays. It never touches a drawing
//! surface: the host paints the [`RenderedBar`]s however it likes.
//!
//! ## Features
//!
//! - **Bar computation**: downsampling and dynamic-range normalization
//! - **Theme**: played/unplayed bar colours and display settings
//! - **Redraw task**: fixed-cadence recomputation on a tokio interval that
//!   stops with its handle

pub mod error;
pub mod redraw;
pub mod theme;
pub mod waveform;

pub use error::{RenderError, RenderResult};
pub use redraw::{spawn_redraw, RedrawHandle};
pub use theme::{Rgba, WaveformConfig, PLAYED_COLOR, UNPLAYED_COLOR};
pub use waveform::{compute_bars, compute_bars_with_epsilon, RenderedBar, DEFAULT_EPSILON};
