//! Engine configuration
//!
//! YAML-backed settings for playback and playlist behaviour, plus the generic
//! loader/saver used by clipcue hosts for their own config types.
//!
//! ```ignore
//! use clipcue_core::config::{default_config_path, load_config, EngineConfig};
//!
//! let config: EngineConfig = load_config(&default_config_path("engine.yaml"));
//! let sequencer = PlaylistSequencer::new(items, &config.playlist, Box::new(SystemClock::new()));
//! ```

mod engine;
mod io;
mod paths;

pub use engine::{EngineConfig, PlaybackConfig, PlaylistConfig};
pub use io::{load_config, save_config};
pub use paths::{default_config_dir, default_config_path};
