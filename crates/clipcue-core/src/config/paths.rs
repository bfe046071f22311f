//! Default locations for clipcue configuration files

use std::path::PathBuf;

/// Directory holding clipcue configuration
///
/// Returns `~/.config/clipcue` on Linux (platform config dir elsewhere), or
/// `./clipcue` when no config dir can be determined.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clipcue")
}

/// Path of a named config file inside [`default_config_dir`]
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}
