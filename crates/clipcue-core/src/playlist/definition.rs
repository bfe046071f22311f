//! YAML playlist definitions
//!
//! A definition is what an editor hands to the engine: items with their
//! durations and user-entered trim timecodes.
//!
//! ```yaml
//! title: Conference highlights
//! items:
//!   - source_id: keynote
//!     title: Keynote
//!     duration_seconds: 3600
//!     poster_url: https://cdn.example/keynote.jpg
//!     trim_start: "00:05:00"
//!     trim_end: "00:25:30.5"
//!   - source_id: panel
//!     duration_seconds: 1800
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::trim::TrimWindow;
use crate::types::{PlayableItem, Seconds};

/// A playlist as written in a definition file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistDefinition {
    pub title: String,
    pub items: Vec<ItemDefinition>,
}

/// One item of a [`PlaylistDefinition`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub source_id: String,
    #[serde(default)]
    pub title: String,
    pub duration_seconds: Seconds,
    #[serde(default)]
    pub poster_url: Option<String>,
    /// `HH:MM:SS[.fff]`, absent or blank for "from the beginning"
    #[serde(default)]
    pub trim_start: Option<String>,
    /// `HH:MM:SS[.fff]`, absent or blank for "until the end"
    #[serde(default)]
    pub trim_end: Option<String>,
}

impl ItemDefinition {
    /// Parse the trim timecodes and build the playable item
    ///
    /// Malformed timecodes fail; an out-of-range window is adopted with a
    /// warning like any other advisory violation.
    pub fn to_item(&self) -> EngineResult<PlayableItem> {
        let window = TrimWindow::from_timecodes(
            self.trim_start.as_deref().unwrap_or(""),
            self.trim_end.as_deref().unwrap_or(""),
        )?;

        let title = if self.title.is_empty() {
            self.source_id.clone()
        } else {
            self.title.clone()
        };

        let mut item = PlayableItem::new(self.source_id.clone(), title, self.duration_seconds);
        if let Some(url) = &self.poster_url {
            item = item.with_poster(url.clone());
        }
        Ok(item.with_trim_window(window))
    }
}

impl PlaylistDefinition {
    /// Build all items, naming the first item that fails
    pub fn build(&self) -> Result<Vec<PlayableItem>> {
        self.items
            .iter()
            .enumerate()
            .map(|(idx, def)| {
                def.to_item()
                    .with_context(|| format!("Playlist item {} ({:?})", idx, def.source_id))
            })
            .collect()
    }
}

/// Read a playlist definition from a YAML file
///
/// Unlike engine config, a missing or broken playlist is an error.
pub fn load_definition(path: &Path) -> Result<PlaylistDefinition> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read playlist definition: {:?}", path))?;
    let definition: PlaylistDefinition = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse playlist definition: {:?}", path))?;

    log::info!(
        "load_definition: {:?} with {} items from {:?}",
        definition.title,
        definition.items.len(),
        path
    );
    Ok(definition)
}
