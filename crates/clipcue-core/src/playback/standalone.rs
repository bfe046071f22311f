//! Single-item playback with an enforced trim window

use serde::{Deserialize, Serialize};

use super::{
    BoundaryReached, IndicatorGeometry, PlaybackCommand, PlaybackWindowController, PlayerHandle,
};
use crate::trim::{TrimWindow, ViolationKind};
use crate::types::{PlayableItem, Seconds};

/// What a standalone player does when the playhead reaches the window end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryAction {
    /// Pause and rewind to the window start
    #[default]
    Stop,
    /// Jump back to the window start and keep playing
    Loop,
    /// Issue no command; the caller handles the returned signal
    Signal,
}

/// Drives one item outside of any playlist
#[derive(Debug, Clone)]
pub struct TrimmedPlayback {
    item: PlayableItem,
    controller: PlaybackWindowController,
    action: BoundaryAction,
}

impl TrimmedPlayback {
    pub fn new(item: PlayableItem, action: BoundaryAction) -> Self {
        let controller = PlaybackWindowController::for_item(&item);
        Self {
            item,
            controller,
            action,
        }
    }

    pub fn item(&self) -> &PlayableItem {
        &self.item
    }

    pub fn controller(&self) -> &PlaybackWindowController {
        &self.controller
    }

    pub fn indicator_geometry(&self) -> IndicatorGeometry {
        self.controller.indicator_geometry()
    }

    pub fn boundary_action(&self) -> BoundaryAction {
        self.action
    }

    pub fn set_boundary_action(&mut self, action: BoundaryAction) {
        self.action = action;
    }

    /// Replace the trim window of the item (advisory validation)
    pub fn set_trim_window(&mut self, window: TrimWindow) -> Vec<ViolationKind> {
        let violations = self.item.set_trim_window(window);
        self.controller.set_window(window);
        violations
    }

    /// Load the item into the player, cued to the window start
    pub fn load(&self, player: &mut impl PlayerHandle) {
        player.dispatch(PlaybackCommand::Load {
            source_id: self.item.source_id.clone(),
            poster_url: self.item.poster_url.clone(),
        });
        let start = self.controller.effective_start();
        if start > 0.0 {
            player.dispatch(PlaybackCommand::SeekTo(start));
        }
    }

    /// Start playback from `position`, moving into the window first if needed
    pub fn request_play(&mut self, position: Seconds, player: &mut impl PlayerHandle) {
        let window = self.controller.window();
        if !window.contains(position, self.controller.total_duration()) {
            player.dispatch(PlaybackCommand::SeekTo(window.effective_start()));
        }
        player.dispatch(PlaybackCommand::RequestPlay);
    }

    /// Feed a position tick and apply the boundary action on a crossing
    pub fn on_position_tick(
        &mut self,
        position: Seconds,
        total_duration: Seconds,
        player: &mut impl PlayerHandle,
    ) -> Option<BoundaryReached> {
        let signal = self.controller.on_position_tick(position, total_duration)?;
        match self.action {
            BoundaryAction::Stop => {
                player.dispatch(PlaybackCommand::Pause);
                player.dispatch(PlaybackCommand::SeekTo(signal.start));
            }
            BoundaryAction::Loop => player.dispatch(PlaybackCommand::SeekTo(signal.start)),
            BoundaryAction::Signal => {}
        }
        Some(signal)
    }

    /// Handle the player's own end-of-media event
    ///
    /// The media can end before a tick lands on the window end (open end,
    /// coarse ticks), so the boundary action is applied here as well.
    pub fn on_natural_end(&mut self, player: &mut impl PlayerHandle) {
        let start = self.controller.effective_start();
        match self.action {
            BoundaryAction::Stop => player.dispatch(PlaybackCommand::SeekTo(start)),
            BoundaryAction::Loop => {
                player.dispatch(PlaybackCommand::SeekTo(start));
                player.dispatch(PlaybackCommand::RequestPlay);
            }
            BoundaryAction::Signal => {}
        }
    }
}
