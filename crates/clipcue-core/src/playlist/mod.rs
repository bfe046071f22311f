//! Playlist sequencing
//!
//! [`PlaylistSequencer`] plays an ordered list of items, each with its own
//! trim window and poster. It reacts to the same two host events as a
//! standalone player (position ticks and natural end) and decides when the
//! active item is finished:
//!
//! - an item with an explicit window end finishes when the playhead crosses
//!   it; the sequencer pauses the player there, which stands in for the media
//!   ending
//! - any other item finishes on the player's natural end event
//!
//! A finished item schedules an advance `advance_delay` later. The deadline is
//! checked by [`PlaylistSequencer::poll`] against an injected [`Clock`], so the
//! delay is deterministic under test and cancelling it is just clearing a
//! field. After [`PlaylistSequencer::teardown`] a late poll does nothing.

mod clock;
mod definition;

pub use clock::{Clock, ManualClock, SystemClock};
pub use definition::{load_definition, ItemDefinition, PlaylistDefinition};

use std::time::Duration;

use crate::config::PlaylistConfig;
use crate::error::{EngineError, EngineResult};
use crate::playback::{
    BoundaryReached, IndicatorGeometry, PlaybackCommand, PlaybackWindowController, PlayerHandle,
    WindowState,
};
use crate::trim::{TrimWindow, ViolationKind};
use crate::types::{PlayableItem, Seconds};

/// Result of a step through the playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// A new item is active
    Advanced { index: usize },
    /// No item in that direction; the active item is unchanged
    Finished,
}

/// Ordered playback across a list of items
pub struct PlaylistSequencer {
    items: Vec<PlayableItem>,
    /// Meaningless while `items` is empty
    active_index: usize,
    /// Window controller of the active item (fresh per item)
    controller: PlaybackWindowController,
    clock: Box<dyn Clock>,
    advance_delay: Duration,
    wrap_around: bool,
    /// Active item crossed its window end
    boundary_reached: bool,
    /// Active item's media ended (or was paused at its window end)
    natural_end: bool,
    /// Clock time at which the scheduled advance fires
    pending_advance: Option<Duration>,
    torn_down: bool,
}

impl PlaylistSequencer {
    /// Create a sequencer with the first item active
    pub fn new(items: Vec<PlayableItem>, config: &PlaylistConfig, clock: Box<dyn Clock>) -> Self {
        let controller = items
            .first()
            .map(PlaybackWindowController::for_item)
            .unwrap_or_else(|| PlaybackWindowController::new(0.0));

        log::debug!("PlaylistSequencer::new: {} items", items.len());

        Self {
            items,
            active_index: 0,
            controller,
            clock,
            advance_delay: config.advance_delay(),
            wrap_around: config.wrap_around,
            boundary_reached: false,
            natural_end: false,
            pending_advance: None,
            torn_down: false,
        }
    }

    /// Create a sequencer driven by the system clock
    pub fn with_system_clock(items: Vec<PlayableItem>, config: &PlaylistConfig) -> Self {
        Self::new(items, config, Box::new(SystemClock::new()))
    }

    // ─────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────

    /// The active item, or `None` for an empty playlist
    pub fn current_item(&self) -> Option<&PlayableItem> {
        self.items.get(self.active_index)
    }

    /// Index of the active item, or `None` for an empty playlist
    pub fn active_index(&self) -> Option<usize> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.active_index)
        }
    }

    /// Poster of the active item, for display while not playing
    pub fn current_poster(&self) -> Option<&str> {
        self.current_item().and_then(|item| item.poster_url.as_deref())
    }

    pub fn items(&self) -> &[PlayableItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Window controller of the active item
    pub fn controller(&self) -> &PlaybackWindowController {
        &self.controller
    }

    pub fn indicator_geometry(&self) -> IndicatorGeometry {
        self.controller.indicator_geometry()
    }

    /// Time left until the scheduled advance, if one is pending
    pub fn pending_advance(&self) -> Option<Duration> {
        self.pending_advance
            .map(|deadline| deadline.saturating_sub(self.clock.now()))
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // ─────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────

    /// Replace the trim window of the active item (advisory validation)
    ///
    /// Returns the violations found; the window is adopted regardless.
    pub fn set_active_trim_window(&mut self, window: TrimWindow) -> Vec<ViolationKind> {
        let Some(item) = self.items.get_mut(self.active_index) else {
            return Vec::new();
        };
        let violations = item.set_trim_window(window);
        self.controller.set_window(window);
        if self.pending_advance.is_some() {
            log::debug!("set_active_trim_window: scheduled advance dropped");
        }
        self.reset_finish_state();
        violations
    }

    // ─────────────────────────────────────────────────────────────
    // Host events
    // ─────────────────────────────────────────────────────────────

    /// Load the active item into the player and start it
    pub fn start(&mut self, player: &mut impl PlayerHandle) {
        if self.torn_down || self.items.is_empty() {
            return;
        }
        self.cue_active(player);
    }

    /// Feed a position tick from the player
    ///
    /// Crossing an explicit window end pauses the player and marks the item
    /// finished, which schedules the advance. A tick back inside the window
    /// after a crossing (the host sought backwards) re-arms the item and drops
    /// the scheduled advance.
    pub fn on_position_tick(
        &mut self,
        position: Seconds,
        total_duration: Seconds,
        player: &mut impl PlayerHandle,
    ) -> Option<BoundaryReached> {
        if self.torn_down {
            return None;
        }
        let was_at_boundary = self.controller.state() == WindowState::AtBoundary;
        let Some(signal) = self.controller.on_position_tick(position, total_duration) else {
            if was_at_boundary && self.controller.state() == WindowState::Bounded {
                log::debug!(
                    "on_position_tick: item {} re-armed at {}",
                    self.active_index,
                    position
                );
                self.reset_finish_state();
            }
            return None;
        };
        self.boundary_reached = true;

        if self.controller.window().end.is_some() {
            player.dispatch(PlaybackCommand::Pause);
            self.natural_end = true;
        }
        self.schedule_if_finished();
        Some(signal)
    }

    /// Handle the player's end-of-media event
    pub fn on_natural_end(&mut self) {
        if self.torn_down {
            log::debug!("on_natural_end: ignored after teardown");
            return;
        }
        self.natural_end = true;

        // Media can end before a tick lands on an open or out-of-range end
        if !self.boundary_reached && self.controller.window().is_bounded() {
            log::debug!("on_natural_end: media ended before a boundary tick");
            self.boundary_reached = true;
        }
        self.schedule_if_finished();
    }

    /// Fire the scheduled advance if its deadline has passed
    ///
    /// Call this from the host's event loop or a timer. Returns the outcome
    /// when an advance ran, `None` otherwise (including after teardown).
    pub fn poll(&mut self, player: &mut impl PlayerHandle) -> Option<AdvanceOutcome> {
        if self.torn_down {
            return None;
        }
        let deadline = self.pending_advance?;
        if self.clock.now() < deadline {
            return None;
        }
        self.pending_advance = None;
        Some(self.advance(player))
    }

    /// Drop a scheduled advance without moving
    pub fn cancel_pending(&mut self) {
        if self.pending_advance.take().is_some() {
            log::debug!("cancel_pending: scheduled advance cancelled");
        }
    }

    /// Stop reacting to events; any scheduled advance is dropped
    pub fn teardown(&mut self) {
        self.pending_advance = None;
        self.torn_down = true;
        log::debug!("teardown: sequencer stopped");
    }

    fn schedule_if_finished(&mut self) {
        let finished = self.natural_end
            && (self.boundary_reached || !self.controller.window().is_bounded());
        if !finished || self.pending_advance.is_some() {
            return;
        }
        let deadline = self.clock.now() + self.advance_delay;
        self.pending_advance = Some(deadline);
        log::info!(
            "schedule_if_finished: item {} finished, advancing in {:?}",
            self.active_index,
            self.advance_delay
        );
    }

    // ─────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────

    /// Move to the next item immediately
    ///
    /// At the last item the playlist stops (the active item is unchanged)
    /// unless wrap-around is enabled. Never moves more than one index.
    pub fn advance(&mut self, player: &mut impl PlayerHandle) -> AdvanceOutcome {
        if self.items.is_empty() {
            return AdvanceOutcome::Finished;
        }

        let next = self.active_index + 1;
        let target = if next < self.items.len() {
            next
        } else if self.wrap_around {
            0
        } else {
            log::info!("advance: end of playlist at item {}", self.active_index);
            self.reset_finish_state();
            return AdvanceOutcome::Finished;
        };

        self.adopt(target, player);
        AdvanceOutcome::Advanced { index: target }
    }

    /// Move to the previous item immediately
    pub fn previous(&mut self, player: &mut impl PlayerHandle) -> AdvanceOutcome {
        if self.items.is_empty() {
            return AdvanceOutcome::Finished;
        }

        let target = match self.active_index.checked_sub(1) {
            Some(prev) => prev,
            None if self.wrap_around => self.items.len() - 1,
            None => return AdvanceOutcome::Finished,
        };

        self.adopt(target, player);
        AdvanceOutcome::Advanced { index: target }
    }

    /// Make a specific item active (user selection), skipping any delay
    pub fn jump_to(
        &mut self,
        index: usize,
        player: &mut impl PlayerHandle,
    ) -> EngineResult<&PlayableItem> {
        if index >= self.items.len() {
            return Err(EngineError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.adopt(index, player);
        Ok(&self.items[index])
    }

    fn reset_finish_state(&mut self) {
        self.boundary_reached = false;
        self.natural_end = false;
        self.pending_advance = None;
    }

    /// Make `index` active with a fresh window controller and cue the player
    fn adopt(&mut self, index: usize, player: &mut impl PlayerHandle) {
        self.active_index = index;
        self.controller = PlaybackWindowController::for_item(&self.items[index]);
        self.reset_finish_state();

        log::info!(
            "adopt: item {} ({:?}) window {}",
            index,
            self.items[index].source_id,
            self.controller.window()
        );
        self.cue_active(player);
    }

    fn cue_active(&self, player: &mut impl PlayerHandle) {
        let item = &self.items[self.active_index];
        player.dispatch(PlaybackCommand::Load {
            source_id: item.source_id.clone(),
            poster_url: item.poster_url.clone(),
        });
        let start = self.controller.effective_start();
        if start > 0.0 {
            player.dispatch(PlaybackCommand::SeekTo(start));
        }
        player.dispatch(PlaybackCommand::RequestPlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<PlayableItem> {
        vec![
            PlayableItem::new("a", "First", 60.0)
                .with_poster("a.jpg")
                .with_trim_window(TrimWindow::between(5.0, 20.0)),
            PlayableItem::new("b", "Second", 90.0).with_poster("b.jpg"),
            PlayableItem::new("c", "Third", 30.0)
                .with_poster("c.jpg")
                .with_trim_window(TrimWindow::new(Some(10.0), None)),
        ]
    }

    fn sequencer(clock: &ManualClock) -> PlaylistSequencer {
        PlaylistSequencer::new(items(), &PlaylistConfig::default(), Box::new(clock.clone()))
    }

    #[test]
    fn test_starts_on_first_item() {
        let clock = ManualClock::new();
        let seq = sequencer(&clock);
        assert_eq!(seq.active_index(), Some(0));
        assert_eq!(seq.current_item().unwrap().source_id, "a");
        assert_eq!(seq.current_poster(), Some("a.jpg"));
        assert!((seq.indicator_geometry().left_percent - 5.0 / 60.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_playlist() {
        let mut seq = PlaylistSequencer::with_system_clock(Vec::new(), &PlaylistConfig::default());
        let mut commands = Vec::new();
        assert!(seq.current_item().is_none());
        assert_eq!(seq.active_index(), None);
        assert_eq!(seq.advance(&mut commands), AdvanceOutcome::Finished);
        assert!(matches!(
            seq.jump_to(0, &mut commands),
            Err(EngineError::IndexOutOfRange { index: 0, len: 0 })
        ));
        assert!(commands.is_empty());
    }

    #[test]
    fn test_advance_stops_at_last_item() {
        let clock = ManualClock::new();
        let mut seq = sequencer(&clock);
        let mut commands = Vec::new();

        seq.jump_to(2, &mut commands).unwrap();
        assert_eq!(seq.advance(&mut commands), AdvanceOutcome::Finished);
        assert_eq!(seq.active_index(), Some(2));
        assert_eq!(seq.current_item().unwrap().source_id, "c");
    }

    #[test]
    fn test_advance_moves_one_step() {
        let clock = ManualClock::new();
        let mut seq = sequencer(&clock);
        let mut commands = Vec::new();

        assert_eq!(seq.advance(&mut commands), AdvanceOutcome::Advanced { index: 1 });
        assert_eq!(seq.advance(&mut commands), AdvanceOutcome::Advanced { index: 2 });
        assert_eq!(seq.current_poster(), Some("c.jpg"));
        assert_eq!(seq.controller().window(), TrimWindow::new(Some(10.0), None));
    }

    #[test]
    fn test_wrap_around() {
        let config = PlaylistConfig {
            wrap_around: true,
            ..Default::default()
        };
        let mut seq = PlaylistSequencer::new(items(), &config, Box::new(ManualClock::new()));
        let mut commands = Vec::new();

        seq.jump_to(2, &mut commands).unwrap();
        assert_eq!(seq.advance(&mut commands), AdvanceOutcome::Advanced { index: 0 });
        assert_eq!(seq.previous(&mut commands), AdvanceOutcome::Advanced { index: 2 });
    }

    #[test]
    fn test_previous_stops_at_first_item() {
        let mut seq = sequencer(&ManualClock::new());
        let mut commands = Vec::new();
        assert_eq!(seq.previous(&mut commands), AdvanceOutcome::Finished);
        assert_eq!(seq.active_index(), Some(0));
    }

    #[test]
    fn test_jump_to_out_of_range() {
        let mut seq = sequencer(&ManualClock::new());
        let mut commands = Vec::new();
        let err = seq.jump_to(3, &mut commands).unwrap_err();
        assert_eq!(err, EngineError::IndexOutOfRange { index: 3, len: 3 });
        assert_eq!(seq.active_index(), Some(0));
        assert!(commands.is_empty());
    }

    #[test]
    fn test_jump_to_cues_player() {
        let mut seq = sequencer(&ManualClock::new());
        let mut commands = Vec::new();
        let item = seq.jump_to(2, &mut commands).unwrap();
        assert_eq!(item.title, "Third");
        assert_eq!(
            commands,
            vec![
                PlaybackCommand::Load {
                    source_id: "c".to_string(),
                    poster_url: Some("c.jpg".to_string()),
                },
                PlaybackCommand::SeekTo(10.0),
                PlaybackCommand::RequestPlay,
            ]
        );
    }

    #[test]
    fn test_window_end_schedules_delayed_advance() {
        let clock = ManualClock::new();
        let mut seq = sequencer(&clock);
        let mut commands = Vec::new();

        assert!(seq.on_position_tick(19.0, 60.0, &mut commands).is_none());
        assert!(seq.on_position_tick(20.0, 60.0, &mut commands).is_some());
        assert_eq!(commands, vec![PlaybackCommand::Pause]);
        assert_eq!(seq.pending_advance(), Some(Duration::from_millis(2000)));

        clock.advance(Duration::from_millis(1999));
        assert_eq!(seq.poll(&mut commands), None);
        assert_eq!(seq.active_index(), Some(0));

        clock.advance(Duration::from_millis(1));
        assert_eq!(seq.poll(&mut commands), Some(AdvanceOutcome::Advanced { index: 1 }));
        assert_eq!(seq.current_item().unwrap().source_id, "b");
        assert!(seq.pending_advance().is_none());
        assert_eq!(commands.last(), Some(&PlaybackCommand::RequestPlay));
    }

    #[test]
    fn test_unbounded_item_waits_for_natural_end() {
        let clock = ManualClock::new();
        let mut seq = sequencer(&clock);
        let mut commands = Vec::new();
        seq.jump_to(1, &mut commands).unwrap();

        assert!(seq.on_position_tick(90.0, 90.0, &mut commands).is_none());
        assert!(seq.pending_advance().is_none());

        seq.on_natural_end();
        assert!(seq.pending_advance().is_some());
        clock.advance(Duration::from_secs(2));
        assert_eq!(seq.poll(&mut commands), Some(AdvanceOutcome::Advanced { index: 2 }));
    }

    #[test]
    fn test_open_end_window_needs_natural_end() {
        let clock = ManualClock::new();
        let mut seq = sequencer(&clock);
        let mut commands = Vec::new();
        seq.jump_to(2, &mut commands).unwrap();
        commands.clear();

        // Boundary at the media end: no pause, the player ends by itself
        assert!(seq.on_position_tick(30.0, 30.0, &mut commands).is_some());
        assert!(commands.is_empty());
        assert!(seq.pending_advance().is_none());

        seq.on_natural_end();
        assert!(seq.pending_advance().is_some());
    }

    #[test]
    fn test_advance_at_end_of_list_via_timer() {
        let clock = ManualClock::new();
        let mut seq = sequencer(&clock);
        let mut commands = Vec::new();
        seq.jump_to(2, &mut commands).unwrap();

        seq.on_natural_end();
        clock.advance(Duration::from_secs(5));
        assert_eq!(seq.poll(&mut commands), Some(AdvanceOutcome::Finished));
        assert_eq!(seq.active_index(), Some(2));
        assert!(seq.pending_advance().is_none());
    }

    #[test]
    fn test_teardown_makes_stale_timer_noop() {
        let clock = ManualClock::new();
        let mut seq = sequencer(&clock);
        let mut commands = Vec::new();

        seq.on_position_tick(25.0, 60.0, &mut commands);
        assert!(seq.pending_advance().is_some());

        seq.teardown();
        clock.advance(Duration::from_secs(10));
        assert_eq!(seq.poll(&mut commands), None);
        assert_eq!(seq.active_index(), Some(0));
        assert!(seq.is_torn_down());

        seq.on_natural_end();
        assert!(seq.pending_advance().is_none());
    }

    #[test]
    fn test_jump_cancels_pending_advance() {
        let clock = ManualClock::new();
        let mut seq = sequencer(&clock);
        let mut commands = Vec::new();

        seq.on_position_tick(20.0, 60.0, &mut commands);
        assert!(seq.pending_advance().is_some());

        seq.jump_to(2, &mut commands).unwrap();
        assert!(seq.pending_advance().is_none());
        clock.advance(Duration::from_secs(10));
        assert_eq!(seq.poll(&mut commands), None);
        assert_eq!(seq.active_index(), Some(2));
    }

    #[test]
    fn test_cancel_pending() {
        let clock = ManualClock::new();
        let mut seq = sequencer(&clock);
        let mut commands = Vec::new();
        seq.on_position_tick(20.0, 60.0, &mut commands);

        seq.cancel_pending();
        clock.advance(Duration::from_secs(10));
        assert_eq!(seq.poll(&mut commands), None);
    }

    #[test]
    fn test_set_active_trim_window() {
        let mut seq = sequencer(&ManualClock::new());
        let violations = seq.set_active_trim_window(TrimWindow::between(50.0, 70.0));
        assert_eq!(violations.len(), 1);
        assert_eq!(seq.current_item().unwrap().trim_window(), TrimWindow::between(50.0, 70.0));
        assert_eq!(seq.controller().window(), TrimWindow::between(50.0, 70.0));
    }

    #[test]
    fn test_extending_window_drops_scheduled_advance() {
        let clock = ManualClock::new();
        let mut seq = sequencer(&clock);
        let mut commands = Vec::new();

        seq.on_position_tick(20.0, 60.0, &mut commands);
        assert!(seq.pending_advance().is_some());

        seq.set_active_trim_window(TrimWindow::between(5.0, 50.0));
        assert!(seq.pending_advance().is_none());
        clock.advance(Duration::from_secs(3));
        assert_eq!(seq.poll(&mut commands), None);
        assert_eq!(seq.active_index(), Some(0));

        // The new end still finishes the item
        assert!(seq.on_position_tick(49.0, 60.0, &mut commands).is_none());
        assert!(seq.on_position_tick(50.0, 60.0, &mut commands).is_some());
        assert!(seq.pending_advance().is_some());
        clock.advance(Duration::from_secs(2));
        assert_eq!(seq.poll(&mut commands), Some(AdvanceOutcome::Advanced { index: 1 }));
    }

    #[test]
    fn test_seek_back_inside_window_drops_scheduled_advance() {
        let clock = ManualClock::new();
        let mut seq = sequencer(&clock);
        let mut commands = Vec::new();

        seq.on_position_tick(20.0, 60.0, &mut commands);
        assert!(seq.pending_advance().is_some());

        assert!(seq.on_position_tick(8.0, 60.0, &mut commands).is_none());
        assert_eq!(seq.controller().state(), WindowState::Bounded);
        assert!(seq.pending_advance().is_none());
        clock.advance(Duration::from_secs(5));
        assert_eq!(seq.poll(&mut commands), None);
        assert_eq!(seq.active_index(), Some(0));

        // Crossing again schedules a fresh advance
        assert!(seq.on_position_tick(20.0, 60.0, &mut commands).is_some());
        assert_eq!(seq.pending_advance(), Some(Duration::from_millis(2000)));
    }

    #[test]
    fn test_tick_after_early_media_end_keeps_schedule() {
        let clock = ManualClock::new();
        let items = vec![
            PlayableItem::new("a", "First", 30.0).with_trim_window(TrimWindow::between(5.0, 45.0)),
            PlayableItem::new("b", "Second", 30.0),
        ];
        let mut seq =
            PlaylistSequencer::new(items, &PlaylistConfig::default(), Box::new(clock.clone()));
        let mut commands = Vec::new();

        seq.on_natural_end();
        assert!(seq.pending_advance().is_some());
        assert!(seq.on_position_tick(30.0, 30.0, &mut commands).is_none());
        assert!(seq.pending_advance().is_some());
    }

    #[test]
    fn test_start_cues_first_item() {
        let mut seq = sequencer(&ManualClock::new());
        let mut commands = Vec::new();
        seq.start(&mut commands);
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[1], PlaybackCommand::SeekTo(5.0));
    }
}
