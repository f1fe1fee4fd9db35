//! Dynamic mode controller
//!
//! Keeps `upcoming_count` unplayed tracks queued after the playing one,
//! trims played tracks when cycling, and keeps shuffle off while active.

use super::config::PartyConfig;
use super::strategy::{strategy_for, AppendStrategy, DrawContext};
use crate::error::PartyError;
use crate::model::{CollectionQuery, TrackRef};
use crate::playlist::{InsertCmd, ItemState, PlaylistStore, RemoveCmd};
use std::collections::HashSet;

/// How many recently played tracks seed suggestions
const SUGGESTION_SEEDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyState {
    Off,
    Active,
}

/// Playback options that conflict with the dynamic mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackModes {
    /// Whether the user may turn shuffle on
    pub shuffle_available: bool,
    pub shuffle_on: bool,
    /// Whether "previous track" is offered
    pub previous_available: bool,
}

impl Default for PlaybackModes {
    fn default() -> Self {
        Self {
            shuffle_available: true,
            shuffle_on: false,
            previous_available: true,
        }
    }
}

pub struct PartyController {
    state: PartyState,
    config: PartyConfig,
    strategy: Box<dyn AppendStrategy>,
    modes: PlaybackModes,
    /// Last few tracks played while active, oldest first; suggestion seeds
    history: Vec<TrackRef>,
}

impl PartyController {
    pub fn new(config: PartyConfig) -> Self {
        let strategy = strategy_for(&config);
        Self {
            state: PartyState::Off,
            config,
            strategy,
            modes: PlaybackModes::default(),
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> PartyState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == PartyState::Active
    }

    pub fn config(&self) -> &PartyConfig {
        &self.config
    }

    pub fn modes(&self) -> PlaybackModes {
        self.modes
    }

    pub fn history(&self) -> &[TrackRef] {
        &self.history
    }

    /// Turn shuffle on or off. Refused while the dynamic mode is active.
    pub fn set_shuffle(&mut self, on: bool) -> Result<(), PartyError> {
        if on && !self.modes.shuffle_available {
            return Err(PartyError::ShuffleUnavailable);
        }
        self.modes.shuffle_on = on;
        Ok(())
    }

    /// Off -> Active: shuffle goes off and becomes unavailable, then the
    /// playlist is repopulated. Returns the number of tracks appended.
    pub fn enable(&mut self, store: &mut PlaylistStore, collection: &dyn CollectionQuery) -> usize {
        self.modes.shuffle_on = false;
        self.modes.shuffle_available = false;
        self.modes.previous_available = false;
        if !self.is_active() {
            log::info!("dynamic mode enabled ({})", self.config.append_type);
            self.state = PartyState::Active;
        }
        self.repopulate(store, collection)
    }

    /// Active -> Off: shuffle becomes available again (left off) and every
    /// history mark is cleared.
    pub fn disable(&mut self, store: &mut PlaylistStore) {
        if self.is_active() {
            log::info!("dynamic mode disabled");
        }
        self.state = PartyState::Off;
        self.modes.shuffle_available = true;
        self.modes.shuffle_on = false;
        self.modes.previous_available = true;
        store.clear_history_marks();
        self.history.clear();
    }

    /// Unplayed rows after the active row (all rows when none is active)
    pub fn unplayed_ahead(&self, store: &PlaylistStore) -> usize {
        let start = store.active_row().map_or(0, |row| row + 1);
        (start..store.row_count())
            .filter(|&row| store.state_of_row(row) != ItemState::Played)
            .count()
    }

    /// Top the playlist up to `upcoming_count` unplayed tracks and trim
    /// history. Calling it again without a playlist change appends nothing.
    pub fn repopulate(&mut self, store: &mut PlaylistStore, collection: &dyn CollectionQuery) -> usize {
        if !self.is_active() {
            log::debug!("repopulate ignored, dynamic mode is off");
            return 0;
        }
        let deficit = self
            .config
            .upcoming_count
            .saturating_sub(self.unplayed_ahead(store));
        let appended = self.append(store, collection, deficit);
        self.trim_history(store);
        appended
    }

    /// Append `append_count` tracks regardless of how many are queued
    pub fn append_tracks(&mut self, store: &mut PlaylistStore, collection: &dyn CollectionQuery) -> usize {
        if !self.is_active() {
            return 0;
        }
        let count = self.config.append_count;
        self.append(store, collection, count)
    }

    /// Extend the Custom list with more track ids
    pub fn replenish_custom(&mut self, ids: Vec<String>) {
        log::debug!("replenishing custom list with {} tracks", ids.len());
        self.strategy.replenish(ids);
    }

    /// Playback moved on to `row`
    pub fn track_advanced(
        &mut self,
        store: &mut PlaylistStore,
        collection: &dyn CollectionQuery,
        row: usize,
    ) -> usize {
        store.set_active_row(Some(row));
        let Some(track) = store.active_track().cloned() else {
            return 0;
        };
        if !self.is_active() {
            return 0;
        }
        self.history.push(track);
        if self.history.len() > SUGGESTION_SEEDS {
            self.history.remove(0);
        }
        if self.config.mark_history {
            store.mark_history_before_active();
        }
        self.repopulate(store, collection)
    }

    /// Switch to a new configuration.
    ///
    /// Ignored (returns false) when the collection is empty. Count changes
    /// and the cycling and history-marking switches take effect on the
    /// playlist immediately while active.
    pub fn apply_config(
        &mut self,
        store: &mut PlaylistStore,
        collection: &dyn CollectionQuery,
        config: PartyConfig,
    ) -> bool {
        if collection.is_empty() {
            log::warn!("collection is empty, dynamic mode settings not applied");
            return false;
        }
        let old = std::mem::replace(&mut self.config, config);

        if old.append_type != self.config.append_type || old.custom_list != self.config.custom_list {
            log::debug!("switching append strategy to {}", self.config.append_type);
            self.strategy = strategy_for(&self.config);
        }
        if !self.is_active() {
            return true;
        }
        if old.mark_history != self.config.mark_history {
            if self.config.mark_history {
                store.mark_history_before_active();
            } else {
                store.clear_history_marks();
            }
        }
        if old.previous_count != self.config.previous_count
            || (self.config.cycle_tracks && !old.cycle_tracks)
        {
            self.trim_history(store);
        }
        if self.config.upcoming_count < old.upcoming_count {
            self.trim_upcoming(store);
        } else if self.config.upcoming_count > old.upcoming_count {
            self.repopulate(store, collection);
        }
        true
    }

    fn append(&mut self, store: &mut PlaylistStore, collection: &dyn CollectionQuery, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        // Queued rows, plus marked history rows when marking is on
        let queued_from = store.active_row().unwrap_or(0);
        let mark_history = self.config.mark_history;
        let exclude: HashSet<String> = store
            .items()
            .enumerate()
            .filter(|(row, item)| {
                *row >= queued_from || (mark_history && item.is_history_marked())
            })
            .map(|(_, item)| item.track().id.clone())
            .collect();
        let ctx = DrawContext {
            exclude,
            recent: &self.history,
        };

        let tracks = self.strategy.next_tracks(collection, &ctx, count);
        if tracks.len() < count {
            log::warn!("only {} of {} tracks available to append", tracks.len(), count);
        }
        let start = store.row_count();
        let cmds = tracks
            .into_iter()
            .enumerate()
            .map(|(i, track)| InsertCmd::new(track, start + i))
            .collect();
        let report = store.insert_tracks(cmds);
        log::debug!("appended {} tracks", report.applied);
        report.applied
    }

    /// Drop played rows beyond `previous_count` from the front
    fn trim_history(&mut self, store: &mut PlaylistStore) {
        if !self.config.cycle_tracks {
            return;
        }
        let Some(active) = store.active_row() else {
            return;
        };
        let excess = active.saturating_sub(self.config.previous_count);
        if excess == 0 {
            return;
        }
        let cmds = (0..excess)
            .filter_map(|row| store.track_at(row).map(|t| RemoveCmd::new(TrackRef::clone(t), row)))
            .collect();
        let report = store.remove_tracks(cmds);
        log::debug!("trimmed {} played tracks", report.applied);
    }

    /// Remove unplayed rows from the end until `upcoming_count` remain
    fn trim_upcoming(&mut self, store: &mut PlaylistStore) {
        let excess = self
            .unplayed_ahead(store)
            .saturating_sub(self.config.upcoming_count);
        if excess == 0 {
            return;
        }
        let start = store.active_row().map_or(0, |row| row + 1);
        let cmds: Vec<RemoveCmd> = (start..store.row_count())
            .rev()
            .filter(|&row| store.state_of_row(row) != ItemState::Played)
            .take(excess)
            .filter_map(|row| store.track_at(row).map(|t| RemoveCmd::new(TrackRef::clone(t), row)))
            .collect();
        let report = store.remove_tracks(cmds);
        log::debug!("dropped {} surplus upcoming tracks", report.applied);
    }
}
