//! Ordered playlist store
//!
//! Holds the ordered list of playlist items, the active (playing) row and
//! the running total length. Mutation batches live in `commands.rs`.

use super::events::ModelEvent;
use super::item::{ItemId, ItemState, PlaylistItem};
use crate::model::{Track, TrackRef};
use std::collections::HashMap;

/// The playlist: ordered items plus an id index for O(1) lookups
#[derive(Debug, Default)]
pub struct PlaylistStore {
    /// Row order, as item ids
    pub(super) order: Vec<ItemId>,

    /// Owner of every item, keyed by id
    pub(super) items: HashMap<ItemId, PlaylistItem>,

    pub(super) active_row: Option<usize>,

    /// Sum of the lengths of all present items
    pub(super) total_length_ms: u64,

    /// Last id handed out; ids start at 1
    next_id: u64,

    /// How many rows reference each track id, for metadata notifications
    subscriptions: HashMap<String, usize>,

    /// Track the playback engine reports as playing
    pub(super) now_playing: Option<String>,

    pending_events: Vec<ModelEvent>,
}

impl PlaylistStore {
    /// Create an empty playlist
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn row_exists(&self, row: usize) -> bool {
        row < self.order.len()
    }

    /// Item at a row
    pub fn item_at(&self, row: usize) -> Option<&PlaylistItem> {
        self.order.get(row).and_then(|id| self.items.get(id))
    }

    pub fn track_at(&self, row: usize) -> Option<&TrackRef> {
        self.item_at(row).map(|item| item.track())
    }

    pub fn id_at(&self, row: usize) -> Option<ItemId> {
        self.order.get(row).copied()
    }

    /// First row holding `track`
    pub fn row_for_track(&self, track: &Track) -> Option<usize> {
        self.order.iter().position(|id| {
            self.items
                .get(id)
                .is_some_and(|item| item.track().id == track.id)
        })
    }

    pub fn contains_track(&self, track: &Track) -> bool {
        self.row_for_track(track).is_some()
    }

    pub fn contains_id(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn row_for_id(&self, id: ItemId) -> Option<usize> {
        if !self.contains_id(id) {
            return None;
        }
        self.order.iter().position(|&other| other == id)
    }

    pub fn track_for_id(&self, id: ItemId) -> Option<&TrackRef> {
        self.items.get(&id).map(|item| item.track())
    }

    pub fn active_row(&self) -> Option<usize> {
        self.active_row
    }

    pub fn active_track(&self) -> Option<&TrackRef> {
        self.active_row.and_then(|row| self.track_at(row))
    }

    pub fn active_id(&self) -> Option<ItemId> {
        self.active_row.and_then(|row| self.id_at(row))
    }

    pub fn state_of_row(&self, row: usize) -> ItemState {
        self.item_at(row)
            .map(|item| item.state())
            .unwrap_or(ItemState::Invalid)
    }

    pub fn state_of_id(&self, id: ItemId) -> ItemState {
        self.items
            .get(&id)
            .map(|item| item.state())
            .unwrap_or(ItemState::Invalid)
    }

    pub fn is_history_marked(&self, row: usize) -> bool {
        self.item_at(row).is_some_and(|item| item.is_history_marked())
    }

    /// Total length of all rows, in milliseconds
    pub fn total_length_ms(&self) -> u64 {
        self.total_length_ms
    }

    /// Items in row order
    pub fn items(&self) -> impl Iterator<Item = &PlaylistItem> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Tracks in row order
    pub fn tracks(&self) -> Vec<TrackRef> {
        self.items().map(|item| TrackRef::clone(item.track())).collect()
    }

    /// Make `row` the playing row.
    ///
    /// A valid row is marked played. Anything else clears the active row.
    /// Notifications are emitted even when the row does not change.
    pub fn set_active_row(&mut self, row: Option<usize>) {
        match row.filter(|&r| self.row_exists(r)) {
            Some(row) => {
                let id = self.order[row];
                if let Some(item) = self.items.get_mut(&id) {
                    item.set_state(ItemState::Played);
                }
                let old = self.active_row;
                self.active_row = Some(row);

                if let Some(old) = old.filter(|&r| self.row_exists(r)) {
                    self.push_event(ModelEvent::row_changed(old));
                }
                self.push_event(ModelEvent::row_changed(row));
                self.push_event(ModelEvent::ActiveTrackChanged(Some(id)));
            }
            None => {
                self.active_row = None;
                self.push_event(ModelEvent::ActiveTrackChanged(None));
            }
        }
        self.push_event(ModelEvent::ActiveRowChanged(self.active_row));
    }

    /// Record the track the playback engine is currently playing.
    ///
    /// Used by insert batches to pick an active row when none is set.
    pub fn set_now_playing(&mut self, track_id: Option<String>) {
        self.now_playing = track_id;
    }

    pub fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    /// A track's metadata changed; refresh the first row showing it
    pub fn metadata_changed(&mut self, track_id: &str) {
        if !self.subscriptions.contains_key(track_id) {
            return;
        }
        if let Some(row) = self.order.iter().position(|id| {
            self.items
                .get(id)
                .is_some_and(|item| item.track().id == track_id)
        }) {
            log::debug!("metadata changed for row {}", row);
            self.push_event(ModelEvent::row_changed(row));
        }
    }

    /// An album's metadata changed; refresh every track of it in the playlist
    pub fn album_metadata_changed(&mut self, album: &str) {
        let mut track_ids: Vec<String> = self
            .items()
            .filter(|item| item.track().album == album)
            .map(|item| item.track().id.clone())
            .collect();
        track_ids.dedup();
        for id in track_ids {
            self.metadata_changed(&id);
        }
    }

    /// Mark every row before the active row as history
    pub fn mark_history_before_active(&mut self) {
        let Some(active) = self.active_row else {
            return;
        };
        let changed = self.set_history_marks(0..active, true);
        self.emit_rows_changed(changed);
    }

    /// Clear every history mark
    pub fn clear_history_marks(&mut self) {
        let changed = self.set_history_marks(0..self.order.len(), false);
        self.emit_rows_changed(changed);
    }

    fn set_history_marks(&mut self, rows: std::ops::Range<usize>, marked: bool) -> Vec<usize> {
        let mut changed = Vec::new();
        for row in rows {
            let id = self.order[row];
            if let Some(item) = self.items.get_mut(&id) {
                if item.is_history_marked() != marked {
                    item.set_history_marked(marked);
                    changed.push(row);
                }
            }
        }
        changed
    }

    /// Drain the notifications queued since the last call
    pub fn take_events(&mut self) -> Vec<ModelEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub(super) fn push_event(&mut self, event: ModelEvent) {
        self.pending_events.push(event);
    }

    pub(super) fn emit_rows_changed(&mut self, rows: Vec<usize>) {
        for row in rows {
            self.push_event(ModelEvent::row_changed(row));
        }
    }

    pub(super) fn allocate_id(&mut self) -> ItemId {
        self.next_id += 1;
        ItemId(self.next_id)
    }

    pub(super) fn subscribe(&mut self, track: &Track) {
        *self.subscriptions.entry(track.id.clone()).or_insert(0) += 1;
    }

    pub(super) fn unsubscribe(&mut self, track: &Track) {
        if let Some(count) = self.subscriptions.get_mut(&track.id) {
            *count -= 1;
            if *count == 0 {
                self.subscriptions.remove(&track.id);
            }
        }
    }

    pub(crate) fn is_subscribed(&self, track_id: &str) -> bool {
        self.subscriptions.contains_key(track_id)
    }
}
