use crate::model::TrackRef;
use std::fmt;

/// Identifier of a playlist entry. Unique per store and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Play state of a playlist entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Unplayed,
    /// Added by the most recent insert batch
    NewlyAdded,
    Played,
    /// Returned for rows or ids that are not in the playlist
    Invalid,
}

/// One entry of the playlist
#[derive(Debug, Clone)]
pub struct PlaylistItem {
    id: ItemId,
    track: TrackRef,
    state: ItemState,
    history_marked: bool,
}

impl PlaylistItem {
    pub(crate) fn new(id: ItemId, track: TrackRef) -> Self {
        Self {
            id,
            track,
            state: ItemState::NewlyAdded,
            history_marked: false,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn track(&self) -> &TrackRef {
        &self.track
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: ItemState) {
        self.state = state;
    }

    /// History-marked items were already played in dynamic mode and are
    /// shown disabled
    pub fn is_history_marked(&self) -> bool {
        self.history_marked
    }

    pub(crate) fn set_history_marked(&mut self, marked: bool) {
        self.history_marked = marked;
    }
}
