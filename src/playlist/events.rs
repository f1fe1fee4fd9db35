//! Change notifications emitted by the playlist store
//!
//! Row ranges are inclusive. Within a batch, events are queued only after
//! the batch's state changes are complete, and row-level events come in
//! nondecreasing row order.

use super::ItemId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    RowsInserted { first: usize, last: usize },
    RowsRemoved { first: usize, last: usize },
    DataChanged { first: usize, last: usize },
    InsertedIds(Vec<ItemId>),
    RemovedIds(Vec<ItemId>),
    /// `None` when nothing is active
    ActiveTrackChanged(Option<ItemId>),
    ActiveRowChanged(Option<usize>),
}

impl ModelEvent {
    pub(crate) fn row_changed(row: usize) -> Self {
        ModelEvent::DataChanged {
            first: row,
            last: row,
        }
    }
}
