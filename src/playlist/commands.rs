//! Insert, remove and move batches
//!
//! Each batch runs to completion on `&mut PlaylistStore`, so no other batch
//! can interleave with it. Entries that reference rows or tracks that are no
//! longer there are logged and skipped; the rest of the batch still applies.

use super::events::ModelEvent;
use super::item::{ItemId, ItemState, PlaylistItem};
use super::store::PlaylistStore;
use crate::error::ReferenceError;
use crate::model::TrackRef;
use std::collections::HashSet;

/// Insert `track` at `row`
#[derive(Debug, Clone)]
pub struct InsertCmd {
    pub track: TrackRef,
    pub row: usize,
}

impl InsertCmd {
    pub fn new(track: TrackRef, row: usize) -> Self {
        Self { track, row }
    }
}

/// Remove the row `row`, which must hold `track`
#[derive(Debug, Clone)]
pub struct RemoveCmd {
    pub track: TrackRef,
    pub row: usize,
}

impl RemoveCmd {
    pub fn new(track: TrackRef, row: usize) -> Self {
        Self { track, row }
    }
}

/// Place the item at `from` at `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCmd {
    pub from: usize,
    pub to: usize,
}

impl MoveCmd {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

/// A batch entry that was not applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Position of the entry in the batch
    pub index: usize,
    pub error: ReferenceError,
}

/// Outcome of a mutation batch
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Number of entries applied
    pub applied: usize,

    pub skipped: Vec<SkippedEntry>,

    /// Ids created by an insert batch, in command order
    pub inserted_ids: Vec<ItemId>,

    /// Entries removed by a remove batch, with their rows before removal,
    /// in increasing row order
    pub removed: Vec<RemoveCmd>,
}

impl BatchReport {
    /// Whether every entry of the batch was applied
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, index: usize, error: ReferenceError) {
        log::warn!("skipping batch entry {}: {}", index, error);
        self.skipped.push(SkippedEntry { index, error });
    }
}

impl PlaylistStore {
    /// Insert tracks at the given rows.
    ///
    /// Commands apply in order, each against the list as it stands after the
    /// previous one. A row past the end appends.
    pub fn insert_tracks(&mut self, cmds: Vec<InsertCmd>) -> BatchReport {
        let mut report = BatchReport::default();
        if cmds.is_empty() {
            return report;
        }

        let mut events = Vec::new();

        for (row, id) in self.order.iter().enumerate() {
            if let Some(item) = self.items.get_mut(id) {
                if item.state() == ItemState::NewlyAdded {
                    item.set_state(ItemState::Unplayed);
                    events.push(ModelEvent::row_changed(row));
                }
            }
        }

        let mut min = usize::MAX;
        for cmd in cmds {
            let len = self.order.len();
            let row = if cmd.row > len {
                log::warn!(
                    "insert row {} past the end ({} rows), appending",
                    cmd.row,
                    len
                );
                len
            } else {
                cmd.row
            };
            log::debug!("inserting {} at {}", cmd.track.pretty_name(), row);

            let id = self.allocate_id();
            self.total_length_ms += cmd.track.duration_ms;
            self.subscribe(&cmd.track);
            self.order.insert(row, id);
            self.items.insert(id, PlaylistItem::new(id, cmd.track));

            if let Some(active) = self.active_row {
                if row <= active {
                    self.active_row = Some(active + 1);
                }
            }

            events.push(ModelEvent::RowsInserted {
                first: row,
                last: row,
            });
            min = min.min(row);
            report.inserted_ids.push(id);
            report.applied += 1;
        }

        events.push(ModelEvent::DataChanged {
            first: min,
            last: self.order.len() - 1,
        });
        events.push(ModelEvent::InsertedIds(report.inserted_ids.clone()));

        if self.active_row.is_none() {
            if let Some(row) = self.now_playing_row() {
                log::debug!("now playing track found at row {}", row);
                self.active_row = Some(row);
                events.push(ModelEvent::ActiveTrackChanged(self.id_at(row)));
                events.push(ModelEvent::ActiveRowChanged(Some(row)));
            }
        }

        for event in events {
            self.push_event(event);
        }
        report
    }

    /// Remove rows, which need not be contiguous or sorted.
    ///
    /// Targets are located by identity in a private copy of the row order;
    /// the copy then replaces the live order, and only afterwards are the
    /// removed items released.
    pub fn remove_tracks(&mut self, cmds: Vec<RemoveCmd>) -> BatchReport {
        let mut report = BatchReport::default();
        if cmds.is_empty() {
            return report;
        }

        let len = self.order.len();
        let mut seen = HashSet::new();
        let mut targets: Vec<(ItemId, RemoveCmd)> = Vec::new();
        for (index, cmd) in cmds.into_iter().enumerate() {
            let Some(id) = self.id_at(cmd.row) else {
                report.skip(index, ReferenceError::RowOutOfRange { row: cmd.row, len });
                continue;
            };
            if !seen.insert(cmd.row) {
                report.skip(index, ReferenceError::DuplicateRow { row: cmd.row });
                continue;
            }
            let found = &self.items[&id].track().id;
            if *found != cmd.track.id {
                let error = ReferenceError::TrackMismatch {
                    row: cmd.row,
                    expected: cmd.track.pretty_name(),
                    found: self.items[&id].track().pretty_name(),
                };
                report.skip(index, error);
                continue;
            }
            log::debug!("removing {} from {}", cmd.track.pretty_name(), cmd.row);
            targets.push((id, cmd));
        }
        if targets.is_empty() {
            return report;
        }
        targets.sort_by_key(|(_, cmd)| cmd.row);

        let mut events = Vec::new();
        let mut new_order = self.order.clone();
        let mut removed_ids = Vec::new();
        for (id, cmd) in targets {
            match new_order.iter().position(|other| *other == id) {
                Some(idx) => {
                    new_order.remove(idx);
                    events.push(ModelEvent::RowsRemoved {
                        first: idx,
                        last: idx,
                    });
                    removed_ids.push(id);
                    report.removed.push(cmd);
                    report.applied += 1;
                }
                None => log::error!("tried to remove a non-existent item at row {}", cmd.row),
            }
        }

        let old_active = self.active_row;
        let old_active_id = self.active_id();
        self.order = new_order;

        let released: Vec<PlaylistItem> = removed_ids
            .iter()
            .filter_map(|id| self.items.remove(id))
            .collect();
        for item in &released {
            self.total_length_ms = self.total_length_ms.saturating_sub(item.track().duration_ms);
            self.unsubscribe(item.track());
        }
        drop(released);

        self.active_row = match (old_active, old_active_id) {
            (Some(_), Some(id)) if removed_ids.contains(&id) => {
                log::debug!("removed the active track");
                None
            }
            (Some(active), _) => {
                let shift = report.removed.iter().filter(|cmd| cmd.row < active).count();
                Some(active - shift)
            }
            _ => None,
        };

        let min = report.removed.first().map(|cmd| cmd.row).unwrap_or(0);
        if min < self.order.len() {
            events.push(ModelEvent::DataChanged {
                first: min,
                last: self.order.len() - 1,
            });
        }
        events.push(ModelEvent::RemovedIds(removed_ids));
        if self.active_row != old_active {
            if self.active_row.is_none() {
                events.push(ModelEvent::ActiveTrackChanged(None));
            }
            events.push(ModelEvent::ActiveRowChanged(self.active_row));
        }

        for event in events {
            self.push_event(event);
        }
        report
    }

    /// Move rows as a single placement against the current order.
    ///
    /// Every accepted pair puts the item found at `from` before the batch at
    /// `to`; items that are not moved keep their relative order in the
    /// remaining rows. With `reverse` each pair is read as `to -> from`,
    /// which undoes the same batch applied forwards.
    pub fn move_tracks(&mut self, cmds: Vec<MoveCmd>, reverse: bool) -> BatchReport {
        let mut report = BatchReport::default();
        if cmds.is_empty() {
            return report;
        }

        let len = self.order.len();
        let mut sources = HashSet::new();
        let mut destinations = HashSet::new();
        let mut accepted = Vec::new();
        for (index, cmd) in cmds.iter().enumerate() {
            let (from, to) = if reverse {
                (cmd.to, cmd.from)
            } else {
                (cmd.from, cmd.to)
            };
            if from >= len || to >= len {
                let row = from.max(to);
                report.skip(index, ReferenceError::RowOutOfRange { row, len });
            } else if sources.contains(&from) {
                report.skip(index, ReferenceError::DuplicateRow { row: from });
            } else if destinations.contains(&to) {
                report.skip(index, ReferenceError::DuplicateRow { row: to });
            } else {
                log::debug!("moving {} to {}", from, to);
                sources.insert(from);
                destinations.insert(to);
                accepted.push((from, to));
                report.applied += 1;
            }
        }
        if accepted.is_empty() {
            return report;
        }

        let active_id = self.active_id();
        let snapshot = self.order.clone();
        let mut placed: Vec<Option<ItemId>> = vec![None; len];
        for &(from, to) in &accepted {
            placed[to] = Some(snapshot[from]);
        }
        let mut rest = snapshot
            .iter()
            .enumerate()
            .filter(|(row, _)| !sources.contains(row))
            .map(|(_, id)| *id);
        for slot in placed.iter_mut().filter(|slot| slot.is_none()) {
            *slot = rest.next();
        }
        self.order = placed.into_iter().flatten().collect();

        let old_active = self.active_row;
        self.active_row = active_id.and_then(|id| self.row_for_id(id));

        let min = accepted.iter().map(|&(f, t)| f.min(t)).min().unwrap_or(0);
        let max = accepted.iter().map(|&(f, t)| f.max(t)).max().unwrap_or(0);
        self.push_event(ModelEvent::DataChanged {
            first: min,
            last: max,
        });
        if self.active_row != old_active {
            self.push_event(ModelEvent::ActiveRowChanged(self.active_row));
        }
        report
    }

    /// Remove every row
    pub fn clear(&mut self) -> BatchReport {
        let cmds = self
            .items()
            .enumerate()
            .map(|(row, item)| RemoveCmd::new(TrackRef::clone(item.track()), row))
            .collect();
        self.remove_tracks(cmds)
    }

    fn now_playing_row(&self) -> Option<usize> {
        let playing = self.now_playing.as_deref()?;
        self.items().position(|item| item.track().id == playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Track;
    use std::sync::Arc;

    fn track(name: &str, ms: u64) -> TrackRef {
        Arc::new(Track::new(name, "X", "Y", ms, format!("/music/{}.mp3", name)))
    }

    fn titles(store: &PlaylistStore) -> Vec<String> {
        store.items().map(|i| i.track().title.clone()).collect()
    }

    fn abc() -> PlaylistStore {
        let mut store = PlaylistStore::new();
        store.insert_tracks(vec![
            InsertCmd::new(track("A", 1000), 0),
            InsertCmd::new(track("B", 2000), 1),
            InsertCmd::new(track("C", 3000), 2),
        ]);
        store.take_events();
        store
    }

    fn remove_row(store: &PlaylistStore, row: usize) -> RemoveCmd {
        RemoveCmd::new(store.track_at(row).unwrap().clone(), row)
    }

    #[test]
    fn insert_in_middle_reports_span_and_next_id() {
        let mut store = abc();
        let report = store.insert_tracks(vec![InsertCmd::new(track("D", 4000), 1)]);

        assert_eq!(titles(&store), vec!["A", "D", "B", "C"]);
        assert_eq!(report.inserted_ids, vec![ItemId(4)]);
        assert_eq!(store.total_length_ms(), 10_000);

        let events = store.take_events();
        assert!(events.contains(&ModelEvent::DataChanged { first: 1, last: 3 }));
        assert_eq!(events.last(), Some(&ModelEvent::InsertedIds(vec![ItemId(4)])));
    }

    #[test]
    fn insert_demotes_previous_new_items() {
        let mut store = abc();
        assert_eq!(store.state_of_row(0), ItemState::NewlyAdded);
        store.insert_tracks(vec![InsertCmd::new(track("D", 1), 3)]);
        assert_eq!(store.state_of_row(0), ItemState::Unplayed);
        assert_eq!(store.state_of_row(3), ItemState::NewlyAdded);
    }

    #[test]
    fn insert_past_end_appends() {
        let mut store = abc();
        let report = store.insert_tracks(vec![InsertCmd::new(track("Z", 1), 42)]);
        assert!(report.is_complete());
        assert_eq!(titles(&store).last().unwrap(), "Z");
        assert_eq!(store.row_count(), 4);
    }

    #[test]
    fn insert_before_active_shifts_it() {
        let mut store = abc();
        store.set_active_row(Some(1));
        store.insert_tracks(vec![InsertCmd::new(track("D", 1), 0)]);
        assert_eq!(store.active_row(), Some(2));
        assert_eq!(store.active_track().unwrap().title, "B");
    }

    #[test]
    fn insert_activates_now_playing_track() {
        let mut store = PlaylistStore::new();
        let playing = track("Playing", 1000);
        store.set_now_playing(Some(playing.id.clone()));
        store.insert_tracks(vec![
            InsertCmd::new(track("A", 1), 0),
            InsertCmd::new(playing.clone(), 1),
        ]);
        assert_eq!(store.active_row(), Some(1));
    }

    #[test]
    fn remove_before_active_keeps_active_item() {
        let mut store = abc();
        store.set_active_row(Some(1));
        let cmd = remove_row(&store, 0);
        store.remove_tracks(vec![cmd]);

        assert_eq!(titles(&store), vec!["B", "C"]);
        assert_eq!(store.active_row(), Some(0));
        assert_eq!(store.active_id(), Some(ItemId(2)));
        assert_eq!(store.total_length_ms(), 5000);
    }

    #[test]
    fn remove_non_contiguous_unsorted_rows() {
        let mut store = abc();
        store.insert_tracks(vec![InsertCmd::new(track("D", 4000), 3)]);
        store.take_events();

        let cmds = vec![remove_row(&store, 3), remove_row(&store, 0), remove_row(&store, 2)];
        let report = store.remove_tracks(cmds);

        assert_eq!(report.applied, 3);
        assert_eq!(titles(&store), vec!["B"]);
        assert!(store.row_for_id(ItemId(1)).is_none());
        assert_eq!(store.total_length_ms(), 2000);

        let removed: Vec<ModelEvent> = store
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, ModelEvent::RowsRemoved { .. }))
            .collect();
        assert_eq!(
            removed,
            vec![
                ModelEvent::RowsRemoved { first: 0, last: 0 },
                ModelEvent::RowsRemoved { first: 1, last: 1 },
                ModelEvent::RowsRemoved { first: 1, last: 1 },
            ]
        );
    }

    #[test]
    fn remove_active_clears_it() {
        let mut store = abc();
        store.set_active_row(Some(2));
        let cmd = remove_row(&store, 2);
        store.remove_tracks(vec![cmd]);
        assert!(store.active_row().is_none());
    }

    #[test]
    fn remove_skips_stale_entries() {
        let mut store = abc();
        let a = remove_row(&store, 0);
        let wrong = RemoveCmd::new(track("A", 1000), 1);
        let gone = RemoveCmd::new(track("Q", 1), 17);

        let report = store.remove_tracks(vec![a.clone(), a, wrong, gone]);
        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped.len(), 3);
        assert!(matches!(
            report.skipped[0].error,
            ReferenceError::DuplicateRow { row: 0 }
        ));
        assert!(matches!(
            report.skipped[1].error,
            ReferenceError::TrackMismatch { row: 1, .. }
        ));
        assert!(matches!(
            report.skipped[2].error,
            ReferenceError::RowOutOfRange { row: 17, len: 3 }
        ));
        assert_eq!(titles(&store), vec!["B", "C"]);
    }

    #[test]
    fn ids_are_not_recycled() {
        let mut store = abc();
        store.clear();
        let report = store.insert_tracks(vec![InsertCmd::new(track("A", 1), 0)]);
        assert_eq!(report.inserted_ids, vec![ItemId(4)]);
        assert_eq!(store.total_length_ms(), 1);
    }

    #[test]
    fn move_swap_and_reverse_restores() {
        let mut store = abc();
        let before: Vec<_> = store.items().map(|i| i.id()).collect();
        let cmds = vec![MoveCmd::new(0, 2), MoveCmd::new(2, 0)];

        store.move_tracks(cmds.clone(), false);
        assert_eq!(titles(&store), vec!["C", "B", "A"]);

        store.move_tracks(cmds, true);
        let after: Vec<_> = store.items().map(|i| i.id()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn move_single_item_shifts_the_rest() {
        let mut store = abc();
        store.set_active_row(Some(0));
        store.take_events();

        store.move_tracks(vec![MoveCmd::new(0, 2)], false);
        assert_eq!(titles(&store), vec!["B", "C", "A"]);
        assert_eq!(store.active_row(), Some(2));
        assert_eq!(
            store.take_events()[0],
            ModelEvent::DataChanged { first: 0, last: 2 }
        );

        store.move_tracks(vec![MoveCmd::new(0, 2)], true);
        assert_eq!(titles(&store), vec!["A", "B", "C"]);
        assert_eq!(store.active_row(), Some(0));
    }

    #[test]
    fn move_is_independent_of_command_order() {
        let mut first = abc();
        let mut second = abc();
        first.move_tracks(vec![MoveCmd::new(0, 1), MoveCmd::new(2, 0)], false);
        second.move_tracks(vec![MoveCmd::new(2, 0), MoveCmd::new(0, 1)], false);
        assert_eq!(titles(&first), titles(&second));
        assert_eq!(titles(&first), vec!["C", "A", "B"]);
    }

    #[test]
    fn move_skips_bad_pairs() {
        let mut store = abc();
        let report = store.move_tracks(
            vec![MoveCmd::new(0, 1), MoveCmd::new(0, 2), MoveCmd::new(1, 9)],
            false,
        );
        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(titles(&store), vec!["B", "A", "C"]);
    }
}
