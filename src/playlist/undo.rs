//! Undo/redo for playlist edits

use super::commands::{InsertCmd, MoveCmd, RemoveCmd};
use super::item::ItemId;
use super::store::PlaylistStore;
use crate::model::TrackRef;

/// An edit as it was applied, with what is needed to revert it
#[derive(Debug, Clone)]
enum EditCommand {
    Insert {
        cmds: Vec<InsertCmd>,
        ids: Vec<ItemId>,
    },
    Remove {
        removed: Vec<RemoveCmd>,
        /// Row of the active item, when the edit removed it
        active: Option<usize>,
    },
    Move {
        cmds: Vec<MoveCmd>,
    },
}

/// Records user edits so they can be undone and redone
#[derive(Debug, Default)]
pub struct UndoStack {
    undo: Vec<EditCommand>,
    redo: Vec<EditCommand>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Insert tracks and record the edit
    pub fn insert(&mut self, store: &mut PlaylistStore, cmds: Vec<InsertCmd>) {
        let report = store.insert_tracks(cmds.clone());
        if report.applied > 0 {
            self.push(EditCommand::Insert {
                cmds,
                ids: report.inserted_ids,
            });
        }
    }

    /// Remove rows and record the edit
    pub fn remove(&mut self, store: &mut PlaylistStore, cmds: Vec<RemoveCmd>) {
        let (removed, active) = remove_tracking_active(store, cmds);
        if !removed.is_empty() {
            self.push(EditCommand::Remove { removed, active });
        }
    }

    /// Move rows and record the edit
    pub fn move_rows(&mut self, store: &mut PlaylistStore, cmds: Vec<MoveCmd>) {
        let report = store.move_tracks(cmds.clone(), false);
        if report.applied > 0 {
            self.push(EditCommand::Move { cmds });
        }
    }

    /// Revert the most recent edit. Returns false when there is none.
    pub fn undo(&mut self, store: &mut PlaylistStore) -> bool {
        let Some(edit) = self.undo.pop() else {
            return false;
        };
        log::debug!("undo {}", edit_name(&edit));
        let redo = match edit {
            EditCommand::Insert { cmds, ids } => {
                let removals = ids
                    .iter()
                    .filter_map(|&id| {
                        let row = store.row_for_id(id)?;
                        let track = TrackRef::clone(store.track_for_id(id)?);
                        Some(RemoveCmd::new(track, row))
                    })
                    .collect();
                store.remove_tracks(removals);
                EditCommand::Insert {
                    cmds,
                    ids: Vec::new(),
                }
            }
            EditCommand::Remove { removed, active } => {
                let inserts = removed
                    .iter()
                    .map(|cmd| InsertCmd::new(TrackRef::clone(&cmd.track), cmd.row))
                    .collect();
                store.insert_tracks(inserts);
                if active.is_some() {
                    store.set_active_row(active);
                }
                EditCommand::Remove { removed, active }
            }
            EditCommand::Move { cmds } => {
                store.move_tracks(cmds.clone(), true);
                EditCommand::Move { cmds }
            }
        };
        self.redo.push(redo);
        true
    }

    /// Re-apply the most recently undone edit. Returns false when there is none.
    pub fn redo(&mut self, store: &mut PlaylistStore) -> bool {
        let Some(edit) = self.redo.pop() else {
            return false;
        };
        log::debug!("redo {}", edit_name(&edit));
        let again = match edit {
            EditCommand::Insert { cmds, .. } => {
                let report = store.insert_tracks(cmds.clone());
                EditCommand::Insert {
                    cmds,
                    ids: report.inserted_ids,
                }
            }
            EditCommand::Remove { removed, .. } => {
                let (removed, active) = remove_tracking_active(store, removed);
                EditCommand::Remove { removed, active }
            }
            EditCommand::Move { cmds } => {
                store.move_tracks(cmds.clone(), false);
                EditCommand::Move { cmds }
            }
        };
        self.undo.push(again);
        true
    }

    fn push(&mut self, edit: EditCommand) {
        self.undo.push(edit);
        self.redo.clear();
    }
}

/// Apply a remove batch, also returning the active row if it was removed
fn remove_tracking_active(
    store: &mut PlaylistStore,
    cmds: Vec<RemoveCmd>,
) -> (Vec<RemoveCmd>, Option<usize>) {
    let active = store.active_row();
    let report = store.remove_tracks(cmds);
    let active = active.filter(|&row| report.removed.iter().any(|cmd| cmd.row == row));
    (report.removed, active)
}

fn edit_name(edit: &EditCommand) -> &'static str {
    match edit {
        EditCommand::Insert { .. } => "insert",
        EditCommand::Remove { .. } => "remove",
        EditCommand::Move { .. } => "move",
    }
}
