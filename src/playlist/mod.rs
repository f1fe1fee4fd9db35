//! Ordered playlist store and its mutation batches

mod commands;
mod events;
mod item;
mod search;
mod store;
mod undo;

pub use commands::{BatchReport, InsertCmd, MoveCmd, RemoveCmd, SkippedEntry};
pub use events::ModelEvent;
pub use item::{ItemId, ItemState, PlaylistItem};
pub use store::PlaylistStore;
pub use undo::UndoStack;
