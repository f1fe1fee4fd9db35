//! Party Queue - a playlist with a self-filling dynamic mode
//!
//! This library keeps an ordered playlist of tracks, applies batched
//! insert/remove/move edits with change notifications, and runs a "party"
//! mode that tops the playlist up from a music collection.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod party;
pub mod playlist;
pub mod rhythmbox;
pub mod scan;

pub use config::{AppConfig, SessionConfig};
pub use error::{ConfigError, PartyError, ReferenceError};
pub use model::{Collection, CollectionQuery, Track, TrackRef};
pub use party::{AppendType, PartyConfig, PartyController, PartySettings};
pub use playlist::{InsertCmd, MoveCmd, PlaylistStore, RemoveCmd};
