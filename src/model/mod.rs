//! Track and collection model
//!
//! The collection owns every track; playlists only hold shared
//! references to them.

mod collection;
pub mod track;

pub use collection::{Collection, CollectionQuery};
pub use track::{Track, TrackRef};
