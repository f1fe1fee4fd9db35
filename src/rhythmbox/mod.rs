//! Rhythmbox library import
//!
//! Parses Rhythmbox's XML database and playlist files into a collection
//! the dynamic mode can draw from.

mod database;
mod model;
mod playlists;

pub use database::{parse_database, read_entries};
pub use playlists::{parse_playlists, read_playlists, NamedList};

use crate::model::Collection;
use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;

/// Parse a complete Rhythmbox library from its XML files
///
/// # Arguments
/// * `db_path` - Path to rhythmdb.xml (typically ~/.local/share/rhythmbox/rhythmdb.xml)
/// * `playlists_path` - Optional path to playlists.xml
///
/// # Returns
/// The collection and the static playlists found
pub fn parse_library(
    db_path: &Path,
    playlists_path: Option<&Path>,
) -> Result<(Collection, Vec<NamedList>)> {
    log::info!("Parsing Rhythmbox database from {:?}", db_path);
    let tracks = database::parse_database(db_path)?;

    let mut collection = Collection::new();
    for track in tracks {
        collection.add_track(track);
    }

    let lists = match playlists_path {
        Some(path) => {
            log::info!("Parsing Rhythmbox playlists from {:?}", path);
            let known: HashSet<String> = collection.tracks().map(|t| t.id.clone()).collect();
            playlists::parse_playlists(path, &known)?
        }
        None => Vec::new(),
    };

    log::info!(
        "Loaded library: {} tracks, {} playlists",
        collection.track_count(),
        lists.len()
    );

    Ok((collection, lists))
}
