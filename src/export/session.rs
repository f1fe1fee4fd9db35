//! Current playlist saved on exit and restored at startup

use super::xspf::{read_xspf, write_xspf};
use crate::model::{Collection, TrackRef};
use crate::playlist::{InsertCmd, PlaylistStore};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SESSION_FILE: &str = "current.xspf";

pub struct Session;

impl Session {
    pub fn path(dir: &Path) -> PathBuf {
        dir.join(SESSION_FILE)
    }

    /// Write the whole playlist to `<dir>/current.xspf`
    pub fn save(store: &PlaylistStore, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create session directory: {:?}", dir))?;
        let path = Self::path(dir);
        write_xspf(&path, "Current Playlist", &store.tracks())?;
        Ok(path)
    }

    /// Append the saved playlist to `store` and re-select the row that was
    /// playing. Locations missing from the collection are restored from the
    /// saved metadata. Returns the number of rows restored.
    pub fn restore(
        dir: &Path,
        collection: &Collection,
        store: &mut PlaylistStore,
        last_playing: Option<usize>,
    ) -> Result<usize> {
        let path = Self::path(dir);
        if !path.exists() {
            log::debug!("No saved session at {:?}", path);
            return Ok(0);
        }

        let saved = read_xspf(&path)?;
        let base = store.row_count();
        let mut cmds = Vec::with_capacity(saved.tracks.len());
        for entry in &saved.tracks {
            let track: Option<TrackRef> = match entry.file_path() {
                Some(file_path) => collection
                    .find_by_path(&file_path)
                    .cloned()
                    .or_else(|| entry.to_track().map(Arc::new)),
                None => None,
            };
            match track {
                Some(track) => cmds.push(InsertCmd::new(track, base + cmds.len())),
                None => log::warn!("Skipping session entry with location {}", entry.location),
            }
        }

        let report = store.insert_tracks(cmds);
        if let Some(row) = last_playing.map(|row| base + row) {
            if store.row_exists(row) {
                store.set_active_row(Some(row));
            }
        }

        log::info!("Restored {} tracks from {:?}", report.applied, path);
        Ok(report.applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Track;
    use tempfile::TempDir;

    #[test]
    fn restore_prefers_collection_tracks() {
        let dir = TempDir::new().unwrap();
        let mut collection = Collection::new();
        let known = collection.add_track(Track::new("Known", "A", "B", 1000, "/m/known.mp3"));
        let stray = Arc::new(Track::new("Stray", "C", "D", 2000, "/m/stray.mp3"));

        let mut store = PlaylistStore::new();
        store.insert_tracks(vec![
            InsertCmd::new(Arc::clone(&known), 0),
            InsertCmd::new(Arc::clone(&stray), 1),
        ]);
        Session::save(&store, dir.path()).unwrap();

        let mut restored = PlaylistStore::new();
        let count = Session::restore(dir.path(), &collection, &mut restored, Some(1)).unwrap();
        assert_eq!(count, 2);
        assert!(Arc::ptr_eq(restored.track_at(0).unwrap(), &known));
        assert_eq!(restored.track_at(1).unwrap().title, "Stray");
        assert_eq!(restored.active_row(), Some(1));
    }

    #[test]
    fn missing_session_restores_nothing() {
        let dir = TempDir::new().unwrap();
        let mut store = PlaylistStore::new();
        let count = Session::restore(dir.path(), &Collection::new(), &mut store, Some(0)).unwrap();
        assert_eq!(count, 0);
        assert_eq!(store.active_row(), None);
    }
}
