//! Named playlists saved as XSPF files in one directory

use super::xspf::{read_xspf, write_xspf, XspfPlaylist};
use crate::playlist::PlaylistStore;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct PlaylistLibrary {
    dir: PathBuf,
}

impl PlaylistLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        let file_name: String = name
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        self.dir.join(format!("{}.xspf", file_name))
    }

    /// Save the current playlist under `name`, replacing any previous copy
    pub fn save(&self, name: &str, store: &PlaylistStore) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create playlist directory: {:?}", self.dir))?;
        let path = self.path_for(name);
        write_xspf(&path, name, &store.tracks())?;
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<XspfPlaylist> {
        read_xspf(&self.path_for(name))
    }

    /// Names of the saved playlists, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read playlist directory: {:?}", self.dir))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("xspf") {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().into_owned());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Track;
    use crate::playlist::InsertCmd;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn saved_playlists_are_listed_and_loadable() {
        let dir = TempDir::new().unwrap();
        let library = PlaylistLibrary::new(dir.path().join("lists"));
        assert!(library.list().unwrap().is_empty());

        let mut store = PlaylistStore::new();
        let track = Arc::new(Track::new("Song", "Artist", "Album", 1000, "/m/song.mp3"));
        store.insert_tracks(vec![InsertCmd::new(track, 0)]);

        library.save("Late Night", &store).unwrap();
        library.save("AC/DC", &store).unwrap();

        assert_eq!(library.list().unwrap(), vec!["AC_DC", "Late Night"]);
        let loaded = library.load("Late Night").unwrap();
        assert_eq!(loaded.title.as_deref(), Some("Late Night"));
        assert_eq!(loaded.tracks.len(), 1);
    }
}
