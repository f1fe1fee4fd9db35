//! Internal Rhythmbox data structures for XML parsing

use crate::model::track::uri_to_path;
use crate::model::Track;
use std::path::PathBuf;

/// Rhythmbox song entry (as stored in rhythmdb.xml)
#[derive(Debug, Clone, Default)]
pub struct RhythmboxEntry {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub track_number: Option<u32>,
    pub duration: Option<u64>,    // seconds
    pub location: Option<String>, // file:// URI
    pub year: Option<u32>,
}

impl RhythmboxEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        self.location.as_deref().and_then(uri_to_path)
    }

    /// Convert to a collection track. Entries without a title or a local
    /// location are dropped.
    pub fn into_track(self) -> Option<Track> {
        let file_path = self.file_path()?;
        let title = self.title?;
        let mut track = Track::new(
            title,
            self.artist.unwrap_or_else(|| "Unknown Artist".to_string()),
            self.album.unwrap_or_else(|| "Unknown Album".to_string()),
            self.duration.unwrap_or(0) * 1000,
            file_path,
        );
        track.genre = self.genre;
        track.track_number = self.track_number;
        track.year = self.year;
        Some(track)
    }
}
