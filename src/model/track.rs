use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared handle to a track owned by the collection
pub type TrackRef = Arc<Track>;

/// Represents a single music track with the metadata the playlist needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Stable identifier (md5 of the file path)
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name
    pub album: String,

    /// Genre (optional)
    pub genre: Option<String>,

    /// Track duration in milliseconds
    pub duration_ms: u64,

    /// File path to the audio file
    pub file_path: PathBuf,

    /// Track number in album (optional)
    pub track_number: Option<u32>,

    /// Year/date (optional)
    pub year: Option<u32>,
}

impl Track {
    /// Build a track with the identifier derived from its path
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        duration_ms: u64,
        file_path: impl Into<PathBuf>,
    ) -> Self {
        let file_path = file_path.into();
        Self {
            id: id_for_path(&file_path),
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            genre: None,
            duration_ms,
            file_path,
            track_number: None,
            year: None,
        }
    }

    /// Name shown in the playlist and matched by search
    pub fn pretty_name(&self) -> String {
        if !self.title.trim().is_empty() {
            return self.title.clone();
        }
        self.file_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// `file://` URI for this track, percent-encoded per path segment
    pub fn url(&self) -> String {
        path_to_uri(&self.file_path)
    }

    /// Format duration as M:SS
    pub fn duration_display(&self) -> String {
        let secs = self.duration_ms / 1000;
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

/// Generate the stable track identifier for a file path
pub fn id_for_path(path: &Path) -> String {
    format!("{:x}", md5::compute(path.to_string_lossy().as_bytes()))
}

/// Convert a filesystem path to a `file://` URI
pub fn path_to_uri(path: &Path) -> String {
    let encoded: Vec<String> = path
        .to_string_lossy()
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("file://{}", encoded.join("/"))
}

/// Convert a `file://` URI back to a path
pub fn uri_to_path(uri: &str) -> Option<PathBuf> {
    uri.strip_prefix("file://")
        .and_then(|path| urlencoding::decode(path).ok())
        .map(|decoded| PathBuf::from(decoded.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_display_formats_correctly() {
        let track = Track::new("Test", "Artist", "Album", 185_000, "/music/test.mp3");
        assert_eq!(track.duration_display(), "3:05");
    }

    #[test]
    fn pretty_name_falls_back_to_file_stem() {
        let track = Track::new("", "Artist", "Album", 1000, "/music/Some Song.flac");
        assert_eq!(track.pretty_name(), "Some Song");
    }

    #[test]
    fn uri_round_trips_spaces() {
        let track = Track::new("T", "A", "B", 1000, "/music/My Band/01 Intro.mp3");
        assert_eq!(track.url(), "file:///music/My%20Band/01%20Intro.mp3");
        assert_eq!(uri_to_path(&track.url()), Some(track.file_path.clone()));
    }

    #[test]
    fn id_is_stable_for_same_path() {
        let a = Track::new("A", "X", "Y", 1, "/music/a.mp3");
        let b = Track::new("Other", "Z", "W", 2, "/music/a.mp3");
        assert_eq!(a.id, b.id);
    }
}
