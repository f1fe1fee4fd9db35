//! Build a collection from a directory of audio files
//!
//! Tags are read with lofty; files whose tags can't be read still join the
//! collection under their file name.

use crate::model::{Collection, Track};
use anyhow::{Context, Result};
use lofty::prelude::*;
use lofty::probe::Probe;
use std::path::Path;
use walkdir::WalkDir;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "oga", "opus", "m4a", "wav", "aiff"];

/// Whether a path looks like an audio file we can queue
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Walk `root` and read every audio file found
pub fn scan_directory(root: &Path) -> Result<Vec<Track>> {
    if !root.is_dir() {
        anyhow::bail!("Music directory not found: {:?}", root);
    }

    let mut tracks = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", root))?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_audio_file(path) {
            continue;
        }
        tracks.push(read_track(path));
    }

    log::info!("Scanned {} audio files under {:?}", tracks.len(), root);
    Ok(tracks)
}

/// Scan `root` straight into a collection
pub fn scan_collection(root: &Path) -> Result<Collection> {
    let mut collection = Collection::new();
    for track in scan_directory(root)? {
        collection.add_track(track);
    }
    Ok(collection)
}

/// Read one file's tags, falling back to its file stem
pub fn read_track(path: &Path) -> Track {
    match read_tags(path) {
        Ok(track) => track,
        Err(e) => {
            log::debug!("No usable tags in {:?}: {:#}", path, e);
            Track::new("", "Unknown Artist", "Unknown Album", 0, path)
        }
    }
}

fn read_tags(path: &Path) -> Result<Track> {
    let tagged_file = Probe::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?
        .read()
        .with_context(|| format!("Failed to read tags from: {}", path.display()))?;

    let duration_ms = tagged_file.properties().duration().as_millis() as u64;
    let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
        return Ok(Track::new("", "Unknown Artist", "Unknown Album", duration_ms, path));
    };

    let mut track = Track::new(
        tag.title().map(|s| s.into_owned()).unwrap_or_default(),
        tag.artist()
            .map(|s| s.into_owned())
            .unwrap_or_else(|| "Unknown Artist".to_string()),
        tag.album()
            .map(|s| s.into_owned())
            .unwrap_or_else(|| "Unknown Album".to_string()),
        duration_ms,
        path,
    );
    track.genre = tag.genre().map(|s| s.into_owned());
    track.track_number = tag.track();
    track.year = tag.year();
    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn recognises_audio_extensions() {
        assert!(is_audio_file(Path::new("/m/a.MP3")));
        assert!(is_audio_file(Path::new("/m/a.flac")));
        assert!(!is_audio_file(Path::new("/m/cover.jpg")));
        assert!(!is_audio_file(Path::new("/m/README")));
    }

    #[test]
    fn unreadable_files_fall_back_to_file_name() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("album")).unwrap();
        fs::write(dir.path().join("album").join("Opening Song.mp3"), b"not audio").unwrap();
        fs::write(dir.path().join("album").join("cover.jpg"), b"jpeg").unwrap();

        let tracks = scan_directory(dir.path()).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].pretty_name(), "Opening Song");
        assert_eq!(tracks[0].duration_ms, 0);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(scan_directory(&dir.path().join("nope")).is_err());
    }
}
