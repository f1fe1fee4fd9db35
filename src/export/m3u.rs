//! Extended M3U writer

use crate::model::TrackRef;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Render tracks as extended M3U text
pub fn render_m3u(tracks: &[TrackRef]) -> String {
    let mut out = String::from("#EXTM3U\n");
    for track in tracks {
        let secs = if track.duration_ms == 0 {
            -1
        } else {
            (track.duration_ms / 1000) as i64
        };
        out.push_str(&format!(
            "#EXTINF:{},{} - {}\n",
            secs,
            track.artist,
            track.pretty_name()
        ));
        out.push_str(&format!("{}\n", track.file_path.display()));
    }
    out
}

pub fn write_m3u(path: &Path, tracks: &[TrackRef]) -> Result<()> {
    fs::write(path, render_m3u(tracks))
        .with_context(|| format!("Failed to write M3U playlist: {:?}", path))?;
    log::info!("Wrote {} tracks to {:?}", tracks.len(), path);
    Ok(())
}
