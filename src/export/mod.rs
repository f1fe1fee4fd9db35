//! Playlist export and session persistence

mod library;
mod m3u;
mod session;
mod xspf;

pub use library::PlaylistLibrary;
pub use m3u::{render_m3u, write_m3u};
pub use session::Session;
pub use xspf::{parse_xspf, read_xspf, render_xspf, write_xspf, XspfEntry, XspfPlaylist};

use crate::playlist::PlaylistStore;
use anyhow::Result;
use std::path::Path;

/// Write the playlist to `path`, picking the format from the extension
pub fn export_playlist(store: &PlaylistStore, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("m3u") | Some("m3u8") => write_m3u(path, &store.tracks()),
        Some("xspf") => {
            let title = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Playlist".to_string());
            write_xspf(path, &title, &store.tracks())
        }
        _ => anyhow::bail!("Unsupported playlist format: {:?}", path),
    }
}
