//! XSPF (XML Shareable Playlist Format) reader and writer

use crate::model::track::uri_to_path;
use crate::model::{Track, TrackRef};
use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

const XSPF_NS: &str = "http://xspf.org/ns/0/";

/// One `<track>` as read back from an XSPF file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XspfEntry {
    pub location: String,
    pub title: Option<String>,
    pub creator: Option<String>,
    pub album: Option<String>,
    pub duration_ms: Option<u64>,
    pub track_num: Option<u32>,
}

impl XspfEntry {
    pub fn file_path(&self) -> Option<PathBuf> {
        uri_to_path(&self.location)
    }

    /// Build a standalone track from the stored metadata
    pub fn to_track(&self) -> Option<Track> {
        let file_path = self.file_path()?;
        let mut track = Track::new(
            self.title.clone().unwrap_or_default(),
            self.creator
                .clone()
                .unwrap_or_else(|| "Unknown Artist".to_string()),
            self.album
                .clone()
                .unwrap_or_else(|| "Unknown Album".to_string()),
            self.duration_ms.unwrap_or(0),
            file_path,
        );
        track.track_number = self.track_num;
        Some(track)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XspfPlaylist {
    pub title: Option<String>,
    pub tracks: Vec<XspfEntry>,
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Serialize tracks as an XSPF document
pub fn render_xspf(title: &str, tracks: &[TrackRef]) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("playlist").with_attributes([("version", "1"), ("xmlns", XSPF_NS)]),
    ))?;

    text_element(&mut writer, "title", title)?;
    text_element(&mut writer, "date", &chrono::Local::now().to_rfc3339())?;

    writer.write_event(Event::Start(BytesStart::new("trackList")))?;
    for track in tracks {
        writer.write_event(Event::Start(BytesStart::new("track")))?;
        text_element(&mut writer, "location", &track.url())?;
        text_element(&mut writer, "title", &track.pretty_name())?;
        text_element(&mut writer, "creator", &track.artist)?;
        text_element(&mut writer, "album", &track.album)?;
        text_element(&mut writer, "duration", &track.duration_ms.to_string())?;
        if let Some(num) = track.track_number {
            text_element(&mut writer, "trackNum", &num.to_string())?;
        }
        writer.write_event(Event::End(BytesEnd::new("track")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("trackList")))?;
    writer.write_event(Event::End(BytesEnd::new("playlist")))?;

    Ok(writer.into_inner())
}

pub fn write_xspf(path: &Path, title: &str, tracks: &[TrackRef]) -> Result<()> {
    let bytes = render_xspf(title, tracks)?;
    fs::write(path, bytes).with_context(|| format!("Failed to write XSPF playlist: {:?}", path))?;
    log::info!("Wrote {} tracks to {:?}", tracks.len(), path);
    Ok(())
}

pub fn read_xspf(path: &Path) -> Result<XspfPlaylist> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open XSPF playlist: {:?}", path))?;
    parse_xspf(BufReader::new(file))
}

/// Parse an XSPF document. Tracks without a location are dropped.
pub fn parse_xspf<R: BufRead>(source: R) -> Result<XspfPlaylist> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);

    let mut playlist = XspfPlaylist::default();
    let mut current: Option<XspfEntry> = None;
    let mut current_element = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "track" {
                    current = Some(XspfEntry::default());
                }
                current_element = name;
            }

            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                match current.as_mut() {
                    Some(entry) => match current_element.as_str() {
                        "location" => entry.location = text,
                        "title" => entry.title = Some(text),
                        "creator" => entry.creator = Some(text),
                        "album" => entry.album = Some(text),
                        "duration" => entry.duration_ms = text.parse().ok(),
                        "trackNum" => entry.track_num = text.parse().ok(),
                        _ => {}
                    },
                    None if current_element == "title" => playlist.title = Some(text),
                    None => {}
                }
            }

            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"track" {
                    if let Some(entry) = current.take() {
                        if entry.location.is_empty() {
                            log::debug!("Dropping XSPF track without location");
                        } else {
                            playlist.tracks.push(entry);
                        }
                    }
                }
                current_element.clear();
            }

            Ok(Event::Eof) => break,
            Err(e) => {
                anyhow::bail!(
                    "XSPF parsing error at position {}: {}",
                    reader.buffer_position(),
                    e
                );
            }
            _ => {}
        }

        buf.clear();
    }

    Ok(playlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn written_document_reads_back() {
        let mut track = Track::new("Fish & Chips", "The <Band>", "Live", 200_000, "/m/a b.ogg");
        track.track_number = Some(3);
        let tracks = vec![Arc::new(track)];

        let bytes = render_xspf("Friday", &tracks).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("<date>"));
        assert!(text.contains("file:///m/a%20b.ogg"));

        let playlist = parse_xspf(bytes.as_slice()).unwrap();
        assert_eq!(playlist.title.as_deref(), Some("Friday"));
        assert_eq!(playlist.tracks.len(), 1);

        let entry = &playlist.tracks[0];
        assert_eq!(entry.title.as_deref(), Some("Fish & Chips"));
        assert_eq!(entry.creator.as_deref(), Some("The <Band>"));
        assert_eq!(entry.duration_ms, Some(200_000));
        assert_eq!(entry.track_num, Some(3));
        assert_eq!(entry.to_track().unwrap(), *tracks[0]);
    }

    #[test]
    fn tracks_without_location_are_dropped() {
        let doc = r#"<playlist version="1" xmlns="http://xspf.org/ns/0/">
  <trackList>
    <track><title>Nowhere</title></track>
    <track><location>file:///m/x.mp3</location></track>
  </trackList>
</playlist>"#;
        let playlist = parse_xspf(doc.as_bytes()).unwrap();
        assert_eq!(playlist.title, None);
        assert_eq!(playlist.tracks.len(), 1);
        assert_eq!(playlist.tracks[0].file_path(), Some(PathBuf::from("/m/x.mp3")));
    }
}
