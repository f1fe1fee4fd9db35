//! Rhythmbox database (rhythmdb.xml) parser

use super::model::RhythmboxEntry;
use crate::model::Track;
use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse rhythmdb.xml and extract all song entries
pub fn parse_database(path: &Path) -> Result<Vec<Track>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open Rhythmbox database: {:?}", path))?;
    let tracks = read_entries(BufReader::new(file))?;
    log::info!("Parsed {} tracks from Rhythmbox database", tracks.len());
    Ok(tracks)
}

/// Read song entries from any rhythmdb.xml source
pub fn read_entries<R: BufRead>(source: R) -> Result<Vec<Track>> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);

    let mut tracks = Vec::new();
    let mut current_entry: Option<RhythmboxEntry> = None;
    let mut current_element = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name();
                if name.as_ref() == b"entry" {
                    // Only song entries; podcasts, radio and ignore entries are skipped
                    let is_song = e.attributes().flatten().any(|attr| {
                        attr.key.as_ref() == b"type" && attr.value.as_ref() == b"song"
                    });
                    if is_song {
                        current_entry = Some(RhythmboxEntry::new());
                    }
                } else if current_entry.is_some() {
                    current_element = String::from_utf8_lossy(name.as_ref()).to_string();
                }
            }

            Ok(Event::Text(e)) => {
                if let Some(ref mut entry) = current_entry {
                    let text = e.unescape().unwrap_or_default().to_string();
                    match current_element.as_str() {
                        "title" => entry.title = Some(text),
                        "artist" => entry.artist = Some(text),
                        "album" => entry.album = Some(text),
                        "genre" => entry.genre = Some(text),
                        "location" => entry.location = Some(text),
                        "duration" => entry.duration = text.parse().ok(),
                        "track-number" => entry.track_number = text.parse().ok(),
                        "date" => {
                            // Rhythmbox stores a day count; approximate the year
                            if let Ok(date) = text.parse::<u32>() {
                                if date > 0 {
                                    entry.year = Some(1970 + (date / 365));
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }

            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"entry" {
                    if let Some(entry) = current_entry.take() {
                        match entry.into_track() {
                            Some(track) => tracks.push(track),
                            None => log::debug!("Skipping entry without title or local file"),
                        }
                    }
                }
                current_element.clear();
            }

            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!(
                    "XML parsing error at position {}: {:?}",
                    reader.buffer_position(),
                    e
                );
            }
            _ => {}
        }

        buf.clear();
    }

    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DB: &str = r#"<?xml version="1.0" standalone="yes"?>
<rhythmdb version="2.0">
  <entry type="song">
    <title>Computer Love</title>
    <artist>Kraftwerk</artist>
    <album>Computer World</album>
    <genre>Electronic</genre>
    <track-number>5</track-number>
    <duration>435</duration>
    <location>file:///music/Kraftwerk/Computer%20Love.flac</location>
  </entry>
  <entry type="iradio">
    <title>Some Station</title>
    <location>http://radio.example/stream</location>
  </entry>
  <entry type="song">
    <artist>Nameless</artist>
    <location>file:///music/untitled.mp3</location>
  </entry>
</rhythmdb>"#;

    #[test]
    fn parses_song_entries_only() {
        let tracks = read_entries(DB.as_bytes()).unwrap();
        assert_eq!(tracks.len(), 1);

        let track = &tracks[0];
        assert_eq!(track.title, "Computer Love");
        assert_eq!(track.artist, "Kraftwerk");
        assert_eq!(track.duration_ms, 435_000);
        assert_eq!(track.track_number, Some(5));
        assert_eq!(
            track.file_path,
            std::path::PathBuf::from("/music/Kraftwerk/Computer Love.flac")
        );
    }
}
