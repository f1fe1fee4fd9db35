//! Rhythmbox playlists (playlists.xml) parser
//!
//! Only static playlists carry an explicit track list; automatic ones are
//! skipped. The lists are used to seed the custom append list.

use crate::model::track::{id_for_path, uri_to_path};
use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A saved track list, by track ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedList {
    pub name: String,
    pub track_ids: Vec<String>,
}

/// Parse playlists.xml and extract the static playlists
///
/// # Arguments
/// * `path` - Path to playlists.xml
/// * `known_ids` - IDs of all tracks in the collection; entries outside it are dropped
pub fn parse_playlists(path: &Path, known_ids: &HashSet<String>) -> Result<Vec<NamedList>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open Rhythmbox playlists: {:?}", path))?;
    let lists = read_playlists(BufReader::new(file), known_ids)?;
    log::info!("Parsed {} playlists from Rhythmbox", lists.len());
    Ok(lists)
}

pub fn read_playlists<R: BufRead>(
    source: R,
    known_ids: &HashSet<String>,
) -> Result<Vec<NamedList>> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);

    let mut lists = Vec::new();
    let mut current: Option<NamedList> = None;
    let mut in_location = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"playlist" => {
                    let mut name = String::from("Unnamed");
                    let mut is_static = true;
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => name = String::from_utf8_lossy(&attr.value).to_string(),
                            b"type" => is_static = attr.value.as_ref() == b"static",
                            _ => {}
                        }
                    }
                    current = is_static.then(|| NamedList {
                        name,
                        track_ids: Vec::new(),
                    });
                }
                b"location" => in_location = current.is_some(),
                _ => {}
            },

            Ok(Event::Text(e)) if in_location => {
                let text = e.unescape().unwrap_or_default();
                if let (Some(list), Some(file_path)) = (current.as_mut(), uri_to_path(&text)) {
                    let id = id_for_path(&file_path);
                    if known_ids.contains(&id) {
                        list.track_ids.push(id);
                    } else {
                        log::debug!("Track not found for path: {:?}", file_path);
                    }
                }
            }

            Ok(Event::End(e)) => match e.name().as_ref() {
                b"playlist" => {
                    if let Some(list) = current.take() {
                        if list.track_ids.is_empty() {
                            log::debug!("Skipping empty playlist: {}", list.name);
                        } else {
                            lists.push(list);
                        }
                    }
                }
                b"location" => in_location = false,
                _ => {}
            },

            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("XML parsing error: {:?}", e);
            }
            _ => {}
        }

        buf.clear();
    }

    Ok(lists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const PLAYLISTS: &str = r#"<?xml version="1.0"?>
<rhythmdb-playlists>
  <playlist name="Warmup" show-browser="false" type="static">
    <location>file:///music/a.mp3</location>
    <location>file:///music/missing.mp3</location>
    <location>file:///music/b%20c.mp3</location>
  </playlist>
  <playlist name="Recently Added" type="automatic">
    <conjunction><equals prop="type">song</equals></conjunction>
  </playlist>
  <playlist name="Empty" type="static"/>
</rhythmdb-playlists>"#;

    #[test]
    fn keeps_static_playlists_with_known_tracks() {
        let a = id_for_path(&PathBuf::from("/music/a.mp3"));
        let bc = id_for_path(&PathBuf::from("/music/b c.mp3"));
        let known: HashSet<String> = [a.clone(), bc.clone()].into_iter().collect();

        let lists = read_playlists(PLAYLISTS.as_bytes(), &known).unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].name, "Warmup");
        assert_eq!(lists[0].track_ids, vec![a, bc]);
    }
}
