use super::{Track, TrackRef};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

/// Query service the dynamic mode draws candidate tracks from
pub trait CollectionQuery {
    /// Resolve a track by its stable identifier
    fn track(&self, id: &str) -> Option<TrackRef>;

    /// Whether the collection holds no tracks at all
    fn is_empty(&self) -> bool;

    /// Draw up to `limit` tracks in random order
    fn random_tracks(&self, limit: usize) -> Vec<TrackRef>;

    /// Up to `limit` tracks related to `seeds`, best matches first.
    /// The seeds themselves are never returned.
    fn suggested_tracks(&self, seeds: &[TrackRef], limit: usize) -> Vec<TrackRef>;
}

/// In-memory music collection, indexed by track ID
#[derive(Debug)]
pub struct Collection {
    /// All tracks indexed by their ID
    tracks: HashMap<String, TrackRef>,

    /// Insertion order, so listings and draws are reproducible for a seed
    order: Vec<String>,

    rng: RefCell<fastrand::Rng>,
}

impl Collection {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }

    /// Create an empty collection whose random draws follow `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    fn with_rng(rng: fastrand::Rng) -> Self {
        Self {
            tracks: HashMap::new(),
            order: Vec::new(),
            rng: RefCell::new(rng),
        }
    }

    /// Add a track to the collection, replacing any track with the same ID.
    /// Returns the shared handle stored in the collection.
    pub fn add_track(&mut self, track: Track) -> TrackRef {
        let track = Arc::new(track);
        if self
            .tracks
            .insert(track.id.clone(), Arc::clone(&track))
            .is_none()
        {
            self.order.push(track.id.clone());
        }
        track
    }

    /// Get a track by ID
    pub fn get_track(&self, id: &str) -> Option<&TrackRef> {
        self.tracks.get(id)
    }

    /// Find the track stored for a file path
    pub fn find_by_path(&self, path: &Path) -> Option<&TrackRef> {
        self.tracks.get(&super::track::id_for_path(path))
    }

    /// All tracks, in the order they were added
    pub fn tracks(&self) -> impl Iterator<Item = &TrackRef> {
        self.order.iter().filter_map(|id| self.tracks.get(id))
    }

    /// Tracks belonging to an album
    pub fn album_tracks(&self, album: &str) -> Vec<TrackRef> {
        self.tracks()
            .filter(|t| t.album == album)
            .cloned()
            .collect()
    }

    /// Total number of tracks
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionQuery for Collection {
    fn track(&self, id: &str) -> Option<TrackRef> {
        self.tracks.get(id).cloned()
    }

    fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn random_tracks(&self, limit: usize) -> Vec<TrackRef> {
        let mut all: Vec<TrackRef> = self.tracks().cloned().collect();
        self.rng.borrow_mut().shuffle(&mut all);
        all.truncate(limit);
        all
    }

    fn suggested_tracks(&self, seeds: &[TrackRef], limit: usize) -> Vec<TrackRef> {
        let seed_ids: HashSet<&str> = seeds.iter().map(|t| t.id.as_str()).collect();
        let artists: HashSet<&str> = seeds.iter().map(|t| t.artist.as_str()).collect();
        let albums: HashSet<&str> = seeds.iter().map(|t| t.album.as_str()).collect();
        let genres: HashSet<&str> = seeds.iter().filter_map(|t| t.genre.as_deref()).collect();

        // Tier 0: same artist, 1: same album, 2: same genre
        let mut tiers: [Vec<TrackRef>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for track in self.tracks() {
            if seed_ids.contains(track.id.as_str()) {
                continue;
            }
            if artists.contains(track.artist.as_str()) {
                tiers[0].push(Arc::clone(track));
            } else if albums.contains(track.album.as_str()) {
                tiers[1].push(Arc::clone(track));
            } else if track
                .genre
                .as_deref()
                .is_some_and(|g| genres.contains(g))
            {
                tiers[2].push(Arc::clone(track));
            }
        }

        let mut rng = self.rng.borrow_mut();
        let mut suggestions = Vec::new();
        for mut tier in tiers {
            rng.shuffle(&mut tier);
            suggestions.extend(tier);
        }
        suggestions.truncate(limit);
        suggestions
    }
}
