//! Substring search over track display names

use super::store::PlaylistStore;

impl PlaylistStore {
    fn row_matches(&self, row: usize, term: &str) -> bool {
        self.track_at(row)
            .is_some_and(|track| track.pretty_name().contains(term))
    }

    /// First row whose name contains `term` (case-sensitive)
    pub fn find(&self, term: &str) -> Option<usize> {
        (0..self.row_count()).find(|&row| self.row_matches(row, term))
    }

    /// First match after `selected`, wrapping around to the first match
    pub fn find_next(&self, term: &str, selected: Option<usize>) -> Option<usize> {
        let mut first_match = None;
        for row in 0..self.row_count() {
            if !self.row_matches(row, term) {
                continue;
            }
            if first_match.is_none() {
                first_match = Some(row);
            }
            if selected.map_or(true, |s| row > s) {
                return Some(row);
            }
        }
        first_match
    }

    /// Last match before `selected`, wrapping around to the last match
    pub fn find_previous(&self, term: &str, selected: Option<usize>) -> Option<usize> {
        let mut last_match = None;
        for row in (0..self.row_count()).rev() {
            if !self.row_matches(row, term) {
                continue;
            }
            if last_match.is_none() {
                last_match = Some(row);
            }
            if selected.map_or(true, |s| row < s) {
                return Some(row);
            }
        }
        last_match
    }
}
