//! Track selection strategies for the dynamic mode
//!
//! One implementation per `AppendType`; `strategy_for` picks the one a
//! configuration asks for.

use super::config::{AppendType, PartyConfig};
use crate::model::{CollectionQuery, TrackRef};
use std::collections::{HashSet, VecDeque};

/// What a strategy may look at when choosing tracks
#[derive(Debug, Default)]
pub struct DrawContext<'a> {
    /// Track ids that must not be chosen
    pub exclude: HashSet<String>,

    /// Most recently played tracks, oldest first
    pub recent: &'a [TrackRef],
}

/// Chooses tracks to append to the playlist
pub trait AppendStrategy {
    fn append_type(&self) -> AppendType;

    /// Choose up to `count` tracks. Returning fewer means the source ran dry.
    fn next_tracks(
        &mut self,
        collection: &dyn CollectionQuery,
        ctx: &DrawContext<'_>,
        count: usize,
    ) -> Vec<TrackRef>;

    /// Feed more track ids to a list-backed strategy; others ignore them
    fn replenish(&mut self, _ids: Vec<String>) {}
}

/// Build the strategy configured by `config`
pub fn strategy_for(config: &PartyConfig) -> Box<dyn AppendStrategy> {
    match config.append_type {
        AppendType::Random => Box::new(RandomStrategy),
        AppendType::Suggestion => Box::new(SuggestionStrategy),
        AppendType::Custom => Box::new(CustomStrategy::new(config.custom_list.clone())),
    }
}

/// Random draw, skipping excluded tracks
pub struct RandomStrategy;

impl AppendStrategy for RandomStrategy {
    fn append_type(&self) -> AppendType {
        AppendType::Random
    }

    fn next_tracks(
        &mut self,
        collection: &dyn CollectionQuery,
        ctx: &DrawContext<'_>,
        count: usize,
    ) -> Vec<TrackRef> {
        if count == 0 {
            return Vec::new();
        }
        // Every excluded track may come back from the draw
        collection
            .random_tracks(count + ctx.exclude.len())
            .into_iter()
            .filter(|track| !ctx.exclude.contains(&track.id))
            .take(count)
            .collect()
    }
}

/// Tracks related to the recently played ones, topped up at random
pub struct SuggestionStrategy;

impl AppendStrategy for SuggestionStrategy {
    fn append_type(&self) -> AppendType {
        AppendType::Suggestion
    }

    fn next_tracks(
        &mut self,
        collection: &dyn CollectionQuery,
        ctx: &DrawContext<'_>,
        count: usize,
    ) -> Vec<TrackRef> {
        if count == 0 {
            return Vec::new();
        }
        let mut chosen: Vec<TrackRef> = if ctx.recent.is_empty() {
            Vec::new()
        } else {
            collection
                .suggested_tracks(ctx.recent, count + ctx.exclude.len())
                .into_iter()
                .filter(|track| !ctx.exclude.contains(&track.id))
                .take(count)
                .collect()
        };

        if chosen.len() < count {
            log::info!(
                "suggestions ran out ({} of {}), filling with random tracks",
                chosen.len(),
                count
            );
            let mut exclude = ctx.exclude.clone();
            exclude.extend(chosen.iter().map(|t| t.id.clone()));
            let fill_ctx = DrawContext {
                exclude,
                recent: ctx.recent,
            };
            let missing = count - chosen.len();
            chosen.extend(RandomStrategy.next_tracks(collection, &fill_ctx, missing));
        }
        chosen
    }
}

/// A fixed list of track ids, consumed head first
pub struct CustomStrategy {
    queue: VecDeque<String>,
}

impl CustomStrategy {
    pub fn new(ids: Vec<String>) -> Self {
        Self { queue: ids.into() }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl AppendStrategy for CustomStrategy {
    fn append_type(&self) -> AppendType {
        AppendType::Custom
    }

    fn next_tracks(
        &mut self,
        collection: &dyn CollectionQuery,
        _ctx: &DrawContext<'_>,
        count: usize,
    ) -> Vec<TrackRef> {
        let mut chosen = Vec::new();
        while chosen.len() < count {
            let Some(id) = self.queue.pop_front() else {
                log::info!("custom list exhausted");
                break;
            };
            match collection.track(&id) {
                Some(track) => chosen.push(track),
                None => log::warn!("custom list entry {} is not in the collection", id),
            }
        }
        chosen
    }

    fn replenish(&mut self, ids: Vec<String>) {
        self.queue.extend(ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Collection, Track};

    fn collection() -> Collection {
        let mut collection = Collection::with_seed(42);
        for (title, artist) in [
            ("a1", "Alpha"),
            ("a2", "Alpha"),
            ("b1", "Beta"),
            ("b2", "Beta"),
            ("c1", "Gamma"),
        ] {
            collection.add_track(Track::new(
                title,
                artist,
                "Album",
                1000,
                format!("/m/{}.mp3", title),
            ));
        }
        collection
    }

    fn id_of(collection: &Collection, title: &str) -> String {
        collection
            .tracks()
            .find(|t| t.title == title)
            .unwrap()
            .id
            .clone()
    }

    #[test]
    fn random_skips_excluded() {
        let collection = collection();
        let exclude: HashSet<String> = ["a1", "a2", "b1"]
            .iter()
            .map(|t| id_of(&collection, t))
            .collect();
        let ctx = DrawContext {
            exclude,
            recent: &[],
        };
        let drawn = RandomStrategy.next_tracks(&collection, &ctx, 5);
        let mut titles: Vec<_> = drawn.iter().map(|t| t.title.as_str()).collect();
        titles.sort();
        assert_eq!(titles, vec!["b2", "c1"]);
    }

    #[test]
    fn suggestion_prefers_recent_artist() {
        let collection = collection();
        let recent = vec![collection.track(&id_of(&collection, "a1")).unwrap()];
        let ctx = DrawContext {
            exclude: HashSet::new(),
            recent: &recent,
        };
        let drawn = SuggestionStrategy.next_tracks(&collection, &ctx, 1);
        assert_eq!(drawn[0].title, "a2");
    }

    #[test]
    fn suggestion_falls_back_to_random() {
        let collection = collection();
        let ctx = DrawContext::default();
        let drawn = SuggestionStrategy.next_tracks(&collection, &ctx, 3);
        assert_eq!(drawn.len(), 3);
    }

    #[test]
    fn custom_consumes_in_order_and_skips_unknown() {
        let collection = collection();
        let mut custom = CustomStrategy::new(vec![
            id_of(&collection, "c1"),
            "unknown".to_string(),
            id_of(&collection, "a1"),
        ]);
        let ctx = DrawContext::default();

        let first = custom.next_tracks(&collection, &ctx, 1);
        assert_eq!(first[0].title, "c1");

        let rest = custom.next_tracks(&collection, &ctx, 5);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].title, "a1");
        assert_eq!(custom.remaining(), 0);

        custom.replenish(vec![id_of(&collection, "b1")]);
        assert_eq!(custom.next_tracks(&collection, &ctx, 1)[0].title, "b1");
    }
}
