//! Dynamic ("party") mode
//!
//! Keeps the playlist filled with upcoming tracks chosen by a configurable
//! strategy, trims played tracks, and disables shuffle while it runs.

mod config;
mod controller;
mod settings;
mod strategy;

pub use config::{AppendType, PartyConfig};
pub use controller::{PartyController, PartyState, PlaybackModes};
pub use settings::PartySettings;
pub use strategy::{
    strategy_for, AppendStrategy, CustomStrategy, DrawContext, RandomStrategy, SuggestionStrategy,
};
