//! Dynamic mode parameters

use crate::error::PartyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where appended tracks come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppendType {
    /// Random draw from the collection
    #[default]
    Random,

    /// Tracks related to what was played recently
    Suggestion,

    /// A user-provided list, consumed from the front
    Custom,
}

impl AppendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppendType::Random => "Random",
            AppendType::Suggestion => "Suggestion",
            AppendType::Custom => "Custom",
        }
    }
}

impl fmt::Display for AppendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppendType {
    type Err = PartyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(AppendType::Random),
            "suggestion" => Ok(AppendType::Suggestion),
            "custom" => Ok(AppendType::Custom),
            _ => Err(PartyError::UnknownAppendType(s.to_string())),
        }
    }
}

/// Stored values that are not recognized are read as Custom
impl From<String> for AppendType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            log::warn!("unknown append type '{}', using Custom", value);
            AppendType::Custom
        })
    }
}

impl From<AppendType> for String {
    fn from(value: AppendType) -> Self {
        value.as_str().to_string()
    }
}

/// Configuration of the dynamic ("party") mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyConfig {
    /// Played tracks kept before the playing one when cycling
    pub previous_count: usize,

    /// Unplayed tracks kept after the playing one
    pub upcoming_count: usize,

    /// Tracks added by a manual append
    pub append_count: usize,

    /// Remove played tracks beyond `previous_count`
    pub cycle_tracks: bool,

    /// Keep played tracks out of random draws and show them as history
    pub mark_history: bool,

    pub append_type: AppendType,

    /// Track ids for the Custom append type, in play order
    pub custom_list: Vec<String>,
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            previous_count: 5,
            upcoming_count: 20,
            append_count: 1,
            cycle_tracks: true,
            mark_history: true,
            append_type: AppendType::Random,
            custom_list: Vec::new(),
        }
    }
}

impl PartyConfig {
    pub fn with_append_type(mut self, append_type: AppendType) -> Self {
        self.append_type = append_type;
        self
    }

    pub fn with_counts(mut self, previous: usize, upcoming: usize) -> Self {
        self.previous_count = previous;
        self.upcoming_count = upcoming;
        self
    }

    pub fn with_custom_list(mut self, ids: Vec<String>) -> Self {
        self.custom_list = ids;
        self
    }
}
