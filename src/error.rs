//! Typed errors for the playlist core

use thiserror::Error;

/// Why a single entry of a mutation batch was skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("row {row} does not exist (playlist has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("row {row} holds '{found}', not '{expected}'")]
    TrackMismatch {
        row: usize,
        expected: String,
        found: String,
    },

    #[error("row {row} was already handled earlier in the batch")]
    DuplicateRow { row: usize },
}

/// Errors raised by the dynamic mode controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartyError {
    #[error("shuffle is unavailable while dynamic mode is active")]
    ShuffleUnavailable,

    #[error("unknown append type '{0}'")]
    UnknownAppendType(String),
}

/// Errors loading or saving the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write config {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
