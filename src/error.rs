//! Error types for resource loading and level start.
//!
//! None of these ever escape a tick: loading failures put the game on its
//! error screen and the entity loop simply never runs.

use crate::sim::LevelKind;

/// Result type alias for feature table loading.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Failure to read or parse a feature table.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV (bad quoting, invalid UTF-8)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Header lacks a required column
    #[error("missing column `{0}` in feature table header")]
    MissingColumn(&'static str),

    /// A cell could not be read as a number
    #[error("row {row}: column `{column}` has invalid value `{value}`")]
    InvalidCell {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// Table has a header but no data rows
    #[error("feature table has no rows")]
    Empty,
}

/// Reasons a level cannot start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("no feature track loaded for the {0} level")]
    MissingTrack(LevelKind),

    #[error("feature track for the {0} level is empty")]
    EmptyTrack(LevelKind),

    #[error("song for the {0} level failed to load or is not ready")]
    ClipNotLoaded(LevelKind),
}

/// Failure to load a JSON config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
