//! Session state and core simulation types
//!
//! Everything a render pass reads about the run in progress (score,
//! progress, phase) lives in `Session`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four elemental levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelKind {
    Water,
    Earth,
    Air,
    Space,
}

impl LevelKind {
    pub const ALL: [LevelKind; 4] = [
        LevelKind::Water,
        LevelKind::Earth,
        LevelKind::Air,
        LevelKind::Space,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelKind::Water => "water",
            LevelKind::Earth => "earth",
            LevelKind::Air => "air",
            LevelKind::Space => "space",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "water" => Some(LevelKind::Water),
            "earth" => Some(LevelKind::Earth),
            "air" => Some(LevelKind::Air),
            "space" => Some(LevelKind::Space),
            _ => None,
        }
    }
}

impl fmt::Display for LevelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current phase of a level run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Ticks are suspended; only returns to Playing
    Paused,
    /// Player was hit (terminal)
    GameOver,
    /// Song reached the end (terminal)
    LevelComplete,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::LevelComplete)
    }
}

/// Score, progress and flags for one run of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub level: LevelKind,
    /// Never decreases during a run
    pub score: u64,
    /// Best score for this level including the current run
    pub high_score: u64,
    /// Fraction of the song played, 0..=1
    pub progress: f32,
    pub phase: GamePhase,
    /// Simulation ticks run (paused ticks excluded)
    pub ticks: u64,
    /// Simulated milliseconds (drives cooldowns)
    pub time_ms: f64,
}

impl Session {
    pub fn new(level: LevelKind, high_score: u64) -> Self {
        Self {
            level,
            score: 0,
            high_score,
            progress: 0.0,
            phase: GamePhase::Playing,
            ticks: 0,
            time_ms: 0.0,
        }
    }

    /// Add a reward and keep the high score in step
    pub fn award(&mut self, points: u64) {
        self.score += points;
        self.commit_high_score();
    }

    /// `high_score = max(high_score, score)`
    pub fn commit_high_score(&mut self) {
        self.high_score = self.high_score.max(self.score);
    }
}
