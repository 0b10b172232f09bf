//! Per-level high scores
//!
//! Kept in memory only; a reload starts every level at zero.

use serde::{Deserialize, Serialize};

use crate::sim::LevelKind;

/// Best score seen for each level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    pub water: u64,
    pub earth: u64,
    pub air: u64,
    pub space: u64,
}

impl HighScores {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score for `level`
    pub fn best(&self, level: LevelKind) -> u64 {
        match level {
            LevelKind::Water => self.water,
            LevelKind::Earth => self.earth,
            LevelKind::Air => self.air,
            LevelKind::Space => self.space,
        }
    }

    fn slot(&mut self, level: LevelKind) -> &mut u64 {
        match level {
            LevelKind::Water => &mut self.water,
            LevelKind::Earth => &mut self.earth,
            LevelKind::Air => &mut self.air,
            LevelKind::Space => &mut self.space,
        }
    }

    /// Record a score. Returns true if it beat the stored best.
    pub fn record(&mut self, level: LevelKind, score: u64) -> bool {
        let slot = self.slot(level);
        if score > *slot {
            *slot = score;
            true
        } else {
            false
        }
    }
}
