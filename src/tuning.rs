//! Data-driven game balance
//!
//! Spawn thresholds, spawn probabilities, speeds, sizes and rewards for each
//! level. Defaults are the values the game ships with; any field can be
//! overridden from the JSON config.

use serde::{Deserialize, Serialize};

use crate::consts::FIELD_WIDTH;

/// Balance for all four levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub water: WaterTuning,
    pub earth: EarthTuning,
    pub air: AirTuning,
    pub space: SpaceTuning,
}

/// Water level: sharks, boats and the missiles boats fire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterTuning {
    /// Dominant-frequency jump that spawns a shark
    pub shark_rise: f32,
    pub shark_size: f32,
    pub shark_speed: f32,
    pub shark_reward: u64,
    /// Energy above which boats may appear
    pub boat_energy: f32,
    /// Per-tick chance of a boat while energy is high
    pub boat_chance: f32,
    pub boat_width: f32,
    pub boat_speed: f32,
    /// Boats fire once they pass this x coordinate
    pub boat_fire_x: f32,
    pub boat_reward: u64,
    pub missile_speed: f32,
    pub missile_reward: u64,
}

impl Default for WaterTuning {
    fn default() -> Self {
        Self {
            shark_rise: 600.0,
            shark_size: 50.0,
            shark_speed: 2.0,
            shark_reward: 5,
            boat_energy: 8000.0,
            boat_chance: 0.02,
            boat_width: 100.0,
            boat_speed: 1.0,
            boat_fire_x: FIELD_WIDTH - 100.0,
            boat_reward: 10,
            missile_speed: 3.0,
            missile_reward: 5,
        }
    }
}

/// Earth level: bombers and their bombs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarthTuning {
    pub plane_rise: f32,
    pub plane_size: f32,
    pub plane_speed: f32,
    pub plane_reward: u64,
    /// Energy above which planes may drop bombs
    pub bomb_energy: f32,
    /// Per-plane, per-tick drop chance while energy is high
    pub bomb_chance: f32,
    pub bomb_speed: f32,
    pub bomb_size: f32,
    /// Collision size of a bomb against the tank
    pub bomb_blast_size: f32,
    pub bomb_reward: u64,
}

impl Default for EarthTuning {
    fn default() -> Self {
        Self {
            plane_rise: 25.0,
            plane_size: 80.0,
            plane_speed: 3.0,
            plane_reward: 10,
            bomb_energy: 5000.0,
            bomb_chance: 0.01,
            bomb_speed: 2.0,
            bomb_size: 16.0,
            bomb_blast_size: 30.0,
            bomb_reward: 5,
        }
    }
}

/// Air level: enemy fighters, their missiles, and birds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirTuning {
    pub plane_rise: f32,
    pub plane_width: f32,
    pub plane_speed: f32,
    pub plane_reward: u64,
    /// Energy above which a fighter fires its one missile
    pub missile_energy: f32,
    pub missile_speed: f32,
    pub missile_reward: u64,
    /// Per-tick chance of a bird
    pub bird_chance: f32,
    pub bird_reward: u64,
}

impl Default for AirTuning {
    fn default() -> Self {
        Self {
            plane_rise: 50.0,
            plane_width: 80.0,
            plane_speed: 2.0,
            plane_reward: 10,
            missile_energy: 2500.0,
            missile_speed: 3.0,
            missile_reward: 5,
            bird_chance: 0.01,
            bird_reward: 20,
        }
    }
}

/// Space level: planets, meteors and stars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceTuning {
    pub planet_rise: f32,
    pub planet_speed: f32,
    pub planet_reward: u64,
    pub meteor_energy: f32,
    pub meteor_chance: f32,
    /// Hits needed to destroy a meteor
    pub meteor_hits: u8,
    pub meteor_reward: u64,
    pub star_chance: f32,
    /// Stars only appear after this long without a new planet
    pub star_quiet_ms: f64,
    pub star_size: f32,
    pub star_reward: u64,
}

impl Default for SpaceTuning {
    fn default() -> Self {
        Self {
            planet_rise: 200.0,
            planet_speed: 2.0,
            planet_reward: 10,
            meteor_energy: 4000.0,
            meteor_chance: 0.02,
            meteor_hits: 2,
            meteor_reward: 20,
            star_chance: 0.02,
            star_quiet_ms: 2000.0,
            star_size: 20.0,
            star_reward: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning: Tuning =
            serde_json::from_str(r#"{ "water": { "shark_rise": 300.0 }, "space": { "meteor_hits": 3 } }"#)
                .unwrap();
        assert_eq!(tuning.water.shark_rise, 300.0);
        assert_eq!(tuning.water.boat_energy, 8000.0);
        assert_eq!(tuning.space.meteor_hits, 3);
        assert_eq!(tuning.earth, EarthTuning::default());
    }

    #[test]
    fn test_empty_json_is_default() {
        let tuning: Tuning = serde_json::from_str("{}").unwrap();
        assert_eq!(tuning, Tuning::default());
    }
}
