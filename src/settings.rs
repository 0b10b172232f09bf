//! Game settings and preferences
//!
//! `Config` bundles player settings with game tuning and loads both from a
//! single JSON file. Every field has a default, so a partial file is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Effects budget. Only particle density depends on it; gameplay never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn label(self) -> &'static str {
        match self {
            QualityPreset::Low => "low",
            QualityPreset::Medium => "medium",
            QualityPreset::High => "high",
        }
    }

    /// Live particles allowed at once
    pub fn particle_budget(self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Explosions, exhaust and trails on or off
    pub particles: bool,
    /// Overrides the preset's particle budget
    pub particle_cap: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::default(),
            particles: true,
            particle_cap: None,
        }
    }
}

impl Settings {
    /// Particle pool size for a run; 0 disables particles entirely
    pub fn max_particles(&self) -> usize {
        match (self.particles, self.particle_cap) {
            (false, _) => 0,
            (true, Some(cap)) => cap,
            (true, None) => self.quality.particle_budget(),
        }
    }
}

/// Everything the JSON config file can set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub settings: Settings,
    pub tuning: Tuning,
    /// Run seed; fixed seeds replay identically
    pub seed: u64,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!(
            "Loaded config from {} (quality {})",
            path.display(),
            config.settings.quality.label()
        );
        Ok(config)
    }

    /// Load a config file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default config ({})", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_particles() {
        assert_eq!(Settings {
            quality: QualityPreset::Low,
            ..Settings::default()
        }
        .max_particles(), 100);
        assert_eq!(Settings::default().max_particles(), 500);
        let off = Settings {
            particles: false,
            ..Settings::default()
        };
        assert_eq!(off.max_particles(), 0);
    }

    #[test]
    fn test_particle_cap_override() {
        let capped = Settings {
            particle_cap: Some(42),
            quality: QualityPreset::High,
            ..Settings::default()
        };
        assert_eq!(capped.max_particles(), 42);
        let off = Settings {
            particles: false,
            ..capped
        };
        assert_eq!(off.max_particles(), 0);
    }

    #[test]
    fn test_config_from_json() {
        let config = Config::from_json(
            r#"{ "settings": { "quality": "high" }, "seed": 7, "tuning": { "air": { "bird_reward": 50 } } }"#,
        )
        .unwrap();
        assert_eq!(config.settings.quality, QualityPreset::High);
        assert!(config.settings.particles);
        assert_eq!(config.seed, 7);
        assert_eq!(config.tuning.air.bird_reward, 50);
    }

    #[test]
    fn test_config_errors() {
        assert!(matches!(Config::from_json("{ nope"), Err(ConfigError::Json(_))));
        assert!(matches!(
            Config::load("/nonexistent/config.json"),
            Err(ConfigError::Io(_))
        ));
        assert_eq!(Config::load_or_default("/nonexistent/config.json"), Config::default());
    }
}
