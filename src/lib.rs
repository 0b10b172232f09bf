//! Battle of the Elements - a music-reactive arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity loop, collisions, levels)
//! - `features`: Precomputed audio feature tracks that drive spawning
//! - `audio`: Playback clip abstraction (current time, duration, controls)
//! - `game`: Screen flow around the per-level loops
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod audio;
pub mod error;
pub mod features;
pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::{AudioClip, PlaybackClock};
pub use error::{ConfigError, FeatureError, LevelError};
pub use features::{AudioFeatureSample, FeatureTrack};
pub use game::{Game, Screen};
pub use highscores::HighScores;
pub use settings::{Config, QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 400.0;

    /// Nominal frame time (the host calls tick once per rendered frame)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Progress at which a level counts as complete
    pub const PROGRESS_COMPLETE: f32 = 0.99;

    /// Particle lifetime budget and per-tick fade
    pub const PARTICLE_LIFE: f32 = 255.0;
    pub const PARTICLE_FADE: f32 = 5.0;
    pub const PARTICLE_FRICTION: f32 = 0.95;
}

/// Re-map `value` from `[start1, stop1]` into `[start2, stop2]` (unclamped)
#[inline]
pub fn map_range(value: f32, start1: f32, stop1: f32, start2: f32, stop2: f32) -> f32 {
    start2 + (stop2 - start2) * ((value - start1) / (stop1 - start1))
}
