//! Per-level hostile populations
//!
//! Each level owns its typed collections and decides how audio features
//! spawn them, how they move, which pairs collide and what they're worth.
//! The shared loop in `tick` drives all four through the `Level` trait.

pub mod air;
pub mod earth;
pub mod space;
pub mod water;

pub use air::Air;
pub use earth::Earth;
pub use space::Space;
pub use water::Water;

use glam::Vec2;
use rand_pcg::Pcg32;

use super::collision::{any_hit, first_hit};
use super::entity::Body;
use super::particles::{BurstSize, ParticleField, Rgba};
use super::state::{LevelKind, Session};
use crate::features::FeatureCursor;

/// Everything a level may read or touch during one tick
pub struct Frame<'a> {
    /// Feature track sampled at the current playback position
    pub cursor: FeatureCursor<'a>,
    /// Gameplay RNG (spawn draws, spawn positions)
    pub rng: &'a mut Pcg32,
    pub particles: &'a mut ParticleField,
    pub session: &'a mut Session,
    /// Player hull after this tick's movement
    pub player: Body,
    /// See `player::anchor_x`
    pub player_x: f32,
    pub now_ms: f64,
    pub ticks: u64,
}

impl Frame<'_> {
    /// Score a kill and celebrate it
    pub fn reward(&mut self, points: u64, at: Vec2, color: Rgba, size: BurstSize, count: usize) {
        self.session.award(points);
        self.particles.burst(at, color, size, count);
    }

    /// Vertical sway used by sharks and fighters while still ahead of the player
    pub fn sway(&self) -> f32 {
        (self.ticks as f32 * 0.05).sin() * 0.5
    }
}

/// One level's rules and entity collections
pub trait Level {
    const KIND: LevelKind;
    type Tuning: Clone;

    fn new(tuning: Self::Tuning) -> Self;

    /// Spawn from the feature cursor and move every hostile one tick
    fn update(&mut self, frame: &mut Frame<'_>);

    /// Test one player projectile against this level's targets.
    /// Resolves at most one hit; returns true if the projectile was used up.
    fn strike(&mut self, shot: &Body, frame: &mut Frame<'_>) -> bool;

    /// True if the player's hull touches anything deadly
    fn collide(&mut self, hull: &Body, frame: &mut Frame<'_>) -> bool;

    /// Acceptance region for the player's projectiles
    fn keeps_shot(&self, shot: &Body) -> bool;

    /// Drop hostiles that left their acceptance region
    fn retire(&mut self);

    /// Bodies of every live hostile
    fn threats(&self) -> Vec<Body>;

    fn hostile_count(&self) -> usize {
        self.threats().len()
    }
}

/// Remove and return the first item whose body overlaps `shot`
pub(crate) fn take_hit<T>(items: &mut Vec<T>, shot: &Body, body: impl Fn(&T) -> &Body) -> Option<T> {
    let i = first_hit(shot, items.iter().map(&body))?;
    Some(items.remove(i))
}

/// True if `hull` overlaps any item
pub(crate) fn touches<T>(items: &[T], hull: &Body, body: impl Fn(&T) -> &Body) -> bool {
    any_hit(hull, items.iter().map(body))
}
