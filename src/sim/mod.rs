//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, time supplied by the caller
//! - Seeded RNG only (particles draw from their own stream)
//! - Stable iteration order (collections scanned front to back)
//! - No rendering or audio decoding

pub mod collision;
pub mod entity;
pub mod levels;
pub mod particles;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{bodies_overlap, circles_overlap, first_hit};
pub use entity::{Body, Cooldown, Motion, Mover, Shot};
pub use levels::{Air, Earth, Frame, Level, Space, Water};
pub use particles::{Particle, ParticleField};
pub use player::{Controls, Player};
pub use state::{GamePhase, LevelKind, Session};
pub use tick::{EntityLoop, TickInput, tick};
