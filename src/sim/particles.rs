//! Decorative particles
//!
//! Explosions, exhaust and missile trails. Purely visual: nothing here feeds
//! back into gameplay. The field owns its own RNG stream so turning particles
//! off never changes what spawns.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{PARTICLE_FADE, PARTICLE_FRICTION, PARTICLE_LIFE};

/// RGBA color
pub type Rgba = [u8; 4];

pub const RED: Rgba = [255, 0, 0, 200];
pub const ORANGE: Rgba = [255, 165, 0, 200];
pub const FLAME: Rgba = [255, 100, 0, 150];
pub const YELLOW: Rgba = [255, 255, 0, 200];
pub const BROWN: Rgba = [139, 69, 19, 200];
pub const SMOKE: Rgba = [100, 100, 100, 255];
pub const BUBBLE: Rgba = [200, 200, 255, 150];
pub const SPRAY: Rgba = [150, 150, 150, 150];

/// A single fading particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgba,
    pub size: f32,
    /// Counts down from `PARTICLE_LIFE` to 0
    pub life: f32,
}

impl Particle {
    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

/// Size range for a burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BurstSize {
    Range(f32, f32),
    Fixed(f32),
}

/// Small sparks (missile trails, hits in the water/air levels)
pub const SMALL: BurstSize = BurstSize::Range(3.0, 8.0);
/// Bigger debris (earth and space levels)
pub const LARGE: BurstSize = BurstSize::Range(5.0, 10.0);

/// Capped pool of particles; the oldest are evicted first
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    cap: usize,
    rng: Pcg32,
}

impl ParticleField {
    pub fn new(cap: usize, seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(cap.min(512)),
            cap,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Emit `count` particles at `origin` with random velocities in [-2, 2]
    pub fn burst(&mut self, origin: Vec2, color: Rgba, size: BurstSize, count: usize) {
        if self.cap == 0 {
            return;
        }
        for _ in 0..count {
            if self.particles.len() >= self.cap {
                // Remove oldest particles to make room
                self.particles.remove(0);
            }
            let size = match size {
                BurstSize::Range(lo, hi) => self.rng.random_range(lo..hi),
                BurstSize::Fixed(s) => s,
            };
            let vel = Vec2::new(
                self.rng.random_range(-2.0..2.0),
                self.rng.random_range(-2.0..2.0),
            );
            self.particles.push(Particle {
                pos: origin,
                vel,
                color,
                size,
                life: PARTICLE_LIFE,
            });
        }
    }

    /// Move, slow and fade every particle; drop the dead ones
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel *= PARTICLE_FRICTION;
            p.life -= PARTICLE_FADE;
        }
        self.particles.retain(|p| !p.is_dead());
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_and_fade() {
        let mut field = ParticleField::new(100, 1);
        field.burst(Vec2::new(10.0, 10.0), RED, SMALL, 10);
        assert_eq!(field.len(), 10);
        assert!(field.iter().all(|p| (3.0..8.0).contains(&p.size)));

        // 255 / 5 = 51 updates to fade out completely
        for _ in 0..50 {
            field.update();
        }
        assert_eq!(field.len(), 10);
        field.update();
        assert!(field.is_empty());
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut field = ParticleField::new(5, 1);
        field.burst(Vec2::ZERO, RED, BurstSize::Fixed(4.0), 3);
        field.burst(Vec2::ONE, YELLOW, BurstSize::Fixed(4.0), 3);
        assert_eq!(field.len(), 5);
        assert_eq!(field.iter().filter(|p| p.color == RED).count(), 2);
    }

    #[test]
    fn test_disabled_field_stays_empty() {
        let mut field = ParticleField::new(0, 1);
        field.burst(Vec2::ZERO, RED, SMALL, 10);
        assert!(field.is_empty());
    }
}
