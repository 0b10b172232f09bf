//! Shared entity building blocks
//!
//! Every live object is a `Body` (center + diameter) moved by a `Motion`.
//! Velocities are per tick: one advance moves a body by exactly its velocity.

use glam::Vec2;

use super::particles::{FLAME, ParticleField, SMALL};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// Collision footprint. `size` is a diameter; all hit tests are circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub size: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size,
        }
    }

    /// A body with a NaN/infinite field can't be tested or drawn
    pub fn is_valid(&self) -> bool {
        self.pos.is_finite() && self.size.is_finite()
    }

    /// Right edge has passed the left side of the field (NaN counts as gone)
    pub fn gone_left(&self) -> bool {
        !(self.pos.x + self.size / 2.0 > 0.0)
    }

    /// Center inside the field, `margin` pixels of slack on each side
    pub fn within_field(&self, margin: f32) -> bool {
        self.pos.x > -margin
            && self.pos.x < FIELD_WIDTH + margin
            && self.pos.y > -margin
            && self.pos.y < FIELD_HEIGHT + margin
    }
}

/// How an entity moves each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Fixed per-tick displacement
    Linear(Vec2),
    /// Speed along a heading (radians, 0 = +x, y grows downward)
    Heading { speed: f32, angle: f32 },
}

impl Motion {
    /// Leftward drift at `speed` px/tick
    pub fn leftward(speed: f32) -> Self {
        Motion::Linear(Vec2::new(-speed, 0.0))
    }

    pub fn rightward(speed: f32) -> Self {
        Motion::Linear(Vec2::new(speed, 0.0))
    }

    /// Per-tick displacement
    pub fn velocity(&self) -> Vec2 {
        match *self {
            Motion::Linear(v) => v,
            Motion::Heading { speed, angle } => Vec2::new(angle.cos(), angle.sin()) * speed,
        }
    }
}

/// A body plus its motion; the common shape of every moving entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mover {
    pub body: Body,
    pub motion: Motion,
}

impl Mover {
    pub fn new(body: Body, motion: Motion) -> Self {
        Self { body, motion }
    }

    /// Move one tick along the current motion
    pub fn advance(&mut self) {
        self.body.pos += self.motion.velocity();
    }
}

/// Minimum-interval gate for periodic effects (trails, exhaust, fire rate)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    last_ms: f64,
    pub interval_ms: f64,
}

impl Cooldown {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            last_ms: f64::NEG_INFINITY,
            interval_ms,
        }
    }

    /// Returns true and restarts the timer if more than the interval has passed
    pub fn ready(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_ms > self.interval_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }
}

/// Trail puffs are emitted at most this often
pub const TRAIL_INTERVAL_MS: f64 = 50.0;

/// Distance behind a shot where its trail puffs appear
const TRAIL_OFFSET: f32 = 10.0;

/// A projectile. Missiles leave a smoke trail, bullets and lasers don't.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub mover: Mover,
    pub trail: Option<Cooldown>,
}

impl Shot {
    pub fn plain(body: Body, motion: Motion) -> Self {
        Self {
            mover: Mover::new(body, motion),
            trail: None,
        }
    }

    pub fn trailing(body: Body, motion: Motion) -> Self {
        Self {
            mover: Mover::new(body, motion),
            trail: Some(Cooldown::new(TRAIL_INTERVAL_MS)),
        }
    }

    pub fn body(&self) -> &Body {
        &self.mover.body
    }

    /// Move one tick and puff the trail if it's due
    pub fn advance(&mut self, now_ms: f64, particles: &mut ParticleField) {
        self.mover.advance();
        if let Some(trail) = &mut self.trail {
            if trail.ready(now_ms) {
                let behind = self.mover.motion.velocity().normalize_or_zero() * TRAIL_OFFSET;
                particles.burst(self.mover.body.pos - behind, FLAME, SMALL, 3);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_heading_velocity() {
        let down = Motion::Heading {
            speed: 2.0,
            angle: std::f32::consts::FRAC_PI_2,
        };
        let v = down.velocity();
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 2.0).abs() < 1e-5);
        assert_eq!(Motion::leftward(3.0).velocity(), Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_cooldown() {
        let mut c = Cooldown::new(100.0);
        assert!(c.ready(0.0));
        assert!(!c.ready(50.0));
        assert!(!c.ready(100.0));
        assert!(c.ready(100.5));
    }

    #[test]
    fn test_missile_trail() {
        let mut particles = ParticleField::new(100, 3);
        let mut missile = Shot::trailing(Body::new(100.0, 50.0, 10.0), Motion::rightward(8.0));
        missile.advance(0.0, &mut particles);
        assert_eq!(missile.body().pos, Vec2::new(108.0, 50.0));
        assert_eq!(particles.len(), 3);
        assert!(particles.iter().all(|p| p.pos == Vec2::new(98.0, 50.0)));

        // Within the trail interval: no new puff
        missile.advance(20.0, &mut particles);
        assert_eq!(particles.len(), 3);
        missile.advance(60.0, &mut particles);
        assert_eq!(particles.len(), 6);

        let mut bullet = Shot::plain(Body::new(0.0, 0.0, 20.0), Motion::leftward(3.0));
        bullet.advance(0.0, &mut particles);
        assert_eq!(particles.len(), 6);
    }

    #[test]
    fn test_body_bounds() {
        assert!(Body::new(10.0, 10.0, 20.0).within_field(0.0));
        assert!(!Body::new(-10.0, 10.0, 20.0).within_field(0.0));
        assert!(Body::new(-10.0, 10.0, 20.0).within_field(50.0));
        assert!(!Body::new(-24.0, 0.0, 50.0).gone_left());
        assert!(Body::new(-25.0, 0.0, 50.0).gone_left());
        assert!(Body::new(f32::NAN, 0.0, 50.0).gone_left());
        assert!(!Body::new(f32::NAN, 0.0, 50.0).is_valid());
    }

    proptest! {
        #[test]
        fn advance_adds_velocity(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            vx in -20.0f32..20.0,
            vy in -20.0f32..20.0,
        ) {
            let mut m = Mover::new(Body::new(x, y, 10.0), Motion::Linear(Vec2::new(vx, vy)));
            m.advance();
            prop_assert_eq!(m.body.pos, Vec2::new(x, y) + Vec2::new(vx, vy));
        }

        #[test]
        fn heading_advance_matches_velocity(
            speed in 0.0f32..10.0,
            angle in -6.3f32..6.3,
        ) {
            let motion = Motion::Heading { speed, angle };
            let mut m = Mover::new(Body::new(100.0, 100.0, 10.0), motion);
            let expected = Vec2::new(100.0, 100.0) + motion.velocity();
            m.advance();
            prop_assert_eq!(m.body.pos, expected);
        }
    }
}
