//! Space level: planets on the beat, tough meteors, stars in the quiet

use std::f32::consts::FRAC_PI_4;

use rand::Rng;
use rand_pcg::Pcg32;

use super::{Frame, Level, take_hit, touches};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::collision::first_hit;
use crate::sim::entity::{Body, Motion, Mover};
use crate::sim::particles::{LARGE, ORANGE, RED, YELLOW};
use crate::sim::state::LevelKind;
use crate::tuning::SpaceTuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Meteor {
    pub mover: Mover,
    /// Hits left before it breaks up
    pub hits: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub mover: Mover,
    pub angle: f32,
    pub spin: f32,
}

#[derive(Debug, Clone)]
pub struct Space {
    tuning: SpaceTuning,
    pub planets: Vec<Mover>,
    pub meteors: Vec<Meteor>,
    pub stars: Vec<Star>,
    /// Simulated time of the most recent planet
    last_planet_ms: f64,
}

/// Random downward heading for a meteor
fn tumble(rng: &mut Pcg32) -> Motion {
    Motion::Heading {
        speed: rng.random_range(2.0..4.0),
        angle: rng.random_range(FRAC_PI_4..3.0 * FRAC_PI_4),
    }
}

impl Level for Space {
    const KIND: LevelKind = LevelKind::Space;
    type Tuning = SpaceTuning;

    fn new(tuning: SpaceTuning) -> Self {
        Self {
            tuning,
            planets: Vec::new(),
            meteors: Vec::new(),
            stars: Vec::new(),
            last_planet_ms: 0.0,
        }
    }

    fn update(&mut self, frame: &mut Frame<'_>) {
        let t = &self.tuning;

        if frame.cursor.frequency_rise(t.planet_rise) {
            let y = frame.rng.random_range(0.0..FIELD_HEIGHT);
            let size = frame.rng.random_range(30.0..60.0);
            log::debug!("Planet at y={y:.0}, size {size:.0}");
            self.planets.push(Mover::new(Body::new(FIELD_WIDTH, y, size), Motion::leftward(t.planet_speed)));
            self.last_planet_ms = frame.now_ms;
        }

        if frame.cursor.energy_above(t.meteor_energy) && frame.rng.random::<f32>() < t.meteor_chance {
            let x = frame.rng.random_range(0.0..FIELD_WIDTH);
            let size = frame.rng.random_range(40.0..60.0);
            let motion = tumble(frame.rng);
            self.meteors.push(Meteor {
                mover: Mover::new(Body::new(x, 0.0, size), motion),
                hits: t.meteor_hits,
            });
        }

        let quiet = frame.now_ms - self.last_planet_ms > t.star_quiet_ms;
        if quiet && frame.rng.random::<f32>() < t.star_chance && frame.session.progress < 1.0 {
            let y = frame.rng.random_range(0.0..FIELD_HEIGHT);
            let speed = frame.rng.random_range(1.0..3.0);
            let spin = frame.rng.random_range(-0.05..0.05);
            self.stars.push(Star {
                mover: Mover::new(Body::new(FIELD_WIDTH, y, t.star_size), Motion::leftward(speed)),
                angle: 0.0,
                spin,
            });
        }

        for planet in &mut self.planets {
            planet.advance();
        }
        for meteor in &mut self.meteors {
            meteor.mover.advance();
            frame.particles.burst(meteor.mover.body.pos, ORANGE, LARGE, 5);
        }
        for star in &mut self.stars {
            star.mover.advance();
            star.angle += star.spin;
        }
    }

    fn strike(&mut self, shot: &Body, frame: &mut Frame<'_>) -> bool {
        let t = &self.tuning;
        if let Some(planet) = take_hit(&mut self.planets, shot, |p| &p.body) {
            frame.reward(t.planet_reward, planet.body.pos, RED, LARGE, 20);
            return true;
        }
        if let Some(i) = first_hit(shot, self.meteors.iter().map(|m| &m.mover.body)) {
            let meteor = &mut self.meteors[i];
            meteor.hits = meteor.hits.saturating_sub(1);
            if meteor.hits == 0 {
                let pos = meteor.mover.body.pos;
                self.meteors.remove(i);
                frame.reward(t.meteor_reward, pos, ORANGE, LARGE, 15);
            } else {
                // Knocked onto a new course, no points yet
                meteor.mover.motion = tumble(frame.rng);
            }
            return true;
        }
        if let Some(star) = take_hit(&mut self.stars, shot, |s| &s.mover.body) {
            frame.reward(t.star_reward, star.mover.body.pos, YELLOW, LARGE, 10);
            return true;
        }
        false
    }

    fn collide(&mut self, hull: &Body, frame: &mut Frame<'_>) -> bool {
        let hit = touches(&self.planets, hull, |p| &p.body)
            || touches(&self.meteors, hull, |m| &m.mover.body)
            || touches(&self.stars, hull, |s| &s.mover.body);
        if hit {
            frame.particles.burst(hull.pos, RED, LARGE, 50);
        }
        hit
    }

    fn keeps_shot(&self, shot: &Body) -> bool {
        (0.0..=FIELD_WIDTH).contains(&shot.pos.x) && (0.0..=FIELD_HEIGHT).contains(&shot.pos.y)
    }

    fn retire(&mut self) {
        self.planets.retain(|p| !p.body.gone_left());
        self.meteors.retain(|m| {
            let pos = m.mover.body.pos;
            pos.y < FIELD_HEIGHT && pos.x > 0.0 && pos.x < FIELD_WIDTH
        });
        self.stars.retain(|s| !s.mover.body.gone_left());
    }

    fn threats(&self) -> Vec<Body> {
        let planets = self.planets.iter().map(|p| p.body);
        let meteors = self.meteors.iter().map(|m| m.mover.body);
        let stars = self.stars.iter().map(|s| s.mover.body);
        planets.chain(meteors).chain(stars).collect()
    }
}
