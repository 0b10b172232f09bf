//! Air level: fighters that fire once, and birds that wander in

use std::f32::consts::{FRAC_PI_4, TAU};

use rand::Rng;

use super::{Frame, Level, take_hit, touches};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::entity::{Body, Motion, Mover, Shot};
use crate::sim::particles::{BROWN, FLAME, ORANGE, SMALL};
use crate::sim::state::LevelKind;
use crate::tuning::AirTuning;

const MISSILE_SIZE: f32 = 10.0;
/// Birds live until they are this far outside the field
const BIRD_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fighter {
    pub mover: Mover,
    pub fired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    pub mover: Mover,
    /// Phase offset of the vertical bob
    pub bob: f32,
    pub wing_angle: f32,
    pub wing_speed: f32,
}

#[derive(Debug, Clone)]
pub struct Air {
    tuning: AirTuning,
    pub planes: Vec<Fighter>,
    /// Missiles fired by enemy fighters
    pub missiles: Vec<Shot>,
    pub birds: Vec<Bird>,
}

impl Air {
    fn spawn_bird(&mut self, frame: &mut Frame<'_>) {
        let rng = &mut *frame.rng;
        let size = rng.random_range(15.0..25.0);
        let y = rng.random_range(0.0..FIELD_HEIGHT);
        let speed = rng.random_range(1.5..3.5);
        let angle = rng.random_range(3.0 * FRAC_PI_4..5.0 * FRAC_PI_4);
        self.birds.push(Bird {
            mover: Mover::new(Body::new(FIELD_WIDTH + 20.0, y, size), Motion::Heading { speed, angle }),
            bob: rng.random_range(0.0..TAU),
            wing_angle: 0.0,
            wing_speed: rng.random_range(0.1..0.15),
        });
    }
}

impl Level for Air {
    const KIND: LevelKind = LevelKind::Air;
    type Tuning = AirTuning;

    fn new(tuning: AirTuning) -> Self {
        Self {
            tuning,
            planes: Vec::new(),
            missiles: Vec::new(),
            birds: Vec::new(),
        }
    }

    fn update(&mut self, frame: &mut Frame<'_>) {
        let t = &self.tuning;

        if frame.cursor.frequency_rise(t.plane_rise) {
            let y = frame.rng.random_range(0.0..FIELD_HEIGHT);
            log::debug!("Fighter at y={y:.0}");
            self.planes.push(Fighter {
                mover: Mover::new(Body::new(FIELD_WIDTH, y, t.plane_width), Motion::leftward(t.plane_speed)),
                fired: false,
            });
        }

        let sway = frame.sway();
        let loud = frame.cursor.energy_above(t.missile_energy);
        for plane in &mut self.planes {
            plane.mover.advance();
            let body = &mut plane.mover.body;
            if body.pos.x > frame.player_x {
                body.pos.y += sway;
            }
            if !plane.fired && loud {
                plane.fired = true;
                self.missiles.push(Shot::trailing(
                    Body::new(body.pos.x - body.size / 2.0, body.pos.y, MISSILE_SIZE),
                    Motion::leftward(t.missile_speed),
                ));
            }
        }

        for missile in &mut self.missiles {
            missile.advance(frame.now_ms, frame.particles);
        }

        if frame.rng.random::<f32>() < t.bird_chance && frame.session.progress < 1.0 {
            self.spawn_bird(frame);
        }
        let wobble = frame.ticks as f32 * 0.05;
        for bird in &mut self.birds {
            bird.mover.advance();
            bird.mover.body.pos.y += (wobble + bird.bob).sin() * 0.3;
            bird.wing_angle += bird.wing_speed;
        }
    }

    fn strike(&mut self, shot: &Body, frame: &mut Frame<'_>) -> bool {
        let t = &self.tuning;
        if let Some(plane) = take_hit(&mut self.planes, shot, |p| &p.mover.body) {
            frame.reward(t.plane_reward, plane.mover.body.pos, ORANGE, SMALL, 15);
        } else if let Some(missile) = take_hit(&mut self.missiles, shot, |m| m.body()) {
            frame.reward(t.missile_reward, missile.body().pos, FLAME, SMALL, 8);
        } else if let Some(bird) = take_hit(&mut self.birds, shot, |b| &b.mover.body) {
            frame.reward(t.bird_reward, bird.mover.body.pos, BROWN, SMALL, 10);
        } else {
            return false;
        }
        true
    }

    fn collide(&mut self, hull: &Body, _frame: &mut Frame<'_>) -> bool {
        touches(&self.planes, hull, |p| &p.mover.body)
            || touches(&self.missiles, hull, |m| m.body())
            || touches(&self.birds, hull, |b| &b.mover.body)
    }

    fn keeps_shot(&self, shot: &Body) -> bool {
        shot.pos.x <= FIELD_WIDTH
    }

    fn retire(&mut self) {
        self.planes.retain(|p| !p.mover.body.gone_left());
        self.missiles.retain(|m| m.body().pos.x > 0.0);
        self.birds.retain(|b| b.mover.body.within_field(BIRD_MARGIN));
    }

    fn threats(&self) -> Vec<Body> {
        let planes = self.planes.iter().map(|p| p.mover.body);
        let missiles = self.missiles.iter().map(|m| *m.body());
        let birds = self.birds.iter().map(|b| b.mover.body);
        planes.chain(missiles).chain(birds).collect()
    }
}
