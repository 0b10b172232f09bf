//! Earth level: bombers overhead, the tank on the ground

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::Rng;

use super::{Frame, Level, take_hit};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::collision::first_hit;
use crate::sim::entity::{Body, Motion, Mover};
use crate::sim::particles::{FLAME, LARGE, ORANGE};
use crate::sim::player::GROUND_Y;
use crate::sim::state::LevelKind;
use crate::tuning::EarthTuning;

/// Bombs burst this far above their center
const BOMB_FUSE: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct Earth {
    tuning: EarthTuning,
    pub planes: Vec<Mover>,
    pub bombs: Vec<Mover>,
}

impl Earth {
    fn blast(&self, bomb: &Mover) -> Body {
        Body {
            pos: bomb.body.pos,
            size: self.tuning.bomb_blast_size,
        }
    }
}

impl Level for Earth {
    const KIND: LevelKind = LevelKind::Earth;
    type Tuning = EarthTuning;

    fn new(tuning: EarthTuning) -> Self {
        Self {
            tuning,
            planes: Vec::new(),
            bombs: Vec::new(),
        }
    }

    fn update(&mut self, frame: &mut Frame<'_>) {
        let t = &self.tuning;

        if frame.cursor.frequency_rise(t.plane_rise) {
            let y = frame.rng.random_range(0.0..FIELD_HEIGHT / 4.0);
            log::debug!("Bomber at y={y:.0}");
            self.planes.push(Mover::new(
                Body::new(FIELD_WIDTH, y, t.plane_size),
                Motion::leftward(t.plane_speed),
            ));
        }

        let loud = frame.cursor.energy_above(t.bomb_energy);
        for plane in &mut self.planes {
            plane.advance();
            if loud && frame.rng.random::<f32>() < t.bomb_chance {
                self.bombs.push(Mover::new(
                    Body {
                        pos: plane.body.pos,
                        size: t.bomb_size,
                    },
                    Motion::Heading {
                        speed: t.bomb_speed,
                        angle: FRAC_PI_2,
                    },
                ));
            }
        }

        // Bombs that reach the ground go off there
        self.bombs.retain_mut(|bomb| {
            bomb.advance();
            if bomb.body.pos.y + BOMB_FUSE >= GROUND_Y {
                frame.particles.burst(Vec2::new(bomb.body.pos.x, GROUND_Y), ORANGE, LARGE, 30);
                false
            } else {
                true
            }
        });
    }

    fn strike(&mut self, shot: &Body, frame: &mut Frame<'_>) -> bool {
        let t = &self.tuning;
        if let Some(plane) = take_hit(&mut self.planes, shot, |p| &p.body) {
            frame.reward(t.plane_reward, plane.body.pos, ORANGE, LARGE, 15);
        } else if let Some(bomb) = take_hit(&mut self.bombs, shot, |b| &b.body) {
            frame.reward(t.bomb_reward, bomb.body.pos, FLAME, LARGE, 10);
        } else {
            return false;
        }
        true
    }

    /// Only bombs hurt the tank; planes fly overhead
    fn collide(&mut self, hull: &Body, frame: &mut Frame<'_>) -> bool {
        let blasts: Vec<Body> = self.bombs.iter().map(|b| self.blast(b)).collect();
        match first_hit(hull, &blasts) {
            Some(i) => {
                let bomb = self.bombs.remove(i);
                frame.particles.burst(bomb.body.pos, ORANGE, LARGE, 30);
                true
            }
            None => false,
        }
    }

    fn keeps_shot(&self, shot: &Body) -> bool {
        (0.0..=FIELD_WIDTH).contains(&shot.pos.x) && shot.pos.y >= 0.0
    }

    fn retire(&mut self) {
        self.planes.retain(|p| p.body.pos.x >= 0.0);
        self.bombs
            .retain(|b| b.body.pos.x >= 0.0 && b.body.pos.y <= FIELD_HEIGHT);
    }

    fn threats(&self) -> Vec<Body> {
        let planes = self.planes.iter().map(|p| p.body);
        planes.chain(self.bombs.iter().map(|b| self.blast(b))).collect()
    }
}
