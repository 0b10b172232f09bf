//! Water level: sharks on the beat, boats on loud passages

use rand::Rng;

use super::{Frame, Level, take_hit, touches};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::entity::{Body, Motion, Mover, Shot};
use crate::sim::particles::{FLAME, ORANGE, RED, SMALL};
use crate::sim::state::LevelKind;
use crate::tuning::WaterTuning;

const MISSILE_SIZE: f32 = 10.0;

/// A boat fires a single missile once it is well into the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boat {
    pub mover: Mover,
    pub fired: bool,
}

#[derive(Debug, Clone)]
pub struct Water {
    tuning: WaterTuning,
    pub sharks: Vec<Mover>,
    pub boats: Vec<Boat>,
    /// Missiles fired by boats
    pub missiles: Vec<Shot>,
}

impl Level for Water {
    const KIND: LevelKind = LevelKind::Water;
    type Tuning = WaterTuning;

    fn new(tuning: WaterTuning) -> Self {
        Self {
            tuning,
            sharks: Vec::new(),
            boats: Vec::new(),
            missiles: Vec::new(),
        }
    }

    fn update(&mut self, frame: &mut Frame<'_>) {
        let t = &self.tuning;

        if frame.cursor.frequency_rise(t.shark_rise) {
            let y = frame.rng.random_range(FIELD_HEIGHT / 2.0..FIELD_HEIGHT);
            log::debug!("Shark at y={y:.0}");
            self.sharks.push(Mover::new(
                Body::new(FIELD_WIDTH, y, t.shark_size),
                Motion::leftward(t.shark_speed),
            ));
        }
        let sway = frame.sway();
        for shark in &mut self.sharks {
            shark.advance();
            if shark.body.pos.x > frame.player_x {
                shark.body.pos.y += sway;
            }
        }

        if frame.cursor.energy_above(t.boat_energy) && frame.rng.random::<f32>() < t.boat_chance {
            log::debug!("Boat launched");
            self.boats.push(Boat {
                mover: Mover::new(
                    Body::new(FIELD_WIDTH, FIELD_HEIGHT / 2.0, t.boat_width),
                    Motion::leftward(t.boat_speed),
                ),
                fired: false,
            });
        }
        for boat in &mut self.boats {
            boat.mover.advance();
            let body = boat.mover.body;
            if !boat.fired && body.pos.x < t.boat_fire_x {
                boat.fired = true;
                self.missiles.push(Shot::trailing(
                    Body::new(body.pos.x - body.size / 2.0, body.pos.y, MISSILE_SIZE),
                    Motion::leftward(t.missile_speed),
                ));
            }
        }

        for missile in &mut self.missiles {
            missile.advance(frame.now_ms, frame.particles);
        }
    }

    fn strike(&mut self, shot: &Body, frame: &mut Frame<'_>) -> bool {
        let t = &self.tuning;
        if let Some(shark) = take_hit(&mut self.sharks, shot, |s| &s.body) {
            frame.reward(t.shark_reward, shark.body.pos, RED, SMALL, 10);
        } else if let Some(boat) = take_hit(&mut self.boats, shot, |b| &b.mover.body) {
            frame.reward(t.boat_reward, boat.mover.body.pos, ORANGE, SMALL, 15);
        } else if let Some(missile) = take_hit(&mut self.missiles, shot, |m| m.body()) {
            frame.reward(t.missile_reward, missile.body().pos, FLAME, SMALL, 8);
        } else {
            return false;
        }
        true
    }

    fn collide(&mut self, hull: &Body, _frame: &mut Frame<'_>) -> bool {
        touches(&self.sharks, hull, |s| &s.body)
            || touches(&self.boats, hull, |b| &b.mover.body)
            || touches(&self.missiles, hull, |m| m.body())
    }

    fn keeps_shot(&self, shot: &Body) -> bool {
        shot.pos.x <= FIELD_WIDTH
    }

    fn retire(&mut self) {
        self.sharks.retain(|s| !s.body.gone_left());
        self.boats.retain(|b| !b.mover.body.gone_left());
        self.missiles.retain(|m| m.body().pos.x > 0.0);
    }

    fn threats(&self) -> Vec<Body> {
        let sharks = self.sharks.iter().map(|s| s.body);
        let boats = self.boats.iter().map(|b| b.mover.body);
        let missiles = self.missiles.iter().map(|m| *m.body());
        sharks.chain(boats).chain(missiles).collect()
    }
}
