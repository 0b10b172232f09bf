//! The player's vehicle
//!
//! One variant per level, each carrying only the fields its level needs.
//! Behavior lives in free functions that dispatch on the variant.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::Vec2;

use super::entity::{Body, Cooldown, Motion, Shot};
use super::particles::{BUBBLE, FLAME, LARGE, ORANGE, ParticleField, SMALL, SMOKE, SPRAY};
use super::state::LevelKind;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::map_range;

/// Speeds below this snap to zero
const REST_EPSILON: f32 = 0.01;

/// Held direction keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Handling for the free-moving craft (submarine, jet)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftSpec {
    pub width: f32,
    pub height: f32,
    pub acceleration: f32,
    pub max_speed: f32,
    pub friction: f32,
    /// Lowest allowed y (center)
    pub min_y: f32,
    /// Exhaust interval; the submarine only bubbles while moving
    pub exhaust_ms: f64,
    pub exhaust_while_idle: bool,
}

pub const SUBMARINE: CraftSpec = CraftSpec {
    width: 70.0,
    height: 30.0,
    acceleration: 0.2,
    max_speed: 4.0,
    friction: 0.96,
    min_y: FIELD_HEIGHT / 2.0,
    exhaust_ms: 100.0,
    exhaust_while_idle: false,
};

pub const JET: CraftSpec = CraftSpec {
    width: 50.0,
    height: 20.0,
    acceleration: 0.3,
    max_speed: 5.0,
    friction: 0.96,
    min_y: 10.0,
    exhaust_ms: 50.0,
    exhaust_while_idle: true,
};

/// Submarine or jet. `pos.x` is the left edge, `pos.y` the centerline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Craft {
    pub spec: CraftSpec,
    pub pos: Vec2,
    pub vel: Vec2,
    pub exhaust: Cooldown,
}

impl Craft {
    pub fn new(spec: CraftSpec) -> Self {
        Self {
            spec,
            pos: Vec2::new(50.0, FIELD_HEIGHT / 2.0),
            vel: Vec2::ZERO,
            exhaust: Cooldown::new(spec.exhaust_ms),
        }
    }

    /// Collision circle centered on the hull, as wide as the craft
    pub fn hull(&self) -> Body {
        Body::new(self.pos.x + self.spec.width / 2.0, self.pos.y, self.spec.width)
    }
}

pub const TANK_SIZE: f32 = 60.0;
const TANK_ACCELERATION: f32 = 0.1;
const TANK_MAX_SPEED: f32 = 4.0;
const TANK_FRICTION: f32 = 0.96;
const CANNON_STEP: f32 = 0.1;
const CANNON_LENGTH: f32 = 40.0;
const TANK_RELOAD_MS: f64 = 500.0;
/// Ground line the tank drives on
pub const GROUND_Y: f32 = FIELD_HEIGHT - 50.0;

/// Earth level tank: drives along the ground, aims a cannon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tank {
    pub x: f32,
    pub speed: f32,
    /// Relative to straight up, within ±π/4
    pub cannon_angle: f32,
    pub reload: Cooldown,
    pub last_exhaust_ms: f64,
}

impl Default for Tank {
    fn default() -> Self {
        Self {
            x: 50.0,
            speed: 0.0,
            cannon_angle: 0.0,
            reload: Cooldown::new(TANK_RELOAD_MS),
            last_exhaust_ms: f64::NEG_INFINITY,
        }
    }
}

impl Tank {
    pub fn hull(&self) -> Body {
        Body::new(self.x, GROUND_Y, TANK_SIZE)
    }
}

pub const SHIP_SIZE: f32 = 40.0;
const SHIP_ROTATION: f32 = 0.1;
const SHIP_ACCELERATION: f32 = 0.2;
const SHIP_DECELERATION: f32 = 0.05;
const SHIP_MAX_SPEED: f32 = 5.0;
const SHIP_FRICTION: f32 = 0.98;

/// Space level ship: rotates and thrusts along its heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ship {
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub last_exhaust_ms: f64,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            pos: Vec2::new(50.0, FIELD_HEIGHT / 2.0),
            angle: 0.0,
            speed: 0.0,
            last_exhaust_ms: f64::NEG_INFINITY,
        }
    }
}

impl Ship {
    fn heading(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin())
    }
}

/// The player's vehicle for the current level
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Player {
    Water(Craft),
    Earth(Tank),
    Air(Craft),
    Space(Ship),
}

const MISSILE_SPEED: f32 = 8.0;
const MISSILE_SIZE: f32 = 10.0;
const BULLET_SPEED: f32 = 8.0;
const BULLET_SIZE: f32 = 20.0;
const LASER_SPEED: f32 = 10.0;
const LASER_SIZE: f32 = 10.0;

/// Fresh vehicle at its starting position
pub fn spawn(level: LevelKind) -> Player {
    match level {
        LevelKind::Water => Player::Water(Craft::new(SUBMARINE)),
        LevelKind::Earth => Player::Earth(Tank::default()),
        LevelKind::Air => Player::Air(Craft::new(JET)),
        LevelKind::Space => Player::Space(Ship::default()),
    }
}

/// Horizontal position hostiles measure themselves against: a craft's left
/// edge, the center for the tank and ship
pub fn anchor_x(player: &Player) -> f32 {
    match player {
        Player::Water(craft) | Player::Air(craft) => craft.pos.x,
        Player::Earth(tank) => tank.x,
        Player::Space(ship) => ship.pos.x,
    }
}

/// Collision circle used against hostiles
pub fn hull(player: &Player) -> Body {
    match player {
        Player::Water(craft) | Player::Air(craft) => craft.hull(),
        Player::Earth(tank) => tank.hull(),
        Player::Space(ship) => Body {
            pos: ship.pos,
            size: SHIP_SIZE,
        },
    }
}

/// Apply held keys
pub fn steer(player: &mut Player, keys: &Controls) {
    match player {
        Player::Water(craft) | Player::Air(craft) => {
            let a = craft.spec.acceleration;
            let max = craft.spec.max_speed;
            if keys.left {
                craft.vel.x = (craft.vel.x - a).max(-max);
            }
            if keys.right {
                craft.vel.x = (craft.vel.x + a).min(max);
            }
            if keys.up {
                craft.vel.y = (craft.vel.y - a).max(-max);
            }
            if keys.down {
                craft.vel.y = (craft.vel.y + a).min(max);
            }
        }
        Player::Earth(tank) => {
            if keys.left {
                tank.cannon_angle = (tank.cannon_angle - CANNON_STEP).clamp(-FRAC_PI_4, FRAC_PI_4);
            }
            if keys.right {
                tank.cannon_angle = (tank.cannon_angle + CANNON_STEP).clamp(-FRAC_PI_4, FRAC_PI_4);
            }
            if keys.up {
                tank.speed = (tank.speed + TANK_ACCELERATION).min(TANK_MAX_SPEED);
            }
            if keys.down {
                tank.speed = (tank.speed - TANK_ACCELERATION).max(-TANK_MAX_SPEED);
            }
        }
        Player::Space(ship) => {
            if keys.left {
                ship.angle -= SHIP_ROTATION;
            }
            if keys.right {
                ship.angle += SHIP_ROTATION;
            }
            if keys.up {
                ship.speed = (ship.speed + SHIP_ACCELERATION).min(SHIP_MAX_SPEED);
            }
            if keys.down && ship.speed > 0.0 {
                ship.speed = (ship.speed - SHIP_DECELERATION).max(0.0);
            }
        }
    }
}

fn settle(speed: f32, friction: f32) -> f32 {
    let s = speed * friction;
    if s.abs() < REST_EPSILON { 0.0 } else { s }
}

/// Exhaust cadence for throttle-driven vehicles: faster means more often and denser
fn throttle_exhaust(speed: f32, max_speed: f32) -> (f64, usize) {
    let interval = map_range(speed.abs(), 0.0, max_speed, 500.0, 50.0) as f64;
    let count = map_range(speed.abs(), 0.0, max_speed, 1.0, 5.0).floor().max(1.0) as usize;
    (interval, count)
}

/// Friction, movement, clamping and exhaust for one tick
pub fn advance(player: &mut Player, now_ms: f64, particles: &mut ParticleField) {
    match player {
        Player::Water(craft) | Player::Air(craft) => {
            let spec = craft.spec;
            craft.vel.x = settle(craft.vel.x, spec.friction);
            craft.vel.y = settle(craft.vel.y, spec.friction);
            craft.pos += craft.vel;
            craft.pos.x = craft.pos.x.clamp(0.0, FIELD_WIDTH - spec.width);
            craft.pos.y = craft
                .pos
                .y
                .clamp(spec.min_y.max(spec.height / 2.0), FIELD_HEIGHT - spec.height / 2.0);

            let moving = craft.vel != Vec2::ZERO;
            if (moving || spec.exhaust_while_idle) && craft.exhaust.ready(now_ms) {
                if spec.exhaust_while_idle {
                    particles.burst(craft.pos, FLAME, SMALL, 3);
                } else {
                    // Bubbles below the surface, spray above it
                    let color = if craft.pos.y > FIELD_HEIGHT / 2.0 { BUBBLE } else { SPRAY };
                    let wake = craft.pos + Vec2::new(0.0, spec.height / 2.0);
                    particles.burst(wake, color, SMALL, 5);
                }
            }
        }
        Player::Earth(tank) => {
            tank.speed = settle(tank.speed, TANK_FRICTION);
            tank.x = (tank.x + tank.speed).clamp(0.0, FIELD_WIDTH - TANK_SIZE / 2.0);

            if tank.speed != 0.0 {
                let (interval, count) = throttle_exhaust(tank.speed, TANK_MAX_SPEED);
                if now_ms - tank.last_exhaust_ms > interval {
                    let rear = tank.x - TANK_SIZE / 2.0 * tank.speed.signum();
                    particles.burst(Vec2::new(rear, GROUND_Y), SMOKE, LARGE, count);
                    tank.last_exhaust_ms = now_ms;
                }
            }
        }
        Player::Space(ship) => {
            ship.speed = settle(ship.speed, SHIP_FRICTION);
            ship.pos += ship.heading() * ship.speed;
            ship.pos.x = ship.pos.x.clamp(0.0, FIELD_WIDTH);
            ship.pos.y = ship.pos.y.clamp(0.0, FIELD_HEIGHT);

            if ship.speed > 0.0 {
                let (interval, count) = throttle_exhaust(ship.speed, SHIP_MAX_SPEED);
                if now_ms - ship.last_exhaust_ms > interval {
                    let nozzle = ship.pos - ship.heading() * SHIP_SIZE / 1.5;
                    particles.burst(nozzle, ORANGE, LARGE, count);
                    ship.last_exhaust_ms = now_ms;
                }
            }
        }
    }
}

/// Fire the vehicle's weapon. The tank's cannon needs to reload between shots.
pub fn shoot(player: &mut Player, now_ms: f64) -> Option<Shot> {
    match player {
        Player::Water(craft) | Player::Air(craft) => {
            let muzzle = Body::new(craft.pos.x + craft.spec.width, craft.pos.y, MISSILE_SIZE);
            Some(Shot::trailing(muzzle, Motion::rightward(MISSILE_SPEED)))
        }
        Player::Earth(tank) => {
            if !tank.reload.ready(now_ms) {
                return None;
            }
            let angle = tank.cannon_angle - FRAC_PI_2;
            let base = Vec2::new(tank.x, GROUND_Y - TANK_SIZE / 2.0);
            let tip = base + Vec2::new(angle.cos(), angle.sin()) * (CANNON_LENGTH + 5.0);
            Some(Shot::plain(
                Body {
                    pos: tip,
                    size: BULLET_SIZE,
                },
                Motion::Heading {
                    speed: BULLET_SPEED,
                    angle,
                },
            ))
        }
        Player::Space(ship) => {
            let apex = ship.pos + ship.heading() * SHIP_SIZE;
            Some(Shot::plain(
                Body {
                    pos: apex,
                    size: LASER_SIZE,
                },
                Motion::Heading {
                    speed: LASER_SPEED,
                    angle: ship.angle,
                },
            ))
        }
    }
}
