//! Per-frame entity loop
//!
//! One call to `tick` advances a level run by a single frame: player,
//! projectiles, spawns, collisions, retirement, progress. Deterministic for
//! a given seed, feature track and sequence of playback positions.

use std::cmp::Ordering;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Body, Shot};
use super::levels::{Frame, Level};
use super::particles::ParticleField;
use super::player::{self, Controls, Player};
use super::state::{GamePhase, Session};
use crate::audio::AudioClip;
use crate::consts::PROGRESS_COMPLETE;
use crate::features::FeatureTrack;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction keys
    pub controls: Controls,
    /// Fire the weapon this tick
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI plays the level
    pub idle_mode: bool,
}

/// Everything one run of a level owns
#[derive(Debug, Clone)]
pub struct EntityLoop<L> {
    pub session: Session,
    pub player: Player,
    /// The player's projectiles
    pub shots: Vec<Shot>,
    pub level: L,
    pub particles: ParticleField,
    rng: Pcg32,
}

impl<L: Level> EntityLoop<L> {
    /// Fresh run: empty collections, player at its start, clock at zero
    pub fn new(tuning: L::Tuning, high_score: u64, seed: u64, max_particles: usize) -> Self {
        Self {
            session: Session::new(L::KIND, high_score),
            player: player::spawn(L::KIND),
            shots: Vec::new(),
            level: L::new(tuning),
            particles: ParticleField::new(max_particles, seed.wrapping_add(1)),
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

/// Fraction of the clip played; 0 when the duration is unknown
fn playback_progress(current: f32, duration: f32) -> f32 {
    if duration > 0.0 && current.is_finite() {
        (current / duration).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Advance a level run by one frame
pub fn tick<L: Level, C: AudioClip + ?Sized>(
    run: &mut EntityLoop<L>,
    track: &FeatureTrack,
    clip: &mut C,
    input: &TickInput,
    frame_ms: f32,
) {
    // Handle pause toggle
    if input.pause {
        match run.session.phase {
            GamePhase::Playing => {
                run.session.phase = GamePhase::Paused;
                clip.pause();
                log::info!("Paused {} at {:.1}s", L::KIND, clip.current_time());
                return;
            }
            GamePhase::Paused => {
                run.session.phase = GamePhase::Playing;
                clip.play();
                log::info!("Resumed {}", L::KIND);
            }
            _ => {}
        }
    }

    match run.session.phase {
        GamePhase::Paused => return,
        // Let the last explosions play out
        GamePhase::GameOver | GamePhase::LevelComplete => {
            run.particles.update();
            return;
        }
        GamePhase::Playing => {}
    }

    run.session.ticks += 1;
    run.session.time_ms += frame_ms as f64;
    let now_ms = run.session.time_ms;

    // Sample playback before anything can stop the clip
    let playback = clip.current_time();
    let duration = clip.duration();

    run.particles.update();

    let input = if input.idle_mode {
        autopilot(run)
    } else {
        input.clone()
    };

    player::steer(&mut run.player, &input.controls);
    player::advance(&mut run.player, now_ms, &mut run.particles);
    let hull = player::hull(&run.player);
    let player_x = player::anchor_x(&run.player);
    let ticks = run.session.ticks;

    let mut frame = Frame {
        cursor: track.cursor(playback, duration),
        rng: &mut run.rng,
        particles: &mut run.particles,
        session: &mut run.session,
        player: hull,
        player_x,
        now_ms,
        ticks,
    };

    let crashed = run.level.collide(&hull, &mut frame);
    if crashed {
        clip.stop();
        log::info!("{} over: score {}", L::KIND, frame.session.score);
    } else {
        if input.fire {
            if let Some(shot) = player::shoot(&mut run.player, now_ms) {
                run.shots.push(shot);
            }
        }

        let level = &mut run.level;
        run.shots.retain_mut(|shot| {
            shot.advance(now_ms, frame.particles);
            !level.strike(shot.body(), &mut frame)
        });

        run.level.update(&mut frame);

        let level = &run.level;
        run.shots.retain(|shot| level.keeps_shot(shot.body()));
        run.level.retire();
    }

    let session = frame.session;
    session.progress = playback_progress(playback, duration);
    if session.progress >= PROGRESS_COMPLETE {
        session.phase = GamePhase::LevelComplete;
        log::info!("{} complete: score {}", L::KIND, session.score);
    } else if crashed {
        session.phase = GamePhase::GameOver;
    }
    session.commit_high_score();
}

/// How often the autopilot pulls the trigger
const AUTOPILOT_FIRE_TICKS: u64 = 12;
/// Threats further ahead than this are ignored when dodging
const AUTOPILOT_LOOKAHEAD: f32 = 160.0;

fn nearest(hull: &Body, threats: &[Body]) -> Option<Body> {
    threats
        .iter()
        .filter(|t| t.is_valid())
        .min_by(|a, b| {
            a.pos
                .distance(hull.pos)
                .partial_cmp(&b.pos.distance(hull.pos))
                .unwrap_or(Ordering::Equal)
        })
        .copied()
}

/// Demo-mode input: dodge what is closest, shoot at a steady cadence
fn autopilot<L: Level>(run: &EntityLoop<L>) -> TickInput {
    let hull = player::hull(&run.player);
    let threats = run.level.threats();
    let mut input = TickInput {
        fire: run.session.ticks % AUTOPILOT_FIRE_TICKS == 0,
        ..Default::default()
    };
    let Some(threat) = nearest(&hull, &threats) else {
        return input;
    };
    let to = threat.pos - hull.pos;

    match &run.player {
        Player::Water(_) | Player::Air(_) => {
            let ahead = to.x > -hull.size && to.x < AUTOPILOT_LOOKAHEAD;
            let lane = (hull.size + threat.size) / 2.0 + 10.0;
            if ahead && to.y.abs() < lane {
                // Slide out of its lane
                if to.y > 0.0 {
                    input.controls.up = true;
                } else {
                    input.controls.down = true;
                }
            }
        }
        Player::Earth(tank) => {
            // Aim at it, and back away from whatever is falling overhead
            let wanted = to.x.atan2(-to.y);
            input.controls.left = wanted < tank.cannon_angle - 0.05;
            input.controls.right = wanted > tank.cannon_angle + 0.05;
            if to.x.abs() < hull.size {
                input.controls.up = to.x < 0.0;
                input.controls.down = to.x >= 0.0;
            }
        }
        Player::Space(ship) => {
            let wanted = to.y.atan2(to.x);
            let turn = (wanted - ship.angle + std::f32::consts::PI).rem_euclid(std::f32::consts::TAU)
                - std::f32::consts::PI;
            input.controls.left = turn < -0.05;
            input.controls.right = turn > 0.05;
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::audio::PlaybackClock;
    use crate::consts::FRAME_MS;
    use crate::features::AudioFeatureSample;
    use crate::sim::entity::{Motion, Mover};
    use crate::sim::levels::space::Meteor;
    use crate::sim::levels::{Air, Earth, Space, Water};
    use crate::tuning::{AirTuning, EarthTuning, SpaceTuning, WaterTuning};

    fn quiet_track(len: usize) -> FeatureTrack {
        FeatureTrack::from_samples((0..len).map(|i| AudioFeatureSample {
            time: i as f32,
            dominant_frequency: 0.0,
            energy: 0.0,
        }))
        .unwrap()
    }

    fn playing(duration: f32) -> PlaybackClock {
        let mut clip = PlaybackClock::new(duration);
        clip.play();
        clip
    }

    fn space_run() -> EntityLoop<Space> {
        EntityLoop::new(
            SpaceTuning {
                star_chance: 0.0,
                ..Default::default()
            },
            0,
            1,
            100,
        )
    }

    #[test]
    fn test_player_collision_ends_run() {
        // Ship (size 40) at (50, 50), planet (size 30) at (72, 50): 22 < 35
        let mut run = space_run();
        if let Player::Space(ship) = &mut run.player {
            ship.pos = Vec2::new(50.0, 50.0);
        }
        run.level
            .planets
            .push(Mover::new(Body::new(72.0, 50.0, 30.0), Motion::leftward(2.0)));
        run.session.score = 30;

        let track = quiet_track(10);
        let mut clip = playing(100.0);
        clip.seek(10.0);
        tick(&mut run, &track, &mut clip, &TickInput::default(), FRAME_MS);

        assert_eq!(run.session.phase, GamePhase::GameOver);
        assert_eq!(run.session.high_score, 30);
        assert!(!clip.is_playing());
        assert_eq!(clip.current_time(), 0.0);

        // Frozen afterwards
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut run, &track, &mut clip, &fire, FRAME_MS);
        assert_eq!(run.session.ticks, 1);
        assert_eq!(run.session.score, 30);
        assert!(run.shots.is_empty());
    }

    #[test]
    fn test_completion_beats_same_tick_collision() {
        let mut run = space_run();
        if let Player::Space(ship) = &mut run.player {
            ship.pos = Vec2::new(50.0, 50.0);
        }
        run.level
            .planets
            .push(Mover::new(Body::new(72.0, 50.0, 30.0), Motion::leftward(2.0)));

        let track = quiet_track(10);
        let mut clip = playing(100.0);
        clip.seek(99.0);
        tick(&mut run, &track, &mut clip, &TickInput::default(), FRAME_MS);
        assert_eq!(run.session.phase, GamePhase::LevelComplete);
        assert!(run.session.progress >= PROGRESS_COMPLETE);
    }

    #[test]
    fn test_progress_just_short_of_done() {
        let mut run = EntityLoop::<Water>::new(WaterTuning::default(), 0, 1, 0);
        let track = quiet_track(10);
        let mut clip = playing(100.0);
        clip.seek(98.9);
        tick(&mut run, &track, &mut clip, &TickInput::default(), FRAME_MS);
        assert_eq!(run.session.phase, GamePhase::Playing);
        assert!((run.session.progress - 0.989).abs() < 1e-4);
    }

    #[test]
    fn test_unknown_duration_never_completes() {
        let mut run = EntityLoop::<Air>::new(AirTuning::default(), 0, 1, 0);
        let track = quiet_track(10);
        let mut clip = PlaybackClock::unloaded();
        for _ in 0..10 {
            tick(&mut run, &track, &mut clip, &TickInput::default(), FRAME_MS);
        }
        assert_eq!(run.session.progress, 0.0);
        assert_eq!(run.session.phase, GamePhase::Playing);
        assert_eq!(run.level.planes.len(), 0);
    }

    #[test]
    fn test_pause_suspends_ticks() {
        let mut run = EntityLoop::<Water>::new(WaterTuning::default(), 0, 1, 100);
        let track = quiet_track(10);
        let mut clip = playing(100.0);
        let idle = TickInput::default();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut run, &track, &mut clip, &idle, FRAME_MS);
        tick(&mut run, &track, &mut clip, &pause, FRAME_MS);
        assert_eq!(run.session.phase, GamePhase::Paused);
        assert!(!clip.is_playing());

        for _ in 0..5 {
            tick(&mut run, &track, &mut clip, &idle, FRAME_MS);
        }
        assert_eq!(run.session.ticks, 1);

        tick(&mut run, &track, &mut clip, &pause, FRAME_MS);
        assert_eq!(run.session.phase, GamePhase::Playing);
        assert!(clip.is_playing());
        assert_eq!(run.session.ticks, 2);
    }

    #[test]
    fn test_missile_scores_and_is_consumed() {
        let mut run = EntityLoop::<Water>::new(WaterTuning::default(), 0, 1, 100);
        // Submarine muzzle is at (120, 200); shark dead ahead
        run.level
            .sharks
            .push(Mover::new(Body::new(150.0, 200.0, 50.0), Motion::leftward(2.0)));
        let track = quiet_track(10);
        let mut clip = playing(100.0);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut run, &track, &mut clip, &fire, FRAME_MS);
        assert_eq!(run.session.score, 5);
        assert_eq!(run.session.high_score, 5);
        assert!(run.level.sharks.is_empty());
        assert!(run.shots.is_empty());
    }

    #[test]
    fn test_meteor_needs_two_lasers() {
        let mut run = space_run();
        // Laser leaves the nose at (90, 200) and moves 10 px/tick
        run.level.meteors.push(Meteor {
            mover: Mover::new(Body::new(200.0, 200.0, 50.0), Motion::Linear(Vec2::ZERO)),
            hits: 2,
        });
        let track = quiet_track(10);
        let mut clip = playing(100.0);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut run, &track, &mut clip, &fire, FRAME_MS);
        for _ in 0..10 {
            tick(&mut run, &track, &mut clip, &TickInput::default(), FRAME_MS);
        }
        assert_eq!(run.level.meteors.len(), 1);
        assert_eq!(run.level.meteors[0].hits, 1);
        assert_eq!(run.session.score, 0);

        // Knocked onto a new course; park it back in the firing line
        run.level.meteors[0].mover.motion = Motion::Linear(Vec2::ZERO);
        run.level.meteors[0].mover.body.pos = Vec2::new(200.0, 200.0);
        tick(&mut run, &track, &mut clip, &fire, FRAME_MS);
        for _ in 0..10 {
            tick(&mut run, &track, &mut clip, &TickInput::default(), FRAME_MS);
        }
        assert!(run.level.meteors.is_empty());
        assert_eq!(run.session.score, 20);
    }

    #[test]
    fn test_shots_retire_at_the_edge() {
        let mut run = EntityLoop::<Earth>::new(EarthTuning::default(), 0, 1, 0);
        let track = quiet_track(10);
        let mut clip = playing(1000.0);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut run, &track, &mut clip, &fire, FRAME_MS);
        assert_eq!(run.shots.len(), 1);
        // Straight up from y=275 at 8 px/tick leaves the field within 35 ticks
        for _ in 0..40 {
            tick(&mut run, &track, &mut clip, &TickInput::default(), FRAME_MS);
        }
        assert!(run.shots.is_empty());
    }

    fn beat_track() -> FeatureTrack {
        FeatureTrack::from_samples((0..200).map(|i| AudioFeatureSample {
            time: i as f32 * 0.1,
            dominant_frequency: if i % 7 == 0 { 5000.0 } else { 100.0 },
            energy: if i % 3 == 0 { 9000.0 } else { 1000.0 },
        }))
        .unwrap()
    }

    fn demo_run<L: Level>(tuning: L::Tuning, seed: u64) -> EntityLoop<L> {
        demo_run_for(tuning, seed, 600)
    }

    fn demo_run_for<L: Level>(tuning: L::Tuning, seed: u64, ticks: usize) -> EntityLoop<L> {
        let mut run = EntityLoop::<L>::new(tuning, 0, seed, 200);
        let track = beat_track();
        let mut clip = playing(20.0);
        let demo = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..ticks {
            tick(&mut run, &track, &mut clip, &demo, FRAME_MS);
            clip.advance(FRAME_MS / 1000.0);
        }
        run
    }

    #[test]
    fn test_same_seed_same_run() {
        let a = demo_run::<Space>(SpaceTuning::default(), 99);
        let b = demo_run::<Space>(SpaceTuning::default(), 99);
        assert_eq!(a.session, b.session);
        assert_eq!(a.level.threats(), b.level.threats());
        assert_eq!(a.shots, b.shots);
    }

    #[test]
    fn test_particles_do_not_change_gameplay() {
        let with = demo_run::<Water>(WaterTuning::default(), 5);
        let mut without = EntityLoop::<Water>::new(WaterTuning::default(), 0, 5, 0);
        let track = beat_track();
        let mut clip = playing(20.0);
        let demo = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut without, &track, &mut clip, &demo, FRAME_MS);
            clip.advance(FRAME_MS / 1000.0);
        }
        assert_eq!(with.session, without.session);
        assert!(without.particles.is_empty());
    }

    #[test]
    fn test_autopilot_finishes_every_level() {
        // 20 s clip is 1200 frames; run past its end
        let frames = 1300;
        let water = demo_run_for::<Water>(WaterTuning::default(), 3, frames);
        let earth = demo_run_for::<Earth>(EarthTuning::default(), 3, frames);
        let air = demo_run_for::<Air>(AirTuning::default(), 3, frames);
        let space = demo_run_for::<Space>(SpaceTuning::default(), 3, frames);
        for session in [&water.session, &earth.session, &air.session, &space.session] {
            assert!(session.phase.is_terminal(), "{} still {:?}", session.level, session.phase);
            match session.phase {
                GamePhase::LevelComplete => assert!(session.progress >= PROGRESS_COMPLETE),
                _ => {
                    assert_eq!(session.phase, GamePhase::GameOver);
                    assert!(session.progress < PROGRESS_COMPLETE);
                }
            }
            assert_eq!(session.high_score, session.score);
            // Frozen once over
            assert!(session.ticks < frames as u64);
        }
    }

    proptest! {
        #[test]
        fn score_never_decreases(seed in 0u64..500, fire_every in 1u64..20) {
            let mut run = EntityLoop::<Air>::new(AirTuning::default(), 0, seed, 50);
            let track = beat_track();
            let mut clip = playing(20.0);
            let mut last = 0;
            for i in 0..300u64 {
                let input = TickInput {
                    fire: i % fire_every == 0,
                    ..Default::default()
                };
                tick(&mut run, &track, &mut clip, &input, FRAME_MS);
                clip.advance(FRAME_MS / 1000.0);
                prop_assert!(run.session.score >= last);
                prop_assert!(run.session.high_score >= run.session.score);
                last = run.session.score;
            }
        }
    }
}
