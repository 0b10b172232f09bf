//! Screen flow around the per-level entity loops
//!
//! `Game` owns the loaded feature tracks and clips, the in-memory high score
//! table, and at most one active level run. The host calls `tick` once per
//! rendered frame and reads `screen`/`session` to draw.

use std::collections::HashMap;

use crate::audio::AudioClip;
use crate::error::LevelError;
use crate::features::FeatureTrack;
use crate::highscores::HighScores;
use crate::settings::Config;
use crate::sim::levels::{Air, Earth, Level, Space, Water};
use crate::sim::{EntityLoop, GamePhase, LevelKind, Session, TickInput, tick};

/// Where the how-to-play screen goes back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Back {
    Menu,
    /// The paused run it was opened from
    Paused,
}

/// What the host should be showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Menu,
    HowToPlay { return_to: Back },
    /// A level run is active (it may be paused or finished)
    Playing,
    /// A level could not start
    Error(LevelError),
}

/// The active run, one variant per level type
#[derive(Debug, Clone)]
pub enum Run {
    Water(EntityLoop<Water>),
    Earth(EntityLoop<Earth>),
    Air(EntityLoop<Air>),
    Space(EntityLoop<Space>),
}

impl Run {
    fn new(level: LevelKind, config: &Config, high_score: u64, seed: u64) -> Self {
        let cap = config.settings.max_particles();
        let tuning = &config.tuning;
        match level {
            LevelKind::Water => Run::Water(EntityLoop::new(tuning.water.clone(), high_score, seed, cap)),
            LevelKind::Earth => Run::Earth(EntityLoop::new(tuning.earth.clone(), high_score, seed, cap)),
            LevelKind::Air => Run::Air(EntityLoop::new(tuning.air.clone(), high_score, seed, cap)),
            LevelKind::Space => Run::Space(EntityLoop::new(tuning.space.clone(), high_score, seed, cap)),
        }
    }

    pub fn session(&self) -> &Session {
        match self {
            Run::Water(run) => &run.session,
            Run::Earth(run) => &run.session,
            Run::Air(run) => &run.session,
            Run::Space(run) => &run.session,
        }
    }

    pub fn level(&self) -> LevelKind {
        self.session().level
    }

    /// Live hostiles in the run
    pub fn hostile_count(&self) -> usize {
        match self {
            Run::Water(run) => run.level.hostile_count(),
            Run::Earth(run) => run.level.hostile_count(),
            Run::Air(run) => run.level.hostile_count(),
            Run::Space(run) => run.level.hostile_count(),
        }
    }

    fn tick<C: AudioClip + ?Sized>(&mut self, track: &FeatureTrack, clip: &mut C, input: &TickInput, frame_ms: f32) {
        match self {
            Run::Water(run) => tick(run, track, clip, input, frame_ms),
            Run::Earth(run) => tick(run, track, clip, input, frame_ms),
            Run::Air(run) => tick(run, track, clip, input, frame_ms),
            Run::Space(run) => tick(run, track, clip, input, frame_ms),
        }
    }
}

/// Top-level game: menus, level start/retry/quit, high scores
pub struct Game<C> {
    config: Config,
    tracks: HashMap<LevelKind, FeatureTrack>,
    clips: HashMap<LevelKind, C>,
    high_scores: HighScores,
    screen: Screen,
    run: Option<Run>,
    /// Runs started so far (varies the seed between attempts)
    runs_started: u64,
    /// Input for the next tick; one-shot fields are cleared after use
    pub input: TickInput,
}

impl<C: AudioClip> Game<C> {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tracks: HashMap::new(),
            clips: HashMap::new(),
            high_scores: HighScores::new(),
            screen: Screen::Menu,
            run: None,
            runs_started: 0,
            input: TickInput::default(),
        }
    }

    /// Register the feature track for a level
    pub fn set_track(&mut self, level: LevelKind, track: FeatureTrack) {
        log::info!("Feature track for {level}: {} samples", track.len());
        self.tracks.insert(level, track);
    }

    /// Register the song for a level
    pub fn set_clip(&mut self, level: LevelKind, clip: C) {
        self.clips.insert(level, clip);
    }

    pub fn clip(&self, level: LevelKind) -> Option<&C> {
        self.clips.get(&level)
    }

    pub fn clip_mut(&mut self, level: LevelKind) -> Option<&mut C> {
        self.clips.get_mut(&level)
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    /// Session of the active run
    pub fn session(&self) -> Option<&Session> {
        self.run.as_ref().map(Run::session)
    }

    fn stop_current_clip(&mut self) {
        if let Some(level) = self.run.as_ref().map(Run::level) {
            if let Some(clip) = self.clips.get_mut(&level) {
                clip.stop();
            }
        }
    }

    fn check_ready(&self, level: LevelKind) -> Result<(), LevelError> {
        match self.tracks.get(&level) {
            None => return Err(LevelError::MissingTrack(level)),
            Some(track) if track.is_empty() => return Err(LevelError::EmptyTrack(level)),
            Some(_) => {}
        }
        match self.clips.get(&level) {
            Some(clip) if clip.is_loaded() => Ok(()),
            _ => Err(LevelError::ClipNotLoaded(level)),
        }
    }

    /// Start `level` from scratch. On failure the error screen is shown and
    /// nothing ticks until the player leaves it.
    pub fn start_level(&mut self, level: LevelKind) -> Result<(), LevelError> {
        self.stop_current_clip();
        self.run = None;
        self.input = TickInput::default();

        if let Err(e) = self.check_ready(level) {
            log::error!("Cannot start {level}: {e}");
            self.screen = Screen::Error(e.clone());
            return Err(e);
        }

        let seed = self.config.seed.wrapping_add(self.runs_started);
        self.runs_started += 1;
        let high_score = self.high_scores.best(level);
        self.run = Some(Run::new(level, &self.config, high_score, seed));
        if let Some(clip) = self.clips.get_mut(&level) {
            clip.stop();
            clip.play();
        }
        self.screen = Screen::Playing;
        log::info!("Started {level} (seed {seed}, best {high_score})");
        Ok(())
    }

    /// Restart the current level
    pub fn retry(&mut self) -> Result<(), LevelError> {
        match self.run.as_ref().map(Run::level) {
            Some(level) => self.start_level(level),
            None => Ok(()),
        }
    }

    /// Abandon any run and go back to the menu
    pub fn main_menu(&mut self) {
        self.stop_current_clip();
        self.run = None;
        self.input = TickInput::default();
        self.screen = Screen::Menu;
    }

    /// Queue a pause toggle for the next tick
    pub fn toggle_pause(&mut self) {
        if self.screen == Screen::Playing {
            self.input.pause = true;
        }
    }

    /// Open the instructions, from the menu or a paused run
    pub fn how_to_play(&mut self) {
        let paused = self
            .session()
            .is_some_and(|s| s.phase == GamePhase::Paused);
        self.screen = match (&self.screen, paused) {
            (Screen::Menu, _) => Screen::HowToPlay { return_to: Back::Menu },
            (Screen::Playing, true) => Screen::HowToPlay {
                return_to: Back::Paused,
            },
            (other, _) => other.clone(),
        };
    }

    /// Leave the instructions or the error screen
    pub fn back(&mut self) {
        self.screen = match self.screen {
            Screen::HowToPlay {
                return_to: Back::Paused,
            } if self.run.is_some() => Screen::Playing,
            Screen::HowToPlay { .. } | Screen::Error(_) => Screen::Menu,
            ref other => other.clone(),
        };
    }

    /// Advance the active run by one frame and sync its high score
    pub fn tick(&mut self, frame_ms: f32) {
        if self.screen != Screen::Playing {
            return;
        }
        let Some(run) = self.run.as_mut() else {
            return;
        };
        let level = run.level();
        let (Some(track), Some(clip)) = (self.tracks.get(&level), self.clips.get_mut(&level)) else {
            return;
        };

        run.tick(track, clip, &self.input, frame_ms);
        self.input.pause = false;
        self.input.fire = false;

        let best = run.session().high_score;
        if self.high_scores.record(level, best) {
            log::debug!("New {level} high score: {best}");
        }
    }
}
