//! Headless runner
//!
//! Plays one level against a feature table with the autopilot at the
//! controls and a silent playback clock standing in for the song.
//!
//! Usage: element-battle <level> <features.csv> [duration-seconds] [config.json]

use std::process::ExitCode;

use element_battle::consts::FRAME_MS;
use element_battle::sim::LevelKind;
use element_battle::{Config, FeatureTrack, Game, PlaybackClock};

/// Upper bound on simulated frames (one hour at 60 fps)
const MAX_FRAMES: u64 = 60 * 60 * 60;

fn usage() -> ExitCode {
    eprintln!("usage: element-battle <water|earth|air|space> <features.csv> [duration-seconds] [config.json]");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (Some(level), Some(csv)) = (args.first(), args.get(1)) else {
        return usage();
    };
    let Some(level) = LevelKind::from_name(level) else {
        log::error!("Unknown level `{level}`");
        return usage();
    };

    let config = match args.get(3) {
        Some(path) => Config::load_or_default(path),
        None => Config::default(),
    };

    let mut game: Game<PlaybackClock> = Game::new(config);
    let track = match FeatureTrack::load(csv) {
        Ok(track) => Some(track),
        Err(e) => {
            log::error!("Failed to load {csv}: {e}");
            None
        }
    };

    // Without an explicit duration the song is as long as the table
    let duration = match args.get(2).map(|s| s.parse::<f32>()) {
        Some(Ok(seconds)) => seconds,
        Some(Err(e)) => {
            log::error!("Invalid duration: {e}");
            return usage();
        }
        None => track
            .as_ref()
            .and_then(|t| t.time().last().copied())
            .unwrap_or(0.0),
    };
    if let Some(track) = track {
        game.set_track(level, track);
    }
    game.set_clip(level, PlaybackClock::new(duration));

    if game.start_level(level).is_err() {
        return ExitCode::FAILURE;
    }
    game.input.idle_mode = true;

    log::info!("Element Battle (headless) playing {level} for {duration:.1}s");
    let mut frames = 0;
    while frames < MAX_FRAMES {
        game.tick(FRAME_MS);
        if let Some(clip) = game.clip_mut(level) {
            clip.advance(FRAME_MS / 1000.0);
        }
        frames += 1;
        if game.session().is_some_and(|s| s.phase.is_terminal()) {
            break;
        }
    }

    let Some(session) = game.session() else {
        return ExitCode::FAILURE;
    };
    let hostiles = game.run().map_or(0, |run| run.hostile_count());
    log::info!(
        "{level}: {:?} after {} ticks, {} hostiles left",
        session.phase,
        session.ticks,
        hostiles
    );
    println!(
        "{level}: {:?} score {} high score {} progress {:.0}%",
        session.phase,
        session.score,
        session.high_score,
        session.progress * 100.0
    );
    ExitCode::SUCCESS
}
