//! Audio playback abstraction
//!
//! The entity loop never decodes or plays audio. It only reads the current
//! playback position of the level's song and issues play/pause/stop.
//! `PlaybackClock` is a silent clip that advances with wall time, used by the
//! headless runner and the tests.

/// A song the host is playing for the current level
pub trait AudioClip {
    /// Seconds since the start of the clip
    fn current_time(&self) -> f32;
    /// Total length in seconds (0 until loaded)
    fn duration(&self) -> f32;
    /// Whether the clip finished loading and can be played
    fn is_loaded(&self) -> bool;
    fn is_playing(&self) -> bool;
    /// Start or resume from the current position
    fn play(&mut self);
    /// Hold the current position
    fn pause(&mut self);
    /// Halt and rewind to the start
    fn stop(&mut self);
}

/// Silent clip driven by elapsed frame time
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackClock {
    position: f32,
    duration: f32,
    loaded: bool,
    playing: bool,
}

impl PlaybackClock {
    /// Create a loaded, stopped clip of `duration` seconds
    pub fn new(duration: f32) -> Self {
        Self {
            position: 0.0,
            duration: duration.max(0.0),
            loaded: true,
            playing: false,
        }
    }

    /// A clip whose asset never arrived
    pub fn unloaded() -> Self {
        Self {
            position: 0.0,
            duration: 0.0,
            loaded: false,
            playing: false,
        }
    }

    /// Advance playback by `dt` seconds (no-op unless playing)
    pub fn advance(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        self.position = (self.position + dt).min(self.duration);
        if self.position >= self.duration {
            self.playing = false;
        }
    }

    /// Jump to `seconds` (clamped to the clip)
    pub fn seek(&mut self, seconds: f32) {
        self.position = seconds.clamp(0.0, self.duration);
    }
}

impl AudioClip for PlaybackClock {
    fn current_time(&self) -> f32 {
        self.position
    }

    fn duration(&self) -> f32 {
        self.duration
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        if self.loaded {
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.position = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances_only_while_playing() {
        let mut clip = PlaybackClock::new(10.0);
        clip.advance(1.0);
        assert_eq!(clip.current_time(), 0.0);

        clip.play();
        clip.advance(1.5);
        assert_eq!(clip.current_time(), 1.5);

        clip.pause();
        clip.advance(1.0);
        assert_eq!(clip.current_time(), 1.5);

        clip.stop();
        assert_eq!(clip.current_time(), 0.0);
        assert!(!clip.is_playing());
    }

    #[test]
    fn test_clock_ends_at_duration() {
        let mut clip = PlaybackClock::new(2.0);
        clip.play();
        clip.advance(5.0);
        assert_eq!(clip.current_time(), 2.0);
        assert!(!clip.is_playing());
    }

    #[test]
    fn test_unloaded_clip_never_plays() {
        let mut clip = PlaybackClock::unloaded();
        clip.play();
        assert!(!clip.is_playing());
        assert_eq!(clip.duration(), 0.0);
    }
}
