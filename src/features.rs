//! Precomputed audio feature tracks
//!
//! Each level's song ships with a table of per-frame measurements
//! (time, dominant frequency, energy). The entity loop samples the table at
//! the current playback position to decide what to spawn.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FeatureError, Result};
use crate::map_range;

/// Column names expected in the feature table header
pub const TIME_COLUMN: &str = "Time";
pub const FREQUENCY_COLUMN: &str = "DominantFrequency";
pub const ENERGY_COLUMN: &str = "Energy";

/// One sampled frame of a song
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatureSample {
    pub time: f32,
    pub dominant_frequency: f32,
    pub energy: f32,
}

/// Immutable, non-empty feature columns for one song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTrack {
    time: Vec<f32>,
    dominant_frequency: Vec<f32>,
    energy: Vec<f32>,
}

impl FeatureTrack {
    /// Build a track from samples. Fails on an empty sequence.
    pub fn from_samples<I>(samples: I) -> Result<Self>
    where
        I: IntoIterator<Item = AudioFeatureSample>,
    {
        let samples = samples.into_iter();
        let (lower, _) = samples.size_hint();
        let mut track = Self {
            time: Vec::with_capacity(lower),
            dominant_frequency: Vec::with_capacity(lower),
            energy: Vec::with_capacity(lower),
        };
        for s in samples {
            track.time.push(s.time);
            track.dominant_frequency.push(s.dominant_frequency);
            track.energy.push(s.energy);
        }
        if track.time.is_empty() {
            return Err(FeatureError::Empty);
        }
        Ok(track)
    }

    /// Parse a CSV table with a header row.
    ///
    /// Columns are located by name, so order and extra columns don't matter.
    /// Quoted cells may contain commas. Blank lines are ignored.
    pub fn parse_csv(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());
        let header = reader.headers()?.clone();
        if header.iter().all(str::is_empty) {
            return Err(FeatureError::Empty);
        }

        let column = |name: &'static str| {
            header
                .iter()
                .position(|h| h == name)
                .ok_or(FeatureError::MissingColumn(name))
        };
        let time_col = column(TIME_COLUMN)?;
        let freq_col = column(FREQUENCY_COLUMN)?;
        let energy_col = column(ENERGY_COLUMN)?;

        let mut samples = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let row = i + 1;
            samples.push(AudioFeatureSample {
                time: parse_cell(&record, time_col, row, TIME_COLUMN)?,
                dominant_frequency: parse_cell(&record, freq_col, row, FREQUENCY_COLUMN)?,
                energy: parse_cell(&record, energy_col, row, ENERGY_COLUMN)?,
            });
        }

        Self::from_samples(samples)
    }

    /// Read and parse a CSV file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let track = Self::parse_csv(&text)?;
        log::info!("Loaded {} feature samples from {}", track.len(), path.display());
        Ok(track)
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f32] {
        &self.time
    }

    pub fn dominant_frequency(&self) -> &[f32] {
        &self.dominant_frequency
    }

    pub fn energy(&self) -> &[f32] {
        &self.energy
    }

    /// Index of the sample playing at `playback` seconds into a clip of `duration`
    pub fn index_at(&self, playback: f32, duration: f32) -> Option<usize> {
        index_for(playback, duration, self.len())
    }

    /// Cursor positioned at the current playback time
    pub fn cursor(&self, playback: f32, duration: f32) -> FeatureCursor<'_> {
        FeatureCursor {
            track: self,
            index: self.index_at(playback, duration),
        }
    }
}

fn parse_cell(record: &csv::StringRecord, col: usize, row: usize, column: &'static str) -> Result<f32> {
    let raw = record.get(col).unwrap_or("");
    raw.parse::<f32>().map_err(|_| FeatureError::InvalidCell {
        row,
        column,
        value: raw.to_string(),
    })
}

/// Map playback time onto `[0, len - 1]`.
///
/// `floor(map(t, 0, duration, 0, len - 1))`, clamped. Returns `None` when the
/// clip has no usable duration (not loaded yet), the time is not finite, or
/// there is nothing to index.
pub fn index_for(playback: f32, duration: f32, len: usize) -> Option<usize> {
    if len == 0 || !playback.is_finite() || !duration.is_finite() || duration <= 0.0 {
        return None;
    }
    let last = (len - 1) as f32;
    let mapped = map_range(playback, 0.0, duration, 0.0, last).floor();
    Some(mapped.clamp(0.0, last) as usize)
}

/// True when the feature jumped by more than `threshold` since the previous sample
pub fn rising_edge(feature: &[f32], index: usize, threshold: f32) -> bool {
    if index == 0 {
        return false;
    }
    match (feature.get(index), feature.get(index - 1)) {
        (Some(now), Some(prev)) => now - prev > threshold,
        _ => false,
    }
}

/// True when the feature exceeds `threshold` at `index`
pub fn above(feature: &[f32], index: usize, threshold: f32) -> bool {
    feature.get(index).is_some_and(|v| *v > threshold)
}

/// A feature track sampled at one tick's playback position
#[derive(Debug, Clone, Copy)]
pub struct FeatureCursor<'a> {
    track: &'a FeatureTrack,
    index: Option<usize>,
}

impl<'a> FeatureCursor<'a> {
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Dominant frequency rose by more than `threshold`
    pub fn frequency_rise(&self, threshold: f32) -> bool {
        self.index
            .is_some_and(|i| rising_edge(&self.track.dominant_frequency, i, threshold))
    }

    /// Energy is above `threshold`
    pub fn energy_above(&self, threshold: f32) -> bool {
        self.index
            .is_some_and(|i| above(&self.track.energy, i, threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(freqs: &[f32]) -> FeatureTrack {
        FeatureTrack::from_samples(freqs.iter().enumerate().map(|(i, f)| AudioFeatureSample {
            time: i as f32,
            dominant_frequency: *f,
            energy: 0.0,
        }))
        .unwrap()
    }

    #[test]
    fn test_spawn_triggers_once_on_jump() {
        let freqs = [0.0, 0.0, 700.0, 0.0];
        let hits: Vec<usize> = (0..freqs.len())
            .filter(|&i| rising_edge(&freqs, i, 600.0))
            .collect();
        assert_eq!(hits, vec![2]);
    }

    #[test]
    fn test_rising_edge_is_strict() {
        let freqs = [0.0, 600.0];
        assert!(!rising_edge(&freqs, 1, 600.0));
        assert!(rising_edge(&freqs, 1, 599.0));
        assert!(!rising_edge(&freqs, 5, 0.0));
    }

    #[test]
    fn test_index_mapping() {
        assert_eq!(index_for(0.0, 10.0, 4), Some(0));
        assert_eq!(index_for(5.0, 10.0, 4), Some(1));
        assert_eq!(index_for(10.0, 10.0, 4), Some(3));
        // Playback overshoot is clamped
        assert_eq!(index_for(12.0, 10.0, 4), Some(3));
        assert_eq!(index_for(-1.0, 10.0, 4), Some(0));
    }

    #[test]
    fn test_index_unloaded_clip() {
        assert_eq!(index_for(1.0, 0.0, 4), None);
        assert_eq!(index_for(f32::NAN, 10.0, 4), None);
        assert_eq!(index_for(1.0, f32::NAN, 4), None);
        assert_eq!(index_for(1.0, 10.0, 0), None);
    }

    #[test]
    fn test_cursor_predicates() {
        let t = track(&[0.0, 0.0, 700.0, 0.0, 0.0]);
        // 4 intervals over 4 seconds: t=2.0 lands on index 2
        let c = t.cursor(2.0, 4.0);
        assert_eq!(c.index(), Some(2));
        assert!(c.frequency_rise(600.0));
        assert!(!c.energy_above(0.0));
        assert!(!t.cursor(2.0, 0.0).frequency_rise(600.0));
    }

    #[test]
    fn test_parse_csv() {
        let csv = "Time,Frequency,DominantFrequency,Amplitude,Energy\n\
                   0.0,10,100,0.1,5000\n\
                   \n\
                   0.5,12,800,0.2,9000\n";
        let t = FeatureTrack::parse_csv(csv).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.dominant_frequency(), &[100.0, 800.0]);
        assert_eq!(t.energy(), &[5000.0, 9000.0]);
        assert_eq!(t.time(), &[0.0, 0.5]);
    }

    #[test]
    fn test_parse_csv_quoted_cells() {
        let csv = "Time,Label,DominantFrequency,Energy\n\
                   0.0,\"x,1\",100,5000\n\
                   \"0.5\",\"chorus, loud\",\"800\",9000\n";
        let t = FeatureTrack::parse_csv(csv).unwrap();
        assert_eq!(t.time(), &[0.0, 0.5]);
        assert_eq!(t.dominant_frequency(), &[100.0, 800.0]);
        assert_eq!(t.energy(), &[5000.0, 9000.0]);
    }

    #[test]
    fn test_parse_csv_short_row() {
        let err = FeatureTrack::parse_csv("Time,DominantFrequency,Energy\n0,100\n").unwrap_err();
        assert!(matches!(err, FeatureError::InvalidCell { row: 1, column: "Energy", .. }));
    }

    #[test]
    fn test_parse_csv_errors() {
        let err = FeatureTrack::parse_csv("Time,Energy\n0,1\n").unwrap_err();
        assert!(matches!(err, FeatureError::MissingColumn("DominantFrequency")));

        let err = FeatureTrack::parse_csv("Time,DominantFrequency,Energy\n0,abc,1\n").unwrap_err();
        match err {
            FeatureError::InvalidCell { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "DominantFrequency");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = FeatureTrack::parse_csv("Time,DominantFrequency,Energy\n").unwrap_err();
        assert!(matches!(err, FeatureError::Empty));
        assert!(matches!(FeatureTrack::parse_csv(""), Err(FeatureError::Empty)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = FeatureTrack::load("/nonexistent/features.csv").unwrap_err();
        assert!(matches!(err, FeatureError::Io(_)));
    }
}
