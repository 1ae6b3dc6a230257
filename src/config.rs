//! Startup configuration for the eye animation.
//!
//! Every tunable is fixed once the program starts. Values can be supplied as a
//! JSON file; any field left out takes its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What happens to an in-progress blink when a face comes back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkPolicy {
    /// A reappearing face cancels the blink on the same tick.
    #[default]
    CancelOnFace,
    /// The blink always runs for its full duration.
    RunToCompletion,
}

/// Sinusoidal drift added on top of the eye-socket offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MicroMotion {
    /// Peak horizontal displacement in display pixels.
    pub amplitude: f32,
    /// Oscillation frequency in Hz.
    pub frequency: f32,
}

impl Default for MicroMotion {
    fn default() -> Self {
        Self {
            amplitude: 3.0,
            frequency: 0.5,
        }
    }
}

/// Settings forwarded to the SeetaFace detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    pub min_face_size: u32,
    pub score_thresh: f64,
    pub pyramid_scale_factor: f32,
    pub slide_window_step: u32,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            min_face_size: 20,
            score_thresh: 2.0,
            pyramid_scale_factor: 0.8,
            slide_window_step: 4,
        }
    }
}

/// All animation tunables. Times are in seconds, speeds are smoothing rates in 1/s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyesConfig {
    /// Multiplier on the pupil travel produced by a face offset.
    pub sensitivity: f32,
    /// Smoothing rate of the pupil toward its target.
    pub animation_speed: f32,
    /// Smoothing rate of the eye socket toward the pupil.
    pub eye_follow_speed: f32,
    /// Detection dropouts shorter than this are ignored.
    pub flicker_threshold: f32,
    /// After this long without a face the eyes start searching.
    pub extended_blink_threshold: f32,
    pub blink_duration: f32,
    /// Time between new random search targets.
    pub random_search_interval: f32,
    pub target_fps: u32,
    pub blink_policy: BlinkPolicy,
    /// When false the eye whites stay put and only the pupils move.
    pub socket_lag: bool,
    pub micro_motion: Option<MicroMotion>,
    pub detector: DetectorSettings,
}

impl Default for EyesConfig {
    fn default() -> Self {
        Self {
            sensitivity: 5.0,
            animation_speed: 6.5,
            eye_follow_speed: 2.0,
            flicker_threshold: 0.5,
            extended_blink_threshold: 1.5,
            blink_duration: 0.2,
            random_search_interval: 3.0,
            target_fps: 60,
            blink_policy: BlinkPolicy::default(),
            socket_lag: true,
            micro_motion: None,
            detector: DetectorSettings::default(),
        }
    }
}

impl EyesConfig {
    /// Load a config from a JSON file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse a config from a JSON string and validate it.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every tunable is finite and the thresholds are ordered.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("sensitivity", self.sensitivity),
            ("animation_speed", self.animation_speed),
            ("eye_follow_speed", self.eye_follow_speed),
            ("flicker_threshold", self.flicker_threshold),
            ("extended_blink_threshold", self.extended_blink_threshold),
            ("blink_duration", self.blink_duration),
            ("random_search_interval", self.random_search_interval),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        if self.flicker_threshold > self.extended_blink_threshold {
            return Err(Error::InvalidConfig(format!(
                "flicker_threshold ({}) exceeds extended_blink_threshold ({})",
                self.flicker_threshold, self.extended_blink_threshold
            )));
        }

        if self.target_fps == 0 {
            return Err(Error::InvalidConfig("target_fps must be at least 1".into()));
        }

        if let Some(motion) = self.micro_motion {
            if !motion.amplitude.is_finite() || !motion.frequency.is_finite() {
                return Err(Error::InvalidConfig(
                    "micro_motion amplitude and frequency must be finite".into(),
                ));
            }
        }

        if self.detector.min_face_size == 0 || self.detector.slide_window_step == 0 {
            return Err(Error::InvalidConfig(
                "detector min_face_size and slide_window_step must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Wall-clock budget of one frame at the target rate.
    pub fn frame_budget(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }
}
