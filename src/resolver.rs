//! Turns the per-tick face signal into a gaze target and a behavior mode.
//!
//! The resolver owns every timer of the animation. Mode selection depends
//! only on how long the face has been missing, plus whether a blink is still
//! running:
//!
//! | face      | time without face          | mode                         |
//! |-----------|----------------------------|------------------------------|
//! | present   | -                          | Tracking                     |
//! | absent    | `< flicker_threshold`      | Tracking, centered           |
//! | absent    | `< extended_blink_threshold` | Blinking (one blink started) |
//! | absent    | beyond                     | RandomSearch                 |

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{BlinkPolicy, EyesConfig};
use crate::types::{FaceRect, FrameSize, GazeOffset};

/// Faces covering more than this share of the frame stop shrinking pupil travel.
const MAX_AREA_ATTENUATION: f32 = 0.8;

/// Mutually exclusive animation state for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorMode {
    #[default]
    Tracking,
    Blinking,
    RandomSearch,
}

impl BehaviorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tracking => "tracking",
            Self::Blinking => "blinking",
            Self::RandomSearch => "random-search",
        }
    }
}

/// Timers driving mode selection. Times are seconds on the animation clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    /// Sum of all positive tick durations seen so far.
    pub clock: f32,
    pub time_since_last_face: f32,
    pub blink_elapsed: f32,
    pub blink_active: bool,
    /// Set once a blink has started during the current absence; cleared by a face.
    pub blink_consumed: bool,
    /// Clock value of the last random target draw, `None` until the first draw
    /// of the current absence.
    pub last_random_update: Option<f32>,
    pub current_random_target: GazeOffset,
}

/// Output of one resolver tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub target: GazeOffset,
    pub mode: BehaviorMode,
    /// True while a blink is in its closed phase.
    pub eyes_closed: bool,
}

/// Resolves face signals into gaze targets for a fixed camera frame size.
#[derive(Debug, Clone)]
pub struct GazeResolver {
    frame: FrameSize,
    max_pupil_movement: f32,
    sensitivity: f32,
    flicker_threshold: f32,
    extended_blink_threshold: f32,
    blink_duration: f32,
    random_search_interval: f32,
    blink_policy: BlinkPolicy,
    timers: TimerState,
}

impl GazeResolver {
    pub fn new(config: &EyesConfig, frame: FrameSize, max_pupil_movement: f32) -> Self {
        Self {
            frame,
            max_pupil_movement,
            sensitivity: config.sensitivity,
            flicker_threshold: config.flicker_threshold,
            extended_blink_threshold: config.extended_blink_threshold,
            blink_duration: config.blink_duration,
            random_search_interval: config.random_search_interval,
            blink_policy: config.blink_policy,
            timers: TimerState::default(),
        }
    }

    pub fn timers(&self) -> &TimerState {
        &self.timers
    }

    /// Advance all timers by `dt` seconds and resolve this tick's target.
    ///
    /// A non-positive or non-finite `dt` advances nothing.
    pub fn resolve<R: Rng + ?Sized>(
        &mut self,
        face: Option<FaceRect>,
        dt: f32,
        rng: &mut R,
    ) -> Resolution {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.timers.clock += dt;
        self.advance_blink(dt);

        let (target, mode) = match face {
            Some(face) => self.on_face(&face),
            None => self.on_absence(dt, rng),
        };

        Resolution {
            target,
            mode,
            eyes_closed: self.timers.blink_active,
        }
    }

    /// Pupil target for a detected face.
    ///
    /// The horizontal axis is mirrored so the eyes face the viewer, and larger
    /// (closer) faces produce less travel, down to 20% of the full amount.
    pub fn face_target(&self, face: &FaceRect) -> GazeOffset {
        if self.frame.width == 0 || self.frame.height == 0 {
            return GazeOffset::zero();
        }

        let half_w = self.frame.width as f32 / 2.0;
        let half_h = self.frame.height as f32 / 2.0;
        let (cx, cy) = face.center();
        let rel_x = (cx - half_w) / half_w;
        let rel_y = (cy - half_h) / half_h;

        let reach = self.max_pupil_movement * self.sensitivity;
        let area_ratio = face.area() as f32 / self.frame.area() as f32;
        let scale = 1.0 - area_ratio.min(MAX_AREA_ATTENUATION);

        (GazeOffset::new(-rel_x * reach, rel_y * reach) * scale).clamp_axes(reach)
    }

    fn advance_blink(&mut self, dt: f32) {
        if !self.timers.blink_active {
            return;
        }
        self.timers.blink_elapsed += dt;
        if self.timers.blink_elapsed >= self.blink_duration {
            self.timers.blink_active = false;
            debug!(elapsed = self.timers.blink_elapsed, "blink finished");
        }
    }

    fn on_face(&mut self, face: &FaceRect) -> (GazeOffset, BehaviorMode) {
        self.timers.time_since_last_face = 0.0;
        self.timers.blink_consumed = false;
        self.timers.last_random_update = None;

        let target = self.face_target(face);
        if self.timers.blink_active {
            match self.blink_policy {
                BlinkPolicy::RunToCompletion => return (target, BehaviorMode::Blinking),
                BlinkPolicy::CancelOnFace => {
                    debug!("face reappeared, cancelling blink");
                    self.timers.blink_active = false;
                    self.timers.blink_elapsed = 0.0;
                }
            }
        }
        (target, BehaviorMode::Tracking)
    }

    fn on_absence<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> (GazeOffset, BehaviorMode) {
        self.timers.time_since_last_face += dt;
        let missing = self.timers.time_since_last_face;

        if missing < self.flicker_threshold {
            // A blink carried over from a reappearing face still finishes.
            let mode = if self.timers.blink_active {
                BehaviorMode::Blinking
            } else {
                BehaviorMode::Tracking
            };
            return (GazeOffset::zero(), mode);
        }

        if missing < self.extended_blink_threshold {
            if !self.timers.blink_active && !self.timers.blink_consumed {
                self.timers.blink_active = true;
                self.timers.blink_consumed = true;
                self.timers.blink_elapsed = 0.0;
                debug!(missing, "face lost, starting blink");
            }
            return (GazeOffset::zero(), BehaviorMode::Blinking);
        }

        self.timers.blink_active = false;
        let due = match self.timers.last_random_update {
            None => true,
            Some(at) => self.timers.clock - at >= self.random_search_interval,
        };
        if due {
            let reach = self.max_pupil_movement.abs();
            self.timers.current_random_target =
                GazeOffset::new(rng.gen_range(-reach..=reach), rng.gen_range(-reach..=reach));
            self.timers.last_random_update = Some(self.timers.clock);
            debug!(
                dx = self.timers.current_random_target.dx,
                dy = self.timers.current_random_target.dy,
                "new random search target"
            );
        }
        (self.timers.current_random_target, BehaviorMode::RandomSearch)
    }
}
