//! Frame-rate independent exponential smoothing.
//!
//! Each tick moves a value a fraction `rate * dt` of the way toward its
//! target. The fraction is clamped to `[0, 1]`, so the value never overshoots,
//! and a non-positive or non-finite `dt` (clock going backwards, duplicate
//! timestamps) leaves the value where it is.

use crate::types::GazeOffset;

/// Interpolation fraction for one step.
pub fn lerp_factor(dt: f32, rate: f32) -> f32 {
    if !dt.is_finite() || rate.is_nan() || dt <= 0.0 || rate <= 0.0 {
        return 0.0;
    }
    (rate * dt).min(1.0)
}

/// Move `current` toward `target` by the clamped factor `rate * dt`.
pub fn smooth(current: f32, target: f32, dt: f32, rate: f32) -> f32 {
    let factor = lerp_factor(dt, rate);
    if factor >= 1.0 {
        return target;
    }
    current + (target - current) * factor
}

/// [`smooth`] applied to both axes of an offset.
pub fn smooth_offset(current: GazeOffset, target: GazeOffset, dt: f32, rate: f32) -> GazeOffset {
    GazeOffset::new(
        smooth(current.dx, target.dx, dt, rate),
        smooth(current.dy, target.dy, dt, rate),
    )
}

/// Pupil and eye-socket offsets with the two-stage lag model.
///
/// The pupil chases the resolver's target quickly; the socket chases the
/// already-smoothed pupil slowly, so the white of the eye drifts toward where
/// the pupil has been.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionIntegrator {
    pupil: GazeOffset,
    socket: GazeOffset,
    pupil_rate: f32,
    socket_rate: f32,
    socket_lag: bool,
}

impl MotionIntegrator {
    pub fn new(pupil_rate: f32, socket_rate: f32, socket_lag: bool) -> Self {
        Self {
            pupil: GazeOffset::zero(),
            socket: GazeOffset::zero(),
            pupil_rate,
            socket_rate,
            socket_lag,
        }
    }

    /// Advance both stages by `dt` toward `target`.
    pub fn step(&mut self, target: GazeOffset, dt: f32) {
        self.pupil = smooth_offset(self.pupil, target, dt, self.pupil_rate);
        if self.socket_lag {
            self.socket = smooth_offset(self.socket, self.pupil, dt, self.socket_rate);
        }
    }

    /// Smoothed pupil offset from the eye's rest position.
    pub fn pupil(&self) -> GazeOffset {
        self.pupil
    }

    /// Smoothed eye-socket offset. Always zero when socket lag is disabled.
    pub fn socket(&self) -> GazeOffset {
        self.socket
    }

    /// Pupil displacement measured from the displaced socket center.
    pub fn pupil_relative(&self) -> GazeOffset {
        self.pupil - self.socket
    }
}
