//! One animation tick: resolver, integrator and eye placement.

use std::f32::consts::{FRAC_PI_2, PI};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::config::{EyesConfig, MicroMotion};
use crate::geometry::EyeGeometry;
use crate::resolver::{BehaviorMode, GazeResolver, TimerState};
use crate::smoothing::MotionIntegrator;
use crate::types::{FaceRect, FrameSize, GazeOffset, Point};

/// Where one eye is drawn this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EyePose {
    /// Center of the eye white, displaced by the socket offset.
    pub socket_center: Point,
    pub pupil_center: Point,
}

/// Everything the frame builder needs from a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickOutput {
    pub mode: BehaviorMode,
    pub eyes_closed: bool,
    pub target: GazeOffset,
    /// Smoothed pupil offset from the rest position.
    pub pupil: GazeOffset,
    /// Socket offset including micro-motion.
    pub socket: GazeOffset,
    pub left: EyePose,
    pub right: EyePose,
}

/// Owns the complete animation state and advances it one tick at a time.
pub struct Animator<R = StdRng> {
    geometry: EyeGeometry,
    resolver: GazeResolver,
    motion: MotionIntegrator,
    micro_motion: Option<MicroMotion>,
    rng: R,
    last_mode: BehaviorMode,
}

impl Animator<StdRng> {
    /// Animator seeded from OS entropy.
    pub fn new(config: &EyesConfig, geometry: EyeGeometry, frame: FrameSize) -> Self {
        Self::with_rng(config, geometry, frame, StdRng::from_entropy())
    }
}

impl<R: Rng> Animator<R> {
    pub fn with_rng(config: &EyesConfig, geometry: EyeGeometry, frame: FrameSize, rng: R) -> Self {
        Self {
            geometry,
            resolver: GazeResolver::new(config, frame, geometry.max_pupil_movement()),
            motion: MotionIntegrator::new(
                config.animation_speed,
                config.eye_follow_speed,
                config.socket_lag,
            ),
            micro_motion: config.micro_motion,
            rng,
            last_mode: BehaviorMode::Tracking,
        }
    }

    pub fn geometry(&self) -> &EyeGeometry {
        &self.geometry
    }

    pub fn timers(&self) -> &TimerState {
        self.resolver.timers()
    }

    pub fn motion(&self) -> &MotionIntegrator {
        &self.motion
    }

    /// Advance the animation by `dt` seconds using this tick's face signal.
    pub fn tick(&mut self, face: Option<FaceRect>, dt: f32) -> TickOutput {
        let resolution = self.resolver.resolve(face, dt, &mut self.rng);
        if resolution.mode != self.last_mode {
            debug!(
                from = self.last_mode.as_str(),
                to = resolution.mode.as_str(),
                "behavior mode changed"
            );
            self.last_mode = resolution.mode;
        }

        self.motion.step(resolution.target, dt);

        let socket = self.motion.socket() + self.micro_offset();
        let lead = self.motion.pupil_relative();
        let [left, right] = self.geometry.centers().map(|center| {
            let socket_center = center.offset(socket);
            EyePose {
                socket_center,
                pupil_center: socket_center.offset(lead),
            }
        });

        TickOutput {
            mode: resolution.mode,
            eyes_closed: resolution.eyes_closed,
            target: resolution.target,
            pupil: self.motion.pupil(),
            socket,
            left,
            right,
        }
    }

    fn micro_offset(&self) -> GazeOffset {
        let Some(motion) = self.micro_motion else {
            return GazeOffset::zero();
        };
        let phase = 2.0 * PI * motion.frequency * self.resolver.timers().clock;
        GazeOffset::new(
            motion.amplitude * phase.sin(),
            0.5 * motion.amplitude * (0.5 * phase + FRAC_PI_2).sin(),
        )
    }
}
