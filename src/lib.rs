//! # follow-eyes
//!
//! A pair of animated eyes whose pupils follow the largest face seen by a
//! camera, with idle behaviors when nobody is around.
//!
//! This crate provides:
//! - **Gaze resolution**: face rectangle to pupil target, with a mirrored
//!   horizontal axis and distance attenuation for large (close) faces
//! - **Behavior modes**: tracking, a single blink after a short dropout, and
//!   random searching after a long one
//! - **Motion smoothing**: frame-rate independent easing of the pupils, with
//!   the eye whites trailing behind them
//! - **Frame building**: plain draw instructions for any renderer
//!
//! Camera capture (`nokhwa`) and the fullscreen window (`eframe`) live behind
//! the `gui` feature.
//!
//! ## Quick Start
//!
//! ```rust
//! use follow_eyes::{build_frame, Animator, EyeGeometry, EyesConfig, FaceRect, FrameSize, Palette};
//!
//! let config = EyesConfig::default();
//! let geometry = EyeGeometry::for_display(1920, 1080);
//! let mut animator = Animator::new(&config, geometry, FrameSize::new(640, 480));
//!
//! // A face left of the camera's center makes the eyes look right.
//! let tick = animator.tick(Some(FaceRect::new(100, 200, 80, 80)), 1.0 / 60.0);
//! assert!(tick.target.dx > 0.0);
//!
//! let commands = build_frame(&geometry, &tick, &Palette::default());
//! assert_eq!(commands.len(), 5);
//! ```

mod animation;
#[cfg(feature = "gui")]
mod camera;
mod config;
mod detect;
mod error;
mod frame;
mod geometry;
mod resolver;
mod scene;
mod smoothing;
mod types;

pub use animation::{Animator, EyePose, TickOutput};
#[cfg(feature = "gui")]
pub use camera::CameraSource;
pub use config::{BlinkPolicy, DetectorSettings, EyesConfig, MicroMotion};
pub use detect::{largest_face, FaceDetector, FaceSignalSource, SeetaDetector};
pub use error::{Error, Result};
pub use frame::{frame_size, rgb_to_gray, FrameSource};
pub use geometry::EyeGeometry;
pub use resolver::{BehaviorMode, GazeResolver, Resolution, TimerState};
pub use scene::{build_frame, DrawCommand, Palette, Rgb};
pub use smoothing::{lerp_factor, smooth, smooth_offset, MotionIntegrator};
pub use types::{FaceRect, FrameSize, GazeOffset, Point};
