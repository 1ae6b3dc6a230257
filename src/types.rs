use serde::{Deserialize, Serialize};

/// A 2D displacement in display pixels.
///
/// Used both for the fast pupil offset and the slower eye-socket offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GazeOffset {
    pub dx: f32,
    pub dy: f32,
}

impl GazeOffset {
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    pub const fn zero() -> Self {
        Self { dx: 0.0, dy: 0.0 }
    }

    pub fn magnitude(&self) -> f32 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    pub fn distance(&self, other: &GazeOffset) -> f32 {
        (*self - *other).magnitude()
    }

    /// Clamp each axis independently to `[-limit, limit]`.
    pub fn clamp_axes(self, limit: f32) -> Self {
        let limit = limit.abs();
        Self {
            dx: self.dx.clamp(-limit, limit),
            dy: self.dy.clamp(-limit, limit),
        }
    }
}

impl std::ops::Add for GazeOffset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            dx: self.dx + rhs.dx,
            dy: self.dy + rhs.dy,
        }
    }
}

impl std::ops::Sub for GazeOffset {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            dx: self.dx - rhs.dx,
            dy: self.dy - rhs.dy,
        }
    }
}

impl std::ops::Mul<f32> for GazeOffset {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            dx: self.dx * rhs,
            dy: self.dy * rhs,
        }
    }
}

/// A point on the display, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Displace this point by a gaze offset.
    pub fn offset(self, by: GazeOffset) -> Self {
        Self {
            x: self.x + by.dx,
            y: self.y + by.dy,
        }
    }
}

/// A face bounding box in source-frame pixels: top-left corner, width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl FaceRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Dimensions of a source camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}
