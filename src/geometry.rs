use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Eye placement and sizes derived from the display size.
///
/// Eyes sit at a quarter and three quarters of the width, vertically centered.
/// Sizes use integer division so they stay stable pixel counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeGeometry {
    pub display_width: u32,
    pub display_height: u32,
    pub left_center: Point,
    pub right_center: Point,
    pub eye_radius: u32,
    pub pupil_radius: u32,
    /// Pupil travel at a relative face position of 1.0 before sensitivity.
    pub max_pupil_movement: u32,
}

impl EyeGeometry {
    pub fn for_display(width: u32, height: u32) -> Self {
        let eye_radius = width.min(height) / 8;
        Self {
            display_width: width,
            display_height: height,
            left_center: Point::new((width / 4) as f32, (height / 2) as f32),
            right_center: Point::new((3 * width / 4) as f32, (height / 2) as f32),
            eye_radius,
            pupil_radius: eye_radius / 4,
            max_pupil_movement: eye_radius / 5,
        }
    }

    pub fn centers(&self) -> [Point; 2] {
        [self.left_center, self.right_center]
    }

    pub fn max_pupil_movement(&self) -> f32 {
        self.max_pupil_movement as f32
    }

    /// Thickness of the closed-eye line, never thinner than 2 px.
    pub fn lid_thickness(&self) -> u32 {
        (self.eye_radius / 10).max(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_hd_layout() {
        let g = EyeGeometry::for_display(1920, 1080);
        assert_eq!(g.left_center, Point::new(480.0, 540.0));
        assert_eq!(g.right_center, Point::new(1440.0, 540.0));
        assert_eq!(g.eye_radius, 135);
        assert_eq!(g.pupil_radius, 33);
        assert_eq!(g.max_pupil_movement, 27);
        assert_eq!(g.lid_thickness(), 13);
    }

    #[test]
    fn portrait_uses_width() {
        let g = EyeGeometry::for_display(600, 1600);
        assert_eq!(g.eye_radius, 75);
        assert_eq!(g.max_pupil_movement, 15);
    }

    #[test]
    fn tiny_display_keeps_visible_lid() {
        let g = EyeGeometry::for_display(64, 48);
        assert_eq!(g.eye_radius, 6);
        assert_eq!(g.pupil_radius, 1);
        assert_eq!(g.max_pupil_movement, 1);
        assert_eq!(g.lid_thickness(), 2);
    }
}
