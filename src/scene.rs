//! Draw instructions for one frame.
//!
//! The frame builder is pure: it turns a [`TickOutput`] into a list of
//! primitives that any backend can paint in order.

use serde::Serialize;

use crate::animation::TickOutput;
use crate::geometry::EyeGeometry;
use crate::types::Point;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// Colors used to paint the eyes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: Rgb,
    pub sclera: Rgb,
    pub pupil: Rgb,
    pub lid: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb::BLACK,
            sclera: Rgb::WHITE,
            pupil: Rgb::BLACK,
            lid: Rgb::WHITE,
        }
    }
}

/// A single paint operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear(Rgb),
    Circle {
        center: Point,
        radius: u32,
        color: Rgb,
    },
    Line {
        from: Point,
        to: Point,
        thickness: u32,
        color: Rgb,
    },
}

/// Build the ordered draw list for a tick.
pub fn build_frame(geometry: &EyeGeometry, tick: &TickOutput, palette: &Palette) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(5);
    commands.push(DrawCommand::Clear(palette.background));

    let eyes = [tick.left, tick.right];
    if tick.eyes_closed {
        let half = geometry.eye_radius as f32;
        for eye in eyes {
            let c = eye.socket_center;
            commands.push(DrawCommand::Line {
                from: Point::new(c.x - half, c.y),
                to: Point::new(c.x + half, c.y),
                thickness: geometry.lid_thickness(),
                color: palette.lid,
            });
        }
        return commands;
    }

    for eye in eyes {
        commands.push(DrawCommand::Circle {
            center: eye.socket_center,
            radius: geometry.eye_radius,
            color: palette.sclera,
        });
    }
    for eye in eyes {
        commands.push(DrawCommand::Circle {
            center: eye.pupil_center,
            radius: geometry.pupil_radius,
            color: palette.pupil,
        });
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::EyePose;
    use crate::resolver::BehaviorMode;
    use crate::types::GazeOffset;

    fn tick(eyes_closed: bool) -> TickOutput {
        TickOutput {
            mode: if eyes_closed {
                BehaviorMode::Blinking
            } else {
                BehaviorMode::Tracking
            },
            eyes_closed,
            target: GazeOffset::zero(),
            pupil: GazeOffset::new(5.0, 0.0),
            socket: GazeOffset::new(2.0, 0.0),
            left: EyePose {
                socket_center: Point::new(482.0, 540.0),
                pupil_center: Point::new(485.0, 540.0),
            },
            right: EyePose {
                socket_center: Point::new(1442.0, 540.0),
                pupil_center: Point::new(1445.0, 540.0),
            },
        }
    }

    #[test]
    fn open_eyes_draw_whites_then_pupils() {
        let geometry = EyeGeometry::for_display(1920, 1080);
        let commands = build_frame(&geometry, &tick(false), &Palette::default());

        assert_eq!(commands.len(), 5);
        assert_eq!(commands[0], DrawCommand::Clear(Rgb::BLACK));
        assert_eq!(
            commands[1],
            DrawCommand::Circle {
                center: Point::new(482.0, 540.0),
                radius: 135,
                color: Rgb::WHITE,
            }
        );
        assert_eq!(
            commands[4],
            DrawCommand::Circle {
                center: Point::new(1445.0, 540.0),
                radius: 33,
                color: Rgb::BLACK,
            }
        );
    }

    #[test]
    fn closed_eyes_draw_lid_lines() {
        let geometry = EyeGeometry::for_display(1920, 1080);
        let commands = build_frame(&geometry, &tick(true), &Palette::default());

        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[1],
            DrawCommand::Line {
                from: Point::new(347.0, 540.0),
                to: Point::new(617.0, 540.0),
                thickness: 13,
                color: Rgb::WHITE,
            }
        );
        assert!(commands
            .iter()
            .all(|c| !matches!(c, DrawCommand::Circle { .. })));
    }
}
