// ============================================================================
// POLAR MAPPING
// ============================================================================

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Angle where render percentage 0 sits (bottom-left of the dial).
pub const ARC_START_OFFSET: f64 = 3.0 * PI / 4.0;

/// Angular length of the full gauge track.
pub const ARC_SPAN: f64 = 3.0 * PI / 2.0;

/// Side length of the square view box every gauge is laid out in.
pub const VIEW_BOX: f64 = 100.0;

/// A point in view box space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Large-arc flag of an elliptical arc command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SweepFlag {
    Small = 0,
    Large = 1,
}

impl SweepFlag {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for SweepFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Converts a render percentage (0-100 of the track) to radians of arc length.
#[inline]
pub fn percentage_to_radians(percentage: f64) -> f64 {
    ARC_SPAN * (percentage / 100.0)
}

/// Absolute angle of a render percentage on the dial.
#[inline]
pub fn percentage_to_angle(percentage: f64) -> f64 {
    ARC_START_OFFSET + percentage_to_radians(percentage)
}

/// Finds the point at `percentage` of the track on a circle of `radius`,
/// shifted by `offset` on both axes.
///
/// Percentages outside 0-100 keep going around the circle, which is what the
/// aligned layout relies on for its slightly longer track.
pub fn point_on_arc(radius: f64, percentage: f64, offset: f64) -> Coordinate {
    let radians = percentage_to_angle(percentage);
    let coordinate = |modifier: f64| (modifier + 1.0) * radius + offset;

    Coordinate {
        x: coordinate(radians.cos()),
        y: coordinate(radians.sin()),
    }
}

/// Large-arc flag for an arc spanning `arc_length_percent` of the track.
///
/// The angle is reduced modulo a full turn and the flag is set when what
/// remains exceeds half a turn.
pub fn sweep_flag(arc_length_percent: f64) -> SweepFlag {
    let radians = percentage_to_radians(arc_length_percent);
    if radians % (2.0 * PI) > PI {
        SweepFlag::Large
    } else {
        SweepFlag::Small
    }
}

// ============================================================================
// CHART GEOMETRY
// ============================================================================

/// Radius and offset shared by every arc of one gauge instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub radius: f64,
    pub offset: f64,
}

impl ChartGeometry {
    /// Fits the widest stroke (fill plus border) inside the view box.
    pub fn from_strokes(stroke_width: f64, stroke_border: f64) -> Self {
        Self {
            radius: (VIEW_BOX - stroke_width - stroke_border) / 2.0,
            offset: (stroke_width + stroke_border) / 2.0,
        }
    }

    pub fn point(&self, percentage: f64) -> Coordinate {
        point_on_arc(self.radius, percentage, self.offset)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.radius + self.offset, self.radius + self.offset)
    }
}
