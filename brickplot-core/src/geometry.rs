//! Plotter geometry
//!
//! All coordinates are in plotter millimeters, X to the right and Y away
//! from the operator.

use crate::traits::Axis;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A position on the paper
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The home position
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    /// Create a point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Coordinate along one axis
    pub fn coord(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Translate by the given offsets
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// A straight line to draw
///
/// The sequencer travels to `start` with the pen up and then draws to
/// `end` with the pen down. When `start` equals the previous segment's
/// `end` the pen simply stays down. A segment whose endpoints coincide
/// draws a dot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    /// Create a segment between two points
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Both endpoints in visiting order
    pub fn points(&self) -> [Point; 2] {
        [self.start, self.end]
    }
}

impl From<[[f32; 2]; 2]> for Segment {
    fn from([start, end]: [[f32; 2]; 2]) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_from_nested_arrays() {
        let seg = Segment::from([[0.0, 0.0], [10.0, -5.0]]);
        assert_eq!(seg.start, Point::ORIGIN);
        assert_eq!(seg.end, Point::new(10.0, -5.0));
        assert_eq!(seg.points(), [Point::ORIGIN, Point::new(10.0, -5.0)]);
    }

    #[test]
    fn test_coord_by_axis() {
        let p = Point::new(1.5, -2.0).offset(1.0, 1.0);
        assert_eq!(p.coord(Axis::X), 2.5);
        assert_eq!(p.coord(Axis::Y), -1.0);
    }
}
