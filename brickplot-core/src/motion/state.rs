//! Plotter state carried between drawing commands
//!
//! The plotter has no sensors, so this is the only record of where the
//! carriage is and which way each drivetrain last took up its slack. It
//! must persist across every `run` call of one power-on session.

use crate::geometry::Point;
use crate::traits::{Axis, Direction};

/// Pen position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PenState {
    /// Lifted off the paper
    #[default]
    Up,
    /// Touching the paper
    Down,
}

/// Believed carriage position and drivetrain state
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlotterState {
    /// Current pen position (mm)
    pub position: Point,
    /// Direction of the last non-zero X move
    pub last_x: Direction,
    /// Direction of the last non-zero Y move
    pub last_y: Direction,
    /// Current pen state
    pub pen: PenState,
}

impl Default for PlotterState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotterState {
    /// Home state: origin, slack taken up forward on both axes, pen up
    pub const fn new() -> Self {
        Self {
            position: Point::ORIGIN,
            last_x: Direction::Forward,
            last_y: Direction::Forward,
            pen: PenState::Up,
        }
    }

    /// Direction of the last non-zero move on an axis
    pub fn last_direction(&self, axis: Axis) -> Direction {
        match axis {
            Axis::X => self.last_x,
            Axis::Y => self.last_y,
        }
    }

    /// Record a non-zero move on an axis
    pub fn set_last_direction(&mut self, axis: Axis, direction: Direction) {
        match axis {
            Axis::X => self.last_x = direction,
            Axis::Y => self.last_y = direction,
        }
    }

    /// Check if the pen is on the paper
    pub fn is_pen_down(&self) -> bool {
        self.pen == PenState::Down
    }
}
