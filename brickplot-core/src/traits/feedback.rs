//! Operator feedback trait
//!
//! The controller has a small LED matrix that shows what the plotter is
//! doing. Feedback is purely observational: nothing here may influence
//! motion, and [`NoFeedback`] can always stand in for a real display.

use super::Direction;

/// Icons shown on pen transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Icon {
    /// Pen is up
    Diamond,
    /// Pen is down
    SmallDiamond,
}

/// Compass arrow for the direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Arrow {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Arrow {
    /// Arrow for a pair of per-axis directions
    ///
    /// Returns `None` when neither axis moves.
    pub fn from_directions(x: Option<Direction>, y: Option<Direction>) -> Option<Self> {
        use Direction::{Backward, Forward};

        match (x, y) {
            (None, Some(Forward)) => Some(Arrow::North),
            (None, Some(Backward)) => Some(Arrow::South),
            (Some(Forward), None) => Some(Arrow::East),
            (Some(Backward), None) => Some(Arrow::West),
            (Some(Forward), Some(Forward)) => Some(Arrow::NorthEast),
            (Some(Backward), Some(Forward)) => Some(Arrow::NorthWest),
            (Some(Forward), Some(Backward)) => Some(Arrow::SouthEast),
            (Some(Backward), Some(Backward)) => Some(Arrow::SouthWest),
            (None, None) => None,
        }
    }
}

/// Trait for the operator display
///
/// Every method defaults to doing nothing.
pub trait Feedback {
    /// Show a status icon
    fn show_icon(&mut self, _icon: Icon) {}

    /// Show a direction arrow
    fn show_arrow(&mut self, _arrow: Arrow) {}

    /// Show a short text marker
    fn show_text(&mut self, _text: &str) {}

    /// Show a number
    fn show_number(&mut self, _value: u8) {}

    /// Blank the display
    fn clear(&mut self) {}
}

/// Feedback sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl Feedback for NoFeedback {}

impl<T: Feedback + ?Sized> Feedback for &mut T {
    fn show_icon(&mut self, icon: Icon) {
        (**self).show_icon(icon);
    }

    fn show_arrow(&mut self, arrow: Arrow) {
        (**self).show_arrow(arrow);
    }

    fn show_text(&mut self, text: &str) {
        (**self).show_text(text);
    }

    fn show_number(&mut self, value: u8) {
        (**self).show_number(value);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}
