//! Motor interface trait
//!
//! The plotter has three open-loop motors:
//! - X drive (carriage left/right)
//! - Y drive (carriage forward/back)
//! - Pen lift
//!
//! A motor is given a signed speed and keeps running until it is given
//! another one. There is no position feedback of any kind, so timing is
//! entirely the caller's business via [`MotorInterface::wait`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest speed step accepted by the motor link
pub const MAX_SPEED: i8 = 7;

/// Drive axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// Horizontal axis
    X,
    /// Vertical axis
    Y,
}

impl Axis {
    /// Both axes, X first
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];
}

/// Direction of travel along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Toward increasing coordinates (positive motor speed)
    #[default]
    Forward,
    /// Toward decreasing coordinates (negative motor speed)
    Backward,
}

impl Direction {
    /// Direction needed to cover a signed delta, or `None` for no movement
    pub fn of(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(Direction::Forward)
        } else if delta < 0.0 {
            Some(Direction::Backward)
        } else {
            None
        }
    }

    /// Apply this direction to an unsigned speed step
    pub fn apply(self, speed: u8) -> i8 {
        let speed = speed.min(MAX_SPEED as u8) as i8;
        match self {
            Direction::Forward => speed,
            Direction::Backward => -speed,
        }
    }
}

/// Trait for the plotter's motor link
///
/// Calls are fire-and-forget: the link gives no acknowledgement and no
/// error is reported back. Implementations should clamp out-of-range
/// speeds rather than fail.
pub trait MotorInterface {
    /// Drive an axis at a signed speed step (-7..=7, 0 brakes)
    fn set_axis_speed(&mut self, axis: Axis, speed: i8);

    /// Brake an axis
    fn stop_axis(&mut self, axis: Axis) {
        self.set_axis_speed(axis, 0);
    }

    /// Drive the pen-lift motor at a signed speed step (-7..=7, 0 brakes)
    fn set_pen_speed(&mut self, speed: i8);

    /// Brake the pen-lift motor
    fn stop_pen(&mut self) {
        self.set_pen_speed(0);
    }

    /// Block for the given number of milliseconds
    fn wait(&mut self, ms: u32);

    /// Brake every motor immediately
    fn halt(&mut self) {
        self.stop_axis(Axis::X);
        self.stop_axis(Axis::Y);
        self.stop_pen();
    }
}

impl<T: MotorInterface + ?Sized> MotorInterface for &mut T {
    fn set_axis_speed(&mut self, axis: Axis, speed: i8) {
        (**self).set_axis_speed(axis, speed);
    }

    fn stop_axis(&mut self, axis: Axis) {
        (**self).stop_axis(axis);
    }

    fn set_pen_speed(&mut self, speed: i8) {
        (**self).set_pen_speed(speed);
    }

    fn stop_pen(&mut self) {
        (**self).stop_pen();
    }

    fn wait(&mut self, ms: u32) {
        (**self).wait(ms);
    }

    fn halt(&mut self) {
        (**self).halt();
    }
}
