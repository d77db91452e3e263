//! Board-agnostic core logic for the Brickplot pen plotter
//!
//! The plotter is built from construction-set parts: an X and a Y drive
//! motor move the carriage, a third motor lifts the pen. Motors are driven
//! over an infrared link with no position feedback, so every move is timed.
//!
//! This crate contains everything that does not depend on the link itself:
//!
//! - Geometry types (points, segments)
//! - Hardware abstraction traits (motor interface, feedback display)
//! - Calibration tables and the distance-to-duration model
//! - Configuration (defaults, TOML subset parser, binary persistence)
//! - The segment sequencer with backlash compensation and diagonal fusing
//! - Maintenance routines (slack preload, calibration pattern, emergency stop)
//! - Text printing with a built-in stroke font

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod geometry;
pub mod motion;
pub mod print;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use geometry::{Point, Segment};
pub use motion::{PenState, PlotterState, Sequencer};
pub use print::Printer;
