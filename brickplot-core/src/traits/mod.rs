//! Hardware abstraction traits
//!
//! These traits define the interface between the sequencing logic
//! and the infrared motor link / on-board display.

pub mod feedback;
pub mod motor;

pub use feedback::{Arrow, Feedback, Icon, NoFeedback};
pub use motor::{Axis, Direction, MotorInterface, MAX_SPEED};
