//! Driver implementations for the Brickplot core traits
//!
//! - [`pf`]: Power Functions infrared receivers driving the real plotter
//! - [`sim`]: a host-side plot simulator for checking whole drawings

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod pf;
pub mod sim;

pub use pf::{IrTransmitter, PfError, PfMotors, PfOutput, PfPort, PfWiring};
pub use sim::PlotSimulator;
