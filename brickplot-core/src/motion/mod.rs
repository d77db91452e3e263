//! Motion sequencing
//!
//! Turns queued line segments into timed motor pulses.

pub mod duration;
pub mod maintenance;
pub mod planner;
pub mod sequencer;
pub mod state;

pub use duration::AxisTiming;
pub use maintenance::emergency_stop;
pub use planner::{AxisMove, VisitPlan};
pub use sequencer::{Sequencer, MAX_QUEUE};
pub use state::{PenState, PlotterState};
