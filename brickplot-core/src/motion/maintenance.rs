//! Maintenance routines
//!
//! Start-up slack preload, the speed calibration pattern and the
//! emergency stop.

use super::sequencer::Sequencer;
use super::state::{PenState, PlotterState};
use crate::config::SpeedLevel;
use crate::traits::{Axis, Direction, Feedback, MotorInterface};

/// Y pre-roll before the calibration pattern
pub const CALIBRATION_LEAD_Y_MS: u32 = 500;

/// X pre-roll before the calibration pattern
pub const CALIBRATION_LEAD_X_MS: u32 = 1000;

/// Length of each calibration stroke
pub const CALIBRATION_STROKE_MS: u32 = 3000;

/// X step between calibration strokes
pub const CALIBRATION_STEP_MS: u32 = 1000;

/// Brake every motor immediately
///
/// Usable from anywhere that can reach the motor link. Plotter state is
/// left alone; the carriage position is unknown afterwards only if a move
/// was cut short.
pub fn emergency_stop<M: MotorInterface + ?Sized>(motors: &mut M) {
    #[cfg(feature = "defmt")]
    defmt::warn!("Emergency stop");

    motors.halt();
}

impl<M: MotorInterface, F: Feedback> Sequencer<M, F> {
    /// Take up drivetrain slack and reset the state to home
    ///
    /// Runs both axes forward at full speed for the configured preload
    /// time, which makes the `Forward` last-direction assumption true.
    pub fn initialize(&mut self, state: &mut PlotterState) {
        #[cfg(feature = "defmt")]
        defmt::info!("Preloading axes for {} ms", self.preload_ms);

        self.feedback.show_text("I");
        self.set_pen(state, PenState::Up);

        let full = SpeedLevel::FULL.signed(Direction::Forward);
        self.motors.set_axis_speed(Axis::X, full);
        self.motors.set_axis_speed(Axis::Y, full);
        self.motors.wait(self.preload_ms);
        self.motors.stop_axis(Axis::X);
        self.motors.stop_axis(Axis::Y);

        *state = PlotterState::new();
        self.feedback.clear();
    }

    /// Draw the speed calibration pattern
    ///
    /// One Y stroke per speed level, slowest first, each run for
    /// [`CALIBRATION_STROKE_MS`] and separated by a short X step. Measuring
    /// the strokes gives the travel per reference period for the
    /// calibration table. The pattern ends at the new home position.
    pub fn calibrate(&mut self, state: &mut PlotterState) {
        #[cfg(feature = "defmt")]
        defmt::info!("Drawing calibration pattern");

        let full = SpeedLevel::FULL.signed(Direction::Forward);

        self.set_pen(state, PenState::Up);
        self.motors.set_axis_speed(Axis::Y, full);
        self.motors.wait(CALIBRATION_LEAD_Y_MS);
        self.motors.stop_axis(Axis::Y);
        self.motors.set_axis_speed(Axis::X, full);
        self.motors.wait(CALIBRATION_LEAD_X_MS);
        self.motors.stop_axis(Axis::X);

        self.set_pen(state, PenState::Down);

        for level in SpeedLevel::all() {
            #[cfg(feature = "defmt")]
            defmt::info!("Calibration stroke at level {}", level.get());

            self.feedback.show_number(level.get());
            self.motors.set_axis_speed(Axis::Y, level.signed(Direction::Forward));
            self.motors.wait(CALIBRATION_STROKE_MS);
            self.motors.stop_axis(Axis::Y);
            self.motors.set_axis_speed(Axis::X, full);
            self.motors.wait(CALIBRATION_STEP_MS);
            self.motors.stop_axis(Axis::X);
        }

        self.set_pen(state, PenState::Up);
        self.motors.stop_axis(Axis::X);
        self.motors.stop_axis(Axis::Y);

        *state = PlotterState::new();
        self.feedback.clear();
    }

    /// Brake every motor immediately, see [`emergency_stop`]
    pub fn emergency_stop(&mut self) {
        emergency_stop(&mut self.motors);
    }
}
