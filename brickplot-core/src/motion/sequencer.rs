//! Segment sequencer
//!
//! Drains a queue of line segments into timed motor commands. Each segment
//! is two visits: its start with the pen up, then its end with the pen
//! down. The pen is always lifted and both axes braked when a run ends.

use heapless::Deque;

use super::duration::AxisTiming;
use super::planner::{DrivePhase, VisitPlan};
use super::state::{PenState, PlotterState};
use crate::config::{ConfigError, PlotterConfig, SpeedLevel};
use crate::geometry::{Point, Segment};
use crate::traits::{Axis, Feedback, Icon, MotorInterface, NoFeedback};

/// Default queue capacity for callers building segment queues
pub const MAX_QUEUE: usize = 32;

/// Which end of a segment is being visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Endpoint {
    Start,
    End,
}

/// Drives the plotter motors through queued segments
///
/// Every calibration value a run needs is resolved on construction, so
/// configuration problems are reported before anything moves.
pub struct Sequencer<M, F = NoFeedback> {
    pub(super) motors: M,
    pub(super) feedback: F,
    level: SpeedLevel,
    x: AxisTiming,
    y: AxisTiming,
    pen_down_speed: i8,
    pen_settle_ms: u32,
    pub(super) preload_ms: u32,
    fuse_diagonals: bool,
}

impl<M: MotorInterface> Sequencer<M> {
    /// Create a sequencer without operator feedback
    pub fn new(motors: M, config: &PlotterConfig) -> Result<Self, ConfigError> {
        Self::with_feedback(motors, NoFeedback, config)
    }
}

impl<M: MotorInterface, F: Feedback> Sequencer<M, F> {
    /// Create a sequencer that reports to a feedback display
    pub fn with_feedback(
        motors: M,
        feedback: F,
        config: &PlotterConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let level = config.speed_level()?;
        let backlash = config.motion.backlash_mm;

        Ok(Self {
            motors,
            feedback,
            level,
            x: AxisTiming::resolve(&config.calibration, Axis::X, level, backlash)?,
            y: AxisTiming::resolve(&config.calibration, Axis::Y, level, backlash)?,
            pen_down_speed: config.pen.down_speed(),
            pen_settle_ms: config.pen.settle_ms,
            preload_ms: config.motion.preload_ms,
            fuse_diagonals: config.motion.fuse_diagonals,
        })
    }

    /// Get the motor interface
    pub fn motors(&self) -> &M {
        &self.motors
    }

    /// Get the motor interface mutably
    pub fn motors_mut(&mut self) -> &mut M {
        &mut self.motors
    }

    /// Get the feedback display
    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Take the collaborators back
    pub fn into_parts(self) -> (M, F) {
        (self.motors, self.feedback)
    }

    /// Draw every queued segment, in order
    ///
    /// The queue is left empty. Afterwards the pen is up and both axes are
    /// stopped, even when the queue was empty to begin with.
    pub fn run<const N: usize>(&mut self, state: &mut PlotterState, queue: &mut Deque<Segment, N>) {
        #[cfg(feature = "defmt")]
        defmt::debug!("Sequencer: running {} segments", queue.len());

        while let Some(segment) = queue.pop_front() {
            let [start, end] = segment.points();
            self.visit(state, start, Endpoint::Start);
            self.visit(state, end, Endpoint::End);
        }

        self.set_pen(state, PenState::Up);
        self.motors.stop_axis(Axis::X);
        self.motors.stop_axis(Axis::Y);
        self.feedback.clear();
    }

    /// Move the pen, doing nothing if it is already there
    pub fn set_pen(&mut self, state: &mut PlotterState, pen: PenState) {
        if state.pen == pen {
            return;
        }

        let (speed, icon) = match pen {
            PenState::Down => (self.pen_down_speed, Icon::SmallDiamond),
            PenState::Up => (-self.pen_down_speed, Icon::Diamond),
        };

        #[cfg(feature = "defmt")]
        defmt::trace!("Pen {} (speed {})", pen, speed);

        self.motors.set_pen_speed(speed);
        self.motors.wait(self.pen_settle_ms);
        self.motors.stop_pen();
        state.pen = pen;
        self.feedback.show_icon(icon);
    }

    fn visit(&mut self, state: &mut PlotterState, target: Point, endpoint: Endpoint) {
        let plan = VisitPlan::plan(state, target, &self.x, &self.y);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Visit {} ({}, {}): x {}+{} ms, y {}+{} ms",
            endpoint,
            target.x,
            target.y,
            plan.x.nominal_ms,
            plan.x.compensation_ms,
            plan.y.nominal_ms,
            plan.y.compensation_ms
        );

        for axis in Axis::ALL {
            let mv = plan.axis(axis);
            if let Some(direction) = mv.direction {
                if mv.reverses {
                    self.feedback.show_text("-");
                }
                state.set_last_direction(axis, direction);
            }
        }

        if let Some(arrow) = plan.arrow() {
            let pen = match endpoint {
                Endpoint::Start => PenState::Up,
                Endpoint::End => PenState::Down,
            };
            self.set_pen(state, pen);
            self.feedback.show_arrow(arrow);
        } else if endpoint == Endpoint::End {
            // A dot
            self.set_pen(state, PenState::Down);
        }

        for phase in plan.phases(self.fuse_diagonals && state.is_pen_down()) {
            self.drive(&phase);
        }

        state.position = target;
    }

    fn drive(&mut self, phase: &DrivePhase) {
        for axis in Axis::ALL {
            if let Some(direction) = phase.direction(axis) {
                #[cfg(feature = "defmt")]
                defmt::trace!("{} -> {}", axis, self.level.signed(direction));

                self.motors.set_axis_speed(axis, self.level.signed(direction));
            }
        }

        self.motors.wait(phase.ms);

        for axis in Axis::ALL {
            if phase.stops(axis) {
                self.motors.stop_axis(axis);
            }
        }
    }
}
