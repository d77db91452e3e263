//! Per-visit move planning
//!
//! Planning is pure: given the current state and a target point it works
//! out per-axis distances, reversal compensation, and the drive phases to
//! issue. The sequencer applies the plan to the motors and the state.

use heapless::Vec;

use super::duration::AxisTiming;
use super::state::PlotterState;
use crate::geometry::Point;
use crate::traits::{Arrow, Axis, Direction};

/// Distances closer than this count as equal for diagonal fusing (mm)
pub const DIAGONAL_TOLERANCE_MM: f32 = 1e-3;

/// Maximum drive phases for one visit
pub const MAX_PHASES: usize = 3;

/// Planned movement of one axis for one visit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisMove {
    /// Unsigned travel (mm)
    pub distance: f32,
    /// Direction of travel, `None` when the axis stays put
    pub direction: Option<Direction>,
    /// Run time for the travel itself
    pub nominal_ms: u32,
    /// Extra pre-roll time to take up slack after a reversal
    pub compensation_ms: u32,
    /// This move reverses the axis
    pub reverses: bool,
}

impl AxisMove {
    /// A move that goes nowhere
    pub const STILL: AxisMove = AxisMove {
        distance: 0.0,
        direction: None,
        nominal_ms: 0,
        compensation_ms: 0,
        reverses: false,
    };

    /// Plan one axis from `from` to `to`
    ///
    /// `last` is the direction of the axis' previous non-zero move.
    pub fn plan(from: f32, to: f32, last: Direction, timing: &AxisTiming) -> Self {
        let delta = to - from;
        let Some(direction) = Direction::of(delta) else {
            return Self::STILL;
        };

        let distance = delta.abs();
        let reverses = direction != last;

        Self {
            distance,
            direction: Some(direction),
            nominal_ms: timing.duration_ms(distance, direction),
            compensation_ms: if reverses {
                timing.backlash_ms(direction)
            } else {
                0
            },
            reverses,
        }
    }

    /// Check if the axis moves at all
    pub fn is_moving(&self) -> bool {
        self.direction.is_some()
    }

    /// Nominal plus compensation time
    pub fn total_ms(&self) -> u32 {
        self.nominal_ms.saturating_add(self.compensation_ms)
    }
}

/// One drive step: run the listed axes together, then wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrivePhase {
    /// X direction, `None` if X is not driven in this phase
    pub x: Option<Direction>,
    /// Y direction, `None` if Y is not driven in this phase
    pub y: Option<Direction>,
    /// How long to run
    pub ms: u32,
    /// Brake X after the wait
    pub stop_x: bool,
    /// Brake Y after the wait
    pub stop_y: bool,
}

impl DrivePhase {
    /// Direction of an axis in this phase
    pub fn direction(&self, axis: Axis) -> Option<Direction> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Check if an axis is braked after this phase
    pub fn stops(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.stop_x,
            Axis::Y => self.stop_y,
        }
    }

    /// Run the given axes without braking afterwards
    fn running(x: Option<Direction>, y: Option<Direction>, ms: u32) -> Self {
        Self {
            x,
            y,
            ms,
            stop_x: false,
            stop_y: false,
        }
    }

    /// Run one axis, then brake it
    fn single(axis: Axis, direction: Direction, ms: u32) -> Self {
        match axis {
            Axis::X => Self {
                stop_x: true,
                ..Self::running(Some(direction), None, ms)
            },
            Axis::Y => Self {
                stop_y: true,
                ..Self::running(None, Some(direction), ms)
            },
        }
    }
}

/// Complete plan for visiting one point
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VisitPlan {
    pub target: Point,
    pub x: AxisMove,
    pub y: AxisMove,
}

impl VisitPlan {
    /// Plan a visit from the current state
    pub fn plan(state: &PlotterState, target: Point, x: &AxisTiming, y: &AxisTiming) -> Self {
        let plan_axis = |axis: Axis, timing: &AxisTiming| {
            AxisMove::plan(
                state.position.coord(axis),
                target.coord(axis),
                state.last_direction(axis),
                timing,
            )
        };
        Self {
            target,
            x: plan_axis(Axis::X, x),
            y: plan_axis(Axis::Y, y),
        }
    }

    /// Movement on one axis
    pub fn axis(&self, axis: Axis) -> &AxisMove {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Check if both axes move by the same amount (a 45° line)
    pub fn is_diagonal(&self) -> bool {
        self.x.is_moving()
            && self.y.is_moving()
            && (self.x.distance - self.y.distance).abs() <= DIAGONAL_TOLERANCE_MM
    }

    /// Arrow for the direction of travel
    pub fn arrow(&self) -> Option<Arrow> {
        Arrow::from_directions(self.x.direction, self.y.direction)
    }

    /// Drive phases for this visit
    ///
    /// With `fuse` set and a diagonal move, both axes run together. The
    /// axis with the longer compensation starts alone for the difference,
    /// then both run until one axis has had its time and is braked. The
    /// other axis finishes alone; with equal nominal times nothing is left.
    /// Otherwise Y runs alone, then X runs alone. Phases that would run
    /// for zero time are left out.
    pub fn phases(&self, fuse: bool) -> Vec<DrivePhase, MAX_PHASES> {
        if fuse && self.is_diagonal() {
            if let (Some(dx), Some(dy)) = (self.x.direction, self.y.direction) {
                return self.fused(dx, dy);
            }
        }

        let mut phases = Vec::new();
        for axis in [Axis::Y, Axis::X] {
            let mv = self.axis(axis);
            let Some(direction) = mv.direction else {
                continue;
            };
            if mv.total_ms() > 0 {
                push(
                    &mut phases,
                    DrivePhase::single(axis, direction, mv.total_ms()),
                );
            }
        }

        phases
    }

    fn fused(&self, dx: Direction, dy: Direction) -> Vec<DrivePhase, MAX_PHASES> {
        let lead_ms = self.x.compensation_ms.abs_diff(self.y.compensation_ms);
        let x_leads = self.x.compensation_ms > self.y.compensation_ms;

        let (remaining_x, remaining_y) = if x_leads {
            (self.x.total_ms().saturating_sub(lead_ms), self.y.total_ms())
        } else {
            (self.x.total_ms(), self.y.total_ms().saturating_sub(lead_ms))
        };

        let lead = if x_leads {
            DrivePhase::running(Some(dx), None, lead_ms)
        } else {
            DrivePhase::running(None, Some(dy), lead_ms)
        };
        let together = DrivePhase::running(Some(dx), Some(dy), remaining_x.min(remaining_y));
        let tail = DrivePhase::running(
            (remaining_x > remaining_y).then_some(dx),
            (remaining_y > remaining_x).then_some(dy),
            remaining_x.abs_diff(remaining_y),
        );

        let mut phases = Vec::new();
        for phase in [lead, together, tail] {
            if phase.ms > 0 {
                push(&mut phases, phase);
            }
        }

        // An axis is braked after the last phase that drives it
        for i in 0..phases.len() {
            let next = phases.get(i + 1).copied();
            let phase = &mut phases[i];
            phase.stop_x = phase.x.is_some() && next.map_or(true, |n| n.x.is_none());
            phase.stop_y = phase.y.is_some() && next.map_or(true, |n| n.y.is_none());
        }

        phases
    }
}

fn push(phases: &mut Vec<DrivePhase, MAX_PHASES>, phase: DrivePhase) {
    // Never more than three phases per visit
    let _ = phases.push(phase);
}
