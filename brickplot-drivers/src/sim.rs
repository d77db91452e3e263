//! Host-side plot simulator
//!
//! Stands in for the motor link and works out what would end up on paper.
//! Each `wait` advances a virtual clock and moves the carriage according to
//! the commanded speeds and the calibration table. Drivetrain slack is
//! modelled per axis: after a reversal the motor turns through the slack
//! before the carriage follows.

use heapless::Vec;

use brickplot_core::config::{CalibrationTable, ConfigError, PenConfig, SpeedLevel};
use brickplot_core::geometry::{Point, Segment};
use brickplot_core::motion::PenState;
use brickplot_core::traits::{Axis, Direction, MotorInterface};

/// Most strokes kept by the simulator
pub const MAX_STROKES: usize = 128;

/// Slack model for one axis
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slack {
    /// Direction the gears are currently engaged in
    engaged: Direction,
    /// Motor travel still needed before the carriage moves (mm)
    remaining_mm: f32,
}

impl Slack {
    /// Gears engaged forward with no slack left, as after a preload
    const PRELOADED: Slack = Slack {
        engaged: Direction::Forward,
        remaining_mm: 0.0,
    };

    /// Feed motor travel through the slack, returning carriage travel
    fn take(&mut self, direction: Direction, travel_mm: f32, slack_mm: f32) -> f32 {
        if direction != self.engaged {
            self.engaged = direction;
            self.remaining_mm = slack_mm;
        }
        let absorbed = travel_mm.min(self.remaining_mm);
        self.remaining_mm -= absorbed;
        travel_mm - absorbed
    }
}

/// Virtual plotter
#[derive(Debug, Clone)]
pub struct PlotSimulator {
    calibration: CalibrationTable,
    slack_mm: f32,
    pen_down_forward: bool,
    now_ms: u64,
    speeds: [i8; 2],
    pen_speed: i8,
    pen: PenState,
    carriage: Point,
    slack: [Slack; 2],
    strokes: Vec<Segment, MAX_STROKES>,
    dropped: usize,
}

impl PlotSimulator {
    /// Create a simulator with the carriage at the origin and the pen up
    ///
    /// `slack_mm` is the real drivetrain slack; set it equal to the
    /// configured backlash for a perfectly compensated plotter.
    pub fn new(
        calibration: CalibrationTable,
        pen: &PenConfig,
        slack_mm: f32,
    ) -> Result<Self, ConfigError> {
        calibration.validate()?;
        Ok(Self {
            calibration,
            slack_mm: slack_mm.max(0.0),
            pen_down_forward: pen.down_forward,
            now_ms: 0,
            speeds: [0; 2],
            pen_speed: 0,
            pen: PenState::Up,
            carriage: Point::ORIGIN,
            slack: [Slack::PRELOADED; 2],
            strokes: Vec::new(),
            dropped: 0,
        })
    }

    /// Virtual time elapsed
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Real carriage position
    pub fn carriage(&self) -> Point {
        self.carriage
    }

    /// Real pen position
    pub fn pen(&self) -> PenState {
        self.pen
    }

    /// Lines drawn so far
    pub fn strokes(&self) -> &[Segment] {
        &self.strokes
    }

    /// Strokes lost because the buffer was full
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Check if every motor is braked
    pub fn is_stopped(&self) -> bool {
        self.speeds == [0, 0] && self.pen_speed == 0
    }

    fn axis_travel(&mut self, axis: Axis, ms: u32) -> f32 {
        let index = axis as usize;
        let speed = self.speeds[index];
        let Some(direction) = Direction::of(f32::from(speed)) else {
            return 0.0;
        };
        let Ok(level) = SpeedLevel::new(speed.unsigned_abs()) else {
            return 0.0;
        };
        // Unmeasured levels do not move the simulated carriage
        let travel = self
            .calibration
            .distance_mm(axis, ms, level, direction)
            .unwrap_or(0.0);

        let moved = self.slack[index].take(direction, travel, self.slack_mm);
        match direction {
            Direction::Forward => moved,
            Direction::Backward => -moved,
        }
    }

    fn record(&mut self, from: Point, to: Point) {
        if from == to {
            return;
        }
        if self.strokes.push(Segment::new(from, to)).is_err() {
            self.dropped += 1;
        }
    }
}

impl MotorInterface for PlotSimulator {
    fn set_axis_speed(&mut self, axis: Axis, speed: i8) {
        self.speeds[axis as usize] = speed;
    }

    fn set_pen_speed(&mut self, speed: i8) {
        self.pen_speed = speed;
    }

    fn wait(&mut self, ms: u32) {
        self.now_ms += u64::from(ms);

        if self.pen_speed != 0 {
            let down = (self.pen_speed > 0) == self.pen_down_forward;
            self.pen = if down { PenState::Down } else { PenState::Up };
        }

        let from = self.carriage;
        let to = from.offset(self.axis_travel(Axis::X, ms), self.axis_travel(Axis::Y, ms));
        self.carriage = to;

        if self.pen == PenState::Down {
            self.record(from, to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickplot_core::config::PlotterConfig;
    use brickplot_core::motion::{PlotterState, Sequencer, MAX_QUEUE};
    use heapless::Deque;

    const TOLERANCE_MM: f32 = 0.02;

    fn near(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() <= TOLERANCE_MM && (a.y - b.y).abs() <= TOLERANCE_MM
    }

    fn simulator(config: &PlotterConfig, slack_mm: f32) -> PlotSimulator {
        PlotSimulator::new(config.calibration, &config.pen, slack_mm).unwrap()
    }

    fn draw(sim: &mut PlotSimulator, config: &PlotterConfig, segments: &[[[f32; 2]; 2]]) {
        let mut queue: Deque<Segment, MAX_QUEUE> = Deque::new();
        for &s in segments {
            queue.push_back(Segment::from(s)).unwrap();
        }
        let mut seq = Sequencer::new(sim, config).unwrap();
        seq.run(&mut PlotterState::new(), &mut queue);
    }

    const SQUARE: [[[f32; 2]; 2]; 4] = [
        [[0.0, 0.0], [20.0, 0.0]],
        [[20.0, 0.0], [20.0, 20.0]],
        [[20.0, 20.0], [0.0, 20.0]],
        [[0.0, 20.0], [0.0, 0.0]],
    ];

    #[test]
    fn test_square_is_reproduced() {
        let config = PlotterConfig::default();
        let mut sim = simulator(&config, config.motion.backlash_mm);

        draw(&mut sim, &config, &SQUARE);

        let corners = [
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(20.0, 20.0),
            Point::new(0.0, 20.0),
            Point::new(0.0, 0.0),
        ];
        let strokes = sim.strokes();
        assert_eq!(strokes.len(), 4);
        for (stroke, pair) in strokes.iter().zip(corners.windows(2)) {
            assert!(near(stroke.start, pair[0]), "{stroke:?}");
            assert!(near(stroke.end, pair[1]), "{stroke:?}");
        }
        assert_eq!(sim.pen(), PenState::Up);
        assert!(sim.is_stopped());
        assert_eq!(sim.dropped(), 0);
    }

    #[test]
    fn test_uncompensated_slack_leaves_a_gap() {
        let mut config = PlotterConfig::default();
        config.motion.backlash_mm = 0.0;
        let mut sim = simulator(&config, 1.5);

        draw(&mut sim, &config, &SQUARE);

        // The return strokes fall short by the slack
        let last = sim.strokes()[3];
        assert!(near(last.end, Point::new(1.5, 1.5)), "{last:?}");
    }

    #[test]
    fn test_diagonal_is_straight() {
        let config = PlotterConfig::default();
        let mut sim = simulator(&config, config.motion.backlash_mm);

        draw(&mut sim, &config, &[[[0.0, 0.0], [10.0, 10.0]]]);

        assert_eq!(sim.strokes().len(), 1);
        let stroke = sim.strokes()[0];
        assert!(near(stroke.start, Point::ORIGIN));
        assert!(near(stroke.end, Point::new(10.0, 10.0)));
        // Pen down, move, pen up
        assert_eq!(sim.now_ms(), 1000 + 1724 + 1000);
    }

    #[test]
    fn test_diagonal_with_unequal_calibration_ends_on_target() {
        let mut config = PlotterConfig::default();
        config.calibration.x.backward.mm_x100[6] = 2000;
        let mut sim = simulator(&config, config.motion.backlash_mm);

        draw(&mut sim, &config, &[[[10.0, 0.0], [0.0, 10.0]]]);

        // Y overshoots if it keeps running while X finishes
        let target = Point::new(0.0, 10.0);
        let last = *sim.strokes().last().unwrap();
        assert!(near(sim.strokes()[0].start, Point::new(10.0, 0.0)));
        assert!(near(last.end, target), "{last:?}");
        assert!(near(sim.carriage(), target), "{:?}", sim.carriage());
        assert!(sim.is_stopped());
    }

    #[test]
    fn test_pen_up_moves_draw_nothing() {
        let config = PlotterConfig::default();
        let mut sim = simulator(&config, 0.0);

        sim.set_axis_speed(Axis::X, 7);
        sim.wait(5000);
        sim.stop_axis(Axis::X);

        assert!(sim.strokes().is_empty());
        assert!(near(sim.carriage(), Point::new(29.0, 0.0)));
    }

    #[test]
    fn test_slack_absorbs_reversal() {
        let mut slack = Slack::PRELOADED;
        assert_eq!(slack.take(Direction::Forward, 2.0, 1.5), 2.0);
        assert_eq!(slack.take(Direction::Backward, 1.0, 1.5), 0.0);
        assert_eq!(slack.take(Direction::Backward, 1.0, 1.5), 0.5);
        assert_eq!(slack.take(Direction::Backward, 1.0, 1.5), 1.0);
    }
}
