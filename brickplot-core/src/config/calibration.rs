//! Speed calibration tables
//!
//! Each drive axis is a different belt/gear train, and each one runs at a
//! slightly different rate forward and backward. The tables record how far
//! the carriage travels during a fixed reference period at each of the
//! seven speed levels. Values are measured with the calibration pattern
//! (see [`crate::Sequencer::calibrate`]).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::ConfigError;
use crate::motion::duration::scale_duration;
use crate::traits::{Axis, Direction};

/// Number of supported speed levels
pub const SPEED_LEVELS: usize = 7;

/// Reference period the tables were measured over
pub const DEFAULT_BASE_TIME_MS: u32 = 5000;

/// Measured travel per reference period (mm × 100) at levels 1 through 7
pub const DEFAULT_SPEED_TABLE_X100: [u16; SPEED_LEVELS] = [414, 829, 1243, 1657, 2071, 2486, 2900];

/// A validated speed level (1-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedLevel(u8);

impl SpeedLevel {
    /// Fastest level
    pub const FULL: SpeedLevel = SpeedLevel(SPEED_LEVELS as u8);

    /// Validate a raw speed level
    pub fn new(level: u8) -> Result<Self, ConfigError> {
        if (1..=SPEED_LEVELS as u8).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ConfigError::InvalidSpeedLevel(level))
        }
    }

    /// Iterate over every level, slowest first
    pub fn all() -> impl Iterator<Item = SpeedLevel> {
        (1..=SPEED_LEVELS as u8).map(SpeedLevel)
    }

    /// Raw level
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Signed motor speed for travel in a direction
    pub fn signed(self, direction: Direction) -> i8 {
        direction.apply(self.0)
    }

    fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

/// Travel per reference period for every speed level, one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeedTable {
    /// Millimeters × 100 travelled in the reference period (0 = not measured)
    pub mm_x100: [u16; SPEED_LEVELS],
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED_TABLE_X100)
    }
}

impl SpeedTable {
    /// Create a table from raw measurements
    pub const fn new(mm_x100: [u16; SPEED_LEVELS]) -> Self {
        Self { mm_x100 }
    }

    /// Raw measurement for a level, `None` if missing
    pub fn rate_x100(&self, level: SpeedLevel) -> Option<u16> {
        match self.mm_x100[level.index()] {
            0 => None,
            rate => Some(rate),
        }
    }
}

/// Forward and backward tables for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisCalibration {
    pub forward: SpeedTable,
    pub backward: SpeedTable,
}

impl AxisCalibration {
    /// Table for a direction bucket
    pub fn table(&self, direction: Direction) -> &SpeedTable {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }

    /// Mutable table for a direction bucket
    pub fn table_mut(&mut self, direction: Direction) -> &mut SpeedTable {
        match direction {
            Direction::Forward => &mut self.forward,
            Direction::Backward => &mut self.backward,
        }
    }
}

/// Complete calibration for both drive axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationTable {
    /// Reference period the tables were measured over
    pub base_time_ms: u32,
    pub x: AxisCalibration,
    pub y: AxisCalibration,
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self {
            base_time_ms: DEFAULT_BASE_TIME_MS,
            x: AxisCalibration::default(),
            y: AxisCalibration::default(),
        }
    }
}

impl CalibrationTable {
    /// Calibration for one axis
    pub fn axis(&self, axis: Axis) -> &AxisCalibration {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Mutable calibration for one axis
    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisCalibration {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    /// Look up a measured rate
    ///
    /// Fails if the entry was never measured.
    pub fn rate_x100(
        &self,
        axis: Axis,
        level: SpeedLevel,
        direction: Direction,
    ) -> Result<u16, ConfigError> {
        self.axis(axis)
            .table(direction)
            .rate_x100(level)
            .ok_or(ConfigError::MissingCalibration {
                axis,
                direction,
                level: level.get(),
            })
    }

    /// Run time needed to travel a distance on one axis
    ///
    /// A zero distance always needs zero time.
    pub fn duration_ms(
        &self,
        axis: Axis,
        distance_mm: f32,
        level: SpeedLevel,
        direction: Direction,
    ) -> Result<u32, ConfigError> {
        if distance_mm.is_nan() || distance_mm <= 0.0 {
            return Ok(0);
        }
        let rate = self.rate_x100(axis, level, direction)?;
        Ok(scale_duration(distance_mm, self.base_time_ms, rate))
    }

    /// Distance travelled on one axis while running for a time
    pub fn distance_mm(
        &self,
        axis: Axis,
        ms: u32,
        level: SpeedLevel,
        direction: Direction,
    ) -> Result<f32, ConfigError> {
        let rate = self.rate_x100(axis, level, direction)?;
        Ok(ms as f32 * rate as f32 / (100.0 * self.base_time_ms as f32))
    }

    /// Check that a speed level is measured on both axes in both directions
    pub fn validate_level(&self, level: SpeedLevel) -> Result<(), ConfigError> {
        for axis in Axis::ALL {
            for direction in [Direction::Forward, Direction::Backward] {
                self.rate_x100(axis, level, direction)?;
            }
        }
        Ok(())
    }

    /// Check the table as a whole
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_time_ms == 0 {
            return Err(ConfigError::InvalidBaseTime);
        }
        Ok(())
    }
}
