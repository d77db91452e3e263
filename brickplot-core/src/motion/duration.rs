//! Distance-to-duration model
//!
//! Open-loop motors only know "run for this long". A distance becomes a
//! run time through the calibration tables:
//!
//! ```text
//! duration_ms = floor(distance_mm * base_time_ms / travel_per_base_mm)
//! ```

use crate::config::{CalibrationTable, ConfigError, SpeedLevel};
use crate::traits::{Axis, Direction};

/// Scale a distance by a measured travel rate
///
/// `rate_x100` is the travel in hundredths of a millimetre over
/// `base_time_ms`, and must be non-zero.
pub(crate) fn scale_duration(distance_mm: f32, base_time_ms: u32, rate_x100: u16) -> u32 {
    // Float to int casts saturate and map NaN to zero
    (distance_mm * base_time_ms as f32 * 100.0 / rate_x100 as f32) as u32
}

/// Resolved timing for one axis at the drive speed level
///
/// Built once from the calibration table so that planning a move can
/// never hit a missing entry halfway through a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisTiming {
    base_time_ms: u32,
    forward_x100: u16,
    backward_x100: u16,
    /// Pre-roll time charged on reversal, per new direction
    backlash_forward_ms: u32,
    backlash_backward_ms: u32,
}

impl AxisTiming {
    /// Look up everything one axis needs at a speed level
    pub fn resolve(
        calibration: &CalibrationTable,
        axis: Axis,
        level: SpeedLevel,
        backlash_mm: f32,
    ) -> Result<Self, ConfigError> {
        calibration.validate()?;

        Ok(Self {
            base_time_ms: calibration.base_time_ms,
            forward_x100: calibration.rate_x100(axis, level, Direction::Forward)?,
            backward_x100: calibration.rate_x100(axis, level, Direction::Backward)?,
            backlash_forward_ms: calibration.duration_ms(
                axis,
                backlash_mm,
                level,
                Direction::Forward,
            )?,
            backlash_backward_ms: calibration.duration_ms(
                axis,
                backlash_mm,
                level,
                Direction::Backward,
            )?,
        })
    }

    /// Run time for a distance in a direction
    pub fn duration_ms(&self, distance_mm: f32, direction: Direction) -> u32 {
        if distance_mm.is_nan() || distance_mm <= 0.0 {
            return 0;
        }
        let rate = match direction {
            Direction::Forward => self.forward_x100,
            Direction::Backward => self.backward_x100,
        };
        scale_duration(distance_mm, self.base_time_ms, rate)
    }

    /// Pre-roll time when reversing into a direction
    pub fn backlash_ms(&self, direction: Direction) -> u32 {
        match direction {
            Direction::Forward => self.backlash_forward_ms,
            Direction::Backward => self.backlash_backward_ms,
        }
    }
}
