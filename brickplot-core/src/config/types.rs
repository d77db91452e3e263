//! Configuration type definitions
//!
//! Defaults reproduce the constants the plotter was originally tuned with.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::calibration::{CalibrationTable, SpeedLevel, SPEED_LEVELS};
use crate::traits::{Axis, Direction, MAX_SPEED};

/// Configuration errors
///
/// These indicate a setup mistake and are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Speed level outside 1-7
    InvalidSpeedLevel(u8),
    /// Calibration entry was never measured
    MissingCalibration {
        axis: Axis,
        direction: Direction,
        level: u8,
    },
    /// Calibration reference period is zero
    InvalidBaseTime,
    /// Pen motor speed outside 1-7
    InvalidPenSpeed(u8),
    /// Backlash distance is negative or not a number
    InvalidBacklash,
    /// Glyph size or letter advance is not a positive number
    InvalidGlyphScale,
}

/// Motion settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionConfig {
    /// Speed level used for every drive move (1-7)
    pub speed_level: u8,
    /// Slack taken up by the pre-roll when an axis reverses (mm)
    pub backlash_mm: f32,
    /// Forward drive time that takes up slack at start-up
    pub preload_ms: u32,
    /// Drive both axes together for 45° pen-down moves
    pub fuse_diagonals: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed_level: SPEED_LEVELS as u8,
            backlash_mm: 1.5,
            preload_ms: 1000,
            fuse_diagonals: true,
        }
    }
}

/// Pen-lift settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PenConfig {
    /// Pen motor speed level (1-7)
    pub speed: u8,
    /// Pen goes down when its motor runs forward
    pub down_forward: bool,
    /// How long the pen motor runs for one transition
    pub settle_ms: u32,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            speed: MAX_SPEED as u8,
            down_forward: true,
            settle_ms: 1000,
        }
    }
}

impl PenConfig {
    /// Signed pen motor speed that lowers the pen
    pub fn down_speed(&self) -> i8 {
        let dir = if self.down_forward {
            Direction::Forward
        } else {
            Direction::Backward
        };
        dir.apply(self.speed)
    }
}

/// Text layout settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrintConfig {
    /// Size of one glyph grid unit (mm)
    pub glyph_scale_mm: f32,
    /// Cursor advance per character (mm)
    pub letter_advance_mm: f32,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            glyph_scale_mm: 5.0,
            letter_advance_mm: 15.0,
        }
    }
}

/// Complete plotter configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlotterConfig {
    pub motion: MotionConfig,
    pub pen: PenConfig,
    pub print: PrintConfig,
    pub calibration: CalibrationTable,
}

impl PlotterConfig {
    /// Validated drive speed level
    pub fn speed_level(&self) -> Result<SpeedLevel, ConfigError> {
        SpeedLevel::new(self.motion.speed_level)
    }

    /// Check everything the sequencer depends on
    ///
    /// The drive speed level must be measured for both axes in both
    /// directions; other levels may be left blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.speed_level()?;
        self.calibration.validate()?;
        self.calibration.validate_level(level)?;

        if self.motion.backlash_mm.is_nan() || self.motion.backlash_mm < 0.0 {
            return Err(ConfigError::InvalidBacklash);
        }
        if self.pen.speed == 0 || self.pen.speed > MAX_SPEED as u8 {
            return Err(ConfigError::InvalidPenSpeed(self.pen.speed));
        }
        self.print.validate()
    }
}

impl PrintConfig {
    /// Check that glyphs have a usable size
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if positive(self.glyph_scale_mm) && positive(self.letter_advance_mm) {
            Ok(())
        } else {
            Err(ConfigError::InvalidGlyphScale)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PlotterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.speed_level().unwrap(), SpeedLevel::FULL);
        assert_eq!(config.pen.down_speed(), 7);
    }

    #[test]
    fn test_invalid_speed_level() {
        let mut config = PlotterConfig::default();
        config.motion.speed_level = 9;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSpeedLevel(9)));
    }

    #[test]
    fn test_unmeasured_drive_level() {
        let mut config = PlotterConfig::default();
        config.motion.speed_level = 4;
        config.calibration.x.backward.mm_x100[3] = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingCalibration {
                axis: Axis::X,
                direction: Direction::Backward,
                level: 4,
            })
        );

        // Another level being blank does not matter
        config.motion.speed_level = 7;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_pen_and_print() {
        let mut config = PlotterConfig::default();
        config.pen.speed = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPenSpeed(0)));

        let mut config = PlotterConfig::default();
        config.print.glyph_scale_mm = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidGlyphScale));

        let mut config = PlotterConfig::default();
        config.motion.backlash_mm = -1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBacklash));
    }

    #[test]
    fn test_reversed_pen_motor() {
        let pen = PenConfig {
            down_forward: false,
            speed: 5,
            ..Default::default()
        };
        assert_eq!(pen.down_speed(), -5);
    }
}
