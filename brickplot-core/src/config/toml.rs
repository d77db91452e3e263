//! Simple TOML parser for plotter configuration
//!
//! This is a minimal, allocation-free parser that handles only the subset
//! needed for `plotter.toml`. It does NOT support full TOML.
//!
//! Supported features:
//! - Key = value pairs (integer, float, boolean)
//! - Integer arrays on a single line: `forward = [414, 829, ...]`
//! - [section] and [section.subsection] headers
//! - Comments (# ...)
//!
//! Keys that are not present keep their default value. Unknown sections
//! and keys are rejected so that typos cannot silently fall back to a
//! default.

use super::calibration::SPEED_LEVELS;
use super::types::PlotterConfig;
use crate::traits::{Axis, Direction};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection { line: usize },
    /// Key not valid in the current section
    UnknownKey { line: usize },
    /// Value has the wrong type or is out of range
    InvalidValue { line: usize },
    /// Array has the wrong number of items
    WrongItemCount { line: usize },
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Motion,
    Pen,
    Print,
    Calibration,
    CalibrationAxis(Axis),
}

/// Parse TOML configuration on top of the defaults
pub fn parse_config(input: &str) -> Result<PlotterConfig, ParseError> {
    let mut config = PlotterConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(ParseError::InvalidSection { line: line_no });
            }
            section = parse_section_header(&line[1..line.len() - 1])
                .ok_or(ParseError::InvalidSection { line: line_no })?;
            continue;
        }

        let (key, value) =
            parse_key_value(line).ok_or(ParseError::InvalidValue { line: line_no })?;
        apply_value(&mut config, section, key, value, line_no)?;
    }

    Ok(config)
}

/// Parse a section header like "pen" or "calibration.x"
fn parse_section_header(header: &str) -> Option<Section> {
    match header.trim() {
        "motion" => Some(Section::Motion),
        "pen" => Some(Section::Pen),
        "print" => Some(Section::Print),
        "calibration" => Some(Section::Calibration),
        "calibration.x" => Some(Section::CalibrationAxis(Axis::X)),
        "calibration.y" => Some(Section::CalibrationAxis(Axis::Y)),
        _ => None,
    }
}

/// Remove a trailing comment
///
/// None of the supported value types can contain '#', so the first one
/// always starts a comment.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn apply_value(
    config: &mut PlotterConfig,
    section: Section,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), ParseError> {
    let invalid = ParseError::InvalidValue { line };

    match (section, key) {
        (Section::Motion, "speed_level") => {
            config.motion.speed_level = parse_int(value).ok_or(invalid)?;
        }
        (Section::Motion, "backlash_mm") => {
            config.motion.backlash_mm = parse_float(value).ok_or(invalid)?;
        }
        (Section::Motion, "preload_ms") => {
            config.motion.preload_ms = parse_int(value).ok_or(invalid)?;
        }
        (Section::Motion, "fuse_diagonals") => {
            config.motion.fuse_diagonals = parse_bool(value).ok_or(invalid)?;
        }
        (Section::Pen, "speed") => {
            config.pen.speed = parse_int(value).ok_or(invalid)?;
        }
        (Section::Pen, "down_forward") => {
            config.pen.down_forward = parse_bool(value).ok_or(invalid)?;
        }
        (Section::Pen, "settle_ms") => {
            config.pen.settle_ms = parse_int(value).ok_or(invalid)?;
        }
        (Section::Print, "glyph_scale_mm") => {
            config.print.glyph_scale_mm = parse_float(value).ok_or(invalid)?;
        }
        (Section::Print, "letter_advance_mm") => {
            config.print.letter_advance_mm = parse_float(value).ok_or(invalid)?;
        }
        (Section::Calibration, "base_time_ms") => {
            config.calibration.base_time_ms = parse_int(value).ok_or(invalid)?;
        }
        (Section::CalibrationAxis(axis), "forward" | "backward") => {
            let direction = if key == "forward" {
                Direction::Forward
            } else {
                Direction::Backward
            };
            let table = config.calibration.axis_mut(axis).table_mut(direction);
            table.mm_x100 = parse_table(value, line)?;
        }
        _ => return Err(ParseError::UnknownKey { line }),
    }

    Ok(())
}

/// Parse an integer value
///
/// TOML allows `_` between digits.
fn parse_int<T: core::str::FromStr>(value: &str) -> Option<T> {
    let mut digits: heapless::String<16> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        // Anything too long to fit cannot be a valid integer anyway
        digits.push(c).ok()?;
    }
    digits.parse().ok()
}

/// Parse a float value (integers are accepted)
fn parse_float(value: &str) -> Option<f32> {
    let v: f32 = value.parse().ok()?;
    v.is_finite().then_some(v)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parse a speed table: `[414, 829, 1243, 1657, 2071, 2486, 2900]`
fn parse_table(value: &str, line: usize) -> Result<[u16; SPEED_LEVELS], ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue { line })?;

    let mut table = [0u16; SPEED_LEVELS];
    let mut count = 0;

    // A trailing comma is allowed
    for item in inner.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let slot = table
            .get_mut(count)
            .ok_or(ParseError::WrongItemCount { line })?;
        *slot = parse_int(item).ok_or(ParseError::InvalidValue { line })?;
        count += 1;
    }

    if count != SPEED_LEVELS {
        return Err(ParseError::WrongItemCount { line });
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SPEED_TABLE_X100;
    use proptest::prelude::*;

    const SHIPPED: &str = include_str!("../../plotter.toml");

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config(""), Ok(PlotterConfig::default()));
        assert_eq!(
            parse_config("# only a comment\n\n"),
            Ok(PlotterConfig::default())
        );
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        assert_eq!(parse_config(SHIPPED), Ok(PlotterConfig::default()));
    }

    #[test]
    fn test_shipped_config_is_valid_toml() {
        let value: ::toml::Value = ::toml::from_str(SHIPPED).unwrap();
        let table = value.get("calibration").and_then(|c| c.get("x")).unwrap();
        assert_eq!(
            table.get("forward").and_then(|f| f.as_array()).map(|a| a.len()),
            Some(SPEED_LEVELS)
        );
    }

    #[test]
    fn test_parse_all_sections() {
        let input = r#"
            [motion]
            speed_level = 5        # slower, more accurate
            backlash_mm = 2.25
            preload_ms = 1_500
            fuse_diagonals = false

            [pen]
            speed = 6
            down_forward = false
            settle_ms = 800

            [print]
            glyph_scale_mm = 4
            letter_advance_mm = 12.5

            [calibration]
            base_time_ms = 3000

            [calibration.y]
            backward = [400, 800, 1200, 1600, 2000, 2400, 2800,]
        "#;

        let config = parse_config(input).unwrap();
        assert_eq!(config.motion.speed_level, 5);
        assert_eq!(config.motion.backlash_mm, 2.25);
        assert_eq!(config.motion.preload_ms, 1500);
        assert!(!config.motion.fuse_diagonals);
        assert_eq!(config.pen.speed, 6);
        assert!(!config.pen.down_forward);
        assert_eq!(config.pen.settle_ms, 800);
        assert_eq!(config.print.glyph_scale_mm, 4.0);
        assert_eq!(config.print.letter_advance_mm, 12.5);
        assert_eq!(config.calibration.base_time_ms, 3000);
        assert_eq!(
            config.calibration.y.backward.mm_x100,
            [400, 800, 1200, 1600, 2000, 2400, 2800]
        );
        // Untouched tables keep their defaults
        assert_eq!(config.calibration.y.forward.mm_x100, DEFAULT_SPEED_TABLE_X100);
        assert_eq!(config.calibration.x.backward.mm_x100, DEFAULT_SPEED_TABLE_X100);
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            parse_config("[motion]\nspeed_level = 7\n[heater]\n"),
            Err(ParseError::InvalidSection { line: 3 })
        );
        assert_eq!(
            parse_config("[calibration.z]"),
            Err(ParseError::InvalidSection { line: 1 })
        );
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            parse_config("[pen]\nsped = 7"),
            Err(ParseError::UnknownKey { line: 2 })
        );
        // Keys outside any section are not allowed
        assert_eq!(
            parse_config("speed_level = 7"),
            Err(ParseError::UnknownKey { line: 1 })
        );
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_config("[motion]\nspeed_level = fast"),
            Err(ParseError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[motion]\nfuse_diagonals = yes"),
            Err(ParseError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[motion]\nspeed_level = 300"),
            Err(ParseError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[motion]\nspeed_level"),
            Err(ParseError::InvalidValue { line: 2 })
        );
    }

    #[test]
    fn test_table_item_count() {
        assert_eq!(
            parse_config("[calibration.x]\nforward = [1, 2, 3]"),
            Err(ParseError::WrongItemCount { line: 2 })
        );
        assert_eq!(
            parse_config("[calibration.x]\nforward = [1, 2, 3, 4, 5, 6, 7, 8]"),
            Err(ParseError::WrongItemCount { line: 2 })
        );
        assert_eq!(
            parse_config("[calibration.x]\nforward = 1, 2"),
            Err(ParseError::InvalidValue { line: 2 })
        );
    }

    proptest! {
        #[test]
        fn test_parser_never_panics(input in "\\PC{0,200}") {
            let _ = parse_config(&input);
        }

        #[test]
        fn test_speed_level_round_trips(level in 0u8..=255) {
            let input = format!("[motion]\nspeed_level = {}\n", level);
            let config = parse_config(&input).unwrap();
            prop_assert_eq!(config.motion.speed_level, level);
        }
    }
}
