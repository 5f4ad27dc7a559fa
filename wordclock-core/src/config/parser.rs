//! Simple TOML parser for the clock configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! clock.toml. It does NOT support the full TOML spec, and it needs no
//! allocator, so the firmware can read its embedded configuration at boot.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - Flat arrays of integers or strings: `primary = [255, 0, 0]`
//! - [palette], [timing], [window] section headers
//! - [[overlay]] array-of-tables headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings or arrays
//! - Nested tables or inline tables
//! - Escapes inside strings
//!
//! The firmware build script checks the same file with the full `toml`
//! crate and fails the build if the two readings disagree.

use heapless::Vec;

use super::{CalendarOverlay, ClockConfig, MAX_OVERLAYS, MAX_OVERLAY_WORDS};
use crate::compositor::{Rgb, Tier};
use crate::layout::Word;
use crate::mode::Mode;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Word name not on the letter mask
    UnknownWord,
    /// [[overlay]] without month, day or words
    IncompleteOverlay,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Palette,
    Timing,
    Window,
    Overlay,
}

/// Parse TOML configuration into ClockConfig
///
/// Missing keys keep their defaults. Any `[[overlay]]` entry replaces the
/// default overlay list.
pub fn parse_config(input: &str) -> Result<ClockConfig, ParseError> {
    let mut config = ClockConfig::default();
    let mut section = Section::Root;

    let mut overlays: Vec<CalendarOverlay, MAX_OVERLAYS> = Vec::new();
    let mut current_overlay: Option<CalendarOverlay> = None;
    let mut saw_overlay = false;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with("[[") && line.ends_with("]]") {
            save_overlay(&mut current_overlay, &mut overlays)?;
            if line[2..line.len() - 2].trim() != "overlay" {
                return Err(ParseError::InvalidSection);
            }
            current_overlay = Some(CalendarOverlay {
                month: 0,
                day: 0,
                tier: Tier::Secondary,
                words: Vec::new(),
            });
            saw_overlay = true;
            section = Section::Overlay;
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            save_overlay(&mut current_overlay, &mut overlays)?;
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config, &mut current_overlay)?;
        }
    }

    save_overlay(&mut current_overlay, &mut overlays)?;
    if saw_overlay {
        config.overlays = overlays;
    }

    Ok(config)
}

/// Finish the overlay being built, if any
fn save_overlay(
    current: &mut Option<CalendarOverlay>,
    overlays: &mut Vec<CalendarOverlay, MAX_OVERLAYS>,
) -> Result<(), ParseError> {
    if let Some(overlay) = current.take() {
        if overlay.month == 0 || overlay.day == 0 || overlay.words.is_empty() {
            return Err(ParseError::IncompleteOverlay);
        }
        overlays
            .push(overlay)
            .map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(())
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "palette" => Ok(Section::Palette),
        "timing" => Ok(Section::Timing),
        "window" => Ok(Section::Window),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Cut a trailing comment, ignoring `#` inside strings
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let (key, value) = (key.trim(), value.trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        // Allow unquoted strings for simple values
        Ok(value)
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Split a flat `[a, b, c]` array into trimmed items
fn parse_array(value: &str) -> Result<impl Iterator<Item = &str>, ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;
    Ok(inner.split(',').map(str::trim).filter(|item| !item.is_empty()))
}

/// Parse an `[r, g, b]` color
fn parse_color(value: &str) -> Result<Rgb, ParseError> {
    let mut channels: Vec<u8, 3> = Vec::new();
    for item in parse_array(value)? {
        channels
            .push(parse_int(item)?)
            .map_err(|_| ParseError::InvalidValue)?;
    }
    match channels.as_slice() {
        &[r, g, b] => Ok(Rgb::new(r, g, b)),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a `["word", ...]` list of token names
fn parse_words(value: &str) -> Result<Vec<Word, MAX_OVERLAY_WORDS>, ParseError> {
    let mut words = Vec::new();
    for item in parse_array(value)? {
        let word = Word::from_name(parse_string(item)?).map_err(|_| ParseError::UnknownWord)?;
        words.push(word).map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(words)
}

fn parse_mode(value: &str) -> Result<Mode, ParseError> {
    parse_string(value)?
        .parse()
        .map_err(|_| ParseError::InvalidValue)
}

fn parse_tier(value: &str) -> Result<Tier, ParseError> {
    match parse_string(value)? {
        "primary" => Ok(Tier::Primary),
        "secondary" => Ok(Tier::Secondary),
        "tertiary" => Ok(Tier::Tertiary),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Apply a parsed value to the appropriate config field
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut ClockConfig,
    current_overlay: &mut Option<CalendarOverlay>,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {
            if key == "mode" {
                config.mode = parse_mode(value)?;
            }
        }
        Section::Palette => {
            let p = &mut config.palette;
            match key {
                "primary" => p.primary = parse_color(value)?,
                "secondary" => p.secondary = parse_color(value)?,
                "tertiary" => p.tertiary = parse_color(value)?,
                _ => {} // Ignore unknown keys
            }
        }
        Section::Timing => {
            let t = &mut config.timing;
            match key {
                "fade_steps" => t.fade_steps = parse_int(value)?,
                "fade_step_delay_ms" => t.fade_step_delay_ms = parse_int(value)?,
                "clock_interval_ms" => t.clock_interval_ms = parse_int(value)?,
                "simulation_interval_ms" => t.simulation_interval_ms = parse_int(value)?,
                "diagnostic_interval_ms" => t.diagnostic_interval_ms = parse_int(value)?,
                _ => {}
            }
        }
        Section::Window => {
            let w = &mut config.window;
            match key {
                "start" => w.start = parse_int(value)?,
                "period" => w.period = parse_int(value)?,
                "limit" => w.limit = parse_int(value)?,
                "wrap" => w.wrap = parse_int(value)?,
                _ => {}
            }
        }
        Section::Overlay => {
            let o = current_overlay.as_mut().ok_or(ParseError::InvalidSection)?;
            match key {
                "month" => o.month = parse_int(value)?,
                "day" => o.day = parse_int(value)?,
                "tier" => o.tier = parse_tier(value)?,
                "words" => o.words = parse_words(value)?,
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::String;

    const CLOCK_TOML: &str = include_str!("../../../wordclock-firmware/clock.toml");

    fn overlay(month: u8, day: u8, words: &[Word]) -> CalendarOverlay {
        CalendarOverlay::new(month, day, words).unwrap()
    }

    #[test]
    fn test_parse_shipped_config() {
        let config = parse_config(CLOCK_TOML).unwrap();
        assert_eq!(config.mode, Mode::Clock);
        assert_eq!(config.palette.primary, Rgb::RED);
        assert_eq!(config.palette.secondary, Rgb::AQUA);
        assert_eq!(config.palette.tertiary, Rgb::WHITE);
        assert_eq!(config.timing.fade_steps, 20);
        assert_eq!(config.timing.clock_interval_ms, 5000);
        assert_eq!(config.window.wrap, 105);
        assert_eq!(
            config.overlays.as_slice(),
            &[
                overlay(2, 2, &[Word::Happy, Word::Birthday]),
                overlay(12, 25, &[Word::Snowflake, Word::Christmas]),
            ]
        );
        assert!(config.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_shipped_config_matches_toml_crate() {
        let expected: ClockConfig = toml::from_str(CLOCK_TOML).unwrap();
        assert_eq!(parse_config(CLOCK_TOML).unwrap(), expected);
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        assert_eq!(parse_config("").unwrap(), ClockConfig::default());

        let config = parse_config("mode = \"simulation\"\n[timing]\nfade_steps = 4\n").unwrap();
        assert_eq!(config.mode, Mode::Simulation);
        assert_eq!(config.timing.fade_steps, 4);
        assert_eq!(config.timing.fade_step_delay_ms, 10);
        assert_eq!(config.overlays.as_slice(), &[CalendarOverlay::birthday()]);
    }

    #[test]
    fn test_overlay_tier_and_replacement() {
        let input = r#"
[[overlay]]
month = 1
day = 1
tier = "tertiary"
words = ["happy", "new", "year"]
"#;
        let config = parse_config(input).unwrap();
        assert_eq!(config.overlays.len(), 1);
        assert_eq!(config.overlays[0].tier, Tier::Tertiary);
        assert_eq!(
            config.overlays[0].words.as_slice(),
            &[Word::Happy, Word::New, Word::Year]
        );
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("fade_steps = 4 # quick"), "fade_steps = 4 ");
        assert_eq!(
            strip_comment(r#"words = ["a#b"] # note"#),
            r#"words = ["a#b"] "#
        );
        assert_eq!(strip_comment("# whole line"), "");
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("[1, 2, 3]"), Ok(Rgb::new(1, 2, 3)));
        assert_eq!(parse_color("[1, 2]"), Err(ParseError::InvalidValue));
        assert_eq!(parse_color("[1, 2, 3, 4]"), Err(ParseError::InvalidValue));
        assert_eq!(parse_color("[256, 0, 0]"), Err(ParseError::InvalidValue));
        assert_eq!(parse_color("255, 0, 0"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_invalid_sections() {
        assert_eq!(parse_config("[display]"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("[[holiday]]"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(parse_config("mode = \"clockwork\""), Err(ParseError::InvalidValue));
        assert_eq!(
            parse_config("[timing]\nfade_steps = many"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[[overlay]]\ntier = \"loud\""),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_unknown_word() {
        let input = "[[overlay]]\nmonth = 1\nday = 1\nwords = [\"happy\", \"easter\"]";
        assert_eq!(parse_config(input), Err(ParseError::UnknownWord));
    }

    #[test]
    fn test_incomplete_overlay() {
        let no_words = "[[overlay]]\nmonth = 3\nday = 1\n[window]\nstart = 0";
        assert_eq!(parse_config(no_words), Err(ParseError::IncompleteOverlay));

        let no_day = "[[overlay]]\nmonth = 3\nwords = [\"heart\"]";
        assert_eq!(parse_config(no_day), Err(ParseError::IncompleteOverlay));
    }

    #[test]
    fn test_too_many_items() {
        let mut input = String::new();
        for day in 1..=(MAX_OVERLAYS + 1) {
            input.push_str("[[overlay]]\nmonth = 5\n");
            input.push_str(&std::format!("day = {}\n", day));
            input.push_str("words = [\"heart\"]\n");
        }
        assert_eq!(parse_config(&input), Err(ParseError::TooManyItems));

        let words = "[[overlay]]\nmonth = 5\nday = 1\nwords = \
                     [\"a\", \"a\", \"a\", \"a\", \"a\", \"a\", \"a\", \"a\", \"a\"]";
        assert_eq!(parse_config(words), Err(ParseError::TooManyItems));
    }
}
