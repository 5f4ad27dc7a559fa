//! Top-level clock configuration

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::{CalendarOverlay, Palette, TimingConfig, WindowConfig, MAX_OVERLAYS};
use crate::error::CoreError;
use crate::mode::Mode;
use crate::time::Timestamp;

/// Complete clock configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ClockConfig {
    /// Mode entered at boot
    pub mode: Mode,
    pub palette: Palette,
    pub timing: TimingConfig,
    pub window: WindowConfig,
    /// Calendar overlays
    #[cfg_attr(feature = "serde", serde(rename = "overlay"))]
    pub overlays: Vec<CalendarOverlay, MAX_OVERLAYS>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        let mut overlays = Vec::new();
        let _ = overlays.push(CalendarOverlay::birthday());
        Self {
            mode: Mode::Clock,
            palette: Palette::default(),
            timing: TimingConfig::default(),
            window: WindowConfig::default(),
            overlays,
        }
    }
}

impl ClockConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the configuration for values the controller cannot run with
    ///
    /// - zero fade steps or window period: `InvalidParameter`
    /// - overlay outside the calendar: `InvalidTimestamp`
    /// - overlay with no words: `InvalidParameter`
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.timing.fade_steps == 0 || self.window.period == 0 {
            return Err(CoreError::InvalidParameter);
        }
        for overlay in &self.overlays {
            Timestamp::new(0, 0, overlay.month, overlay.day)?;
            if overlay.words.is_empty() {
                return Err(CoreError::InvalidParameter);
            }
        }
        Ok(())
    }

    /// Overlays scheduled for the timestamp's calendar day
    pub fn overlays_on<'a>(&'a self, now: &'a Timestamp) -> impl Iterator<Item = &'a CalendarOverlay> {
        self.overlays
            .iter()
            .filter(move |o| now.is_on(o.month, o.day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{Rgb, Tier};
    use crate::layout::Word;

    #[test]
    fn test_default_config() {
        let config = ClockConfig::new();
        assert_eq!(config.mode, Mode::Clock);
        assert_eq!(config.timing.fade_steps, 20);
        assert_eq!(config.timing.clock_interval_ms, 5000);
        assert_eq!(config.palette.color(Tier::Primary), Rgb::RED);
        assert_eq!(config.palette.color(Tier::Secondary), Rgb::AQUA);
        assert_eq!(config.overlays.len(), 1);
        assert_eq!(config.overlays[0].words.as_slice(), &[Word::Happy, Word::Birthday]);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClockConfig::new();
        config.timing.fade_steps = 0;
        assert_eq!(config.validate(), Err(CoreError::InvalidParameter));

        let mut config = ClockConfig::new();
        config.window.period = 0;
        assert_eq!(config.validate(), Err(CoreError::InvalidParameter));

        let mut config = ClockConfig::new();
        config.overlays[0].month = 13;
        assert_eq!(config.validate(), Err(CoreError::InvalidTimestamp));

        let mut config = ClockConfig::new();
        config.overlays[0].words.clear();
        assert_eq!(config.validate(), Err(CoreError::InvalidParameter));
    }

    #[test]
    fn test_overlays_on() {
        let mut config = ClockConfig::new();
        let snow = CalendarOverlay::new(12, 25, &[Word::Snowflake, Word::Christmas]).unwrap();
        config.overlays.push(snow).unwrap();

        let birthday = Timestamp::new(10, 0, 2, 2).unwrap();
        let christmas = Timestamp::new(10, 0, 12, 25).unwrap();
        let plain = Timestamp::new(10, 0, 3, 1).unwrap();

        assert_eq!(config.overlays_on(&birthday).count(), 1);
        assert_eq!(
            config.overlays_on(&christmas).next().map(|o| o.words[1]),
            Some(Word::Christmas)
        );
        assert_eq!(config.overlays_on(&plain).count(), 0);
    }
}
