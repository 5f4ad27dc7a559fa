//! Configuration type definitions

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::compositor::{Rgb, Tier};
use crate::layout::Word;

/// Maximum calendar overlays per config
pub const MAX_OVERLAYS: usize = 4;

/// Maximum words in one overlay message
pub const MAX_OVERLAY_WORDS: usize = 8;

/// Colors assigned to each display tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Palette {
    /// Time words
    pub primary: Rgb,
    /// Overlay messages
    pub secondary: Rgb,
    pub tertiary: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Rgb::RED,
            secondary: Rgb::AQUA,
            tertiary: Rgb::WHITE,
        }
    }
}

impl Palette {
    /// Color for a tier
    pub const fn color(&self, tier: Tier) -> Rgb {
        match tier {
            Tier::Primary => self.primary,
            Tier::Secondary => self.secondary,
            Tier::Tertiary => self.tertiary,
        }
    }
}

/// Timing of fades and mode loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TimingConfig {
    /// Frames per cross-fade (must be at least 1)
    pub fade_steps: u16,
    /// Delay between fade frames (ms)
    pub fade_step_delay_ms: u32,
    /// Delay between clock updates (ms)
    pub clock_interval_ms: u32,
    /// Delay between simulated minutes (ms)
    pub simulation_interval_ms: u32,
    /// Delay between diagnostic colors (ms)
    pub diagnostic_interval_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fade_steps: 20,
            fade_step_delay_ms: 10,
            clock_interval_ms: 5000,
            simulation_interval_ms: 200,
            diagnostic_interval_ms: 200,
        }
    }
}

/// Counter window that makes overlays blink
///
/// The counter starts at `start`, advances once per clock cycle and wraps to
/// zero once it exceeds `wrap`. Overlays are visible on cycles where the
/// counter is a multiple of `period` and below `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct WindowConfig {
    pub start: u16,
    pub period: u16,
    pub limit: u16,
    pub wrap: u16,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start: 90,
            period: 5,
            limit: 100,
            wrap: 105,
        }
    }
}

/// Message shown on one calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalendarOverlay {
    /// Month (1-12)
    pub month: u8,
    /// Day of month (1-31)
    pub day: u8,
    /// Tier the words are painted in
    #[cfg_attr(feature = "serde", serde(default = "default_overlay_tier"))]
    pub tier: Tier,
    /// Words to light, by token name
    pub words: Vec<Word, MAX_OVERLAY_WORDS>,
}

#[cfg(feature = "serde")]
fn default_overlay_tier() -> Tier {
    Tier::Secondary
}

impl CalendarOverlay {
    /// Create an overlay painted in the secondary tier
    pub fn new(month: u8, day: u8, words: &[Word]) -> Option<Self> {
        Some(Self {
            month,
            day,
            tier: Tier::Secondary,
            words: Vec::from_slice(words).ok()?,
        })
    }

    /// "happy birthday" on February 2nd
    pub fn birthday() -> Self {
        let mut words = Vec::new();
        // Capacity is MAX_OVERLAY_WORDS, two words always fit
        let _ = words.push(Word::Happy);
        let _ = words.push(Word::Birthday);
        Self {
            month: 2,
            day: 2,
            tier: Tier::Secondary,
            words,
        }
    }
}
