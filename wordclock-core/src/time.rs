//! Wall-clock timestamp
//!
//! Only the fields the clock face needs: hour and minute for the sentence,
//! month and day for calendar overlays.

use crate::error::CoreError;

/// Validated wall-clock reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    hour: u8,
    minute: u8,
    month: u8,
    day: u8,
}

impl Timestamp {
    /// Create a timestamp
    ///
    /// - `hour`: 0-23
    /// - `minute`: 0-59
    /// - `month`: 1-12
    /// - `day`: 1-31
    pub const fn new(hour: u8, minute: u8, month: u8, day: u8) -> Result<Self, CoreError> {
        if hour > 23 || minute > 59 || month == 0 || month > 12 || day == 0 || day > 31 {
            return Err(CoreError::InvalidTimestamp);
        }
        Ok(Self {
            hour,
            minute,
            month,
            day,
        })
    }

    /// Time of day on January 1st (used by the day simulation)
    pub const fn from_hm(hour: u8, minute: u8) -> Result<Self, CoreError> {
        Self::new(hour, minute, 1, 1)
    }

    /// Hour (0-23)
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute (0-59)
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Month (1-12)
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Day of month (1-31)
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Check whether this timestamp falls on the given calendar day
    pub const fn is_on(&self, month: u8, day: u8) -> bool {
        self.month == month && self.day == day
    }
}
