//! Wall-clock source trait

use crate::time::Timestamp;

/// Errors that can occur reading the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Clock lost power or was never set
    NotRunning,
    /// Communication with the clock chip failed
    Bus,
    /// Clock returned a value outside the calendar
    InvalidReading,
}

/// Trait for wall-clock sources (RTC chips, on-die RTC, fixed test clocks)
pub trait ClockSource {
    /// Read the current local time
    fn now(&mut self) -> Result<Timestamp, ClockError>;
}

impl<T: ClockSource + ?Sized> ClockSource for &mut T {
    fn now(&mut self) -> Result<Timestamp, ClockError> {
        T::now(self)
    }
}
