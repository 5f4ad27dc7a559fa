//! Error types
//!
//! Every error here is fatal to the operation that raised it. They point at
//! a caller or configuration bug, never a transient condition, so nothing in
//! the core retries.

use core::fmt;

use crate::traits::ClockError;

/// Core logic errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CoreError {
    /// A token name with no entry in the word layout
    UnknownToken,
    /// Hour, minute, month or day outside its valid range
    InvalidTimestamp,
    /// Invalid parameter (zero transition steps, bad layout entry, ...)
    InvalidParameter,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::UnknownToken => f.write_str("unknown word token"),
            CoreError::InvalidTimestamp => f.write_str("timestamp out of range"),
            CoreError::InvalidParameter => f.write_str("invalid parameter"),
        }
    }
}

/// Errors that abort a mode loop
///
/// `E` is the display driver's error type. The core passes it through
/// without interpreting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunError<E> {
    /// Core logic error
    Core(CoreError),
    /// Display driver failure
    Display(E),
    /// Clock source failure
    Clock(ClockError),
}

impl<E> From<CoreError> for RunError<E> {
    fn from(e: CoreError) -> Self {
        RunError::Core(e)
    }
}

impl<E> From<ClockError> for RunError<E> {
    fn from(e: ClockError) -> Self {
        RunError::Clock(e)
    }
}
