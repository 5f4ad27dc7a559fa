//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod clock;
pub mod display;

pub use clock::{ClockError, ClockSource};
pub use display::DisplayDriver;
