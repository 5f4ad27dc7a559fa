//! Board-agnostic core logic for the word clock firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Word layout of the 16x16 letter mask
//! - Time-to-words encoding
//! - Frame compositing and cross-fade transitions
//! - Mode controller (diagnostic sweep, day simulation, clock loop)
//! - Hardware abstraction traits (display, clock source)
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

mod logging;

pub mod compositor;
pub mod config;
pub mod encoder;
pub mod error;
pub mod layout;
pub mod mode;
pub mod time;
pub mod traits;

pub use compositor::{Compositor, PixelBuffer, Rgb, Tier, Transition, WordSet};
pub use config::{
    parse_config, CalendarOverlay, ClockConfig, Palette, ParseError, TimingConfig, WindowConfig,
};
pub use encoder::{encode, encode_hm, Phrase, TimeWords};
pub use error::{CoreError, RunError};
pub use layout::{Word, WordEntry, WordGrid, WORD_GRID};
pub use mode::{CycleReport, Mode, ModeController, OverlayWindow};
pub use time::Timestamp;
pub use traits::{ClockError, ClockSource, DisplayDriver};
