//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware embeds them as a
//! TOML document, reads it at boot with [`parse_config`] and checks it at
//! build time through the `serde` feature.

pub mod clock;
pub mod parser;
pub mod types;

pub use clock::*;
pub use parser::{parse_config, ParseError};
pub use types::*;
