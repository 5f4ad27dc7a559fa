//! Logging shim
//!
//! Re-exports the `defmt` macros when the `defmt` feature is enabled.
//! Otherwise the macros only borrow their arguments so host builds carry
//! no logger.
//!
//! Only `debug!` and `info!` are provided. A crate-local `warn` would clash
//! with the built-in `#[warn]` attribute on import.

#![allow(unused_imports, unused_macros)]

#[cfg(feature = "defmt")]
pub(crate) use defmt::{debug, info};

#[cfg(not(feature = "defmt"))]
mod noop {
    macro_rules! debug {
        ($fmt:literal $(, $arg:expr)* $(,)?) => {{
            $(let _ = &$arg;)*
        }};
    }

    macro_rules! info {
        ($fmt:literal $(, $arg:expr)* $(,)?) => {{
            $(let _ = &$arg;)*
        }};
    }

    pub(crate) use {debug, info};
}

#[cfg(not(feature = "defmt"))]
pub(crate) use noop::{debug, info};

#[cfg(test)]
mod tests {
    use super::{debug, info};

    #[test]
    fn test_macros_accept_format_args() {
        let minute = 37u8;
        info!("plain message");
        debug!("{=u8:02} - {}", minute, "twenty three",);
        assert_eq!(minute, 37);
    }
}
