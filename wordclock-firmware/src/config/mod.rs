//! Configuration loading and parsing
//!
//! The configuration is clock.toml, embedded at build time and parsed at
//! boot by the no_std parser in `wordclock_core::config::parser`.

use defmt::*;
use wordclock_core::config::{parse_config, ClockConfig};

/// Parse and check the embedded configuration
///
/// Falls back to the built-in defaults if the text cannot be used.
pub fn load(input: &str) -> ClockConfig {
    let config = match parse_config(input) {
        Ok(config) => config,
        Err(e) => {
            // build.rs rejects a broken clock.toml, so this is a parser gap
            error!("Failed to parse embedded config: {}", e);
            warn!("Using default configuration");
            return ClockConfig::default();
        }
    };

    if let Err(e) = config.validate() {
        error!("Embedded config rejected: {}", e);
        warn!("Using default configuration");
        return ClockConfig::default();
    }

    log_config_summary(&config);
    config
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &ClockConfig) {
    info!("Configuration loaded successfully");
    debug!("  mode: {}", config.mode);
    debug!(
        "  fade: {} steps x {} ms",
        config.timing.fade_steps, config.timing.fade_step_delay_ms
    );
    debug!("  update every {} ms", config.timing.clock_interval_ms);
    debug!("  {} overlays", config.overlays.len());
}
