//! Build script for wordclock-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates clock.toml at compile time, with the `toml` crate and with
//!   the parser the firmware runs at boot

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use wordclock_core::config::{parse_config, ClockConfig};
use wordclock_core::CoreError;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate clock.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=clock.toml");

    let config_path = Path::new("clock.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: clock.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a clock.toml configuration file.            ║\n\
            ║  Please create one in the wordclock-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read clock.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Syntax, key names, word tokens and value ranges in one pass
    let config: ClockConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid clock.toml                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    // The firmware reads the file with its own no_std parser at boot
    match parse_config(&config_content) {
        Ok(runtime) if runtime == config => {}
        Ok(_) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: clock.toml is read differently at boot                   ║\n\
                ║                                                                  ║\n\
                ║  The firmware parser and the toml crate disagree on this file.   ║\n\
                ║  Keep to plain keys, flat arrays and [[overlay]] tables.         ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n"
            );
        }
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: clock.toml cannot be read at boot                        ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format!("{:?}", e)
            );
        }
    }

    let errors = collect_errors(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid clock configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!(
        "cargo:warning=clock.toml validated successfully ({} mode, {} overlays)",
        config.mode.name(),
        config.overlays.len()
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Explain every problem, not just the first one `validate` reports
fn collect_errors(config: &ClockConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if config.timing.fade_steps == 0 {
        errors.push("[timing] fade_steps must be at least 1".to_string());
    }
    if config.window.period == 0 {
        errors.push("[window] period must be at least 1".to_string());
    }

    for (i, overlay) in config.overlays.iter().enumerate() {
        if !(1..=12).contains(&overlay.month) {
            errors.push(format!("[[overlay]] {} month must be 1-12", i));
        }
        if !(1..=31).contains(&overlay.day) {
            errors.push(format!("[[overlay]] {} day must be 1-31", i));
        }
        if overlay.words.is_empty() {
            errors.push(format!("[[overlay]] {} needs at least one word", i));
        }
    }

    // Anything the checks above missed
    if errors.is_empty() {
        match config.validate() {
            Ok(()) => {}
            Err(CoreError::InvalidTimestamp) => errors.push("overlay date out of range".to_string()),
            Err(e) => errors.push(format!("{}", e)),
        }
    }

    errors
}
