//! Word Clock - LED Word Clock Firmware
//!
//! Main firmware binary for an RP2040 driving a 32x32 HUB75 panel behind a
//! 16x16 letter mask, with a DS3231 keeping the time.
//!
//! # Wiring
//!
//! | Signal            | GPIO      |
//! |-------------------|-----------|
//! | R1 G1 B1 R2 G2 B2 | 0-5       |
//! | A B C D           | 6-9       |
//! | CLK LAT OE        | 10-12     |
//! | Stop button       | 15        |
//! | DS3231 SDA / SCL  | 16 / 17   |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use {defmt_rtt as _, panic_probe as _};

use wordclock_drivers::ds3231::Ds3231;
use wordclock_drivers::hub75::{Hub75, Hub75Pins};

mod channels;
mod config;
mod display;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit clock.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../clock.toml");

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Word clock firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load(EMBEDDED_CONFIG);

    // HUB75 connector, output enable starts high (blanked)
    let pins = Hub75Pins {
        r1: Output::new(p.PIN_0, Level::Low),
        g1: Output::new(p.PIN_1, Level::Low),
        b1: Output::new(p.PIN_2, Level::Low),
        r2: Output::new(p.PIN_3, Level::Low),
        g2: Output::new(p.PIN_4, Level::Low),
        b2: Output::new(p.PIN_5, Level::Low),
        a: Output::new(p.PIN_6, Level::Low),
        b: Output::new(p.PIN_7, Level::Low),
        c: Output::new(p.PIN_8, Level::Low),
        d: Output::new(p.PIN_9, Level::Low),
        clk: Output::new(p.PIN_10, Level::Low),
        lat: Output::new(p.PIN_11, Level::Low),
        oe: Output::new(p.PIN_12, Level::High),
    };
    let panel = Hub75::new(pins);
    info!("HUB75 panel initialized");

    let i2c = I2c::new_blocking(p.I2C0, p.PIN_17, p.PIN_16, i2c::Config::default());
    let mut rtc = Ds3231::new(i2c);
    match rtc.oscillator_stopped() {
        Ok(false) => info!("DS3231 running"),
        Ok(true) => warn!("DS3231 lost power, set the time before using clock mode"),
        Err(e) => warn!("DS3231 not responding: {}", e),
    }

    let stop_button = Input::new(p.PIN_15, Pull::Up);

    spawner.spawn(tasks::refresh_task(panel)).unwrap();
    spawner.spawn(tasks::stop_task(stop_button)).unwrap();
    spawner.spawn(tasks::clock_task(rtc, config)).unwrap();

    info!("All tasks spawned, firmware running");
}
