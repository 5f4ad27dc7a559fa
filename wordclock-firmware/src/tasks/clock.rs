//! Clock task
//!
//! Runs the mode controller until the mode finishes, fails, or the stop
//! button is pressed, then turns the panel off exactly once.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::Delay;

use wordclock_core::config::ClockConfig;
use wordclock_core::traits::ClockError;
use wordclock_core::{ModeController, RunError};
use wordclock_drivers::ds3231::Ds3231;

use crate::channels::SHUTDOWN;
use crate::display::PanelHandle;

/// The DS3231 on I2C0
pub type Rtc = Ds3231<I2c<'static, I2C0, Blocking>>;

/// Clock task - runs the configured mode
#[embassy_executor::task]
pub async fn clock_task(rtc: Rtc, config: ClockConfig) {
    info!("Clock task started");

    let mut controller = match ModeController::new(PanelHandle, rtc, Delay, config) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Invalid clock configuration: {}", e);
            return;
        }
    };

    match select(controller.run(), SHUTDOWN.wait()).await {
        Either::First(Ok(())) => info!("Mode finished"),
        Either::First(Err(RunError::Clock(ClockError::NotRunning))) => {
            error!("RTC oscillator stopped, the time must be set");
        }
        Either::First(Err(e)) => error!("Mode aborted: {}", e),
        Either::Second(()) => info!("Stop requested"),
    }

    if let Err(e) = controller.shutdown() {
        match e {}
    }
}
