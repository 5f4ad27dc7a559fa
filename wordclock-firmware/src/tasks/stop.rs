//! Stop button task
//!
//! Watches the stop button and raises [`SHUTDOWN`] once it has been held
//! low through the debounce time.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use crate::channels::SHUTDOWN;

/// Debounce time in milliseconds
const DEBOUNCE_MS: u64 = 50;

/// Stop task (button active low, internal pull-up)
#[embassy_executor::task]
pub async fn stop_task(mut button: Input<'static>) {
    info!("Stop task started");

    loop {
        button.wait_for_low().await;
        Timer::after_millis(DEBOUNCE_MS).await;

        if button.is_low() {
            info!("Stop button pressed");
            SHUTDOWN.signal(());
            return;
        }
    }
}
