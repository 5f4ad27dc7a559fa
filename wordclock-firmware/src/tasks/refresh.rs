//! Panel refresh task
//!
//! Owns the HUB75 driver and scans it back to back. A dark panel is not
//! scanned at all; the task sleeps until the next command arrives.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::Delay;

use wordclock_core::traits::DisplayDriver;
use wordclock_drivers::hub75::Hub75;

use crate::channels::{PanelCommand, PANEL_COMMAND};

/// The HUB75 panel on RP2040 GPIO
pub type Panel = Hub75<Output<'static>>;

/// Refresh task - keeps the latest frame on the panel
#[embassy_executor::task]
pub async fn refresh_task(mut panel: Panel) {
    info!("Refresh task started");

    let mut delay = Delay;

    loop {
        if panel.is_dark() {
            let command = PANEL_COMMAND.wait().await;
            apply(&mut panel, command);
            continue;
        }

        if let Some(command) = PANEL_COMMAND.try_take() {
            apply(&mut panel, command);
        }

        if let Err(e) = panel.refresh(&mut delay).await {
            match e {}
        }
    }
}

fn apply(panel: &mut Panel, command: PanelCommand) {
    match command {
        PanelCommand::Show(frame) => panel.load(&frame),
        PanelCommand::Clear => {
            trace!("Panel cleared");
            if let Err(e) = panel.clear() {
                match e {}
            }
        }
    }
}
