//! HUB75 panel access from the clock task
//!
//! The panel is owned by the refresh task, which has to keep scanning it
//! continuously. The clock task only sees a [`PanelHandle`] that forwards
//! frames through [`PANEL_COMMAND`]. When frames arrive faster than a scan
//! pass, the intermediate ones are skipped.

use core::convert::Infallible;

use wordclock_core::compositor::PixelBuffer;
use wordclock_core::traits::DisplayDriver;

use crate::channels::{PanelCommand, PANEL_COMMAND};

/// Display driver that hands frames to the refresh task
pub struct PanelHandle;

impl DisplayDriver for PanelHandle {
    type Error = Infallible;

    fn show(&mut self, frame: &PixelBuffer) -> Result<(), Infallible> {
        PANEL_COMMAND.signal(PanelCommand::Show(*frame));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Infallible> {
        PANEL_COMMAND.signal(PanelCommand::Clear);
        Ok(())
    }
}
