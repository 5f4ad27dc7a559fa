//! Inter-task communication channels
//!
//! Defines the static signals used for communication between Embassy tasks.
//! Only the latest value matters for each, so signals are used rather than
//! queues.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use wordclock_core::compositor::PixelBuffer;

/// What the refresh task should put on the panel
pub enum PanelCommand {
    /// Replace the displayed frame
    Show(PixelBuffer),
    /// Turn every pixel off and stop scanning
    Clear,
}

/// Panel command signal (updated by the clock task)
pub static PANEL_COMMAND: Signal<CriticalSectionRawMutex, PanelCommand> = Signal::new();

/// Stop request (raised by the stop button)
pub static SHUTDOWN: Signal<CriticalSectionRawMutex, ()> = Signal::new();
