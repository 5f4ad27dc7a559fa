//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod clock;
pub mod refresh;
pub mod stop;

pub use clock::{clock_task, Rtc};
pub use refresh::{refresh_task, Panel};
pub use stop::stop_task;
