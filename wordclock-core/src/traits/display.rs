//! Display driver trait for the LED panel

use crate::compositor::PixelBuffer;

/// Trait for the LED panel
///
/// The panel is a fixed-size RGB matrix. The core hands it complete frames
/// and never looks at its error type.
pub trait DisplayDriver {
    /// Driver-specific error
    type Error;

    /// Present a complete frame
    fn show(&mut self, frame: &PixelBuffer) -> Result<(), Self::Error>;

    /// Turn every pixel off
    fn clear(&mut self) -> Result<(), Self::Error>;
}

impl<T: DisplayDriver + ?Sized> DisplayDriver for &mut T {
    type Error = T::Error;

    fn show(&mut self, frame: &PixelBuffer) -> Result<(), Self::Error> {
        T::show(self, frame)
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        T::clear(self)
    }
}
