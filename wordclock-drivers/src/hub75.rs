//! HUB75 RGB matrix panel driver
//!
//! Drives a 32x32 panel with 1/16 scan: two rows are lit at a time, one in
//! the upper half on R1/G1/B1 and one in the lower half on R2/G2/B2,
//! selected by the A-D address lines.
//!
//! # Color depth
//!
//! Each frame is split into 8 bit planes. A refresh pass shows every plane
//! of every row, holding plane `n` for `base_on_time_us << n` microseconds
//! (binary code modulation), so a channel value of 255 is lit 255 time
//! units out of 255.
//!
//! # Row sequence
//!
//! 1. Shift 32 columns of color bits (clock rising edge)
//! 2. Blank (OE high)
//! 3. Latch the shift register
//! 4. Select the row address
//! 5. Unblank (OE low) and hold

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use wordclock_core::compositor::PixelBuffer;
use wordclock_core::traits::DisplayDriver;

/// Panel width in pixels
pub const WIDTH: usize = 32;

/// Panel height in pixels
pub const HEIGHT: usize = 32;

/// Rows driven at once
pub const SCAN_ROWS: usize = HEIGHT / 2;

/// Bit planes per color channel
pub const PLANES: usize = 8;

/// Default on-time of the least significant plane
pub const DEFAULT_BASE_ON_TIME_US: u32 = 1;

const R1: u8 = 1 << 0;
const G1: u8 = 1 << 1;
const B1: u8 = 1 << 2;
const R2: u8 = 1 << 3;
const G2: u8 = 1 << 4;
const B2: u8 = 1 << 5;

/// The 13 control lines of a HUB75 connector
pub struct Hub75Pins<P> {
    pub r1: P,
    pub g1: P,
    pub b1: P,
    pub r2: P,
    pub g2: P,
    pub b2: P,
    pub a: P,
    pub b: P,
    pub c: P,
    pub d: P,
    pub clk: P,
    pub lat: P,
    /// Output enable (active low)
    pub oe: P,
}

/// Bit-plane image of one frame, one byte of color bits per column
type Planes = [[[u8; WIDTH]; SCAN_ROWS]; PLANES];

/// HUB75 panel driver
pub struct Hub75<P> {
    pins: Hub75Pins<P>,
    planes: Planes,
    base_on_time_us: u32,
}

impl<P: OutputPin> Hub75<P> {
    /// Create a driver with the default plane timing
    pub fn new(pins: Hub75Pins<P>) -> Self {
        Self::with_on_time(pins, DEFAULT_BASE_ON_TIME_US)
    }

    /// Create a driver with a custom least-significant-plane on-time
    ///
    /// Longer times give a brighter panel and a lower refresh rate.
    pub fn with_on_time(pins: Hub75Pins<P>, base_on_time_us: u32) -> Self {
        Self {
            pins,
            planes: [[[0; WIDTH]; SCAN_ROWS]; PLANES],
            base_on_time_us: base_on_time_us.max(1),
        }
    }

    /// Convert a frame into bit planes
    ///
    /// Takes effect on the next [`Hub75::refresh`].
    pub fn load(&mut self, frame: &PixelBuffer) {
        for (plane, bits) in self.planes.iter_mut().enumerate() {
            let mask = 1u8 << plane;
            for (y, row) in bits.iter_mut().enumerate() {
                for (x, cell) in row.iter_mut().enumerate() {
                    let upper = frame.pixel(x, y);
                    let lower = frame.pixel(x, y + SCAN_ROWS);
                    let mut out = 0;
                    if upper.r & mask != 0 {
                        out |= R1;
                    }
                    if upper.g & mask != 0 {
                        out |= G1;
                    }
                    if upper.b & mask != 0 {
                        out |= B1;
                    }
                    if lower.r & mask != 0 {
                        out |= R2;
                    }
                    if lower.g & mask != 0 {
                        out |= G2;
                    }
                    if lower.b & mask != 0 {
                        out |= B2;
                    }
                    *cell = out;
                }
            }
        }
    }

    /// Check if the loaded frame has no lit pixels
    pub fn is_dark(&self) -> bool {
        self.planes.iter().flatten().flatten().all(|&c| c == 0)
    }

    /// Run one full scan of all planes and rows, then blank the panel
    pub async fn refresh<T: DelayNs>(&mut self, delay: &mut T) -> Result<(), P::Error> {
        for plane in 0..PLANES {
            let hold = self.base_on_time_us << plane;
            for row in 0..SCAN_ROWS {
                self.shift_row(plane, row)?;
                self.pins.oe.set_high()?;
                self.pins.lat.set_high()?;
                self.pins.lat.set_low()?;
                self.select_row(row)?;
                self.pins.oe.set_low()?;
                delay.delay_us(hold).await;
            }
        }
        self.blank()
    }

    /// Turn the outputs off without touching the loaded frame
    pub fn blank(&mut self) -> Result<(), P::Error> {
        self.pins.oe.set_high()
    }

    fn shift_row(&mut self, plane: usize, row: usize) -> Result<(), P::Error> {
        for &bits in &self.planes[plane][row] {
            set(&mut self.pins.r1, bits & R1 != 0)?;
            set(&mut self.pins.g1, bits & G1 != 0)?;
            set(&mut self.pins.b1, bits & B1 != 0)?;
            set(&mut self.pins.r2, bits & R2 != 0)?;
            set(&mut self.pins.g2, bits & G2 != 0)?;
            set(&mut self.pins.b2, bits & B2 != 0)?;
            self.pins.clk.set_high()?;
            self.pins.clk.set_low()?;
        }
        Ok(())
    }

    fn select_row(&mut self, row: usize) -> Result<(), P::Error> {
        set(&mut self.pins.a, row & 0b0001 != 0)?;
        set(&mut self.pins.b, row & 0b0010 != 0)?;
        set(&mut self.pins.c, row & 0b0100 != 0)?;
        set(&mut self.pins.d, row & 0b1000 != 0)
    }
}

fn set<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), P::Error> {
    if high {
        pin.set_high()
    } else {
        pin.set_low()
    }
}

impl<P: OutputPin> DisplayDriver for Hub75<P> {
    type Error = P::Error;

    fn show(&mut self, frame: &PixelBuffer) -> Result<(), Self::Error> {
        self.load(frame);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.planes = [[[0; WIDTH]; SCAN_ROWS]; PLANES];
        self.blank()
    }
}
