//! Frame compositor
//!
//! Rasterizes colored word sets into a panel-sized pixel buffer and
//! cross-fades from the last committed frame to the new one.
//!
//! The compositor owns the committed buffer. Only a [`Transition`] that has
//! yielded its last frame can replace it, through [`Transition::commit`] once
//! the caller has put that frame on the panel. It is replaced with the exact
//! target, not the last interpolated frame, so rounding never accumulates.

use heapless::Vec;

use crate::encoder::MAX_WORDS;
use crate::error::CoreError;
use crate::layout::{Word, WordGrid, GRID_COLS, GRID_ROWS, WORD_GRID};

/// Physical pixels per logical grid cell (each axis)
pub const SCALE: usize = 2;

/// Panel width in pixels
pub const PANEL_WIDTH: usize = GRID_COLS as usize * SCALE;

/// Panel height in pixels
pub const PANEL_HEIGHT: usize = GRID_ROWS as usize * SCALE;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "[u8; 3]", into = "[u8; 3]")
)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const LIME: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const FUCHSIA: Rgb = Rgb::new(255, 0, 255);
    pub const AQUA: Rgb = Rgb::new(0, 255, 255);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Check if all channels are off
    pub const fn is_black(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Display tier of a word set
///
/// When a cell is claimed by several tiers, primary wins over secondary,
/// secondary over tertiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Tier {
    /// The time sentence
    #[default]
    Primary,
    /// Overlay messages
    Secondary,
    /// Decorations
    Tertiary,
}

impl Tier {
    /// Paint order, lowest precedence first
    const PAINT_ORDER: [Tier; 3] = [Tier::Tertiary, Tier::Secondary, Tier::Primary];
}

/// Words lit in one color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSet {
    pub tier: Tier,
    pub color: Rgb,
    pub words: Vec<Word, MAX_WORDS>,
}

impl WordSet {
    /// Create an empty word set
    pub fn new(tier: Tier, color: Rgb) -> Self {
        Self {
            tier,
            color,
            words: Vec::new(),
        }
    }

    /// Create a word set from a slice of words
    pub fn from_words(tier: Tier, color: Rgb, words: &[Word]) -> Result<Self, CoreError> {
        let words = Vec::from_slice(words).map_err(|_| CoreError::InvalidParameter)?;
        Ok(Self { tier, color, words })
    }
}

/// Panel-sized RGB frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: [[Rgb; PANEL_WIDTH]; PANEL_HEIGHT],
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelBuffer {
    pub const WIDTH: usize = PANEL_WIDTH;
    pub const HEIGHT: usize = PANEL_HEIGHT;

    /// Create an all-black frame
    pub const fn new() -> Self {
        Self {
            pixels: [[Rgb::BLACK; PANEL_WIDTH]; PANEL_HEIGHT],
        }
    }

    /// Get a pixel (black when out of bounds)
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(Rgb::BLACK)
    }

    /// Set a pixel (ignored when out of bounds)
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        if let Some(px) = self.pixels.get_mut(y).and_then(|row| row.get_mut(x)) {
            *px = color;
        }
    }

    /// Fill a rectangle, clipped to the panel
    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, color: Rgb) {
        let x_end = (x + width).min(PANEL_WIDTH);
        let y_end = (y + height).min(PANEL_HEIGHT);
        for row in self.pixels.iter_mut().take(y_end).skip(y) {
            for px in row.iter_mut().take(x_end).skip(x) {
                *px = color;
            }
        }
    }

    /// Pixel rows, top to bottom
    pub fn rows(&self) -> &[[Rgb; PANEL_WIDTH]; PANEL_HEIGHT] {
        &self.pixels
    }

    /// Number of pixels that are not black
    pub fn lit_pixels(&self) -> usize {
        self.pixels
            .iter()
            .flat_map(|row| row.iter())
            .filter(|px| !px.is_black())
            .count()
    }

    /// Check if every pixel is black
    pub fn is_blank(&self) -> bool {
        self.lit_pixels() == 0
    }
}

/// Word-set rasterizer and cross-fader
pub struct Compositor {
    grid: &'static WordGrid,
    /// Frame currently shown on the panel
    committed: PixelBuffer,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    /// Create a compositor for the reference layout, starting from black
    pub fn new() -> Self {
        Self::with_grid(&WORD_GRID)
    }

    /// Create a compositor for a specific layout
    pub fn with_grid(grid: &'static WordGrid) -> Self {
        Self {
            grid,
            committed: PixelBuffer::new(),
        }
    }

    /// The last fully displayed frame
    pub fn committed(&self) -> &PixelBuffer {
        &self.committed
    }

    /// Forget the committed frame (after the panel was cleared)
    pub fn reset(&mut self) {
        self.committed = PixelBuffer::new();
    }

    /// Rasterize word sets into a frame
    pub fn render(&self, sets: &[WordSet]) -> PixelBuffer {
        let mut frame = PixelBuffer::new();
        for tier in Tier::PAINT_ORDER {
            for set in sets.iter().filter(|s| s.tier == tier) {
                for &word in &set.words {
                    let entry = self.grid.entry(word);
                    frame.fill_rect(
                        entry.column.saturating_sub(1) as usize * SCALE,
                        entry.row.saturating_sub(1) as usize * SCALE,
                        entry.width as usize * SCALE,
                        entry.height as usize * SCALE,
                        set.color,
                    );
                }
            }
        }
        frame
    }

    /// Start a cross-fade from the committed frame to the given word sets
    ///
    /// The returned iterator yields exactly `steps` frames. The committed
    /// frame is only replaced by [`Transition::commit`]. `steps` must be at
    /// least 1.
    pub fn transition(&mut self, sets: &[WordSet], steps: u16) -> Result<Transition<'_>, CoreError> {
        if steps == 0 {
            return Err(CoreError::InvalidParameter);
        }
        let start = self.committed;
        let target = self.render(sets);
        Ok(Transition {
            committed: &mut self.committed,
            start,
            target,
            steps,
            emitted: 0,
        })
    }
}

/// Cross-fade between two frames
///
/// Frame `k` (1-based) is `start + k * (target - start) / steps` per
/// channel. The sequence can be replayed with [`Transition::restart`].
pub struct Transition<'a> {
    committed: &'a mut PixelBuffer,
    start: PixelBuffer,
    target: PixelBuffer,
    steps: u16,
    emitted: u16,
}

impl Transition<'_> {
    /// Total number of frames
    pub fn steps(&self) -> u16 {
        self.steps
    }

    /// The exact frame this transition ends on
    pub fn target(&self) -> &PixelBuffer {
        &self.target
    }

    /// Check if every frame has been yielded
    pub fn is_complete(&self) -> bool {
        self.emitted == self.steps
    }

    /// Replay the fade from the first frame
    pub fn restart(&mut self) {
        self.emitted = 0;
    }

    /// Make the target the committed frame
    ///
    /// Does nothing unless every frame has been yielded. Returns whether the
    /// target was committed.
    pub fn commit(self) -> bool {
        if self.is_complete() {
            *self.committed = self.target;
            true
        } else {
            false
        }
    }

    fn frame(&self, step: u16) -> PixelBuffer {
        let mut frame = PixelBuffer::new();
        let rows = self.start.pixels.iter().zip(self.target.pixels.iter());
        for (out_row, (start_row, target_row)) in frame.pixels.iter_mut().zip(rows) {
            for (out, (from, to)) in out_row.iter_mut().zip(start_row.iter().zip(target_row)) {
                *out = Rgb {
                    r: interpolate(from.r, to.r, step, self.steps),
                    g: interpolate(from.g, to.g, step, self.steps),
                    b: interpolate(from.b, to.b, step, self.steps),
                };
            }
        }
        frame
    }
}

impl Iterator for Transition<'_> {
    type Item = PixelBuffer;

    fn next(&mut self) -> Option<PixelBuffer> {
        if self.emitted >= self.steps {
            return None;
        }
        self.emitted += 1;
        Some(self.frame(self.emitted))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.steps - self.emitted) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Transition<'_> {}

/// One channel of frame `step` out of `steps`
///
/// Floor of the exact value `from + (to - from) * step / steps`, so fades
/// round down in both directions and every frame stays between the two
/// endpoints.
fn interpolate(from: u8, to: u8, step: u16, steps: u16) -> u8 {
    let (from, to, step, steps) = (from as i32, to as i32, step as i32, steps as i32);
    (from * steps + (to - from) * step).div_euclid(steps) as u8
}
