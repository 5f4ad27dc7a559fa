//! Mode controller
//!
//! Drives the panel in one of three modes chosen at boot:
//!
//! - `Diagnostic`: light every word alone in red, lime and blue
//! - `Simulation`: play a whole day, one minute per step
//! - `Clock`: show the real time forever, with calendar overlays
//!
//! All waiting goes through the injected [`DelayNs`] provider, so the
//! controller runs on any executor and under `block_on` in tests.

use core::convert::Infallible;
use core::str::FromStr;

use embedded_hal_async::delay::DelayNs;
use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::compositor::{Compositor, Rgb, Tier, WordSet};
use crate::config::{ClockConfig, WindowConfig, MAX_OVERLAYS};
use crate::encoder::{encode, Phrase};
use crate::error::{CoreError, RunError};
use crate::layout::Word;
use crate::logging::{debug, info};
use crate::time::Timestamp;
use crate::traits::{ClockSource, DisplayDriver};

/// Colors cycled through by the diagnostic sweep
const DIAGNOSTIC_COLORS: [Rgb; 3] = [Rgb::RED, Rgb::LIME, Rgb::BLUE];

/// Operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Mode {
    /// Word-by-word color sweep, then stop
    Diagnostic,
    /// Accelerated 24 hour run, then stop
    Simulation,
    /// Real-time clock loop
    #[default]
    Clock,
}

impl Mode {
    /// Configuration name of the mode
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Diagnostic => "diagnostic",
            Mode::Simulation => "simulation",
            Mode::Clock => "clock",
        }
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "diagnostic" => Ok(Mode::Diagnostic),
            "simulation" => Ok(Mode::Simulation),
            "clock" => Ok(Mode::Clock),
            _ => Err(CoreError::InvalidParameter),
        }
    }
}

/// Blink counter for calendar overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OverlayWindow {
    counter: u16,
    config: WindowConfig,
}

impl OverlayWindow {
    /// Create a window at its configured start
    pub const fn new(config: WindowConfig) -> Self {
        Self {
            counter: config.start,
            config,
        }
    }

    /// Current counter value
    pub const fn counter(&self) -> u16 {
        self.counter
    }

    /// Check if overlays are visible this cycle
    pub fn is_open(&self) -> bool {
        self.counter.checked_rem(self.config.period) == Some(0) && self.counter < self.config.limit
    }

    /// Move to the next cycle
    ///
    /// Wraps to 0 once the counter would pass `wrap`.
    pub fn advance(&mut self) {
        self.counter = if self.counter >= self.config.wrap {
            0
        } else {
            self.counter + 1
        };
    }
}

/// Outcome of one clock cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Time that was displayed
    pub time: Timestamp,
    /// Number of overlays lit this cycle
    pub overlays: u8,
}

/// Top-level controller tying clock, encoder, compositor and panel together
pub struct ModeController<D, C, T> {
    display: D,
    clock: C,
    delay: T,
    compositor: Compositor,
    config: ClockConfig,
    window: OverlayWindow,
}

impl<D, C, T> ModeController<D, C, T>
where
    D: DisplayDriver,
    C: ClockSource,
    T: DelayNs,
{
    /// Create a controller
    ///
    /// Fails with the first problem [`ClockConfig::validate`] finds.
    pub fn new(display: D, clock: C, delay: T, config: ClockConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            display,
            clock,
            delay,
            compositor: Compositor::new(),
            window: OverlayWindow::new(config.window),
            config,
        })
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn window(&self) -> &OverlayWindow {
        &self.window
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Run the configured mode
    ///
    /// Returns after the diagnostic sweep or the simulation. Clock mode only
    /// returns on error.
    pub async fn run(&mut self) -> Result<(), RunError<D::Error>> {
        info!("mode: {=str}", self.config.mode.name());
        match self.config.mode {
            Mode::Diagnostic => self.run_diagnostic().await,
            Mode::Simulation => self.run_simulation().await,
            Mode::Clock => match self.run_clock().await {
                Ok(never) => match never {},
                Err(e) => Err(e),
            },
        }
    }

    /// Light every word alone in each diagnostic color, then clear the panel
    pub async fn run_diagnostic(&mut self) -> Result<(), RunError<D::Error>> {
        info!("testing each word and color");
        let pause = self.config.timing.diagnostic_interval_ms;
        for &word in Word::ALL {
            debug!("  {=str}", word.name());
            for color in DIAGNOSTIC_COLORS {
                let set = WordSet::from_words(Tier::Primary, color, &[word])?;
                self.show(core::slice::from_ref(&set)).await?;
                self.delay.delay_ms(pause).await;
            }
        }
        self.clear()?;
        info!("diagnostic done");
        Ok(())
    }

    /// Show every minute of a day on January 1st, then clear the panel
    pub async fn run_simulation(&mut self) -> Result<(), RunError<D::Error>> {
        info!("testing all times");
        let pause = self.config.timing.simulation_interval_ms;
        for hour in 0..24 {
            for minute in 0..60 {
                let now = Timestamp::from_hm(hour, minute)?;
                let set = WordSet {
                    tier: Tier::Primary,
                    color: self.config.palette.primary,
                    words: encode(&now),
                };
                debug!("{=u8:02}:{=u8:02} - {}", hour, minute, Phrase(&set.words));
                self.show(core::slice::from_ref(&set)).await?;
                self.delay.delay_ms(pause).await;
            }
        }
        self.clear()?;
        info!("simulation done");
        Ok(())
    }

    /// Run clock cycles until one fails
    pub async fn run_clock(&mut self) -> Result<Infallible, RunError<D::Error>> {
        info!("running the clock");
        loop {
            self.clock_cycle().await?;
        }
    }

    /// Read the clock, show the time and any open overlays, then sleep
    pub async fn clock_cycle(&mut self) -> Result<CycleReport, RunError<D::Error>> {
        let now = self.clock.now()?;
        let words = encode(&now);
        info!(
            "{=u8:02}:{=u8:02} - {}",
            now.hour(),
            now.minute(),
            Phrase(&words)
        );

        let mut sets: Vec<WordSet, { MAX_OVERLAYS + 1 }> = Vec::new();
        sets.push(WordSet {
            tier: Tier::Primary,
            color: self.config.palette.primary,
            words,
        })
        .map_err(|_| CoreError::InvalidParameter)?;

        let mut overlays = 0;
        if self.window.is_open() {
            for overlay in self.config.overlays_on(&now) {
                info!("    - {}", Phrase(&overlay.words));
                let color = self.config.palette.color(overlay.tier);
                let set = WordSet::from_words(overlay.tier, color, &overlay.words)?;
                sets.push(set).map_err(|_| CoreError::InvalidParameter)?;
                overlays += 1;
            }
        }

        self.show(&sets).await?;
        self.window.advance();
        self.delay.delay_ms(self.config.timing.clock_interval_ms).await;

        Ok(CycleReport {
            time: now,
            overlays,
        })
    }

    /// Turn the panel off
    ///
    /// The next transition fades in from black.
    pub fn shutdown(&mut self) -> Result<(), D::Error> {
        info!("turning off the clock");
        self.display.clear()?;
        self.compositor.reset();
        Ok(())
    }

    /// Fade from the committed frame to the given word sets
    async fn show(&mut self, sets: &[WordSet]) -> Result<(), RunError<D::Error>> {
        let pause = self.config.timing.fade_step_delay_ms;
        let mut transition = self.compositor.transition(sets, self.config.timing.fade_steps)?;
        for frame in transition.by_ref() {
            self.display.show(&frame).map_err(RunError::Display)?;
            self.delay.delay_ms(pause).await;
        }
        transition.commit();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RunError<D::Error>> {
        self.display.clear().map_err(RunError::Display)?;
        self.compositor.reset();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{PixelBuffer, SCALE};
    use crate::layout::WORD_GRID;
    use crate::traits::ClockError;
    use embassy_futures::block_on;
    use std::vec::Vec as StdVec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct PanelFault;

    #[derive(Default)]
    struct MockDisplay {
        shown: usize,
        clears: usize,
        last: PixelBuffer,
        fail_at: Option<usize>,
    }

    impl DisplayDriver for MockDisplay {
        type Error = PanelFault;

        fn show(&mut self, frame: &PixelBuffer) -> Result<(), PanelFault> {
            if self.fail_at == Some(self.shown) {
                return Err(PanelFault);
            }
            self.shown += 1;
            self.last = *frame;
            Ok(())
        }

        fn clear(&mut self) -> Result<(), PanelFault> {
            self.clears += 1;
            self.last = PixelBuffer::new();
            Ok(())
        }
    }

    /// Replays a fixed list of readings, repeating the last one
    struct MockClock {
        readings: StdVec<Timestamp>,
        next: usize,
    }

    impl MockClock {
        fn new(readings: &[Timestamp]) -> Self {
            Self {
                readings: readings.to_vec(),
                next: 0,
            }
        }
    }

    impl ClockSource for MockClock {
        fn now(&mut self) -> Result<Timestamp, ClockError> {
            let reading = self
                .readings
                .get(self.next)
                .or(self.readings.last())
                .copied()
                .ok_or(ClockError::NotRunning)?;
            self.next += 1;
            Ok(reading)
        }
    }

    #[derive(Default)]
    struct MockDelay {
        calls: usize,
        total_ms: u64,
    }

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.calls += 1;
            self.total_ms += u64::from(ns / 1_000_000);
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.calls += 1;
            self.total_ms += u64::from(ms);
        }
    }

    fn test_config(mode: Mode, fade_steps: u16) -> ClockConfig {
        let mut config = ClockConfig::new();
        config.mode = mode;
        config.timing.fade_steps = fade_steps;
        config
    }

    fn controller(
        config: ClockConfig,
        readings: &[Timestamp],
    ) -> ModeController<MockDisplay, MockClock, MockDelay> {
        ModeController::new(
            MockDisplay::default(),
            MockClock::new(readings),
            MockDelay::default(),
            config,
        )
        .unwrap()
    }

    fn word_pixel(frame: &PixelBuffer, word: Word) -> Rgb {
        let entry = WORD_GRID.entry(word);
        frame.pixel(
            (entry.column as usize - 1) * SCALE,
            (entry.row as usize - 1) * SCALE,
        )
    }

    #[test]
    fn test_mode_names() {
        for mode in [Mode::Diagnostic, Mode::Simulation, Mode::Clock] {
            assert_eq!(mode.name().parse::<Mode>(), Ok(mode));
        }
        assert_eq!("clockwork".parse::<Mode>(), Err(CoreError::InvalidParameter));
        assert_eq!(Mode::default(), Mode::Clock);
    }

    #[test]
    fn test_window_blinks_then_wraps() {
        let mut window = OverlayWindow::new(WindowConfig::default());
        let mut open = StdVec::new();
        for _ in 0..17 {
            if window.is_open() {
                open.push(window.counter());
            }
            window.advance();
        }
        // 90..=105, then wrapped to 0
        assert_eq!(open, [90, 95, 0]);
        assert_eq!(window.counter(), 1);
    }

    #[test]
    fn test_window_wraps_at_max_counter() {
        let mut window = OverlayWindow::new(WindowConfig {
            start: u16::MAX - 1,
            wrap: u16::MAX,
            ..WindowConfig::default()
        });
        window.advance();
        assert_eq!(window.counter(), u16::MAX);
        window.advance();
        assert_eq!(window.counter(), 0);
        assert!(window.is_open());
    }

    #[test]
    fn test_window_closed_at_limit() {
        let window = OverlayWindow::new(WindowConfig {
            start: 100,
            ..WindowConfig::default()
        });
        assert!(!window.is_open());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = test_config(Mode::Clock, 0);
        let result = ModeController::new(
            MockDisplay::default(),
            MockClock::new(&[]),
            MockDelay::default(),
            config,
        );
        assert!(matches!(result, Err(CoreError::InvalidParameter)));
    }

    #[test]
    fn test_diagnostic_sweep() {
        let mut ctl = controller(test_config(Mode::Diagnostic, 2), &[]);
        block_on(ctl.run()).unwrap();

        assert_eq!(ctl.display().shown, Word::COUNT * 3 * 2);
        assert_eq!(ctl.display().clears, 1);
        assert!(ctl.compositor().committed().is_blank());
        // every fade frame and every color hold
        assert_eq!(ctl.delay.calls, Word::COUNT * 3 * 3);
    }

    #[test]
    fn test_simulation_runs_whole_day() {
        let mut config = test_config(Mode::Simulation, 1);
        config.timing.fade_step_delay_ms = 0;
        config.timing.simulation_interval_ms = 7;
        let mut ctl = controller(config, &[]);
        block_on(ctl.run()).unwrap();

        assert_eq!(ctl.display().shown, 24 * 60);
        assert_eq!(ctl.display().clears, 1);
        assert_eq!(ctl.delay.total_ms, 24 * 60 * 7);
        assert!(ctl.display().last.is_blank());
    }

    #[test]
    fn test_clock_cycle_shows_time() {
        let now = Timestamp::new(16, 37, 3, 14).unwrap();
        let mut ctl = controller(test_config(Mode::Clock, 4), &[now]);

        let report = block_on(ctl.clock_cycle()).unwrap();
        assert_eq!(report, CycleReport { time: now, overlays: 0 });

        let expected = encode(&now);
        let frame = ctl.display().last;
        assert_eq!(frame, *ctl.compositor().committed());
        for &word in &expected {
            assert_eq!(word_pixel(&frame, word), Rgb::RED);
        }
        assert!(word_pixel(&frame, Word::Happy).is_black());
        assert_eq!(ctl.display().shown, 4);
        assert_eq!(ctl.delay.total_ms, 4 * 10 + 5000);
    }

    #[test]
    fn test_overlay_blinks_on_matching_day() {
        let birthday = Timestamp::new(9, 0, 2, 2).unwrap();
        let mut ctl = controller(test_config(Mode::Clock, 1), &[birthday]);

        // counter 90: open
        let report = block_on(ctl.clock_cycle()).unwrap();
        assert_eq!(report.overlays, 1);
        let frame = ctl.display().last;
        assert_eq!(word_pixel(&frame, Word::Happy), Rgb::AQUA);
        assert_eq!(word_pixel(&frame, Word::Birthday), Rgb::AQUA);
        assert_eq!(word_pixel(&frame, Word::Nine2), Rgb::RED);

        // counter 91: closed
        let report = block_on(ctl.clock_cycle()).unwrap();
        assert_eq!(report.overlays, 0);
        assert!(word_pixel(&ctl.display().last, Word::Happy).is_black());
        assert_eq!(ctl.window().counter(), 92);
    }

    #[test]
    fn test_overlay_needs_matching_day() {
        let other = Timestamp::new(9, 0, 2, 3).unwrap();
        let mut ctl = controller(test_config(Mode::Clock, 1), &[other]);

        let report = block_on(ctl.clock_cycle()).unwrap();
        assert_eq!(report.overlays, 0);
        assert!(word_pixel(&ctl.display().last, Word::Happy).is_black());
    }

    #[test]
    fn test_clock_error_aborts_loop() {
        let mut ctl = controller(test_config(Mode::Clock, 1), &[]);
        assert_eq!(
            block_on(ctl.run()),
            Err(RunError::Clock(ClockError::NotRunning))
        );
        assert_eq!(ctl.display().shown, 0);
    }

    #[test]
    fn test_display_error_commits_nothing() {
        let now = Timestamp::new(12, 0, 1, 1).unwrap();
        let mut ctl = controller(test_config(Mode::Clock, 4), &[now]);
        ctl.display.fail_at = Some(2);

        assert_eq!(
            block_on(ctl.clock_cycle()),
            Err(RunError::Display(PanelFault))
        );
        assert!(ctl.compositor().committed().is_blank());
        // the window only advances on a completed cycle
        assert_eq!(ctl.window().counter(), 90);
    }

    #[test]
    fn test_display_error_on_last_frame_commits_nothing() {
        let now = Timestamp::new(12, 0, 1, 1).unwrap();
        let mut ctl = controller(test_config(Mode::Clock, 4), &[now]);
        ctl.display.fail_at = Some(3);

        assert_eq!(
            block_on(ctl.clock_cycle()),
            Err(RunError::Display(PanelFault))
        );
        assert_eq!(ctl.display().shown, 3);
        assert!(ctl.compositor().committed().is_blank());

        // the next cycle fades in from black again
        ctl.display.fail_at = None;
        block_on(ctl.clock_cycle()).unwrap();
        assert_eq!(ctl.display().last, *ctl.compositor().committed());
        assert!(!ctl.compositor().committed().is_blank());
    }

    #[test]
    fn test_shutdown_clears_panel() {
        let now = Timestamp::new(7, 15, 1, 1).unwrap();
        let mut ctl = controller(test_config(Mode::Clock, 1), &[now]);
        block_on(ctl.clock_cycle()).unwrap();
        assert!(!ctl.compositor().committed().is_blank());

        ctl.shutdown().unwrap();
        assert_eq!(ctl.display().clears, 1);
        assert!(ctl.display().last.is_blank());
        assert!(ctl.compositor().committed().is_blank());
    }
}
