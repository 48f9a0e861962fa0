//! # monochron-core
//!
//! Emulation core for the Monochron clock: a 128×64 monochrome dot-matrix
//! LCD driven by two KS0108 controllers, the graphics library the clock
//! faces draw with, and the cooperative tick loop that drives the faces.
//!
//! ## Architecture
//!
//! - [`controller::Controller`]: One KS0108 chip with registers, bus state
//!   machine and 64×64 pixel image
//! - [`Lcd`]: Two chips side by side with chip select, command decoding,
//!   logical addressing, redraw notifications
//! - [`sink`]: Redraw event sinks (synchronous callback, cross-thread queue)
//! - [`LcdImage`]: Sink-side copy of the display for rendering
//! - [`Glcd`]: Graphics library for pixels, lines, pattern fills, circles,
//!   stencil bitmaps, scaled text in three orientations
//! - [`font`]: Built-in 5×5 monospace and proportional fonts
//! - [`scheduler`]: Face scheduler with a fixed per-tick budget
//! - [`faces`]: Digital, analog and banner clock faces
//! - [`snapshot`] / [`png`]: LCD state files and screenshots
//!
//! ## Geometry
//!
//! Pixel (x, y) lives in controller `x >> 6`, column `x & 63`, page `y >> 3`,
//! bit `y & 7`. Every primitive goes through the helpers below rather than
//! literal shifts.
//!
//! ## Faults
//!
//! Undecodable command bytes, out-of-range coordinates and chip select
//! faults are programming errors and panic with a diagnostic. Environment
//! failures (file I/O, a full or poisoned event queue) are returned as
//! [`Error`].

pub mod audio;
pub mod config;
pub mod controller;
pub mod error;
pub mod faces;
pub mod font;
pub mod glcd;
pub mod image;
pub mod lcd;
pub mod png;
pub mod rtc;
pub mod scheduler;
pub mod sink;
pub mod snapshot;

use std::path::Path;

use log::{debug, info};

pub use audio::Beeper;
pub use config::EmuConfig;
pub use error::{Error, Result};
pub use glcd::Glcd;
pub use image::LcdImage;
pub use lcd::Lcd;
pub use rtc::{ClockTime, TimeSource};
pub use scheduler::Scheduler;

/// Number of controller chips
pub const CONTROLLER_COUNT: usize = 2;
/// Column address bits per controller
pub const CONTROLLER_WIDTH_BITS: u32 = 6;
/// Columns per controller
pub const CONTROLLER_WIDTH: usize = 1 << CONTROLLER_WIDTH_BITS;
/// Row bits per page
pub const PAGE_BITS: u32 = 3;
/// Pixel rows per page byte
pub const PAGE_HEIGHT: usize = 1 << PAGE_BITS;
/// Pixel rows per controller
pub const CONTROLLER_HEIGHT: usize = 64;
/// Pages per controller
pub const CONTROLLER_PAGES: usize = CONTROLLER_HEIGHT / PAGE_HEIGHT;
/// Display width in pixels
pub const GLCD_XPIXELS: usize = CONTROLLER_WIDTH * CONTROLLER_COUNT;
/// Display height in pixels
pub const GLCD_YPIXELS: usize = CONTROLLER_HEIGHT;

/// Controller owning logical column `x`.
pub const fn controller_of(x: u8) -> usize {
    (x >> CONTROLLER_WIDTH_BITS) as usize
}

/// Column of `x` within its controller.
pub const fn local_x(x: u8) -> u8 {
    x & (CONTROLLER_WIDTH as u8 - 1)
}

/// Page holding row `y`.
pub const fn page_of(y: u8) -> u8 {
    y >> PAGE_BITS
}

/// Bit of row `y` within its page byte.
pub const fn bit_of(y: u8) -> u8 {
    y & (PAGE_HEIGHT as u8 - 1)
}

/// The emulated clock: display, faces, time source and alarm.
pub struct Monochron {
    pub glcd: Glcd,
    pub scheduler: Scheduler,
    time: Box<dyn TimeSource>,
    beeper: Box<dyn Beeper>,
    pub config: EmuConfig,
    /// Second of the alarm minute that last beeped
    alarm_second: Option<u8>,
    /// Time seen by the last tick
    now: ClockTime,
    pub tick_count: u64,
}

impl Monochron {
    /// Build the clock on `lcd`. Sinks attached to `lcd` beforehand receive
    /// every redraw event, including display power-up.
    pub fn new(config: EmuConfig, lcd: Lcd, time: Box<dyn TimeSource>, beeper: Box<dyn Beeper>) -> Self {
        let mut glcd = Glcd::new(lcd);
        glcd.set_inverted(config.inverted);
        let mut scheduler = Scheduler::new(config.tick);
        for face in faces::default_faces() {
            scheduler.register(face);
        }
        scheduler.select(config.start_face % scheduler.face_count());
        info!(
            "monochron: tick {:?}, face {}, alarm {:?}",
            config.tick,
            scheduler.active_name().unwrap_or("-"),
            config.alarm
        );
        Monochron {
            glcd,
            scheduler,
            time,
            beeper,
            config,
            alarm_second: None,
            now: ClockTime::default(),
            tick_count: 0,
        }
    }

    /// Run one scheduler tick: read the clock, sound the alarm, advance the
    /// active face.
    pub fn run_tick(&mut self) -> Result<ClockTime> {
        let now = self.time.now();
        self.check_alarm(&now);
        self.now = now;
        self.tick_count += 1;
        self.scheduler.tick(&mut self.glcd, &now)?;
        Ok(now)
    }

    /// Beep once per second while the clock is in the alarm minute.
    fn check_alarm(&mut self, now: &ClockTime) {
        let ringing = matches!(self.config.alarm, Some((h, m)) if now.hour == h && now.minute == m);
        if !ringing {
            self.alarm_second = None;
            return;
        }
        if self.alarm_second != Some(now.second) {
            if self.alarm_second.is_none() {
                info!("monochron: alarm {:02}:{:02}", now.hour, now.minute);
            }
            self.alarm_second = Some(now.second);
            self.beeper.beep(audio::ALARM_FREQUENCY_HZ, audio::ALARM_DURATION_MS);
        }
    }

    pub fn now(&self) -> ClockTime {
        self.now
    }

    pub fn alarm_active(&self) -> bool {
        self.alarm_second.is_some()
    }

    /// Flip display inversion and redraw the active face.
    pub fn toggle_inverted(&mut self) {
        self.config.inverted = !self.config.inverted;
        self.glcd.set_inverted(self.config.inverted);
        self.scheduler.restart();
        debug!("monochron: inverted = {}", self.config.inverted);
    }

    pub fn next_face(&mut self) {
        self.scheduler.next_face();
    }

    pub fn save_state(&self, path: &Path) -> Result<()> {
        snapshot::save_to_file(&self.glcd.lcd().to_state(), path)
    }

    /// Load an lcd state file. Attached sinks are resynchronised.
    pub fn load_state(&mut self, path: &Path) -> Result<()> {
        let state = snapshot::load_from_file(path)?;
        self.glcd.lcd_mut().restore(&state)
    }
}
