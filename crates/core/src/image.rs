//! Sink-side copy of the LCD image.
//!
//! A visualization keeps its own [`LcdImage`] and applies redraw events to
//! it. Applying an event is idempotent, so replaying a resync stream over an
//! up-to-date image leaves it unchanged. Rendering honours each controller's
//! display-on flag and start line the way the glass would show them.

use crate::sink::LcdEvent;
use crate::{CONTROLLER_COUNT, CONTROLLER_HEIGHT, CONTROLLER_PAGES, GLCD_XPIXELS, GLCD_YPIXELS};
use crate::{bit_of, controller_of, page_of};

#[derive(Debug, Clone)]
pub struct LcdImage {
    /// Stored image bytes indexed `[page][x]`
    bytes: [[u8; GLCD_XPIXELS]; CONTROLLER_PAGES],
    display_on: [bool; CONTROLLER_COUNT],
    start_line: [u8; CONTROLLER_COUNT],
    /// Set by every applied event, cleared by the renderer
    pub dirty: bool,
}

impl Default for LcdImage {
    fn default() -> Self {
        Self::new()
    }
}

impl LcdImage {
    pub fn new() -> Self {
        LcdImage {
            bytes: [[0; GLCD_XPIXELS]; CONTROLLER_PAGES],
            display_on: [false; CONTROLLER_COUNT],
            start_line: [0; CONTROLLER_COUNT],
            dirty: true,
        }
    }

    pub fn apply(&mut self, event: &LcdEvent) {
        match *event {
            LcdEvent::Display { controller, on } => self.display_on[controller as usize] = on,
            LcdEvent::StartLine { controller, line } => self.start_line[controller as usize] = line,
            LcdEvent::Write { x, page, value } => self.bytes[page as usize][x as usize] = value,
        }
        self.dirty = true;
    }

    pub fn byte_at(&self, x: u8, page: u8) -> u8 {
        self.bytes[page as usize][x as usize]
    }

    /// Stored pixel, ignoring display state and scrolling.
    pub fn pixel(&self, x: u8, y: u8) -> bool {
        (self.bytes[page_of(y) as usize][x as usize] >> bit_of(y)) & 1 != 0
    }

    /// Pixel as shown on the glass at screen row `row`.
    pub fn displayed_pixel(&self, x: u8, row: u8) -> bool {
        let controller = controller_of(x);
        if !self.display_on[controller] {
            return false;
        }
        let y = (row as usize + self.start_line[controller] as usize) % CONTROLLER_HEIGHT;
        self.pixel(x, y as u8)
    }

    pub fn display_on(&self, controller: usize) -> bool {
        self.display_on[controller]
    }

    pub fn start_line(&self, controller: usize) -> u8 {
        self.start_line[controller]
    }

    /// Number of lit pixels on screen.
    pub fn lit_count(&self) -> usize {
        let mut n = 0;
        for row in 0..GLCD_YPIXELS as u8 {
            for x in 0..GLCD_XPIXELS as u8 {
                if self.displayed_pixel(x, row) {
                    n += 1;
                }
            }
        }
        n
    }

    /// Render to 0xRRGGBB pixels at an integer scale (minifb buffer layout).
    pub fn render_rgb(&self, scale: usize, on: u32, off: u32, out: &mut Vec<u32>) {
        let w = GLCD_XPIXELS * scale;
        out.resize(w * GLCD_YPIXELS * scale, off);
        for row in 0..GLCD_YPIXELS {
            for x in 0..GLCD_XPIXELS {
                let c = if self.displayed_pixel(x as u8, row as u8) { on } else { off };
                for sy in 0..scale {
                    let base = (row * scale + sy) * w + x * scale;
                    out[base..base + scale].fill(c);
                }
            }
        }
    }

    /// Render as half-block text, two pixel rows per text line.
    pub fn to_text(&self) -> String {
        let mut s = String::with_capacity((GLCD_XPIXELS + 3) * GLCD_YPIXELS / 2 * 3);
        for row in (0..GLCD_YPIXELS).step_by(2) {
            s.push('|');
            for x in 0..GLCD_XPIXELS as u8 {
                let t = self.displayed_pixel(x, row as u8);
                let b = row + 1 < GLCD_YPIXELS && self.displayed_pixel(x, row as u8 + 1);
                s.push(match (t, b) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    _ => ' ',
                });
            }
            s.push('|');
            s.push('\n');
        }
        s
    }
}
