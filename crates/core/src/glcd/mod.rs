//! Graphics library on top of the dual-controller display.
//!
//! All drawing happens in the fixed 128×64 logical space and is expressed as
//! read-modify-write merges over runs of page bytes. A run is read once
//! (dummy read included, re-addressed at the controller boundary), merged in
//! the scratch line buffer, and only the span from the first to the last
//! changed byte is written back. Runs whose mask covers the whole byte skip
//! the read entirely.
//!
//! Out-of-range coordinates are caller bugs and panic.

mod bitmap;
mod circle;
mod line;
mod rect;
mod text;

pub use bitmap::Bitmap;
pub use circle::CircleStyle;
pub use rect::{Align, Pattern};
pub use text::Orientation;

use crate::lcd::{Lcd, CMD_DISPLAY, CMD_START_LINE};
use crate::{bit_of, local_x, page_of};
use crate::{CONTROLLER_COUNT, CONTROLLER_PAGES, GLCD_XPIXELS, GLCD_YPIXELS, PAGE_BITS, PAGE_HEIGHT};

/// Pixel draw color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    Off,
    #[default]
    On,
}

impl Color {
    pub fn inverse(self) -> Color {
        match self {
            Color::Off => Color::On,
            Color::On => Color::Off,
        }
    }

    /// Byte with all 8 pixels in this color.
    fn fill(self) -> u8 {
        match self {
            Color::Off => 0x00,
            Color::On => 0xFF,
        }
    }
}

/// Graphics context: the display plus draw color and scratch buffer.
///
/// Every primitive takes `&mut self`, so at most one draw is in flight per
/// display.
pub struct Glcd {
    lcd: Lcd,
    color: Color,
    /// Display-wide inversion; swaps foreground and background
    inverted: bool,
    /// Scratch line buffer for one page run
    line: [u8; GLCD_XPIXELS],
}

impl Default for Glcd {
    fn default() -> Self {
        Self::new(Lcd::new())
    }
}

impl Glcd {
    /// Take over `lcd`, switch both controllers on and reset their start
    /// lines. Sinks attached to `lcd` beforehand see these changes.
    pub fn new(mut lcd: Lcd) -> Self {
        for index in 0..CONTROLLER_COUNT {
            lcd.select_controller(index);
            lcd.write_command(CMD_DISPLAY | 1);
            lcd.write_command(CMD_START_LINE);
        }
        Glcd { lcd, color: Color::On, inverted: false, line: [0; GLCD_XPIXELS] }
    }

    pub fn lcd(&self) -> &Lcd {
        &self.lcd
    }

    pub fn lcd_mut(&mut self) -> &mut Lcd {
        &mut self.lcd
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn inverted(&self) -> bool {
        self.inverted
    }

    /// Change display inversion. Already drawn content is left as is.
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    pub fn foreground(&self) -> Color {
        if self.inverted {
            Color::Off
        } else {
            Color::On
        }
    }

    pub fn background(&self) -> Color {
        self.foreground().inverse()
    }

    /// Fill the whole display with the background color.
    pub fn clear(&mut self) {
        let value = self.background().fill();
        for page in 0..CONTROLLER_PAGES as u8 {
            self.update_run(0, page, GLCD_XPIXELS, false, |_, _| value);
        }
    }

    /// Paint one pixel in the current draw color.
    pub fn set_pixel(&mut self, x: u8, y: u8) {
        self.paint_pixel(x, y, self.color);
    }

    /// Paint one pixel in the inverse of the current draw color.
    pub fn clear_pixel(&mut self, x: u8, y: u8) {
        self.paint_pixel(x, y, self.color.inverse());
    }

    fn paint_pixel(&mut self, x: u8, y: u8, color: Color) {
        assert_point(x, y, "set_pixel");
        let bit = 1u8 << bit_of(y);
        self.update_run(x, page_of(y), 1, true, |_, old| merge_color(old, bit, color));
    }

    /// Read one pixel back through the controller bus.
    pub fn read_pixel(&mut self, x: u8, y: u8) -> bool {
        assert_point(x, y, "read_pixel");
        let mut byte = [0u8; 1];
        read_run(&mut self.lcd, x, page_of(y), &mut byte);
        byte[0] & (1 << bit_of(y)) != 0
    }

    /// Read-modify-write `len` bytes of `page` starting at column `x`.
    ///
    /// `merge` maps (index in run, current byte) to the new byte. With
    /// `read == false` the current byte is not fetched, `merge` must ignore
    /// it, and every byte is written.
    fn update_run<F>(&mut self, x: u8, page: u8, len: usize, read: bool, mut merge: F)
    where
        F: FnMut(usize, u8) -> u8,
    {
        assert!(
            len > 0 && x as usize + len <= GLCD_XPIXELS && (page as usize) < CONTROLLER_PAGES,
            "glcd: run of {} bytes at ({}, page {}) outside display",
            len,
            x,
            page
        );
        let bytes = &mut self.line[..len];
        if read {
            read_run(&mut self.lcd, x, page, bytes);
        }
        let mut span: Option<(usize, usize)> = None;
        for (i, byte) in bytes.iter_mut().enumerate() {
            let merged = merge(i, *byte);
            if !read || merged != *byte {
                span = Some(match span {
                    Some((first, _)) => (first, i),
                    None => (i, i),
                });
            }
            *byte = merged;
        }
        if let Some((first, last)) = span {
            write_run(&mut self.lcd, x + first as u8, page, &self.line[first..=last]);
        }
    }

    /// Draw a stencil block: `columns[i]` holds the pixels of column `x + i`
    /// from row `y` down, bit 0 first. Set bits take the draw color, clear
    /// bits its inverse; pixels outside the block are untouched.
    fn stencil(&mut self, x: u8, y: u8, height: u8, columns: &[u64]) {
        let width = columns.len();
        if width == 0 || height == 0 {
            return;
        }
        assert_region(x, y, width, height as usize, "stencil");
        let bottom = y + height - 1;
        let invert = self.color == Color::Off;
        for page in page_of(y)..=page_of(bottom) {
            let mask = page_mask(page, y, bottom);
            let top = page << PAGE_BITS;
            self.update_run(x, page, width, mask != 0xFF, |i, old| {
                let src = if top >= y {
                    (columns[i] >> (top - y)) as u8
                } else {
                    (columns[i] << (y - top)) as u8
                };
                let src = if invert { !src } else { src };
                (old & !mask) | (src & mask)
            });
        }
    }
}

/// Byte with `mask` bits painted in `color`.
fn merge_color(old: u8, mask: u8, color: Color) -> u8 {
    match color {
        Color::On => old | mask,
        Color::Off => old & !mask,
    }
}

/// Bits of `page` covered by rows `top..=bottom`.
fn page_mask(page: u8, top: u8, bottom: u8) -> u8 {
    let first = page << PAGE_BITS;
    let last = first + PAGE_HEIGHT as u8 - 1;
    let lo = top.max(first) - first;
    let hi = bottom.min(last) - first;
    ((0xFFu16 << lo) & (0xFFu16 >> (7 - hi))) as u8
}

/// Read `out.len()` consecutive bytes of `page` starting at column `x`.
/// Each controller segment starts with an address set and a dummy read.
fn read_run(lcd: &mut Lcd, x: u8, page: u8, out: &mut [u8]) {
    let y = page << PAGE_BITS;
    for (i, slot) in out.iter_mut().enumerate() {
        let column = x + i as u8;
        if i == 0 || local_x(column) == 0 {
            lcd.set_address(column, y);
            lcd.read_byte();
        }
        *slot = lcd.read_byte();
    }
}

/// Write `data` to consecutive columns of `page` starting at `x`.
fn write_run(lcd: &mut Lcd, x: u8, page: u8, data: &[u8]) {
    let y = page << PAGE_BITS;
    for (i, &value) in data.iter().enumerate() {
        let column = x + i as u8;
        if i == 0 || local_x(column) == 0 {
            lcd.set_address(column, y);
        }
        lcd.write_byte(value);
    }
}

/// Per-page pixel masks gathered by point-wise primitives (lines, circle
/// outlines) and flushed as one run per page.
struct PageBatch {
    page: Option<u8>,
    lo: usize,
    hi: usize,
    masks: [u8; GLCD_XPIXELS],
}

impl PageBatch {
    fn new() -> Self {
        PageBatch { page: None, lo: GLCD_XPIXELS, hi: 0, masks: [0; GLCD_XPIXELS] }
    }

    /// Add a pixel, flushing first if it lies on another page.
    fn plot(&mut self, glcd: &mut Glcd, x: u8, y: u8) {
        assert_point(x, y, "plot");
        let page = page_of(y);
        if self.page != Some(page) {
            self.flush(glcd);
            self.page = Some(page);
        }
        self.mark(x, 1 << bit_of(y));
    }

    fn mark(&mut self, x: u8, bits: u8) {
        if bits == 0 {
            return;
        }
        let x = x as usize;
        self.masks[x] |= bits;
        self.lo = self.lo.min(x);
        self.hi = self.hi.max(x);
    }

    /// Merge the gathered masks into the display in the draw color.
    fn flush(&mut self, glcd: &mut Glcd) {
        if let Some(page) = self.page {
            if self.lo <= self.hi {
                let color = glcd.color;
                let (lo, masks) = (self.lo, &self.masks);
                glcd.update_run(lo as u8, page, self.hi - lo + 1, true, |i, old| {
                    merge_color(old, masks[lo + i], color)
                });
            }
        }
        self.masks = [0; GLCD_XPIXELS];
        self.lo = GLCD_XPIXELS;
        self.hi = 0;
    }
}

#[track_caller]
fn assert_point(x: u8, y: u8, op: &str) {
    assert!(
        (x as usize) < GLCD_XPIXELS && (y as usize) < GLCD_YPIXELS,
        "glcd: {} at ({}, {}) outside display",
        op,
        x,
        y
    );
}

#[track_caller]
fn assert_region(x: u8, y: u8, width: usize, height: usize, op: &str) {
    assert!(
        x as usize + width <= GLCD_XPIXELS && y as usize + height <= GLCD_YPIXELS,
        "glcd: {} {}x{} at ({}, {}) outside display",
        op,
        width,
        height,
        x,
        y
    );
}
