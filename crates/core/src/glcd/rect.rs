//! Pattern-filled rectangles.
//!
//! A pattern is a function of a pixel's offset from a virtual origin. The
//! origin comes from the [`Align`] mode, so rectangles sharing an origin
//! tile seamlessly no matter where their edges fall:
//!
//! - `Half`: pixels with an even `vx + vy` sum
//! - `ThirdUp`: `(vx + vy) % 3 == 0`, diagonals rising to the right
//! - `ThirdDown`: `(vy - vx) % 3 == 0`, diagonals falling to the right
//!
//! Pattern pixels take the draw color and the remaining pixels its inverse.
//! `Inverse` flips existing content and ignores the draw color.

use super::{assert_region, page_mask, Color, Glcd};
use crate::{page_of, PAGE_BITS};

/// Fill pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Full,
    Half,
    ThirdUp,
    ThirdDown,
    Inverse,
    Blank,
}

/// Pattern origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Top-left corner of the rectangle
    Top,
    /// Bottom-left corner of the rectangle
    Bottom,
    /// Display origin (0, 0)
    Auto,
}

/// Pattern bits of the byte at column offset `vx` whose top row is at
/// row offset `vy_top` from the origin.
fn pattern_byte(pattern: Pattern, vx: i16, vy_top: i16) -> u8 {
    match pattern {
        Pattern::Full => 0xFF,
        Pattern::Blank | Pattern::Inverse => 0x00,
        Pattern::Half => {
            if (vx + vy_top).rem_euclid(2) == 0 {
                0x55
            } else {
                0xAA
            }
        }
        Pattern::ThirdUp => {
            let phase = (3 - (vx + vy_top).rem_euclid(3)) % 3;
            (0x49u16 << phase) as u8
        }
        Pattern::ThirdDown => {
            let phase = (vx - vy_top).rem_euclid(3);
            (0x49u16 << phase) as u8
        }
    }
}

impl Glcd {
    /// Fill a `width`×`height` rectangle at (x, y) with `pattern`. Zero width
    /// or height draws nothing.
    pub fn fill_rect(&mut self, x: u8, y: u8, width: u8, height: u8, align: Align, pattern: Pattern) {
        if width == 0 || height == 0 {
            return;
        }
        assert_region(x, y, width as usize, height as usize, "fill_rect");
        let bottom = y + height - 1;
        let (origin_x, origin_y) = match align {
            Align::Top => (x as i16, y as i16),
            Align::Bottom => (x as i16, bottom as i16),
            Align::Auto => (0, 0),
        };
        let invert = self.color == Color::Off;

        for page in page_of(y)..=page_of(bottom) {
            let mask = page_mask(page, y, bottom);
            let vy_top = ((page << PAGE_BITS) as i16) - origin_y;
            let read = mask != 0xFF || pattern == Pattern::Inverse;
            self.update_run(x, page, width as usize, read, |i, old| {
                if pattern == Pattern::Inverse {
                    return old ^ mask;
                }
                let vx = x as i16 + i as i16 - origin_x;
                let bits = pattern_byte(pattern, vx, vy_top);
                let bits = if invert { !bits } else { bits };
                (old & !mask) | (bits & mask)
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(glcd: &Glcd, x: u8, y: u8) -> bool {
        glcd.lcd().byte_at(x, y >> 3) & (1 << (y & 7)) != 0
    }

    #[test]
    fn test_full_partial_pages() {
        let mut glcd = Glcd::default();
        glcd.fill_rect(2, 1, 5, 10, Align::Auto, Pattern::Full);
        for x in 2..7 {
            assert_eq!(glcd.lcd().byte_at(x, 0), 0xFE);
            assert_eq!(glcd.lcd().byte_at(x, 1), 0x07);
        }
        assert_eq!(glcd.lcd().byte_at(1, 0), 0);
        assert_eq!(glcd.lcd().byte_at(7, 0), 0);
    }

    #[test]
    fn test_half_pattern_is_checkerboard() {
        let mut glcd = Glcd::default();
        glcd.fill_rect(10, 3, 9, 13, Align::Top, Pattern::Half);
        for x in 10..19 {
            for y in 3..16 {
                let expected = (x - 10 + y - 3) % 2 == 0;
                assert_eq!(pixel(&glcd, x, y), expected, "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_third_patterns() {
        let mut glcd = Glcd::default();
        glcd.fill_rect(0, 0, 12, 12, Align::Auto, Pattern::ThirdUp);
        glcd.fill_rect(20, 5, 12, 12, Align::Auto, Pattern::ThirdDown);
        for x in 0..12u8 {
            for y in 0..12u8 {
                assert_eq!(pixel(&glcd, x, y), (x + y) % 3 == 0, "up ({}, {})", x, y);
            }
        }
        for x in 20..32i16 {
            for y in 5..17i16 {
                assert_eq!(
                    pixel(&glcd, x as u8, y as u8),
                    (y - x).rem_euclid(3) == 0,
                    "down ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_bottom_alignment_anchors_last_row() {
        let mut glcd = Glcd::default();
        glcd.fill_rect(0, 0, 4, 5, Align::Bottom, Pattern::Half);
        // (0, 4) is the origin and therefore lit
        assert!(pixel(&glcd, 0, 4));
        assert!(!pixel(&glcd, 0, 3));
        assert!(pixel(&glcd, 1, 3));
    }

    #[test]
    fn test_inverse_flips() {
        let mut glcd = Glcd::default();
        glcd.set_pixel(3, 3);
        glcd.fill_rect(0, 0, 8, 8, Align::Top, Pattern::Inverse);
        assert!(!pixel(&glcd, 3, 3));
        assert!(pixel(&glcd, 4, 3));
        glcd.fill_rect(0, 0, 8, 8, Align::Top, Pattern::Inverse);
        assert!(pixel(&glcd, 3, 3));
        assert!(!pixel(&glcd, 4, 3));
    }

    #[test]
    fn test_off_color_inverts_pattern() {
        let mut glcd = Glcd::default();
        glcd.set_color(Color::Off);
        glcd.fill_rect(0, 0, 2, 8, Align::Auto, Pattern::Blank);
        assert_eq!(glcd.lcd().byte_at(0, 0), 0xFF);
        glcd.fill_rect(0, 0, 2, 8, Align::Auto, Pattern::Full);
        assert_eq!(glcd.lcd().byte_at(1, 0), 0x00);
    }

    #[test]
    fn test_zero_size_is_noop() {
        let mut glcd = Glcd::default();
        glcd.fill_rect(0, 0, 0, 8, Align::Auto, Pattern::Full);
        glcd.fill_rect(0, 0, 8, 0, Align::Auto, Pattern::Full);
        assert_eq!(glcd.lcd().byte_at(0, 0), 0);
    }

    #[test]
    #[should_panic(expected = "outside display")]
    fn test_fill_outside_display() {
        Glcd::default().fill_rect(120, 0, 9, 1, Align::Auto, Pattern::Full);
    }
}
