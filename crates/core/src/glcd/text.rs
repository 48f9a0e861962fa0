//! Scaled text in three orientations.
//!
//! A string is first laid out as a sequence of glyph columns (each glyph
//! column repeated `x_scale` times, followed by `x_scale` blank spacing
//! columns). Horizontal text stretches every column by `y_scale` and draws
//! the sequence as a stencil. Vertical text rotates the same sequence by a
//! quarter turn, so the glyph rows become display columns.

use super::Glcd;
use crate::font::{Font, FONT_HEIGHT};
use crate::GLCD_YPIXELS;

/// Text direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Left to right, top-left corner at (x, y)
    Horizontal,
    /// Bottom to top, glyph tops facing left; (x, y) is the bottom-left corner
    BottomUp,
    /// Top to bottom, glyph tops facing right; (x, y) is the top-right corner
    TopDown,
}

/// Glyph columns of `text` with horizontal scaling and spacing applied.
fn layout(font: Font, text: &str, x_scale: u8) -> Vec<u8> {
    let mut columns = Vec::new();
    for c in text.chars() {
        let glyph = font.glyph(c);
        for &column in glyph.columns() {
            columns.extend(std::iter::repeat(column).take(x_scale as usize));
        }
        columns.extend(std::iter::repeat(0).take(x_scale as usize));
    }
    columns
}

/// Stretch a 5-row glyph column vertically by `y_scale`.
fn stretch(column: u8, y_scale: u8) -> u64 {
    let mut out = 0u64;
    for row in 0..FONT_HEIGHT {
        if column & (1 << row) != 0 {
            let run = (1u64 << y_scale) - 1;
            out |= run << (row * y_scale);
        }
    }
    out
}

impl Glcd {
    /// Draw `text` and return the pixels consumed along the text direction:
    /// the width for horizontal text, the height for vertical text. Every
    /// glyph is followed by one (scaled) blank spacing column.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text(
        &mut self,
        x: u8,
        y: u8,
        font: Font,
        text: &str,
        orientation: Orientation,
        x_scale: u8,
        y_scale: u8,
    ) -> u16 {
        let glyph_height = FONT_HEIGHT as usize * y_scale as usize;
        assert!(
            x_scale > 0 && y_scale > 0 && glyph_height <= GLCD_YPIXELS,
            "glcd: draw_text scale {}x{} invalid",
            x_scale,
            y_scale
        );
        let sequence = layout(font, text, x_scale);
        let length = sequence.len();
        if length == 0 {
            return 0;
        }
        let glyph_height = glyph_height as u8;

        match orientation {
            Orientation::Horizontal => {
                let columns: Vec<u64> = sequence.iter().map(|&c| stretch(c, y_scale)).collect();
                self.stencil(x, y, glyph_height, &columns);
            }
            Orientation::BottomUp | Orientation::TopDown => {
                assert!(
                    length <= GLCD_YPIXELS,
                    "glcd: vertical text of {} pixels does not fit the display",
                    length
                );
                let bottom_up = orientation == Orientation::BottomUp;
                let (left, top) = if bottom_up {
                    (Some(x), y.checked_sub(length as u8 - 1))
                } else {
                    (x.checked_add(1).and_then(|r| r.checked_sub(glyph_height)), Some(y))
                };
                let (left, top) = match (left, top) {
                    (Some(left), Some(top)) => (left, top),
                    _ => panic!("glcd: vertical text at ({}, {}) outside display", x, y),
                };
                let columns: Vec<u64> = (0..glyph_height)
                    .map(|j| {
                        let row = if bottom_up { j / y_scale } else { (glyph_height - 1 - j) / y_scale };
                        let mut bits = 0u64;
                        for t in 0..length {
                            let index = if bottom_up { length - 1 - t } else { t };
                            if sequence[index] & (1 << row) != 0 {
                                bits |= 1 << t;
                            }
                        }
                        bits
                    })
                    .collect();
                self.stencil(left, top, length as u8, &columns);
            }
        }
        length as u16
    }
}
