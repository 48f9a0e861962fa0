//! Stencil bitmaps.

use super::{assert_region, Glcd};

/// Column-major bitmap source. Each element is one column, bit 0 at the
/// top; wider elements hold taller images.
#[derive(Debug, Clone, Copy)]
pub enum Bitmap<'a> {
    Bytes(&'a [u8]),
    Words(&'a [u16]),
    Dwords(&'a [u32]),
}

impl Bitmap<'_> {
    /// Number of columns.
    pub fn width(&self) -> usize {
        match self {
            Bitmap::Bytes(data) => data.len(),
            Bitmap::Words(data) => data.len(),
            Bitmap::Dwords(data) => data.len(),
        }
    }

    /// Column height in pixels.
    pub fn height(&self) -> usize {
        match self {
            Bitmap::Bytes(_) => 8,
            Bitmap::Words(_) => 16,
            Bitmap::Dwords(_) => 32,
        }
    }

    fn column(&self, index: usize) -> u64 {
        match self {
            Bitmap::Bytes(data) => data[index] as u64,
            Bitmap::Words(data) => data[index] as u64,
            Bitmap::Dwords(data) => data[index] as u64,
        }
    }
}

impl Glcd {
    /// Draw the `width`×`height` region of `source` starting at
    /// (`x_offset`, `y_offset`) with its top-left corner at (x, y).
    ///
    /// Set bits take the draw color and clear bits its inverse.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_bitmap(
        &mut self,
        x: u8,
        y: u8,
        x_offset: u8,
        y_offset: u8,
        width: u8,
        height: u8,
        source: &Bitmap<'_>,
    ) {
        assert!(
            x_offset as usize + width as usize <= source.width()
                && y_offset as usize + height as usize <= source.height(),
            "glcd: bitmap region {}x{} at ({}, {}) exceeds {}x{} source",
            width,
            height,
            x_offset,
            y_offset,
            source.width(),
            source.height()
        );
        if width == 0 || height == 0 {
            return;
        }
        assert_region(x, y, width as usize, height as usize, "draw_bitmap");
        let keep = (1u64 << height) - 1;
        let columns: Vec<u64> = (0..width as usize)
            .map(|i| (source.column(x_offset as usize + i) >> y_offset) & keep)
            .collect();
        self.stencil(x, y, height, &columns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glcd::Color;

    #[test]
    fn test_byte_bitmap_unaligned() {
        let mut glcd = Glcd::default();
        glcd.draw_bitmap(10, 5, 0, 0, 2, 8, &Bitmap::Bytes(&[0xFF, 0x81]));
        assert_eq!(glcd.lcd().byte_at(10, 0), 0xE0);
        assert_eq!(glcd.lcd().byte_at(10, 1), 0x1F);
        assert_eq!(glcd.lcd().byte_at(11, 0), 0x20);
        assert_eq!(glcd.lcd().byte_at(11, 1), 0x10);
    }

    #[test]
    fn test_stencil_replaces_destination() {
        let mut glcd = Glcd::default();
        glcd.fill_rect(0, 0, 4, 16, crate::glcd::Align::Auto, crate::glcd::Pattern::Full);
        glcd.draw_bitmap(0, 4, 0, 0, 4, 4, &Bitmap::Bytes(&[0x01, 0x00, 0x00, 0x08]));
        assert_eq!(glcd.lcd().byte_at(0, 0), 0x1F);
        assert_eq!(glcd.lcd().byte_at(1, 0), 0x0F);
        assert_eq!(glcd.lcd().byte_at(3, 0), 0x8F);
        assert_eq!(glcd.lcd().byte_at(1, 1), 0xFF);
    }

    #[test]
    fn test_word_bitmap_with_offsets() {
        let mut glcd = Glcd::default();
        let tall = [0x0000u16, 0xF00F, 0x0FF0];
        glcd.draw_bitmap(0, 0, 1, 4, 2, 8, &Bitmap::Words(&tall));
        assert_eq!(glcd.lcd().byte_at(0, 0), 0x00);
        assert_eq!(glcd.lcd().byte_at(1, 0), 0xFF);
        assert_eq!(glcd.lcd().byte_at(2, 0), 0x00);
    }

    #[test]
    fn test_dword_bitmap_off_color() {
        let mut glcd = Glcd::default();
        glcd.set_color(Color::Off);
        glcd.draw_bitmap(64, 0, 0, 0, 1, 32, &Bitmap::Dwords(&[0x0000_FFFF]));
        assert_eq!(glcd.lcd().byte_at(64, 0), 0x00);
        assert_eq!(glcd.lcd().byte_at(64, 2), 0xFF);
        assert_eq!(glcd.lcd().byte_at(64, 3), 0xFF);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn test_region_past_source() {
        Glcd::default().draw_bitmap(0, 0, 1, 0, 2, 8, &Bitmap::Bytes(&[1, 2]));
    }
}
