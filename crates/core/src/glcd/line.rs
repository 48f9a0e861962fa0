//! Lines and rectangle outlines.

use super::{Glcd, PageBatch};

impl Glcd {
    /// Bresenham line between two inclusive end points in the draw color.
    ///
    /// Points are visited top to bottom so every page is read and written
    /// back once.
    pub fn draw_line(&mut self, x1: u8, y1: u8, x2: u8, y2: u8) {
        let (x1, y1, x2, y2) = if y1 <= y2 { (x1, y1, x2, y2) } else { (x2, y2, x1, y1) };
        let (mut x, mut y) = (x1 as i16, y1 as i16);
        let (x2, y2) = (x2 as i16, y2 as i16);
        let dx = (x2 - x).abs();
        let dy = y2 - y;
        let sx = if x < x2 { 1 } else { -1 };
        let mut err = dx - dy;

        let mut batch = PageBatch::new();
        loop {
            batch.plot(self, x as u8, y as u8);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= -dy {
                err -= dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += 1;
            }
        }
        batch.flush(self);
    }

    /// Rectangle outline with top-left corner (x, y). Zero width or height
    /// draws nothing.
    pub fn draw_rect(&mut self, x: u8, y: u8, width: u8, height: u8) {
        if width == 0 || height == 0 {
            return;
        }
        super::assert_region(x, y, width as usize, height as usize, "draw_rect");
        let right = x + width - 1;
        let bottom = y + height - 1;
        self.draw_line(x, y, right, y);
        self.draw_line(x, bottom, right, bottom);
        if height > 2 {
            self.draw_line(x, y + 1, x, bottom - 1);
            self.draw_line(right, y + 1, right, bottom - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::glcd::{Color, Glcd};
    use crate::sink::{CallbackSink, LcdEvent};
    use crate::Lcd;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_horizontal_line() {
        let mut glcd = Glcd::default();
        glcd.draw_line(60, 9, 67, 9);
        for x in 60..=67 {
            assert_eq!(glcd.lcd().byte_at(x, 1), 0x02);
        }
        assert_eq!(glcd.lcd().byte_at(59, 1), 0);
        assert_eq!(glcd.lcd().byte_at(68, 1), 0);
    }

    #[test]
    fn test_vertical_line_spans_pages() {
        let mut glcd = Glcd::default();
        glcd.draw_line(5, 20, 5, 3);
        assert_eq!(glcd.lcd().byte_at(5, 0), 0xF8);
        assert_eq!(glcd.lcd().byte_at(5, 1), 0xFF);
        assert_eq!(glcd.lcd().byte_at(5, 2), 0x1F);
    }

    #[test]
    fn test_diagonal_line_endpoints() {
        let mut glcd = Glcd::default();
        glcd.draw_line(100, 0, 90, 30);
        assert!(glcd.read_pixel(100, 0));
        assert!(glcd.read_pixel(90, 30));
        let mut lit = 0;
        for x in 85..=105 {
            for y in 0..40 {
                if glcd.read_pixel(x, y) {
                    lit += 1;
                }
            }
        }
        assert_eq!(lit, 31);
    }

    #[test]
    fn test_line_one_write_per_byte() {
        let writes = Rc::new(Cell::new(0));
        let counter = writes.clone();
        let mut lcd = Lcd::new();
        lcd.add_sink(Box::new(CallbackSink::new(move |ev: &LcdEvent| {
            if matches!(ev, LcdEvent::Write { .. }) {
                counter.set(counter.get() + 1);
            }
        })));
        let mut glcd = Glcd::new(lcd);
        glcd.draw_line(0, 0, 7, 7);
        assert_eq!(writes.get(), 8);
        assert_eq!(glcd.lcd().byte_at(3, 0), 0x08);
    }

    #[test]
    fn test_erase_line() {
        let mut glcd = Glcd::default();
        glcd.draw_line(10, 10, 40, 25);
        glcd.set_color(Color::Off);
        glcd.draw_line(10, 10, 40, 25);
        for page in 0..8 {
            for x in 0..128 {
                assert_eq!(glcd.lcd().byte_at(x, page), 0);
            }
        }
    }

    #[test]
    fn test_rect_outline() {
        let mut glcd = Glcd::default();
        glcd.draw_rect(2, 2, 4, 3);
        assert_eq!(glcd.lcd().byte_at(2, 0), 0x1C);
        assert_eq!(glcd.lcd().byte_at(3, 0), 0x14);
        assert_eq!(glcd.lcd().byte_at(5, 0), 0x1C);
        glcd.draw_rect(50, 50, 0, 10);
        assert_eq!(glcd.lcd().byte_at(50, 6), 0);
    }
}
