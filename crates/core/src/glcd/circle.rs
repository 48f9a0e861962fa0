//! Midpoint circles, outlined and filled.

use super::{Align, Glcd, PageBatch, Pattern};
use crate::{page_of, GLCD_XPIXELS, GLCD_YPIXELS, PAGE_BITS, PAGE_HEIGHT};

/// Outline dot style. Dots are counted along the outline of each quadrant,
/// starting on the horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircleStyle {
    Full,
    /// Every second point, starting with the first
    HalfEven,
    /// Every second point, starting with the second
    HalfUneven,
    /// Every third point
    Third,
}

impl CircleStyle {
    fn accepts(self, step: usize) -> bool {
        match self {
            CircleStyle::Full => true,
            CircleStyle::HalfEven => step % 2 == 0,
            CircleStyle::HalfUneven => step % 2 == 1,
            CircleStyle::Third => step % 3 == 0,
        }
    }
}

/// Points of one quadrant of a midpoint circle as (dx, dy) offsets, in
/// outline order from (radius, 0) to (0, radius).
fn quadrant_points(radius: u8) -> Vec<(u8, u8)> {
    let mut octant = Vec::with_capacity(radius as usize + 1);
    let (mut x, mut y) = (radius as i16, 0i16);
    let mut err = 1 - radius as i16;
    while x >= y {
        octant.push((x as u8, y as u8));
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
    // second octant runs back from the diagonal, which is not repeated
    let mut points = octant.clone();
    points.extend(octant.iter().rev().filter(|&&(x, y)| x != y).map(|&(x, y)| (y, x)));
    points
}

/// One quadrant as column masks: bit `dy` of entry `dx` is set when
/// (dx, dy) is an outline point drawn in `style`.
fn quadrant(radius: u8, style: CircleStyle) -> Vec<u64> {
    let mut q = vec![0u64; radius as usize + 1];
    for (step, &(dx, dy)) in quadrant_points(radius).iter().enumerate() {
        if style.accepts(step) {
            q[dx as usize] |= 1 << dy;
        }
    }
    q
}

#[track_caller]
fn assert_circle(cx: u8, cy: u8, radius: u8, op: &str) {
    assert!(
        cx >= radius
            && cy >= radius
            && cx as usize + (radius as usize) < GLCD_XPIXELS
            && cy as usize + (radius as usize) < GLCD_YPIXELS,
        "glcd: {} at ({}, {}) radius {} outside display",
        op,
        cx,
        cy,
        radius
    );
}

impl Glcd {
    /// Circle outline around (cx, cy) in the draw color.
    ///
    /// Built one page at a time: for each column offset right of the center
    /// the page's eight rows are tested against the quadrant, and the same
    /// bits are mirrored to the left column.
    pub fn draw_circle(&mut self, cx: u8, cy: u8, radius: u8, style: CircleStyle) {
        assert_circle(cx, cy, radius, "draw_circle");
        let q = quadrant(radius, style);
        let top = cy - radius;
        let bottom = cy + radius;
        let mut batch = PageBatch::new();
        for page in page_of(top)..=page_of(bottom) {
            batch.flush(self);
            batch.page = Some(page);
            let first = page << PAGE_BITS;
            for dx in 0..=radius {
                let mut bits = 0u8;
                for b in 0..PAGE_HEIGHT as u8 {
                    let y = first + b;
                    if y < top || y > bottom {
                        continue;
                    }
                    let dy = y.abs_diff(cy);
                    if q[dx as usize] & (1 << dy) != 0 {
                        bits |= 1 << b;
                    }
                }
                batch.mark(cx + dx, bits);
                batch.mark(cx - dx, bits);
            }
        }
        batch.flush(self);
    }

    /// Filled circle around (cx, cy).
    ///
    /// The circle is split into vertical strips; neighbouring columns of
    /// equal height are merged into a single rectangle fill. Patterns are
    /// aligned to the display origin so the strips tile.
    pub fn fill_circle(&mut self, cx: u8, cy: u8, radius: u8, pattern: Pattern) {
        assert_circle(cx, cy, radius, "fill_circle");
        let q = quadrant(radius, CircleStyle::Full);
        let heights: Vec<u8> = q.iter().map(|&col| (63 - col.leading_zeros().min(63)) as u8).collect();

        let mut start = 0usize;
        while start < heights.len() {
            let h = heights[start];
            let mut end = start;
            while end + 1 < heights.len() && heights[end + 1] == h {
                end += 1;
            }
            let (a, b) = (start as u8, end as u8);
            let width = b - a + 1;
            self.fill_rect(cx + a, cy - h, width, 2 * h + 1, Align::Auto, pattern);
            // mirror without repeating the center column
            let left_from = a.max(1);
            if b >= left_from {
                self.fill_rect(cx - b, cy - h, b - left_from + 1, 2 * h + 1, Align::Auto, pattern);
            }
            start = end + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(glcd: &Glcd, x: u8, y: u8) -> bool {
        glcd.lcd().byte_at(x, y >> 3) & (1 << (y & 7)) != 0
    }

    fn bytes(glcd: &Glcd) -> Vec<u8> {
        let mut out = Vec::new();
        for page in 0..8 {
            for x in 0..128 {
                out.push(glcd.lcd().byte_at(x, page));
            }
        }
        out
    }

    #[test]
    fn test_quadrant_radius_two() {
        let q = quadrant(2, CircleStyle::Full);
        assert_eq!(q[0], 0b100);
        assert_eq!(q[1], 0b100);
        assert_eq!(q[2], 0b011);
    }

    #[test]
    fn test_outline_extremes() {
        let mut glcd = Glcd::default();
        glcd.draw_circle(64, 32, 10, CircleStyle::Full);
        assert!(pixel(&glcd, 74, 32));
        assert!(pixel(&glcd, 54, 32));
        assert!(pixel(&glcd, 64, 22));
        assert!(pixel(&glcd, 64, 42));
        assert!(!pixel(&glcd, 64, 32));
    }

    #[test]
    fn test_outline_is_symmetric() {
        let mut glcd = Glcd::default();
        glcd.draw_circle(40, 30, 17, CircleStyle::HalfEven);
        for dx in 0..=17u8 {
            for y in 13..=47u8 {
                assert_eq!(pixel(&glcd, 40 + dx, y), pixel(&glcd, 40 - dx, y));
                assert_eq!(pixel(&glcd, 40 + dx, y), pixel(&glcd, 40 + dx, 60 - y));
            }
        }
    }

    #[test]
    fn test_dotted_styles_partition_outline() {
        let mut full = Glcd::default();
        full.draw_circle(30, 30, 12, CircleStyle::Full);
        let mut halves = Glcd::default();
        halves.draw_circle(30, 30, 12, CircleStyle::HalfEven);
        halves.draw_circle(30, 30, 12, CircleStyle::HalfUneven);
        for x in 0..128 {
            for page in 0..8 {
                assert_eq!(full.lcd().byte_at(x, page), halves.lcd().byte_at(x, page));
            }
        }
    }

    #[test]
    fn test_quadrant_points_are_connected() {
        for radius in 1..32u8 {
            let points = quadrant_points(radius);
            assert_eq!(points[0], (radius, 0));
            assert_eq!(*points.last().unwrap(), (0, radius));
            for pair in points.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                assert!(a != b, "radius {} repeats {:?}", radius, a);
                assert!(a.0.abs_diff(b.0) <= 1 && a.1.abs_diff(b.1) <= 1, "radius {}: {:?} -> {:?}", radius, a, b);
            }
        }
    }

    #[test]
    fn test_dotted_styles_alternate_along_outline() {
        for radius in [3u8, 10, 20, 29] {
            let mut even = Glcd::default();
            even.draw_circle(64, 32, radius, CircleStyle::HalfEven);
            let mut uneven = Glcd::default();
            uneven.draw_circle(64, 32, radius, CircleStyle::HalfUneven);
            let mut third = Glcd::default();
            third.draw_circle(64, 32, radius, CircleStyle::Third);

            let points = quadrant_points(radius);
            let lit = |glcd: &Glcd, &(dx, dy): &(u8, u8)| pixel(glcd, 64 + dx, 32 + dy);
            for pair in points.windows(2) {
                assert!(!(lit(&even, &pair[0]) && lit(&even, &pair[1])), "radius {} at {:?}", radius, pair);
                assert!(!(lit(&uneven, &pair[0]) && lit(&uneven, &pair[1])), "radius {} at {:?}", radius, pair);
            }
            for (step, point) in points.iter().enumerate() {
                assert_eq!(lit(&third, point), step % 3 == 0, "radius {} step {}", radius, step);
            }
            let thirds = points.iter().filter(|p| lit(&third, *p)).count();
            assert_eq!(thirds, (points.len() + 2) / 3);
        }
    }

    #[test]
    fn test_fill_covers_outline() {
        let mut glcd = Glcd::default();
        glcd.fill_circle(90, 30, 14, Pattern::Full);
        let mut outline = Glcd::default();
        outline.draw_circle(90, 30, 14, CircleStyle::Full);
        for x in 76..=104 {
            for y in 16..=44 {
                if pixel(&outline, x, y) {
                    assert!(pixel(&glcd, x, y), "({}, {})", x, y);
                }
            }
        }
        assert!(pixel(&glcd, 90, 30));
        assert!(!pixel(&glcd, 90, 15));
        assert!(!pixel(&glcd, 75, 30));
    }

    #[test]
    fn test_inverse_fill_twice_restores() {
        let mut glcd = Glcd::default();
        glcd.draw_line(0, 0, 127, 63);
        let before = bytes(&glcd);
        glcd.fill_circle(64, 32, 20, Pattern::Inverse);
        glcd.fill_circle(64, 32, 20, Pattern::Inverse);
        assert_eq!(before, bytes(&glcd));
    }

    #[test]
    #[should_panic(expected = "outside display")]
    fn test_circle_off_display() {
        Glcd::default().draw_circle(5, 32, 6, CircleStyle::Full);
    }
}
