//! Analog dial with hour, minute and second hands.

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::glcd::{CircleStyle, Glcd, Pattern};
use crate::rtc::ClockTime;
use crate::scheduler::ClockFace;

const CX: u8 = 64;
const CY: u8 = 32;
const DIAL_RADIUS: u8 = 30;
const MARKER_OUTER: f32 = 28.0;
const MARKER_INNER: f32 = 26.0;
const MARKER_INNER_QUARTER: f32 = 23.0;
const HUB_RADIUS: u8 = 2;

/// Hand lengths: hour, minute, second. All end inside the marker ring so
/// erasing a hand never touches the dial.
const HAND_LENGTHS: [f32; 3] = [13.0, 19.0, 21.0];

/// Point at `len` pixels from the center, `fraction` of a turn clockwise
/// from twelve o'clock.
fn polar(fraction: f32, len: f32) -> (u8, u8) {
    let angle = fraction * TAU - FRAC_PI_2;
    let x = CX as f32 + len * angle.cos();
    let y = CY as f32 + len * angle.sin();
    (x.round() as u8, y.round() as u8)
}

fn hand_ends(now: &ClockTime) -> [(u8, u8); 3] {
    let second = now.second as f32 / 60.0;
    let minute = (now.minute as f32 + second) / 60.0;
    let hour = ((now.hour % 12) as f32 + minute) / 12.0;
    [
        polar(hour, HAND_LENGTHS[0]),
        polar(minute, HAND_LENGTHS[1]),
        polar(second, HAND_LENGTHS[2]),
    ]
}

#[derive(Debug, Default)]
pub struct AnalogFace {
    /// End points of the hands currently on screen
    hands: Option<[(u8, u8); 3]>,
    shown_second: Option<u8>,
}

impl AnalogFace {
    pub fn new() -> Self {
        AnalogFace::default()
    }

    fn draw_hands(&mut self, glcd: &mut Glcd, now: &ClockTime) {
        let foreground = glcd.foreground();
        if let Some(old) = self.hands {
            glcd.set_color(glcd.background());
            for (x, y) in old {
                glcd.draw_line(CX, CY, x, y);
            }
        }
        glcd.set_color(foreground);
        let ends = hand_ends(now);
        for (x, y) in ends {
            glcd.draw_line(CX, CY, x, y);
        }
        glcd.fill_circle(CX, CY, HUB_RADIUS, Pattern::Full);
        self.hands = Some(ends);
        self.shown_second = Some(now.second);
    }
}

impl ClockFace for AnalogFace {
    fn name(&self) -> &'static str {
        "analog"
    }

    fn init(&mut self, glcd: &mut Glcd, now: &ClockTime) {
        glcd.set_color(glcd.foreground());
        glcd.draw_circle(CX, CY, DIAL_RADIUS, CircleStyle::Full);
        glcd.draw_circle(CX, CY, DIAL_RADIUS - 1, CircleStyle::Third);
        for mark in 0..12u8 {
            let fraction = mark as f32 / 12.0;
            let inner = if mark % 3 == 0 { MARKER_INNER_QUARTER } else { MARKER_INNER };
            let (x1, y1) = polar(fraction, inner);
            let (x2, y2) = polar(fraction, MARKER_OUTER);
            glcd.draw_line(x1, y1, x2, y2);
        }
        self.hands = None;
        self.draw_hands(glcd, now);
    }

    fn cycle(&mut self, glcd: &mut Glcd, now: &ClockTime) {
        if self.shown_second != Some(now.second) {
            self.draw_hands(glcd, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(hour: u8, minute: u8, second: u8) -> ClockTime {
        ClockTime { hour, minute, second, day: 1, month: 1, year: 2026 }
    }

    #[test]
    fn test_polar() {
        assert_eq!(polar(0.0, 10.0), (64, 22));
        assert_eq!(polar(0.25, 10.0), (74, 32));
        assert_eq!(polar(0.5, 10.0), (64, 42));
    }

    #[test]
    fn test_hands_at_three_oclock() {
        let ends = hand_ends(&time(3, 0, 0));
        assert_eq!(ends[0], (77, 32));
        assert_eq!(ends[1], (64, 13));
        assert_eq!(ends[2], (64, 11));
    }

    #[test]
    fn test_moving_hands_erases_old() {
        let mut glcd = Glcd::default();
        let mut face = AnalogFace::new();
        face.init(&mut glcd, &time(3, 0, 0));
        assert!(glcd.read_pixel(64, 12));
        face.cycle(&mut glcd, &time(3, 0, 15));
        // second hand moved from twelve to three o'clock
        assert!(!glcd.read_pixel(64, 12));
        assert!(glcd.read_pixel(84, 32));
        // dial and markers survive
        assert!(glcd.read_pixel(64, 2));
        assert!(glcd.read_pixel(64, 6));
        assert!(glcd.read_pixel(CX, CY));
    }
}
