//! Vertical side banners around a seconds clock with a bouncing bell.
//!
//! Setup is spread over several ticks: each banner, the frame and the
//! first sprite are drawn in separate cycles before the face starts
//! updating the time.

use super::{centered, date_text};
use crate::font::{Font, FONT_HEIGHT};
use crate::glcd::{Align, Bitmap, Glcd, Orientation, Pattern};
use crate::rtc::ClockTime;
use crate::scheduler::ClockFace;

const LEFT_BANNER: &str = "MONOCHRON";
const RIGHT_BANNER: &str = "EMUCHRON";
const FRAME_X: u8 = 8;
const FRAME_WIDTH: u8 = 112;
const TIME_Y: u8 = 6;
const DATE_Y: u8 = 22;
const SPRITE_Y: u8 = 36;
const SPRITE_SIZE: u8 = 16;
const SPRITE_MIN_X: u8 = FRAME_X + 2;
const SPRITE_MAX_X: u8 = FRAME_X + FRAME_WIDTH - 2 - SPRITE_SIZE;

/// 16×16 bell, one word per column, bit 0 at the top
static BELL: [u16; 16] = [
    0x1000, 0x1C00, 0x13E0, 0x1018, 0x1004, 0x1002, 0x5001, 0xD1F9, 0xD1F9, 0x5181, 0x1182, 0x1004, 0x1018,
    0x13E0, 0x1C00, 0x1000,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    LeftBanner,
    RightBanner,
    Frame,
    Sprite,
    Running,
}

#[derive(Debug)]
pub struct BannerFace {
    phase: Phase,
    sprite_x: u8,
    moving_right: bool,
    shown: Option<ClockTime>,
}

impl Default for BannerFace {
    fn default() -> Self {
        Self::new()
    }
}

impl BannerFace {
    pub fn new() -> Self {
        BannerFace { phase: Phase::LeftBanner, sprite_x: SPRITE_MIN_X, moving_right: true, shown: None }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn draw_sprite(&self, glcd: &mut Glcd) {
        glcd.draw_bitmap(self.sprite_x, SPRITE_Y, 0, 0, SPRITE_SIZE, SPRITE_SIZE, &Bitmap::Words(&BELL));
    }

    /// Move the bell one pixel, bouncing off the frame. The stencil covers
    /// the old position except for one trailing column, which is blanked.
    fn step_sprite(&mut self, glcd: &mut Glcd) {
        if self.moving_right && self.sprite_x >= SPRITE_MAX_X {
            self.moving_right = false;
        } else if !self.moving_right && self.sprite_x <= SPRITE_MIN_X {
            self.moving_right = true;
        }
        let trailing = if self.moving_right {
            let column = self.sprite_x;
            self.sprite_x += 1;
            column
        } else {
            self.sprite_x -= 1;
            self.sprite_x + SPRITE_SIZE
        };
        glcd.fill_rect(trailing, SPRITE_Y, 1, SPRITE_SIZE, Align::Auto, Pattern::Blank);
        self.draw_sprite(glcd);
    }

    fn draw_time(glcd: &mut Glcd, now: &ClockTime) {
        let text = format!("{:02}:{:02}:{:02}", now.hour, now.minute, now.second);
        glcd.fill_rect(FRAME_X + 1, TIME_Y, FRAME_WIDTH - 2, FONT_HEIGHT * 2, Align::Auto, Pattern::Blank);
        let x = centered(FRAME_X, FRAME_WIDTH, Font::Prop5x5.text_width(&text) * 2);
        glcd.draw_text(x, TIME_Y, Font::Prop5x5, &text, Orientation::Horizontal, 2, 2);
    }

    fn draw_date(glcd: &mut Glcd, now: &ClockTime) {
        let text = date_text(now);
        glcd.fill_rect(FRAME_X + 1, DATE_Y, FRAME_WIDTH - 2, FONT_HEIGHT, Align::Auto, Pattern::Blank);
        let x = centered(FRAME_X, FRAME_WIDTH, Font::Prop5x5.text_width(&text));
        glcd.draw_text(x, DATE_Y, Font::Prop5x5, &text, Orientation::Horizontal, 1, 1);
    }
}

impl ClockFace for BannerFace {
    fn name(&self) -> &'static str {
        "banner"
    }

    fn init(&mut self, _glcd: &mut Glcd, _now: &ClockTime) {
        *self = BannerFace::new();
    }

    fn cycle(&mut self, glcd: &mut Glcd, now: &ClockTime) {
        glcd.set_color(glcd.foreground());
        self.phase = match self.phase {
            Phase::LeftBanner => {
                glcd.draw_text(1, 60, Font::Mono5x5, LEFT_BANNER, Orientation::BottomUp, 1, 1);
                Phase::RightBanner
            }
            Phase::RightBanner => {
                glcd.draw_text(126, 3, Font::Mono5x5, RIGHT_BANNER, Orientation::TopDown, 1, 1);
                Phase::Frame
            }
            Phase::Frame => {
                glcd.draw_rect(FRAME_X, 0, FRAME_WIDTH, 64);
                glcd.draw_line(FRAME_X, 32, FRAME_X + FRAME_WIDTH - 1, 32);
                Phase::Sprite
            }
            Phase::Sprite => {
                self.draw_sprite(glcd);
                Phase::Running
            }
            Phase::Running => {
                let date_changed = self
                    .shown
                    .map_or(true, |s| (s.day, s.month, s.year) != (now.day, now.month, now.year));
                if self.shown.map_or(true, |s| s != *now) {
                    Self::draw_time(glcd, now);
                }
                if date_changed {
                    Self::draw_date(glcd, now);
                }
                self.shown = Some(*now);
                self.step_sprite(glcd);
                Phase::Running
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time() -> ClockTime {
        ClockTime { hour: 10, minute: 9, second: 8, day: 18, month: 10, year: 2026 }
    }

    #[test]
    fn test_setup_takes_several_ticks() {
        let mut glcd = Glcd::default();
        let mut face = BannerFace::new();
        face.init(&mut glcd, &time());
        let phases: Vec<Phase> = (0..5)
            .map(|_| {
                face.cycle(&mut glcd, &time());
                face.phase()
            })
            .collect();
        assert_eq!(
            phases,
            vec![Phase::RightBanner, Phase::Frame, Phase::Sprite, Phase::Running, Phase::Running]
        );
    }

    #[test]
    fn test_banners_are_vertical() {
        let mut glcd = Glcd::default();
        let mut face = BannerFace::new();
        face.cycle(&mut glcd, &time());
        face.cycle(&mut glcd, &time());
        let left: usize = (0..64).map(|y| (1..6).filter(|&x| glcd.read_pixel(x, y)).count()).sum();
        let right: usize = (0..64).map(|y| (122..127).filter(|&x| glcd.read_pixel(x, y)).count()).sum();
        assert!(left > 0 && right > 0);
        // nothing outside the banner columns yet
        assert!(!(6..122).any(|x| (0..64).any(|y| glcd.read_pixel(x, y))));
    }

    #[test]
    fn test_sprite_bounces() {
        let mut glcd = Glcd::default();
        let mut face = BannerFace::new();
        for _ in 0..4 {
            face.cycle(&mut glcd, &time());
        }
        assert_eq!(face.sprite_x, SPRITE_MIN_X);
        let span = (SPRITE_MAX_X - SPRITE_MIN_X) as usize;
        for _ in 0..span {
            face.cycle(&mut glcd, &time());
        }
        assert_eq!(face.sprite_x, SPRITE_MAX_X);
        face.cycle(&mut glcd, &time());
        assert_eq!(face.sprite_x, SPRITE_MAX_X - 1);
        // no trail left behind the sprite
        for y in SPRITE_Y..SPRITE_Y + SPRITE_SIZE {
            assert!(!glcd.read_pixel(SPRITE_MAX_X + SPRITE_SIZE - 1, y));
            assert!(!glcd.read_pixel(SPRITE_MIN_X, y));
        }
    }
}
