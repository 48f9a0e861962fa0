//! Large digital time with date line and seconds bar.

use super::{centered, date_text};
use crate::font::{Font, FONT_HEIGHT};
use crate::glcd::{Align, Glcd, Orientation, Pattern};
use crate::rtc::ClockTime;
use crate::scheduler::ClockFace;
use crate::GLCD_XPIXELS;

const TIME_X_SCALE: u8 = 3;
const TIME_Y_SCALE: u8 = 5;
const TIME_Y: u8 = 6;
const DATE_Y: u8 = 38;
const BAR_X: u8 = 14;
const BAR_Y: u8 = 50;
const BAR_WIDTH: u8 = 100;
const BAR_HEIGHT: u8 = 7;

/// Digital clock. Only fields whose value changed are redrawn.
#[derive(Debug, Default)]
pub struct DigitalFace {
    shown: Option<ClockTime>,
}

impl DigitalFace {
    pub fn new() -> Self {
        DigitalFace { shown: None }
    }

    fn draw_time(glcd: &mut Glcd, now: &ClockTime) {
        let text = format!("{:02}:{:02}", now.hour, now.minute);
        let width = Font::Mono5x5.text_width(&text) * TIME_X_SCALE as u16;
        let x = centered(0, GLCD_XPIXELS as u8, width);
        glcd.draw_text(x, TIME_Y, Font::Mono5x5, &text, Orientation::Horizontal, TIME_X_SCALE, TIME_Y_SCALE);
    }

    fn draw_date(glcd: &mut Glcd, now: &ClockTime) {
        let text = date_text(now);
        glcd.fill_rect(0, DATE_Y, GLCD_XPIXELS as u8, FONT_HEIGHT, Align::Auto, Pattern::Blank);
        let x = centered(0, GLCD_XPIXELS as u8, Font::Prop5x5.text_width(&text));
        glcd.draw_text(x, DATE_Y, Font::Prop5x5, &text, Orientation::Horizontal, 1, 1);
    }

    fn draw_bar(glcd: &mut Glcd, second: u8) {
        let inner = BAR_WIDTH - 2;
        let filled = (second.min(59) as u16 * inner as u16 / 59) as u8;
        let (x, y, h) = (BAR_X + 1, BAR_Y + 1, BAR_HEIGHT - 2);
        glcd.fill_rect(x, y, filled, h, Align::Auto, Pattern::Half);
        glcd.fill_rect(x + filled, y, inner - filled, h, Align::Auto, Pattern::Blank);
    }
}

impl ClockFace for DigitalFace {
    fn name(&self) -> &'static str {
        "digital"
    }

    fn init(&mut self, glcd: &mut Glcd, now: &ClockTime) {
        glcd.set_color(glcd.foreground());
        Self::draw_time(glcd, now);
        Self::draw_date(glcd, now);
        glcd.draw_rect(BAR_X, BAR_Y, BAR_WIDTH, BAR_HEIGHT);
        Self::draw_bar(glcd, now.second);
        self.shown = Some(*now);
    }

    fn cycle(&mut self, glcd: &mut Glcd, now: &ClockTime) {
        let Some(shown) = self.shown else {
            return self.init(glcd, now);
        };
        glcd.set_color(glcd.foreground());
        if !shown.same_minute(now) {
            Self::draw_time(glcd, now);
        }
        if (shown.day, shown.month, shown.year) != (now.day, now.month, now.year) {
            Self::draw_date(glcd, now);
        }
        if shown.second != now.second {
            Self::draw_bar(glcd, now.second);
        }
        self.shown = Some(*now);
    }
}
