//! Clock faces built on the graphics library.

mod analog;
mod banner;
mod digital;

pub use analog::AnalogFace;
pub use banner::BannerFace;
pub use digital::DigitalFace;

use crate::rtc::ClockTime;
use crate::scheduler::ClockFace;

const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Built-in faces in switching order.
pub fn default_faces() -> Vec<Box<dyn ClockFace>> {
    vec![Box::new(DigitalFace::new()), Box::new(AnalogFace::new()), Box::new(BannerFace::new())]
}

/// `18 Oct 2026`
fn date_text(now: &ClockTime) -> String {
    let month = MONTHS.get(now.month.saturating_sub(1) as usize).copied().unwrap_or("???");
    format!("{} {} {}", now.day, month, now.year)
}

/// Left edge that centers `width` pixels within `span` pixels starting at
/// `left`.
fn centered(left: u8, span: u8, width: u16) -> u8 {
    left + (span as u16).saturating_sub(width) as u8 / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_text() {
        let now = ClockTime { day: 18, month: 10, year: 2026, ..Default::default() };
        assert_eq!(date_text(&now), "18 Oct 2026");
        let bad = ClockTime { month: 0, ..now };
        assert_eq!(date_text(&bad), "18 ??? 2026");
    }

    #[test]
    fn test_centered() {
        assert_eq!(centered(0, 128, 90), 19);
        assert_eq!(centered(10, 20, 40), 10);
    }

    #[test]
    fn test_default_faces_names() {
        let names: Vec<_> = default_faces().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["digital", "analog", "banner"]);
    }
}
