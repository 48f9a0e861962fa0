//! Time sources feeding the clock.
//!
//! The clock only ever sees a [`ClockTime`] tuple. Where it comes from is up
//! to the [`TimeSource`]: the host clock, or a simulated clock that advances
//! by a fixed step per tick for headless runs and tests.

use chrono::{Datelike, FixedOffset, Local, NaiveDateTime, Timelike, Utc};
use log::warn;

/// Wall clock reading as delivered by the RTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl ClockTime {
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        ClockTime {
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
            day: dt.day() as u8,
            month: dt.month() as u8,
            year: dt.year().clamp(0, u16::MAX as i32) as u16,
        }
    }

    /// Same hour and minute.
    pub fn same_minute(&self, other: &ClockTime) -> bool {
        self.hour == other.hour && self.minute == other.minute
    }
}

/// Supplier of the current time, queried once per tick.
pub trait TimeSource {
    fn now(&mut self) -> ClockTime;
}

/// Host wall clock, in local time or at a fixed UTC offset.
pub struct SystemTimeSource {
    offset: Option<FixedOffset>,
}

impl SystemTimeSource {
    pub fn new(utc_offset_minutes: Option<i32>) -> Self {
        let offset = utc_offset_minutes.and_then(|minutes| {
            let offset = minutes.checked_mul(60).and_then(FixedOffset::east_opt);
            if offset.is_none() {
                warn!("rtc: utc offset {} minutes out of range, using local time", minutes);
            }
            offset
        });
        SystemTimeSource { offset }
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&mut self) -> ClockTime {
        let dt = match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
            None => Local::now().naive_local(),
        };
        ClockTime::from_datetime(&dt)
    }
}

/// Clock starting at a given time and advancing `step` per reading.
pub struct SimulatedClock {
    current: NaiveDateTime,
    step: chrono::Duration,
}

impl SimulatedClock {
    pub fn new(start: NaiveDateTime, step: std::time::Duration) -> Self {
        let step = chrono::Duration::from_std(step).unwrap_or_else(|_| chrono::Duration::zero());
        SimulatedClock { current: start, step }
    }

    /// Parse `YYYY-MM-DD HH:MM:SS`.
    pub fn parse_start(text: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").ok()
    }
}

impl TimeSource for SimulatedClock {
    fn now(&mut self) -> ClockTime {
        let time = ClockTime::from_datetime(&self.current);
        if let Some(next) = self.current.checked_add_signed(self.step) {
            self.current = next;
        }
        time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_simulated_clock_advances() {
        let start = SimulatedClock::parse_start("2026-12-31 23:59:59").unwrap();
        let mut clock = SimulatedClock::new(start, Duration::from_millis(500));
        let t0 = clock.now();
        assert_eq!((t0.hour, t0.minute, t0.second), (23, 59, 59));
        assert_eq!((t0.day, t0.month, t0.year), (31, 12, 2026));
        clock.now();
        let t2 = clock.now();
        assert_eq!((t2.hour, t2.minute, t2.second), (0, 0, 0));
        assert_eq!((t2.day, t2.month, t2.year), (1, 1, 2027));
    }

    #[test]
    fn test_parse_start_rejects_garbage() {
        assert!(SimulatedClock::parse_start("noon").is_none());
    }

    #[test]
    fn test_same_minute() {
        let a = ClockTime { hour: 7, minute: 30, second: 0, ..Default::default() };
        let b = ClockTime { second: 59, ..a };
        assert!(a.same_minute(&b));
        assert!(!a.same_minute(&ClockTime { minute: 31, ..a }));
    }

    #[test]
    fn test_huge_utc_offset_falls_back_to_local() {
        let mut source = SystemTimeSource::new(Some(i32::MAX));
        assert!(source.offset.is_none());
        let t = source.now();
        assert!(t.hour < 24 && t.minute < 60);
    }

    #[test]
    fn test_system_time_is_valid() {
        let t = SystemTimeSource::new(Some(0)).now();
        assert!(t.hour < 24 && t.minute < 60 && (1..=12).contains(&t.month));
    }
}
