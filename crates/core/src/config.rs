//! Runtime settings of the emulated clock.

use std::time::Duration;

/// Tick period of the face scheduler on the real clock
pub const DEFAULT_TICK: Duration = Duration::from_millis(75);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmuConfig {
    /// Scheduler tick period, also the per-cycle time budget
    pub tick: Duration,
    /// Draw light-on-dark
    pub inverted: bool,
    /// Alarm time as (hour, minute)
    pub alarm: Option<(u8, u8)>,
    /// Face shown at start
    pub start_face: usize,
    /// Fixed UTC offset for the host clock, local time when `None`
    pub utc_offset_minutes: Option<i32>,
}

impl Default for EmuConfig {
    fn default() -> Self {
        EmuConfig {
            tick: DEFAULT_TICK,
            inverted: false,
            alarm: None,
            start_face: 0,
            utc_offset_minutes: None,
        }
    }
}

/// Parse an `HH:MM` alarm time.
pub fn parse_alarm(text: &str) -> Option<(u8, u8)> {
    let (hour, minute) = text.split_once(':')?;
    let hour: u8 = hour.trim().parse().ok()?;
    let minute: u8 = minute.trim().parse().ok()?;
    (hour < 24 && minute < 60).then_some((hour, minute))
}
