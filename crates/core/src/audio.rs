//! Sound output contract.
//!
//! The clock core only asks for "a tone of this frequency for this long";
//! how that becomes sound is the frontend's business.

use std::cell::RefCell;
use std::rc::Rc;

/// Audible output device.
pub trait Beeper {
    fn beep(&mut self, frequency_hz: u16, duration_ms: u16);
}

/// Beeper that discards every request.
#[derive(Debug, Default)]
pub struct SilentBeeper;

impl Beeper for SilentBeeper {
    fn beep(&mut self, _frequency_hz: u16, _duration_ms: u16) {}
}

/// Beeper that records requests, for headless runs and tests. Clones share
/// one log.
#[derive(Debug, Default, Clone)]
pub struct RecordingBeeper {
    beeps: Rc<RefCell<Vec<(u16, u16)>>>,
}

impl RecordingBeeper {
    /// Recorded (frequency, duration) pairs in request order.
    pub fn beeps(&self) -> Vec<(u16, u16)> {
        self.beeps.borrow().clone()
    }
}

impl Beeper for RecordingBeeper {
    fn beep(&mut self, frequency_hz: u16, duration_ms: u16) {
        self.beeps.borrow_mut().push((frequency_hz, duration_ms));
    }
}

/// Alarm tone frequency
pub const ALARM_FREQUENCY_HZ: u16 = 2000;
/// Alarm tone length per second
pub const ALARM_DURATION_MS: u16 = 250;
