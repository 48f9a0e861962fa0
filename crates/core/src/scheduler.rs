//! Cooperative face scheduler.
//!
//! One face is active at a time. Every tick the scheduler hands it the
//! current time and the graphics context; the face must return within the
//! tick period. Heavy work is split across ticks by the face itself (see
//! [`ClockFace::cycle`]). There is no preemption: an overrun is only logged.

use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::error::Result;
use crate::glcd::Glcd;
use crate::rtc::ClockTime;

/// A clock face driven by the [`Scheduler`].
pub trait ClockFace {
    fn name(&self) -> &'static str;

    /// Draw the face from scratch on a cleared display.
    fn init(&mut self, glcd: &mut Glcd, now: &ClockTime);

    /// Update the face for the current time. Called once per tick after
    /// `init`. A face may keep a phase counter and spread expensive work
    /// over several calls.
    fn cycle(&mut self, glcd: &mut Glcd, now: &ClockTime);
}

pub struct Scheduler {
    faces: Vec<Box<dyn ClockFace>>,
    active: usize,
    /// Active face still has to be initialised
    pending_init: bool,
    /// Time budget per tick
    budget: Duration,
    /// Ticks run since creation
    pub ticks: u64,
    /// Ticks that exceeded the budget
    pub overruns: u64,
}

impl Scheduler {
    pub fn new(budget: Duration) -> Self {
        Scheduler {
            faces: Vec::new(),
            active: 0,
            pending_init: true,
            budget,
            ticks: 0,
            overruns: 0,
        }
    }

    pub fn register(&mut self, face: Box<dyn ClockFace>) {
        self.faces.push(face);
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_name(&self) -> Option<&'static str> {
        self.faces.get(self.active).map(|face| face.name())
    }

    /// Switch to face `index`; it is initialised on the next tick.
    pub fn select(&mut self, index: usize) {
        assert!(index < self.faces.len(), "scheduler: face {} out of range ({} registered)", index, self.faces.len());
        self.active = index;
        self.pending_init = true;
        debug!("scheduler: select face {} ({})", index, self.faces[index].name());
    }

    /// Switch to the next face, wrapping around.
    pub fn next_face(&mut self) {
        if !self.faces.is_empty() {
            self.select((self.active + 1) % self.faces.len());
        }
    }

    /// Redraw the active face from scratch on the next tick.
    pub fn restart(&mut self) {
        self.pending_init = true;
    }

    /// Run one tick of the active face.
    ///
    /// Returns the first redraw sink failure raised while the face was
    /// drawing.
    pub fn tick(&mut self, glcd: &mut Glcd, now: &ClockTime) -> Result<()> {
        let Some(face) = self.faces.get_mut(self.active) else {
            return Ok(());
        };
        let start = Instant::now();
        if self.pending_init {
            self.pending_init = false;
            glcd.clear();
            face.init(glcd, now);
        } else {
            face.cycle(glcd, now);
        }
        let elapsed = start.elapsed();
        if elapsed > self.budget {
            self.overruns += 1;
            warn!(
                "scheduler: {} took {:?}, over the {:?} budget",
                face.name(),
                elapsed,
                self.budget
            );
        }
        self.ticks += 1;
        match glcd.lcd_mut().take_sink_error() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sink::{EventQueue, QueueSink};
    use crate::Lcd;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct CountingFace {
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl ClockFace for CountingFace {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn init(&mut self, glcd: &mut Glcd, _now: &ClockTime) {
            glcd.set_pixel(0, 0);
            self.log.borrow_mut().push("init");
        }

        fn cycle(&mut self, _glcd: &mut Glcd, _now: &ClockTime) {
            self.log.borrow_mut().push("cycle");
        }
    }

    fn scheduler_with_faces(n: usize) -> (Scheduler, Rc<RefCell<Vec<&'static str>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new(Duration::from_millis(75));
        for _ in 0..n {
            scheduler.register(Box::new(CountingFace { log: log.clone() }));
        }
        (scheduler, log)
    }

    #[test]
    fn test_init_then_cycle() {
        let (mut scheduler, log) = scheduler_with_faces(1);
        let mut glcd = Glcd::default();
        let now = ClockTime::default();
        for _ in 0..3 {
            scheduler.tick(&mut glcd, &now).unwrap();
        }
        assert_eq!(*log.borrow(), vec!["init", "cycle", "cycle"]);
        assert_eq!(scheduler.ticks, 3);
        assert!(glcd.read_pixel(0, 0));
    }

    #[test]
    fn test_switch_face_reinitialises() {
        let (mut scheduler, log) = scheduler_with_faces(2);
        let mut glcd = Glcd::default();
        let now = ClockTime::default();
        scheduler.tick(&mut glcd, &now).unwrap();
        scheduler.next_face();
        assert_eq!(scheduler.active(), 1);
        scheduler.tick(&mut glcd, &now).unwrap();
        scheduler.next_face();
        assert_eq!(scheduler.active(), 0);
        assert_eq!(*log.borrow(), vec!["init", "init"]);
    }

    #[test]
    fn test_no_faces_is_noop() {
        let mut scheduler = Scheduler::new(Duration::from_millis(75));
        scheduler.next_face();
        assert!(scheduler.tick(&mut Glcd::default(), &ClockTime::default()).is_ok());
        assert_eq!(scheduler.ticks, 0);
    }

    #[test]
    fn test_tick_surfaces_sink_error() {
        let (mut scheduler, _) = scheduler_with_faces(1);
        let queue = EventQueue::bounded(2);
        let mut lcd = Lcd::new();
        lcd.add_sink(Box::new(QueueSink::new(queue.clone())));
        let mut glcd = Glcd::new(lcd);
        // the two display-on events fill the queue; the first pixel overflows it
        let result = scheduler.tick(&mut glcd, &ClockTime::default());
        assert!(matches!(result, Err(Error::QueueFull(2))));
        queue.drain().unwrap();
        assert!(scheduler.tick(&mut glcd, &ClockTime::default()).is_ok());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_select_out_of_range() {
        let (mut scheduler, _) = scheduler_with_faces(1);
        scheduler.select(1);
    }
}
