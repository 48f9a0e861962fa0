//! Redraw notifications for visualization backends.
//!
//! The display controller reports every register or image change as an
//! [`LcdEvent`], in the order the bus operations were issued. Backends attach
//! through [`LcdSink`]:
//!
//! - [`CallbackSink`]: delivers synchronously on the bus thread (terminal UI)
//! - [`QueueSink`]: pushes into an [`EventQueue`] that another thread drains
//!   (window UI running beside the bus thread)

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::image::LcdImage;

/// A change in controller state that a visualization has to mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcdEvent {
    Display { controller: u8, on: bool },
    StartLine { controller: u8, line: u8 },
    /// Image byte written at logical column `x` (0–127) and page (0–7)
    Write { x: u8, page: u8, value: u8 },
}

/// Receiver of redraw notifications.
pub trait LcdSink {
    fn deliver(&mut self, event: &LcdEvent) -> Result<()>;
}

/// Sink that calls a closure for every event.
pub struct CallbackSink<F> {
    callback: F,
}

impl<F: FnMut(&LcdEvent)> CallbackSink<F> {
    pub fn new(callback: F) -> Self {
        CallbackSink { callback }
    }
}

impl<F: FnMut(&LcdEvent)> LcdSink for CallbackSink<F> {
    fn deliver(&mut self, event: &LcdEvent) -> Result<()> {
        (self.callback)(event);
        Ok(())
    }
}

/// Thread-safe FIFO of redraw events.
///
/// Cloning shares the underlying queue, so one clone goes to the bus thread
/// (inside a [`QueueSink`]) and another stays with the consumer.
#[derive(Clone)]
pub struct EventQueue {
    events: Arc<Mutex<VecDeque<LcdEvent>>>,
    /// Maximum pending events, `None` for unbounded
    capacity: Option<usize>,
}

impl EventQueue {
    pub fn unbounded() -> Self {
        EventQueue { events: Arc::new(Mutex::new(VecDeque::with_capacity(4096))), capacity: None }
    }

    pub fn bounded(capacity: usize) -> Self {
        EventQueue {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: Some(capacity),
        }
    }

    pub fn push(&self, event: LcdEvent) -> Result<()> {
        let mut events = self.events.lock().map_err(|_| Error::QueuePoisoned)?;
        if let Some(capacity) = self.capacity {
            if events.len() >= capacity {
                return Err(Error::QueueFull(events.len()));
            }
        }
        events.try_reserve(1).map_err(|_| Error::QueueFull(events.len()))?;
        events.push_back(event);
        Ok(())
    }

    /// Remove all pending events in delivery order.
    pub fn drain(&self) -> Result<Vec<LcdEvent>> {
        let mut events = self.events.lock().map_err(|_| Error::QueuePoisoned)?;
        Ok(events.drain(..).collect())
    }

    /// Apply all pending events to `image`. Returns the number applied.
    pub fn drain_into(&self, image: &mut LcdImage) -> Result<usize> {
        let mut events = self.events.lock().map_err(|_| Error::QueuePoisoned)?;
        let n = events.len();
        for event in events.drain(..) {
            image.apply(&event);
        }
        Ok(n)
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sink feeding an [`EventQueue`].
pub struct QueueSink {
    queue: EventQueue,
}

impl QueueSink {
    pub fn new(queue: EventQueue) -> Self {
        QueueSink { queue }
    }
}

impl LcdSink for QueueSink {
    fn deliver(&mut self, event: &LcdEvent) -> Result<()> {
        self.queue.push(*event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_preserves_order() {
        let queue = EventQueue::unbounded();
        let mut sink = QueueSink::new(queue.clone());
        sink.deliver(&LcdEvent::Display { controller: 0, on: true }).unwrap();
        sink.deliver(&LcdEvent::Write { x: 3, page: 1, value: 9 }).unwrap();
        sink.deliver(&LcdEvent::StartLine { controller: 1, line: 4 }).unwrap();
        assert_eq!(queue.len(), 3);
        let events = queue.drain().unwrap();
        assert_eq!(events[0], LcdEvent::Display { controller: 0, on: true });
        assert_eq!(events[1], LcdEvent::Write { x: 3, page: 1, value: 9 });
        assert_eq!(events[2], LcdEvent::StartLine { controller: 1, line: 4 });
        assert!(queue.is_empty());
    }

    #[test]
    fn test_bounded_queue_full() {
        let queue = EventQueue::bounded(2);
        let ev = LcdEvent::Write { x: 0, page: 0, value: 1 };
        queue.push(ev).unwrap();
        queue.push(ev).unwrap();
        assert!(matches!(queue.push(ev), Err(Error::QueueFull(2))));
    }

    #[test]
    fn test_queue_across_threads() {
        let queue = EventQueue::unbounded();
        let producer = queue.clone();
        let handle = std::thread::spawn(move || {
            let mut sink = QueueSink::new(producer);
            for x in 0..100u8 {
                sink.deliver(&LcdEvent::Write { x, page: 0, value: x }).unwrap();
            }
        });
        handle.join().unwrap();
        let events = queue.drain().unwrap();
        assert_eq!(events.len(), 100);
        for (i, ev) in events.iter().enumerate() {
            assert_eq!(*ev, LcdEvent::Write { x: i as u8, page: 0, value: i as u8 });
        }
    }

    #[test]
    fn test_callback_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = CallbackSink::new(|ev: &LcdEvent| seen.push(*ev));
            sink.deliver(&LcdEvent::Display { controller: 1, on: false }).unwrap();
        }
        assert_eq!(seen, vec![LcdEvent::Display { controller: 1, on: false }]);
    }
}
