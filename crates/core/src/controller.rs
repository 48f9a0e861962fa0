//! KS0108 LCD controller chip emulation.
//!
//! One chip drives a 64×64 pixel half of the Monochron display. The chip keeps
//! a column cursor (x, 0–63), a page cursor (y, 0–7), a display on/off flag and
//! a start line register, plus 64 columns × 8 pages of image memory where each
//! byte packs 8 vertically stacked pixels (bit 0 = topmost).
//!
//! Bus access runs through a small state machine over {Cursor, Read, Write}.
//! A data read issued from the Cursor or Write state is a dummy read: it
//! returns the stale output latch and only arms the Read state. Data appears
//! from the second consecutive read onward. Data reads and writes advance the
//! column cursor, wrapping 63 → 0; the page cursor is never advanced.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{CONTROLLER_HEIGHT, CONTROLLER_PAGES, CONTROLLER_WIDTH};

/// Bus state of a controller chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum State {
    #[default]
    Cursor,
    Read,
    Write,
}

/// A decoded bus operation together with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    SetCursorX(u8),
    SetCursorY(u8),
    SetDisplay(bool),
    SetStartLine(u8),
    ReadByte,
    WriteByte(u8),
}

/// Result of handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Response {
    /// Byte placed on the bus (reads only)
    pub value: u8,
    /// Register or image content actually changed
    pub changed: bool,
}

/// Register file of one chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Registers {
    /// Column within this chip (0–63)
    pub cursor_x: u8,
    /// Page (0–7)
    pub cursor_y: u8,
    pub display_on: bool,
    /// Vertical scroll offset, applied when the image is shown
    pub start_line: u8,
    pub last_byte_read: u8,
    pub last_byte_written: u8,
}

/// Serializable copy of a chip, used by lcd state files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerState {
    pub registers: Registers,
    pub state: State,
    /// Image memory, column-major (`x * CONTROLLER_PAGES + page`)
    pub image: Vec<u8>,
}

/// KS0108 controller chip
#[derive(Debug, Clone)]
pub struct Controller {
    regs: Registers,
    state: State,
    /// Image memory indexed `[x][page]`
    image: [[u8; CONTROLLER_PAGES]; CONTROLLER_WIDTH],
    /// Debug: events handled since the last counter reset
    pub dbg_event_count: u32,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            regs: Registers::default(),
            state: State::Cursor,
            image: [[0; CONTROLLER_PAGES]; CONTROLLER_WIDTH],
            dbg_event_count: 0,
        }
    }

    /// Run one event through the state machine.
    ///
    /// | Event \ State | Cursor              | Read                | Write               |
    /// |---------------|---------------------|---------------------|---------------------|
    /// | SetCursorX    | setX → Cursor       | setX → Cursor       | setX → Cursor       |
    /// | SetCursorY    | setY → Cursor       | setY → Cursor       | setY → Cursor       |
    /// | SetDisplay    | display → Cursor    | display → Read      | display → Write     |
    /// | SetStartLine  | startline → Cursor  | startline → Read    | startline → Write   |
    /// | ReadByte      | dummy read → Read   | read + inc → Read   | dummy read → Read   |
    /// | WriteByte     | write + inc → Write | write + inc → Write | write + inc → Write |
    pub fn handle(&mut self, event: Event) -> Response {
        self.dbg_event_count = self.dbg_event_count.wrapping_add(1);
        let (response, next) = match (self.state, event) {
            (_, Event::SetCursorX(x)) => (self.set_x(x), State::Cursor),
            (_, Event::SetCursorY(y)) => (self.set_y(y), State::Cursor),
            (state, Event::SetDisplay(on)) => (self.set_display(on), state),
            (state, Event::SetStartLine(line)) => (self.set_start_line(line), state),
            (State::Read, Event::ReadByte) => (self.read(), State::Read),
            (State::Cursor | State::Write, Event::ReadByte) => (self.dummy_read(), State::Read),
            (_, Event::WriteByte(value)) => (self.write(value), State::Write),
        };
        self.state = next;
        response
    }

    fn set_x(&mut self, x: u8) -> Response {
        assert!((x as usize) < CONTROLLER_WIDTH, "controller: set x {} out of range", x);
        self.regs.cursor_x = x;
        Response::default()
    }

    fn set_y(&mut self, y: u8) -> Response {
        assert!((y as usize) < CONTROLLER_PAGES, "controller: set y {} out of range", y);
        self.regs.cursor_y = y;
        Response::default()
    }

    fn set_display(&mut self, on: bool) -> Response {
        let changed = self.regs.display_on != on;
        self.regs.display_on = on;
        Response { value: 0, changed }
    }

    fn set_start_line(&mut self, line: u8) -> Response {
        assert!((line as usize) < CONTROLLER_HEIGHT, "controller: start line {} out of range", line);
        let changed = self.regs.start_line != line;
        self.regs.start_line = line;
        Response { value: 0, changed }
    }

    fn dummy_read(&mut self) -> Response {
        Response { value: self.regs.last_byte_read, changed: false }
    }

    fn read(&mut self) -> Response {
        let value = self.image[self.regs.cursor_x as usize][self.regs.cursor_y as usize];
        self.regs.last_byte_read = value;
        self.advance();
        Response { value, changed: false }
    }

    fn write(&mut self, value: u8) -> Response {
        let cell = &mut self.image[self.regs.cursor_x as usize][self.regs.cursor_y as usize];
        let changed = *cell != value;
        *cell = value;
        self.regs.last_byte_written = value;
        self.advance();
        Response { value, changed }
    }

    fn advance(&mut self) {
        self.regs.cursor_x = if self.regs.cursor_x as usize == CONTROLLER_WIDTH - 1 {
            0
        } else {
            self.regs.cursor_x + 1
        };
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Image byte at a chip-local column and page, bypassing the bus.
    pub fn byte_at(&self, x: u8, page: u8) -> u8 {
        self.image[x as usize][page as usize]
    }

    pub fn dbg_reset_counters(&mut self) {
        self.dbg_event_count = 0;
    }

    pub fn to_state(&self) -> ControllerState {
        let mut image = Vec::with_capacity(CONTROLLER_WIDTH * CONTROLLER_PAGES);
        for column in &self.image {
            image.extend_from_slice(column);
        }
        ControllerState { registers: self.regs, state: self.state, image }
    }

    pub fn restore(&mut self, saved: &ControllerState) -> Result<()> {
        if saved.image.len() != CONTROLLER_WIDTH * CONTROLLER_PAGES {
            return Err(Error::InvalidSnapshot(format!(
                "controller image is {} bytes, expected {}",
                saved.image.len(),
                CONTROLLER_WIDTH * CONTROLLER_PAGES
            )));
        }
        let regs = &saved.registers;
        if regs.cursor_x as usize >= CONTROLLER_WIDTH
            || regs.cursor_y as usize >= CONTROLLER_PAGES
            || regs.start_line as usize >= CONTROLLER_HEIGHT
        {
            return Err(Error::InvalidSnapshot(format!("controller registers out of range: {:?}", regs)));
        }
        for (column, chunk) in self.image.iter_mut().zip(saved.image.chunks(CONTROLLER_PAGES)) {
            column.copy_from_slice(chunk);
        }
        self.regs = *regs;
        self.state = saved.state;
        Ok(())
    }
}
