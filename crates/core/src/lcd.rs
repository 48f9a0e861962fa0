//! Dual KS0108 display controller: chip select, command decoding, addressing.
//!
//! Two [`Controller`] chips sit side by side to form the 128×64 logical
//! display. Exactly one chip is selected at a time; command bytes are decoded
//! into state machine events and routed to the selected chip. Changes reported
//! by a chip are forwarded to every attached [`LcdSink`] in issue order.
//!
//! ## Command encoding
//!
//! ```text
//! 01xx xxxx   set column (cursor x), payload 0–63
//! 1011 1xxx   set page (cursor y), payload 0–7
//! 0011 111x   display off/on
//! 11xx xxxx   set start line, payload 0–63
//! ```
//!
//! Any other byte is a decode fault and panics.

use log::{debug, trace};

use crate::controller::{Controller, ControllerState, Event, Response, State};
use crate::error::{Error, Result};
use crate::sink::{LcdEvent, LcdSink};
use crate::{controller_of, local_x, page_of, CONTROLLER_COUNT, CONTROLLER_WIDTH, GLCD_XPIXELS, GLCD_YPIXELS};
use serde::{Deserialize, Serialize};

pub const CMD_SET_X: u8 = 0x40;
pub const CMD_SET_Y: u8 = 0xB8;
pub const CMD_DISPLAY: u8 = 0x3E;
pub const CMD_START_LINE: u8 = 0xC0;

/// Serializable copy of the whole display controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LcdState {
    pub controllers: Vec<ControllerState>,
    pub chip_select: Vec<bool>,
}

/// Dual-controller display
pub struct Lcd {
    controllers: [Controller; CONTROLLER_COUNT],
    /// Chip select lines, one per controller (true = asserted)
    chip_select: [bool; CONTROLLER_COUNT],
    /// Logical cursor mirror: column 0–127 and page 0–7
    cursor_x: u8,
    cursor_page: u8,
    sinks: Vec<Box<dyn LcdSink>>,
    /// First sink failure since the last `take_sink_error`
    sink_error: Option<Error>,
    /// Debug: bus operations since the last counter reset
    pub dbg_cmd_count: u32,
    pub dbg_read_count: u32,
    pub dbg_write_count: u32,
}

impl Default for Lcd {
    fn default() -> Self {
        Self::new()
    }
}

impl Lcd {
    /// Both chips in reset state with no chip selected.
    pub fn new() -> Self {
        Lcd {
            controllers: [Controller::new(), Controller::new()],
            chip_select: [false; CONTROLLER_COUNT],
            cursor_x: 0,
            cursor_page: 0,
            sinks: Vec::new(),
            sink_error: None,
            dbg_cmd_count: 0,
            dbg_read_count: 0,
            dbg_write_count: 0,
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn LcdSink>) {
        self.sinks.push(sink);
    }

    /// Take the first sink delivery failure, if any occurred.
    pub fn take_sink_error(&mut self) -> Option<Error> {
        self.sink_error.take()
    }

    /// Decode a command byte into a state machine event.
    pub fn decode_command(byte: u8) -> Event {
        if byte & 0xC0 == CMD_SET_X {
            Event::SetCursorX(byte & 0x3F)
        } else if byte & 0xF8 == CMD_SET_Y {
            Event::SetCursorY(byte & 0x07)
        } else if byte & 0xFE == CMD_DISPLAY {
            Event::SetDisplay(byte & 0x01 != 0)
        } else if byte & 0xC0 == CMD_START_LINE {
            Event::SetStartLine(byte & 0x3F)
        } else {
            panic!("lcd: cannot decode command byte 0x{:02X}", byte);
        }
    }

    /// Assert the chip select line of one controller only.
    pub fn select_controller(&mut self, index: usize) {
        assert!(index < CONTROLLER_COUNT, "lcd: select controller {} out of range", index);
        if !self.chip_select[index] {
            debug!("lcd: select controller {}", index);
        }
        self.chip_select = [false; CONTROLLER_COUNT];
        self.chip_select[index] = true;
    }

    /// Drive the chip select lines directly, as the pin-level stub layer does.
    pub fn set_chip_select(&mut self, lines: [bool; CONTROLLER_COUNT]) {
        self.chip_select = lines;
    }

    /// Index of the selected controller. Both or neither selected is fatal.
    pub fn active(&self) -> usize {
        let mut selected = self.chip_select.iter().enumerate().filter(|(_, &cs)| cs);
        match (selected.next(), selected.next()) {
            (Some((index, _)), None) => index,
            _ => panic!("lcd: chip select fault (cs={:?})", self.chip_select),
        }
    }

    /// Decode and execute a command byte on the selected controller.
    pub fn write_command(&mut self, byte: u8) {
        let event = Self::decode_command(byte);
        trace!("lcd: cmd 0x{:02X} -> {:?}", byte, event);
        self.dbg_cmd_count = self.dbg_cmd_count.wrapping_add(1);
        self.dispatch(event);
    }

    /// Point the bus at logical pixel (x, y): selects the owning controller,
    /// sets its column, and sets its page when that differs from the chip's
    /// current page.
    pub fn set_address(&mut self, x: u8, y: u8) {
        assert!(
            (x as usize) < GLCD_XPIXELS && (y as usize) < GLCD_YPIXELS,
            "lcd: set address ({}, {}) outside display",
            x,
            y
        );
        let index = controller_of(x);
        if !self.chip_select[index] || self.chip_select.iter().filter(|&&cs| cs).count() != 1 {
            self.select_controller(index);
        }
        let page = page_of(y);
        self.write_command(CMD_SET_X | local_x(x));
        if self.controllers[index].registers().cursor_y != page {
            self.write_command(CMD_SET_Y | page);
        }
        self.cursor_x = x;
        self.cursor_page = page;
    }

    /// Read the data bus. The first read after addressing or writing is a
    /// dummy read and returns stale data.
    pub fn read_byte(&mut self) -> u8 {
        self.dbg_read_count = self.dbg_read_count.wrapping_add(1);
        self.dispatch(Event::ReadByte).value
    }

    /// Write the data bus at the current cursor, advancing it.
    pub fn write_byte(&mut self, value: u8) {
        self.dbg_write_count = self.dbg_write_count.wrapping_add(1);
        self.dispatch(Event::WriteByte(value));
    }

    /// Logical cursor mirror as (column, page).
    pub fn cursor(&self) -> (u8, u8) {
        (self.cursor_x, self.cursor_page)
    }

    pub fn controller(&self, index: usize) -> &Controller {
        &self.controllers[index]
    }

    /// Image byte at logical column `x` and `page`, bypassing the bus.
    pub fn byte_at(&self, x: u8, page: u8) -> u8 {
        self.controllers[controller_of(x)].byte_at(local_x(x), page)
    }

    fn dispatch(&mut self, event: Event) -> Response {
        let index = self.active();
        let before = *self.controllers[index].registers();
        let prior = self.controllers[index].state();
        let response = self.controllers[index].handle(event);
        let regs = *self.controllers[index].registers();

        if matches!(event, Event::WriteByte(_)) || (event == Event::ReadByte && prior == State::Read) {
            self.cursor_x = (index * CONTROLLER_WIDTH) as u8 + regs.cursor_x;
            self.cursor_page = regs.cursor_y;
        }

        if response.changed {
            let notice = match event {
                Event::SetDisplay(on) => LcdEvent::Display { controller: index as u8, on },
                Event::SetStartLine(line) => LcdEvent::StartLine { controller: index as u8, line },
                Event::WriteByte(value) => LcdEvent::Write {
                    x: (index * CONTROLLER_WIDTH) as u8 + before.cursor_x,
                    page: before.cursor_y,
                    value,
                },
                _ => return response,
            };
            self.notify(notice);
        }
        response
    }

    fn notify(&mut self, event: LcdEvent) {
        for sink in self.sinks.iter_mut() {
            if let Err(e) = sink.deliver(&event) {
                if self.sink_error.is_none() {
                    self.sink_error = Some(e);
                }
            }
        }
    }

    /// Send the full controller state to all sinks, e.g. after a sink was
    /// attached late or a state file was loaded.
    pub fn resync_sinks(&mut self) {
        for index in 0..CONTROLLER_COUNT {
            let regs = *self.controllers[index].registers();
            self.notify(LcdEvent::Display { controller: index as u8, on: regs.display_on });
            self.notify(LcdEvent::StartLine { controller: index as u8, line: regs.start_line });
        }
        for page in 0..crate::CONTROLLER_PAGES as u8 {
            for x in 0..GLCD_XPIXELS as u8 {
                let value = self.byte_at(x, page);
                self.notify(LcdEvent::Write { x, page, value });
            }
        }
    }

    pub fn dbg_reset_counters(&mut self) {
        self.dbg_cmd_count = 0;
        self.dbg_read_count = 0;
        self.dbg_write_count = 0;
        for chip in self.controllers.iter_mut() {
            chip.dbg_reset_counters();
        }
    }

    pub fn to_state(&self) -> LcdState {
        LcdState {
            controllers: self.controllers.iter().map(|c| c.to_state()).collect(),
            chip_select: self.chip_select.to_vec(),
        }
    }

    /// Restore controller state and resync attached sinks.
    pub fn restore(&mut self, state: &LcdState) -> Result<()> {
        if state.controllers.len() != CONTROLLER_COUNT || state.chip_select.len() != CONTROLLER_COUNT {
            return Err(Error::InvalidSnapshot(format!(
                "expected {} controllers, found {}",
                CONTROLLER_COUNT,
                state.controllers.len()
            )));
        }
        let selected = state.chip_select.iter().filter(|&&cs| cs).count();
        if selected != 1 {
            return Err(Error::InvalidSnapshot(format!(
                "{} chip select lines asserted, expected exactly one",
                selected
            )));
        }
        let mut restored = [Controller::new(), Controller::new()];
        for (chip, saved) in restored.iter_mut().zip(state.controllers.iter()) {
            chip.restore(saved)?;
        }
        self.controllers = restored;
        self.chip_select.copy_from_slice(&state.chip_select);
        if let Some(index) = state.chip_select.iter().position(|&cs| cs) {
            let regs = self.controllers[index].registers();
            self.cursor_x = (index * CONTROLLER_WIDTH) as u8 + regs.cursor_x;
            self.cursor_page = regs.cursor_y;
        }
        debug!("lcd: state restored");
        self.resync_sinks();
        Ok(())
    }

    /// Bus state of a controller, for diagnostics.
    pub fn controller_state(&self, index: usize) -> State {
        self.controllers[index].state()
    }
}
