//! Recoverable error type for the emulator core.
//!
//! Only environment conditions end up here (file I/O, state file decoding,
//! redraw queue exhaustion). Protocol, addressing and chip-select faults are
//! programming errors and panic at the point of detection instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] bincode::Error),
    #[error("decompress error: {0}")]
    Decompress(String),
    #[error("invalid lcd state: {0}")]
    InvalidSnapshot(String),
    #[error("redraw queue full ({0} events pending)")]
    QueueFull(usize),
    #[error("redraw queue poisoned")]
    QueuePoisoned,
}
