//! LCD state files.
//!
//! Captures both controllers (registers, bus state, image) and the chip
//! select lines so a session can be resumed with identical display content.
//!
//! ## File format
//!
//! ```text
//! +------------------+
//! | Magic "MCLS"     |  4 bytes
//! +------------------+
//! | Format version   |  u32 little-endian (currently 1)
//! +------------------+
//! | Controller count |  u8
//! +------------------+
//! | Compressed data  |  deflate-compressed bincode payload
//! +------------------+
//! ```

use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::lcd::LcdState;
use crate::CONTROLLER_COUNT;

/// Magic bytes identifying a Monochron lcd state file.
const MAGIC: &[u8; 4] = b"MCLS";
/// Current state file format version.
const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = 9;

/// Encode a state into the file format.
pub fn encode(state: &LcdState) -> Result<Vec<u8>> {
    let payload = bincode::serialize(state)?;
    let compressed = miniz_oxide::deflate::compress_to_vec(&payload, 6);

    let mut out = Vec::with_capacity(HEADER_LEN + compressed.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.push(CONTROLLER_COUNT as u8);
    out.extend_from_slice(&compressed);
    Ok(out)
}

/// Decode a state, verifying magic, version and geometry.
pub fn decode(data: &[u8]) -> Result<LcdState> {
    if data.len() < HEADER_LEN {
        return Err(Error::InvalidSnapshot("file too small".into()));
    }
    if &data[0..4] != MAGIC {
        return Err(Error::InvalidSnapshot("bad magic".into()));
    }
    let version = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if version != FORMAT_VERSION {
        return Err(Error::InvalidSnapshot(format!(
            "unsupported version {} (expected {})",
            version, FORMAT_VERSION
        )));
    }
    if data[8] as usize != CONTROLLER_COUNT {
        return Err(Error::InvalidSnapshot(format!(
            "{} controllers in file, display has {}",
            data[8], CONTROLLER_COUNT
        )));
    }
    let decompressed = miniz_oxide::inflate::decompress_to_vec(&data[HEADER_LEN..])
        .map_err(|e| Error::Decompress(format!("{:?}", e)))?;
    Ok(bincode::deserialize(&decompressed)?)
}

pub fn save_to_file(state: &LcdState, path: &Path) -> Result<()> {
    let data = encode(state)?;
    std::fs::write(path, &data)?;
    debug!("snapshot: wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

pub fn load_from_file(path: &Path) -> Result<LcdState> {
    let data = std::fs::read(path)?;
    debug!("snapshot: read {} bytes from {}", data.len(), path.display());
    decode(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lcd;

    fn sample_state() -> LcdState {
        let mut lcd = Lcd::new();
        lcd.set_address(100, 40);
        lcd.write_byte(0x5A);
        lcd.write_command(crate::lcd::CMD_START_LINE | 9);
        lcd.to_state()
    }

    #[test]
    fn test_encode_decode() {
        let state = sample_state();
        let data = encode(&state).unwrap();
        assert_eq!(&data[0..4], b"MCLS");
        assert_eq!(decode(&data).unwrap(), state);
    }

    #[test]
    fn test_rejects_bad_header() {
        let mut data = encode(&sample_state()).unwrap();
        assert!(matches!(decode(&data[..5]), Err(Error::InvalidSnapshot(_))));
        data[4] = 7;
        assert!(matches!(decode(&data), Err(Error::InvalidSnapshot(_))));
        data[4] = 1;
        data[8] = 3;
        assert!(matches!(decode(&data), Err(Error::InvalidSnapshot(_))));
        data[0] = b'X';
        assert!(matches!(decode(&data), Err(Error::InvalidSnapshot(_))));
    }

    #[test]
    fn test_rejects_corrupt_payload() {
        let mut data = encode(&sample_state()).unwrap();
        data.truncate(HEADER_LEN + 2);
        assert!(decode(&data).is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("monochron-test-{}.lcd", std::process::id()));
        let state = sample_state();
        save_to_file(&state, &path).unwrap();
        let loaded = load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, state);
    }
}
