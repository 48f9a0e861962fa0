//! PNG screenshots of the displayed LCD image.
//!
//! Writes 8-bit grayscale PNGs; the image data is zlib-compressed with
//! miniz_oxide.

use crate::image::LcdImage;
use crate::{GLCD_XPIXELS, GLCD_YPIXELS};

const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Encode the displayed image at an integer scale. Lit pixels are dark, the
/// way they appear on the glass.
pub fn encode_lcd(image: &LcdImage, scale: u32) -> Vec<u8> {
    let scale = scale.max(1) as usize;
    let (width, height) = (GLCD_XPIXELS * scale, GLCD_YPIXELS * scale);
    let mut levels = Vec::with_capacity(width * height);
    for row in 0..GLCD_YPIXELS {
        let mut line = Vec::with_capacity(width);
        for x in 0..GLCD_XPIXELS {
            let level = if image.displayed_pixel(x as u8, row as u8) { 0x20 } else { 0xC8 };
            line.extend(std::iter::repeat(level).take(scale));
        }
        for _ in 0..scale {
            levels.extend_from_slice(&line);
        }
    }
    encode_gray(width as u32, height as u32, &levels)
}

/// Encode row-major 8-bit gray levels as a PNG file.
fn encode_gray(width: u32, height: u32, levels: &[u8]) -> Vec<u8> {
    let mut png = Vec::with_capacity(levels.len() / 4 + 128);
    png.extend_from_slice(&SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(0); // color type: grayscale
    ihdr.extend_from_slice(&[0, 0, 0]); // compression, filter, interlace
    write_chunk(&mut png, b"IHDR", &ihdr);

    let mut raw = Vec::with_capacity((width as usize + 1) * height as usize);
    for line in levels.chunks(width as usize) {
        raw.push(0); // filter: None
        raw.extend_from_slice(line);
    }
    let zlib = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
    write_chunk(&mut png, b"IDAT", &zlib);
    write_chunk(&mut png, b"IEND", &[]);
    png
}

fn write_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc32(chunk_type, data).to_be_bytes());
}

// CRC-32 (PNG/zlib)
fn crc32(chunk_type: &[u8], data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &b in chunk_type.iter().chain(data.iter()) {
        crc ^= b as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::LcdEvent;

    #[test]
    fn test_crc32_known_value() {
        // CRC of an empty IEND chunk
        assert_eq!(crc32(b"IEND", &[]), 0xAE42_6082);
    }

    #[test]
    fn test_png_layout() {
        let mut image = LcdImage::new();
        image.apply(&LcdEvent::Display { controller: 0, on: true });
        image.apply(&LcdEvent::Write { x: 0, page: 0, value: 0x01 });
        let png = encode_lcd(&image, 2);
        assert_eq!(&png[0..8], &SIGNATURE);
        assert_eq!(&png[12..16], b"IHDR");
        assert_eq!(u32::from_be_bytes([png[16], png[17], png[18], png[19]]), 256);
        assert_eq!(u32::from_be_bytes([png[20], png[21], png[22], png[23]]), 128);
        assert_eq!(&png[png.len() - 8..png.len() - 4], b"IEND");
    }

    #[test]
    fn test_idat_inflates_to_rows() {
        let image = LcdImage::new();
        let png = encode_lcd(&image, 1);
        // IDAT follows the 8-byte signature and 25-byte IHDR chunk
        let idat = 8 + 25;
        let len = u32::from_be_bytes([png[idat], png[idat + 1], png[idat + 2], png[idat + 3]]) as usize;
        assert_eq!(&png[idat + 4..idat + 8], b"IDAT");
        let raw = miniz_oxide::inflate::decompress_to_vec_zlib(&png[idat + 8..idat + 8 + len]).unwrap();
        assert_eq!(raw.len(), (GLCD_XPIXELS + 1) * GLCD_YPIXELS);
        assert_eq!(raw[0], 0);
        assert_eq!(raw[1], 0xC8);
    }
}
