//! Built-in 5×5 fonts.
//!
//! Glyphs are stored as column bytes, bit 0 = top row, covering the 96
//! printable ASCII codes 0x20–0x7F (0x7F is a solid block). The monospace
//! table holds five columns per glyph. The proportional table holds
//! variable-length records located through [`PROP5X5_INDEX`]; the top three
//! bits of a record's first byte give its width.

/// Glyph height in pixels.
pub const FONT_HEIGHT: u8 = 5;

const FIRST_CHAR: u8 = 0x20;
const LAST_CHAR: u8 = 0x7F;

/// Font selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Mono5x5,
    Prop5x5,
}

/// One glyph: up to five column bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub columns: [u8; 5],
    pub width: u8,
}

impl Glyph {
    pub fn columns(&self) -> &[u8] {
        &self.columns[..self.width as usize]
    }
}

impl Font {
    /// Glyph for `c`; characters outside the table render as `?`.
    pub fn glyph(self, c: char) -> Glyph {
        let code = match u8::try_from(c) {
            Ok(b) if (FIRST_CHAR..=LAST_CHAR).contains(&b) => b,
            _ => b'?',
        };
        let index = (code - FIRST_CHAR) as usize;
        let mut columns = [0u8; 5];
        match self {
            Font::Mono5x5 => {
                columns.copy_from_slice(&MONO5X5[index * 5..index * 5 + 5]);
                Glyph { columns, width: 5 }
            }
            Font::Prop5x5 => {
                let start = PROP5X5_INDEX[index] as usize;
                let width = PROP5X5[start] >> 5;
                let end = start + width as usize;
                columns[0] = PROP5X5[start] & 0x1F;
                columns[1..width as usize].copy_from_slice(&PROP5X5[start + 1..end]);
                Glyph { columns, width }
            }
        }
    }

    /// Unscaled pixel width of `text`, one spacing column per glyph included.
    /// Saturates at `u16::MAX`.
    pub fn text_width(self, text: &str) -> u16 {
        text.chars()
            .fold(0u16, |width, c| width.saturating_add(self.glyph(c).width as u16 + 1))
    }
}

/// Monospace 5×5 font, 5 column bytes per glyph from 0x20.
pub static MONO5X5: [u8; 480] = [
    0x00, 0x00, 0x00, 0x00, 0x00, // ' '
    0x00, 0x00, 0x17, 0x00, 0x00, // '!'
    0x00, 0x03, 0x00, 0x03, 0x00, // '"'
    0x0A, 0x1F, 0x0A, 0x1F, 0x0A, // '#'
    0x12, 0x15, 0x1F, 0x15, 0x09, // '$'
    0x13, 0x0B, 0x04, 0x1A, 0x19, // '%'
    0x0A, 0x15, 0x15, 0x0A, 0x10, // '&'
    0x00, 0x00, 0x03, 0x00, 0x00, // "'"
    0x00, 0x00, 0x0E, 0x11, 0x00, // '('
    0x00, 0x11, 0x0E, 0x00, 0x00, // ')'
    0x15, 0x0E, 0x1F, 0x0E, 0x15, // '*'
    0x00, 0x04, 0x0E, 0x04, 0x00, // '+'
    0x00, 0x10, 0x08, 0x00, 0x00, // ','
    0x00, 0x04, 0x04, 0x04, 0x00, // '-'
    0x00, 0x00, 0x10, 0x00, 0x00, // '.'
    0x10, 0x08, 0x04, 0x02, 0x01, // '/'
    0x0E, 0x19, 0x15, 0x13, 0x0E, // '0'
    0x00, 0x12, 0x1F, 0x10, 0x00, // '1'
    0x19, 0x15, 0x15, 0x15, 0x12, // '2'
    0x11, 0x11, 0x15, 0x15, 0x0A, // '3'
    0x07, 0x04, 0x04, 0x1F, 0x04, // '4'
    0x17, 0x15, 0x15, 0x15, 0x09, // '5'
    0x0E, 0x15, 0x15, 0x15, 0x08, // '6'
    0x01, 0x01, 0x19, 0x05, 0x03, // '7'
    0x0A, 0x15, 0x15, 0x15, 0x0A, // '8'
    0x02, 0x15, 0x15, 0x15, 0x0E, // '9'
    0x00, 0x00, 0x0A, 0x00, 0x00, // ':'
    0x00, 0x10, 0x0A, 0x00, 0x00, // ';'
    0x00, 0x04, 0x0A, 0x11, 0x00, // '<'
    0x00, 0x0A, 0x0A, 0x0A, 0x00, // '='
    0x00, 0x11, 0x0A, 0x04, 0x00, // '>'
    0x02, 0x01, 0x15, 0x05, 0x02, // '?'
    0x0E, 0x11, 0x1F, 0x0B, 0x06, // '@'
    0x1E, 0x05, 0x05, 0x05, 0x1E, // 'A'
    0x1F, 0x15, 0x15, 0x15, 0x0A, // 'B'
    0x0E, 0x11, 0x11, 0x11, 0x11, // 'C'
    0x1F, 0x11, 0x11, 0x11, 0x0E, // 'D'
    0x1F, 0x15, 0x15, 0x15, 0x11, // 'E'
    0x1F, 0x05, 0x05, 0x05, 0x01, // 'F'
    0x0E, 0x11, 0x11, 0x15, 0x0D, // 'G'
    0x1F, 0x04, 0x04, 0x04, 0x1F, // 'H'
    0x00, 0x11, 0x1F, 0x11, 0x00, // 'I'
    0x08, 0x10, 0x11, 0x0F, 0x01, // 'J'
    0x1F, 0x04, 0x0A, 0x11, 0x00, // 'K'
    0x1F, 0x10, 0x10, 0x10, 0x10, // 'L'
    0x1F, 0x02, 0x04, 0x02, 0x1F, // 'M'
    0x1F, 0x02, 0x04, 0x08, 0x1F, // 'N'
    0x0E, 0x11, 0x11, 0x11, 0x0E, // 'O'
    0x1F, 0x05, 0x05, 0x05, 0x02, // 'P'
    0x0E, 0x11, 0x15, 0x09, 0x16, // 'Q'
    0x1F, 0x05, 0x05, 0x0D, 0x12, // 'R'
    0x12, 0x15, 0x15, 0x15, 0x09, // 'S'
    0x01, 0x01, 0x1F, 0x01, 0x01, // 'T'
    0x0F, 0x10, 0x10, 0x10, 0x0F, // 'U'
    0x07, 0x08, 0x10, 0x08, 0x07, // 'V'
    0x1F, 0x08, 0x04, 0x08, 0x1F, // 'W'
    0x11, 0x0A, 0x04, 0x0A, 0x11, // 'X'
    0x01, 0x02, 0x1C, 0x02, 0x01, // 'Y'
    0x11, 0x19, 0x15, 0x13, 0x11, // 'Z'
    0x00, 0x1F, 0x11, 0x11, 0x00, // '['
    0x01, 0x02, 0x04, 0x08, 0x10, // '\\'
    0x00, 0x11, 0x11, 0x1F, 0x00, // ']'
    0x04, 0x02, 0x01, 0x02, 0x04, // '^'
    0x10, 0x10, 0x10, 0x10, 0x10, // '_'
    0x00, 0x01, 0x02, 0x00, 0x00, // '`'
    0x0C, 0x12, 0x12, 0x0E, 0x10, // 'a'
    0x1F, 0x14, 0x14, 0x08, 0x00, // 'b'
    0x0C, 0x12, 0x12, 0x12, 0x00, // 'c'
    0x08, 0x14, 0x14, 0x1F, 0x00, // 'd'
    0x0C, 0x16, 0x16, 0x14, 0x00, // 'e'
    0x04, 0x1E, 0x05, 0x01, 0x00, // 'f'
    0x02, 0x15, 0x15, 0x0F, 0x00, // 'g'
    0x1F, 0x04, 0x04, 0x18, 0x00, // 'h'
    0x00, 0x1D, 0x00, 0x00, 0x00, // 'i'
    0x10, 0x10, 0x0D, 0x00, 0x00, // 'j'
    0x1F, 0x04, 0x04, 0x1A, 0x00, // 'k'
    0x00, 0x0F, 0x10, 0x00, 0x00, // 'l'
    0x1E, 0x02, 0x1C, 0x02, 0x1C, // 'm'
    0x1E, 0x02, 0x02, 0x1C, 0x00, // 'n'
    0x0C, 0x12, 0x12, 0x0C, 0x00, // 'o'
    0x1E, 0x0A, 0x0A, 0x04, 0x00, // 'p'
    0x04, 0x0A, 0x0A, 0x1E, 0x00, // 'q'
    0x1E, 0x04, 0x02, 0x02, 0x00, // 'r'
    0x14, 0x16, 0x1A, 0x0A, 0x00, // 's'
    0x02, 0x0F, 0x12, 0x10, 0x00, // 't'
    0x0E, 0x10, 0x10, 0x1E, 0x00, // 'u'
    0x06, 0x08, 0x10, 0x08, 0x06, // 'v'
    0x0E, 0x10, 0x0C, 0x10, 0x0E, // 'w'
    0x12, 0x0C, 0x0C, 0x12, 0x00, // 'x'
    0x02, 0x14, 0x14, 0x0E, 0x00, // 'y'
    0x12, 0x1A, 0x16, 0x12, 0x00, // 'z'
    0x00, 0x04, 0x1B, 0x11, 0x00, // '{'
    0x00, 0x00, 0x1F, 0x00, 0x00, // '|'
    0x00, 0x11, 0x1B, 0x04, 0x00, // '}'
    0x04, 0x02, 0x04, 0x08, 0x04, // '~'
    0x1F, 0x1F, 0x1F, 0x1F, 0x1F, // DEL
];

/// Proportional 5×5 font. First byte of each glyph: width in bits 5–7,
/// first column in bits 0–4.
pub static PROP5X5: [u8; 390] = [
    0x60, 0x00, 0x00, // ' '
    0x37, // '!'
    0x63, 0x00, 0x03, // '"'
    0xAA, 0x1F, 0x0A, 0x1F, 0x0A, // '#'
    0xB2, 0x15, 0x1F, 0x15, 0x09, // '$'
    0xB3, 0x0B, 0x04, 0x1A, 0x19, // '%'
    0xAA, 0x15, 0x15, 0x0A, 0x10, // '&'
    0x23, // "'"
    0x4E, 0x11, // '('
    0x51, 0x0E, // ')'
    0xB5, 0x0E, 0x1F, 0x0E, 0x15, // '*'
    0x64, 0x0E, 0x04, // '+'
    0x50, 0x08, // ','
    0x64, 0x04, 0x04, // '-'
    0x30, // '.'
    0xB0, 0x08, 0x04, 0x02, 0x01, // '/'
    0xAE, 0x19, 0x15, 0x13, 0x0E, // '0'
    0x72, 0x1F, 0x10, // '1'
    0xB9, 0x15, 0x15, 0x15, 0x12, // '2'
    0xB1, 0x11, 0x15, 0x15, 0x0A, // '3'
    0xA7, 0x04, 0x04, 0x1F, 0x04, // '4'
    0xB7, 0x15, 0x15, 0x15, 0x09, // '5'
    0xAE, 0x15, 0x15, 0x15, 0x08, // '6'
    0xA1, 0x01, 0x19, 0x05, 0x03, // '7'
    0xAA, 0x15, 0x15, 0x15, 0x0A, // '8'
    0xA2, 0x15, 0x15, 0x15, 0x0E, // '9'
    0x2A, // ':'
    0x50, 0x0A, // ';'
    0x64, 0x0A, 0x11, // '<'
    0x6A, 0x0A, 0x0A, // '='
    0x71, 0x0A, 0x04, // '>'
    0xA2, 0x01, 0x15, 0x05, 0x02, // '?'
    0xAE, 0x11, 0x1F, 0x0B, 0x06, // '@'
    0xBE, 0x05, 0x05, 0x05, 0x1E, // 'A'
    0xBF, 0x15, 0x15, 0x15, 0x0A, // 'B'
    0xAE, 0x11, 0x11, 0x11, 0x11, // 'C'
    0xBF, 0x11, 0x11, 0x11, 0x0E, // 'D'
    0xBF, 0x15, 0x15, 0x15, 0x11, // 'E'
    0xBF, 0x05, 0x05, 0x05, 0x01, // 'F'
    0xAE, 0x11, 0x11, 0x15, 0x0D, // 'G'
    0xBF, 0x04, 0x04, 0x04, 0x1F, // 'H'
    0x71, 0x1F, 0x11, // 'I'
    0xA8, 0x10, 0x11, 0x0F, 0x01, // 'J'
    0x9F, 0x04, 0x0A, 0x11, // 'K'
    0xBF, 0x10, 0x10, 0x10, 0x10, // 'L'
    0xBF, 0x02, 0x04, 0x02, 0x1F, // 'M'
    0xBF, 0x02, 0x04, 0x08, 0x1F, // 'N'
    0xAE, 0x11, 0x11, 0x11, 0x0E, // 'O'
    0xBF, 0x05, 0x05, 0x05, 0x02, // 'P'
    0xAE, 0x11, 0x15, 0x09, 0x16, // 'Q'
    0xBF, 0x05, 0x05, 0x0D, 0x12, // 'R'
    0xB2, 0x15, 0x15, 0x15, 0x09, // 'S'
    0xA1, 0x01, 0x1F, 0x01, 0x01, // 'T'
    0xAF, 0x10, 0x10, 0x10, 0x0F, // 'U'
    0xA7, 0x08, 0x10, 0x08, 0x07, // 'V'
    0xBF, 0x08, 0x04, 0x08, 0x1F, // 'W'
    0xB1, 0x0A, 0x04, 0x0A, 0x11, // 'X'
    0xA1, 0x02, 0x1C, 0x02, 0x01, // 'Y'
    0xB1, 0x19, 0x15, 0x13, 0x11, // 'Z'
    0x7F, 0x11, 0x11, // '['
    0xA1, 0x02, 0x04, 0x08, 0x10, // '\\'
    0x71, 0x11, 0x1F, // ']'
    0xA4, 0x02, 0x01, 0x02, 0x04, // '^'
    0xB0, 0x10, 0x10, 0x10, 0x10, // '_'
    0x41, 0x02, // '`'
    0xAC, 0x12, 0x12, 0x0E, 0x10, // 'a'
    0x9F, 0x14, 0x14, 0x08, // 'b'
    0x8C, 0x12, 0x12, 0x12, // 'c'
    0x88, 0x14, 0x14, 0x1F, // 'd'
    0x8C, 0x16, 0x16, 0x14, // 'e'
    0x84, 0x1E, 0x05, 0x01, // 'f'
    0x82, 0x15, 0x15, 0x0F, // 'g'
    0x9F, 0x04, 0x04, 0x18, // 'h'
    0x3D, // 'i'
    0x70, 0x10, 0x0D, // 'j'
    0x9F, 0x04, 0x04, 0x1A, // 'k'
    0x4F, 0x10, // 'l'
    0xBE, 0x02, 0x1C, 0x02, 0x1C, // 'm'
    0x9E, 0x02, 0x02, 0x1C, // 'n'
    0x8C, 0x12, 0x12, 0x0C, // 'o'
    0x9E, 0x0A, 0x0A, 0x04, // 'p'
    0x84, 0x0A, 0x0A, 0x1E, // 'q'
    0x9E, 0x04, 0x02, 0x02, // 'r'
    0x94, 0x16, 0x1A, 0x0A, // 's'
    0x82, 0x0F, 0x12, 0x10, // 't'
    0x8E, 0x10, 0x10, 0x1E, // 'u'
    0xA6, 0x08, 0x10, 0x08, 0x06, // 'v'
    0xAE, 0x10, 0x0C, 0x10, 0x0E, // 'w'
    0x92, 0x0C, 0x0C, 0x12, // 'x'
    0x82, 0x14, 0x14, 0x0E, // 'y'
    0x92, 0x1A, 0x16, 0x12, // 'z'
    0x64, 0x1B, 0x11, // '{'
    0x3F, // '|'
    0x71, 0x1B, 0x04, // '}'
    0xA4, 0x02, 0x04, 0x08, 0x04, // '~'
    0xBF, 0x1F, 0x1F, 0x1F, 0x1F, // DEL
];

/// Offset of each proportional glyph in [`PROP5X5`].
pub static PROP5X5_INDEX: [u16; 96] = [
    0, 3, 4, 7, 12, 17, 22, 27, 28, 30, 32, 37,
    40, 42, 45, 46, 51, 56, 59, 64, 69, 74, 79, 84,
    89, 94, 99, 100, 102, 105, 108, 111, 116, 121, 126, 131,
    136, 141, 146, 151, 156, 161, 164, 169, 173, 178, 183, 188,
    193, 198, 203, 208, 213, 218, 223, 228, 233, 238, 243, 248,
    251, 256, 259, 264, 269, 271, 276, 280, 284, 288, 292, 296,
    300, 304, 305, 308, 312, 314, 319, 323, 327, 331, 335, 339,
    343, 347, 351, 356, 361, 365, 369, 373, 376, 377, 380, 385,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_glyph() {
        let g = Font::Mono5x5.glyph('1');
        assert_eq!(g.width, 5);
        assert_eq!(g.columns, [0x00, 0x12, 0x1F, 0x10, 0x00]);
    }

    #[test]
    fn test_prop_widths() {
        assert_eq!(Font::Prop5x5.glyph('1').width, 3);
        assert_eq!(Font::Prop5x5.glyph('M').width, 5);
        assert_eq!(Font::Prop5x5.glyph('i').width, 1);
        assert_eq!(Font::Prop5x5.glyph(' ').width, 3);
        assert_eq!(Font::Prop5x5.glyph(' ').columns(), &[0, 0, 0]);
        assert_eq!(Font::Prop5x5.glyph('1').columns(), &[0x12, 0x1F, 0x10]);
    }

    #[test]
    fn test_prop_index_consistent() {
        for i in 0..95 {
            let start = PROP5X5_INDEX[i] as usize;
            let width = (PROP5X5[start] >> 5) as usize;
            assert!((1..=5).contains(&width));
            assert_eq!(PROP5X5_INDEX[i + 1] as usize, start + width);
        }
    }

    #[test]
    fn test_unknown_char_is_question_mark() {
        assert_eq!(Font::Mono5x5.glyph('é'), Font::Mono5x5.glyph('?'));
        assert_eq!(Font::Prop5x5.glyph('\n'), Font::Prop5x5.glyph('?'));
    }

    #[test]
    fn test_text_width() {
        assert_eq!(Font::Prop5x5.text_width("12:34"), 24);
        assert_eq!(Font::Mono5x5.text_width("ab"), 12);
        assert_eq!(Font::Mono5x5.text_width(""), 0);
    }

    #[test]
    fn test_text_width_saturates() {
        let long = "W".repeat(20_000);
        assert_eq!(Font::Mono5x5.text_width(&long), u16::MAX);
        assert_eq!(Font::Prop5x5.text_width(&long), u16::MAX);
    }
}
