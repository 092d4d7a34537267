//! # Character cells of the MAX7456
//!
//! A glyph is 12 x 18 pixels with 2 bits per pixel, stored as 54 bytes: 18 rows of 3 bytes
//! with 4 pixels each. The leftmost pixel of a byte sits in bits 7..6.
//!
//! The same 54 bytes can be looked at as a flat byte array, as rows of 3 bytes or pixel by
//! pixel. These are only views on the one array, byte `i` is row `i / 3`, byte `i % 3` of that
//! row.
//!
//! Font tables in flash are a sequence of 54 byte records. Some memories can't store 0xFF
//! literally, so tables use 0x55 instead and `Glyph::from_table` translates it back.

use core::fmt;

/// bytes per glyph
pub const GLYPH_SIZE: usize = 54;
/// pixel rows per glyph
pub const GLYPH_ROWS: usize = 18;
/// bytes per pixel row
pub const BYTES_PER_ROW: usize = 3;
/// pixels per row
pub const GLYPH_WIDTH: usize = BYTES_PER_ROW * PIXELS_PER_BYTE;

const PIXELS_PER_BYTE: usize = 4;

/// byte value font tables use in place of 0xFF
pub const TABLE_ESCAPE: u8 = 0x55;

/// Value of a single glyph pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Pixel {
    Black = 0b00,
    /// shows the input video, or gray with internal sync
    Transparent = 0b01,
    White = 0b10,
    /// transparent on the chip as well, kept to not lose any bits
    Reserved = 0b11,
}

impl Pixel {
    /// the pixel for the lower 2 bits of `bits`
    pub fn from_bits(bits: u8) -> Pixel {
        match bits & 0b11 {
            0b00 => Pixel::Black,
            0b01 => Pixel::Transparent,
            0b10 => Pixel::White,
            _ => Pixel::Reserved,
        }
    }
}

/// One 12x18 character as stored in the character memory
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    bytes: [u8; GLYPH_SIZE],
}

impl Glyph {
    /// create a glyph from its flat byte representation
    pub const fn new(bytes: [u8; GLYPH_SIZE]) -> Glyph {
        Glyph { bytes }
    }

    /// a glyph with all pixels transparent
    pub const fn transparent() -> Glyph {
        Glyph {
            bytes: [0b0101_0101; GLYPH_SIZE],
        }
    }

    /// Read glyph `index` from a font table of consecutive 54 byte records.
    ///
    /// Every 0x55 in the table is read as 0xFF. Returns `None` if the table is too short.
    pub fn from_table(table: &[u8], index: usize) -> Option<Glyph> {
        let start = index.checked_mul(GLYPH_SIZE)?;
        let record = table.get(start..start.checked_add(GLYPH_SIZE)?)?;

        let mut bytes = [0u8; GLYPH_SIZE];
        for (byte, stored) in bytes.iter_mut().zip(record) {
            *byte = unescape_table_byte(*stored);
        }
        Some(Glyph { bytes })
    }

    /// the flat 54 bytes
    pub fn as_bytes(&self) -> &[u8; GLYPH_SIZE] {
        &self.bytes
    }

    /// the flat 54 bytes, by value
    pub fn to_bytes(self) -> [u8; GLYPH_SIZE] {
        self.bytes
    }

    /// create a glyph from 18 rows of 3 packed bytes
    pub fn from_rows(rows: &[[u8; BYTES_PER_ROW]; GLYPH_ROWS]) -> Glyph {
        let mut bytes = [0u8; GLYPH_SIZE];
        for (chunk, row) in bytes.chunks_exact_mut(BYTES_PER_ROW).zip(rows.iter()) {
            chunk.copy_from_slice(row);
        }
        Glyph { bytes }
    }

    /// the 18 rows of 3 packed bytes
    pub fn rows(&self) -> [[u8; BYTES_PER_ROW]; GLYPH_ROWS] {
        let mut rows = [[0u8; BYTES_PER_ROW]; GLYPH_ROWS];
        for (row, chunk) in rows.iter_mut().zip(self.bytes.chunks_exact(BYTES_PER_ROW)) {
            row.copy_from_slice(chunk);
        }
        rows
    }

    /// the 3 packed bytes of row `y`, `None` if `y` is out of range
    pub fn row(&self, y: usize) -> Option<[u8; BYTES_PER_ROW]> {
        if y >= GLYPH_ROWS {
            return None;
        }
        let start = y * BYTES_PER_ROW;
        let mut row = [0u8; BYTES_PER_ROW];
        row.copy_from_slice(&self.bytes[start..start + BYTES_PER_ROW]);
        Some(row)
    }

    /// pixel at column `x` (0..12) and row `y` (0..18), `None` if out of range
    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        let (index, shift) = pixel_position(x, y)?;
        Some(Pixel::from_bits(self.bytes[index] >> shift))
    }

    /// set the pixel at column `x` and row `y`, out of range coordinates are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: Pixel) {
        if let Some((index, shift)) = pixel_position(x, y) {
            let byte = &mut self.bytes[index];
            *byte = (*byte & !(0b11 << shift)) | ((pixel as u8) << shift);
        }
    }

    /// all 12 pixels of row `y`, left to right
    pub fn pixel_row(&self, y: usize) -> Option<[Pixel; GLYPH_WIDTH]> {
        let mut pixels = [Pixel::Black; GLYPH_WIDTH];
        for (x, pixel) in pixels.iter_mut().enumerate() {
            *pixel = self.pixel(x, y)?;
        }
        Some(pixels)
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Glyph::transparent()
    }
}

impl From<[u8; GLYPH_SIZE]> for Glyph {
    fn from(bytes: [u8; GLYPH_SIZE]) -> Self {
        Glyph::new(bytes)
    }
}

impl From<Glyph> for [u8; GLYPH_SIZE] {
    fn from(glyph: Glyph) -> Self {
        glyph.bytes
    }
}

impl fmt::Debug for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Glyph").field("bytes", &&self.bytes[..]).finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Glyph {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Glyph {{ bytes: {=[u8]:x} }}", &self.bytes[..])
    }
}

// Draws the glyph like a terminal would: '#' black, '*' white, ' ' transparent, framed by a
// dashed line above and below.
impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "------------")?;
        for y in 0..GLYPH_ROWS {
            for x in 0..GLYPH_WIDTH {
                let c = match self.pixel(x, y) {
                    Some(Pixel::Black) => '#',
                    Some(Pixel::White) => '*',
                    _ => ' ',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "------------")
    }
}

/// translate a byte stored in a font table into the byte sent to the chip
pub fn unescape_table_byte(stored: u8) -> u8 {
    if stored == TABLE_ESCAPE {
        0xFF
    } else {
        stored
    }
}

/// character memory slot of the glyph at column `x`, row `y` of the 16 wide font map
pub fn slot_at(x: u8, y: u8) -> u8 {
    x.wrapping_add(y.wrapping_mul(16))
}

// byte index and bit shift of a pixel
fn pixel_position(x: usize, y: usize) -> Option<(usize, u8)> {
    if x >= GLYPH_WIDTH || y >= GLYPH_ROWS {
        return None;
    }
    let index = y * BYTES_PER_ROW + x / PIXELS_PER_BYTE;
    let shift = (6 - 2 * (x % PIXELS_PER_BYTE)) as u8;
    Some((index, shift))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    fn counting() -> Glyph {
        let mut bytes = [0u8; GLYPH_SIZE];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(37);
        }
        Glyph::new(bytes)
    }

    #[test]
    fn flat_and_row_views_match() {
        let glyph = counting();
        let rows = glyph.rows();
        for i in 0..GLYPH_SIZE {
            assert_eq!(glyph.as_bytes()[i], rows[i / 3][i % 3]);
        }
        assert_eq!(Glyph::from_rows(&rows), glyph);
        assert_eq!(glyph.row(17), Some(rows[17]));
        assert_eq!(glyph.row(18), None);
    }

    #[test]
    fn pixel_order_is_left_to_right() {
        let mut bytes = [0u8; GLYPH_SIZE];
        bytes[3] = 0b10_01_11_00;
        let glyph = Glyph::new(bytes);

        assert_eq!(glyph.pixel(0, 1), Some(Pixel::White));
        assert_eq!(glyph.pixel(1, 1), Some(Pixel::Transparent));
        assert_eq!(glyph.pixel(2, 1), Some(Pixel::Reserved));
        assert_eq!(glyph.pixel(3, 1), Some(Pixel::Black));
        assert_eq!(glyph.pixel(12, 0), None);
        assert_eq!(glyph.pixel(0, 18), None);
    }

    #[test]
    fn set_pixel_only_touches_one_pixel() {
        let mut glyph = Glyph::transparent();
        glyph.set_pixel(5, 17, Pixel::White);

        let bytes = glyph.as_bytes();
        assert_eq!(bytes[52], 0b01_10_01_01);
        assert_eq!(bytes.iter().filter(|b| **b != 0x55).count(), 1);

        glyph.set_pixel(12, 0, Pixel::Black);
        glyph.set_pixel(0, 18, Pixel::Black);
        assert_eq!(glyph.as_bytes().iter().filter(|b| **b != 0x55).count(), 1);
    }

    #[test]
    fn pixels_rebuild_the_bytes() {
        let glyph = counting();
        let mut copy = Glyph::new([0; GLYPH_SIZE]);
        for y in 0..GLYPH_ROWS {
            let row = glyph.pixel_row(y).unwrap();
            for (x, pixel) in row.iter().enumerate() {
                copy.set_pixel(x, y, *pixel);
            }
        }
        assert_eq!(copy, glyph);
    }

    #[test]
    fn table_escape() {
        let mut table = [0u8; GLYPH_SIZE * 2];
        table[GLYPH_SIZE] = 0x55;
        table[GLYPH_SIZE + 1] = 0xAA;
        table[GLYPH_SIZE + 53] = 0x54;

        let glyph = Glyph::from_table(&table, 1).unwrap();
        assert_eq!(glyph.as_bytes()[0], 0xFF);
        assert_eq!(glyph.as_bytes()[1], 0xAA);
        assert_eq!(glyph.as_bytes()[53], 0x54);

        assert_eq!(Glyph::from_table(&table, 2), None);
        assert_eq!(Glyph::from_table(&table[..100], 1), None);
    }

    #[test]
    fn slots() {
        assert_eq!(slot_at(3, 0), 3);
        assert_eq!(slot_at(3, 2), 35);
        assert_eq!(slot_at(15, 15), 255);
    }

    #[test]
    fn display_draws_pixels() {
        let mut glyph = Glyph::transparent();
        glyph.set_pixel(0, 0, Pixel::Black);
        glyph.set_pixel(11, 0, Pixel::White);

        let text = glyph.to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("------------"));
        assert_eq!(lines.next(), Some("#          *"));
        assert_eq!(text.lines().count(), GLYPH_ROWS + 2);
    }
}
