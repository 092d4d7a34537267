//! # Text extensions for the MAX7456 driver
//!
//! The chip shows a grid of 30 columns and 13 (NTSC) or 16 (PAL) rows of characters. Every
//! cell of the display memory holds the number of a glyph slot in the character memory, so
//! "text" is a run of slot numbers. With the usual fonts the slots of the printable ASCII
//! characters are their ASCII codes, so a `&str` can be printed directly.
//!
//! A run is written in auto-increment mode: DMM, DMAH and DMAL once, then one DMDI write per
//! character, and a 0xFF to leave auto-increment mode again. A 0xFF inside the text would end
//! the run early, so text is cut at the first 0xFF.
//!
//! There also is a text cursor, used by the `core::fmt::Write` implementation so the
//! `writeln!()` macro works on the overlay, like on a teletype.
use core::fmt::Error as FmtError;
use core::fmt::Result as FmtResult;
use core::fmt::Write;

use hal::blocking::delay::{DelayMs, DelayUs};
use hal::blocking::spi::{Transfer, Write as SpiWrite};
use hal::digital::v2::OutputPin;
use heapless::{String, Vec};

use crate::{
    display::MAX7456,
    error::OsdError,
    registers::{Dmah, Dmal, Dmdi, Dmm, Register},
    COLUMNS, END_OF_TEXT,
};

/// longest string `format_number` can produce: 255 digits before and after the point
pub const NUMBER_CAPACITY: usize = 2 * 255 + 1;

/// Main trait of the text extension
pub trait TextMode<E> {
    /// Write the slot numbers in `text` to the display memory, starting at (`col`, `row`).
    ///
    /// `blink` and `invert` apply to the whole run. Text longer than the row continues on the
    /// next row.
    fn render_text(
        &mut self,
        text: &[u8],
        col: u8,
        row: u8,
        blink: bool,
        invert: bool,
    ) -> Result<(), E>;

    /// same as `render_text` for a string, characters outside of ASCII become '?'
    fn print_str(&mut self, text: &str, col: u8, row: u8, blink: bool, invert: bool)
        -> Result<(), E>;

    /// Show the glyphs in `slots`, e.g. the icons of a custom font
    fn render_glyphs(
        &mut self,
        slots: &[u8],
        col: u8,
        row: u8,
        blink: bool,
        invert: bool,
    ) -> Result<(), E>;

    /// Show a single glyph
    fn render_glyph(&mut self, slot: u8, col: u8, row: u8, blink: bool, invert: bool)
        -> Result<(), E>;

    /// Print `value` with `before` digits before and `after` digits after the decimal point,
    /// see `format_number`
    #[allow(clippy::too_many_arguments)]
    fn render_number(
        &mut self,
        value: f32,
        col: u8,
        row: u8,
        before: u8,
        after: u8,
        blink: bool,
        invert: bool,
    ) -> Result<(), E>;

    /// return column of the text cursor
    fn pos(&self) -> u8;

    /// return row of the text cursor
    fn row(&self) -> u8;

    /// set the position (column, row) of the text cursor, out of range values are ignored
    fn set_position(&mut self, col: u8, row: u8);

    /// clear the screen and set cursor to (0,0)
    fn cls(&mut self) -> Result<(), E>;
}

impl<SPI, CS, DELAY, SpiErr, PinErr> TextMode<OsdError<SpiErr, PinErr>> for MAX7456<SPI, CS, DELAY>
where
    SPI: Transfer<u8, Error = SpiErr> + SpiWrite<u8, Error = SpiErr>,
    CS: OutputPin<Error = PinErr>,
    DELAY: DelayMs<u16> + DelayUs<u16>,
{
    fn render_text(
        &mut self,
        text: &[u8],
        col: u8,
        row: u8,
        blink: bool,
        invert: bool,
    ) -> Result<(), OsdError<SpiErr, PinErr>> {
        let address = display_address(col, row);

        let registers = self.registers_mut();
        registers.dmm.set_flag(Dmm::AUTO_INCREMENT, true);
        registers.dmm.set_flag(Dmm::INVERT, invert);
        registers.dmm.set_flag(Dmm::BLINK, blink);
        // never start another clear by accident
        registers.dmm.set_flag(Dmm::CLEAR_DISPLAY_MEMORY, false);
        registers
            .dmah
            .set_field(Dmah::ADDRESS_BIT8, (address >> 8) as u8);
        registers.dmah.set_flag(Dmah::ATTRIBUTE_SELECT, false);
        registers.dmal = Dmal(address as u8);
        let (dmm, dmah, dmal) = (registers.dmm, registers.dmah, registers.dmal);

        self.write_register(dmm)?;
        self.write_register(dmah)?;
        self.write_register(dmal)?;

        for byte in text.iter().take_while(|b| **b != END_OF_TEXT) {
            self.write_register(Dmdi(*byte))?;
        }
        self.write_register(Dmdi(END_OF_TEXT))?;

        // the end marker takes the chip out of auto-increment mode
        let registers = self.registers_mut();
        registers.dmdi = Dmdi(END_OF_TEXT);
        registers.dmm.set_flag(Dmm::AUTO_INCREMENT, false);
        Ok(())
    }

    fn print_str(
        &mut self,
        text: &str,
        col: u8,
        row: u8,
        blink: bool,
        invert: bool,
    ) -> Result<(), OsdError<SpiErr, PinErr>> {
        let mut bytes: Vec<u8, { crate::DISPLAY_MEMORY_SIZE }> = Vec::new();
        for c in text.chars() {
            if bytes.push(char_to_slot(c)).is_err() {
                break;
            }
        }
        self.render_text(&bytes, col, row, blink, invert)
    }

    fn render_glyphs(
        &mut self,
        slots: &[u8],
        col: u8,
        row: u8,
        blink: bool,
        invert: bool,
    ) -> Result<(), OsdError<SpiErr, PinErr>> {
        self.render_text(slots, col, row, blink, invert)
    }

    fn render_glyph(
        &mut self,
        slot: u8,
        col: u8,
        row: u8,
        blink: bool,
        invert: bool,
    ) -> Result<(), OsdError<SpiErr, PinErr>> {
        self.render_text(&[slot], col, row, blink, invert)
    }

    fn render_number(
        &mut self,
        value: f32,
        col: u8,
        row: u8,
        before: u8,
        after: u8,
        blink: bool,
        invert: bool,
    ) -> Result<(), OsdError<SpiErr, PinErr>> {
        let text = format_number(value, before, after);
        self.render_text(text.as_bytes(), col, row, blink, invert)
    }

    fn pos(&self) -> u8 {
        self.text_col
    }

    fn row(&self) -> u8 {
        self.text_row
    }

    fn set_position(&mut self, col: u8, row: u8) {
        // silently ignore out of bounds, like the chip would
        if col < COLUMNS && row < self.video_standard().rows() {
            self.text_col = col;
            self.text_row = row;
        }
    }

    fn cls(&mut self) -> Result<(), OsdError<SpiErr, PinErr>> {
        self.text_col = 0;
        self.text_row = 0;
        self.clear_screen()
    }
}

impl<SPI, CS, DELAY, SpiErr, PinErr> Write for MAX7456<SPI, CS, DELAY>
where
    SPI: Transfer<u8, Error = SpiErr> + SpiWrite<u8, Error = SpiErr>,
    CS: OutputPin<Error = PinErr>,
    DELAY: DelayMs<u16> + DelayUs<u16>,
{
    // Characters are collected until the end of the line and then written as one run, a new
    // line wraps back to row 0 after the last row of the video standard.
    fn write_str(&mut self, s: &str) -> FmtResult {
        let mut line: Vec<u8, { COLUMNS as usize }> = Vec::new();
        let mut start = self.text_col;

        for c in s.chars() {
            match c {
                '\r' => {
                    self.flush_line(&line, start)?;
                    line.clear();
                    self.text_col = 0;
                    start = 0;
                }
                '\n' => {
                    self.flush_line(&line, start)?;
                    line.clear();
                    self.line_feed();
                    start = 0;
                }
                _ => {
                    // the line buffer has room for a whole row
                    let _ = line.push(char_to_slot(c));
                    self.text_col += 1;
                    if self.text_col == COLUMNS {
                        self.flush_line(&line, start)?;
                        line.clear();
                        self.line_feed();
                        start = 0;
                    }
                }
            }
        }
        self.flush_line(&line, start)
    }
}

impl<SPI, CS, DELAY, SpiErr, PinErr> MAX7456<SPI, CS, DELAY>
where
    SPI: Transfer<u8, Error = SpiErr> + SpiWrite<u8, Error = SpiErr>,
    CS: OutputPin<Error = PinErr>,
    DELAY: DelayMs<u16> + DelayUs<u16>,
{
    fn flush_line(&mut self, line: &[u8], start: u8) -> FmtResult {
        if line.is_empty() {
            return Ok(());
        }
        let row = self.text_row;
        self.render_text(line, start, row, false, false)
            .map_err(|_| FmtError)
    }

    fn line_feed(&mut self) {
        self.text_col = 0;
        self.text_row += 1;
        if self.text_row >= self.video_standard().rows() {
            self.text_row = 0;
        }
    }
}

/// Linear display memory address of the cell in column `col` and row `row`
pub fn display_address(col: u8, row: u8) -> u16 {
    u16::from(COLUMNS) * u16::from(row) + u16::from(col)
}

/// Format `value` as fixed point number of exactly `before + after + 1` characters (or
/// `before` if `after` is 0).
///
/// The number is padded with zeroes, a minus sign stays in front. If the number doesn't fit,
/// the characters at the end are cut off:
///
/// ```
/// use max7456::textmode::format_number;
///
/// assert_eq!(format_number(3.14, 3, 4), "003.1400");
/// assert_eq!(format_number(-1.5, 3, 1), "-01.5");
/// assert_eq!(format_number(1234.0, 2, 0), "12");
/// ```
pub fn format_number(value: f32, before: u8, after: u8) -> String<NUMBER_CAPACITY> {
    let width = usize::from(before) + usize::from(after) + usize::from(after > 0);

    // an f32 has at most 39 integer digits, so sign, digits, point and 255 decimals fit
    let mut buffer: String<{ NUMBER_CAPACITY + 1 }> = String::new();
    let _ = write!(
        buffer,
        "{:0width$.prec$}",
        value,
        width = width,
        prec = usize::from(after)
    );
    buffer.truncate(width);

    let mut text = String::new();
    // ASCII only and at most `NUMBER_CAPACITY` long after the truncate
    let _ = text.push_str(&buffer);
    text
}

// slot of a character in an ASCII ordered font
fn char_to_slot(c: char) -> u8 {
    if c.is_ascii() {
        c as u8
    } else {
        b'?'
    }
}
