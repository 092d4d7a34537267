//! # Character memory extension for the MAX7456 driver
//!
//! The 256 glyphs the chip can show live in a non volatile memory (NVM). Glyphs are not
//! written to the NVM directly, but to a shadow RAM of one glyph: 54 times slot/byte address
//! and data, then a command copies the shadow RAM into the NVM slot. Loading works the other
//! way around.
//!
//! The chip only gives access to the character memory while the OSD is off, so both
//! directions switch it off and back on when they're done. Copying into the NVM takes about
//! 12ms, during which STAT[5] is set.
//!
//! If the copy doesn't finish within `Config::character_memory_timeout_ms` the store fails with
//! `OsdError::CharacterMemoryBusy` and the OSD stays off.
use hal::blocking::delay::{DelayMs, DelayUs};
use hal::blocking::spi::{Transfer, Write as SpiWrite};
use hal::digital::v2::OutputPin;

use crate::{
    display::MAX7456,
    error::OsdError,
    glyph::{slot_at, Glyph, GLYPH_SIZE},
    logging,
    registers::{Cmah, Cmal, Cmdi, Cmdo, Cmm, Stat},
};

/// Glyph upload and download
pub trait CharacterMemory<E> {
    /// Write `glyph` into the NVM slot `slot`. Blocks until the chip is done.
    fn store_glyph(&mut self, glyph: &Glyph, slot: u8) -> Result<(), E>;

    /// Read the glyph in NVM slot `slot`
    fn load_glyph(&mut self, slot: u8) -> Result<Glyph, E>;

    /// Read the glyph at column `x` and row `y` of the font map, which is 16 glyphs wide
    fn load_glyph_at(&mut self, x: u8, y: u8) -> Result<Glyph, E>;
}

impl<SPI, CS, DELAY, SpiErr, PinErr> CharacterMemory<OsdError<SpiErr, PinErr>>
    for MAX7456<SPI, CS, DELAY>
where
    SPI: Transfer<u8, Error = SpiErr> + SpiWrite<u8, Error = SpiErr>,
    CS: OutputPin<Error = PinErr>,
    DELAY: DelayMs<u16> + DelayUs<u16>,
{
    fn store_glyph(&mut self, glyph: &Glyph, slot: u8) -> Result<(), OsdError<SpiErr, PinErr>> {
        logging::debug!("max7456: storing glyph {=u8}", slot);

        let was_enabled = self.is_osd_enabled();
        self.set_osd_enabled(false)?;

        self.select_slot(slot)?;
        for (index, byte) in glyph.as_bytes().iter().enumerate() {
            self.write_register(Cmal(index as u8))?;
            self.write_register(Cmdi(*byte))?;
        }
        self.registers_mut().cmal = Cmal((GLYPH_SIZE - 1) as u8);
        self.registers_mut().cmdi = Cmdi(glyph.as_bytes()[GLYPH_SIZE - 1]);

        self.registers_mut().cmm = Cmm::WRITE_NVM;
        self.write_register(Cmm::WRITE_NVM)?;
        self.wait_until_idle()?;

        if was_enabled {
            self.set_osd_enabled(true)?;
        }
        Ok(())
    }

    fn load_glyph(&mut self, slot: u8) -> Result<Glyph, OsdError<SpiErr, PinErr>> {
        let was_enabled = self.is_osd_enabled();
        self.set_osd_enabled(false)?;

        self.select_slot(slot)?;
        self.registers_mut().cmm = Cmm::READ_NVM;
        self.write_register(Cmm::READ_NVM)?;
        self.wait_until_idle()?;

        let mut bytes = [0u8; GLYPH_SIZE];
        for (index, byte) in bytes.iter_mut().enumerate() {
            self.write_register(Cmal(index as u8))?;
            *byte = self.read_register::<Cmdo>()?.0;
        }
        self.registers_mut().cmal = Cmal((GLYPH_SIZE - 1) as u8);

        if was_enabled {
            self.set_osd_enabled(true)?;
        }
        Ok(Glyph::new(bytes))
    }

    fn load_glyph_at(&mut self, x: u8, y: u8) -> Result<Glyph, OsdError<SpiErr, PinErr>> {
        self.load_glyph(slot_at(x, y))
    }
}

impl<SPI, CS, DELAY, SpiErr, PinErr> MAX7456<SPI, CS, DELAY>
where
    SPI: Transfer<u8, Error = SpiErr> + SpiWrite<u8, Error = SpiErr>,
    CS: OutputPin<Error = PinErr>,
    DELAY: DelayMs<u16> + DelayUs<u16>,
{
    fn select_slot(&mut self, slot: u8) -> Result<(), OsdError<SpiErr, PinErr>> {
        self.registers_mut().cmah = Cmah(slot);
        self.write_register(Cmah(slot))
    }

    // STAT[5] is set while the chip copies between shadow RAM and NVM
    fn wait_until_idle(&mut self) -> Result<(), OsdError<SpiErr, PinErr>> {
        let timeout = self.config().character_memory_timeout_ms;
        match self.poll_until_clear::<Stat>(Stat::CHARACTER_MEMORY_BUSY, timeout)? {
            Some(stat) => {
                self.registers_mut().stat = stat;
                Ok(())
            }
            None => {
                logging::warning!("max7456: character memory still busy after {=u16}ms", timeout);
                Err(OsdError::CharacterMemoryBusy)
            }
        }
    }
}
