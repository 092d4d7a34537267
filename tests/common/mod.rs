//! A simulated MAX7456 behind fake SPI, chip select and delay implementations.
//!
//! Every SPI call is checked to happen inside its own chip select bracket and to carry
//! exactly one address/data pair. The chip side models the registers, the display memory
//! with auto-increment, the character memory (shadow RAM and NVM) and the two bits the chip
//! clears on its own.
#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::blocking::spi::{Transfer, Write};
use embedded_hal::digital::v2::OutputPin;
use max7456::{Config, MAX7456};

pub const GLYPH_SIZE: usize = 54;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Write(u8, u8),
    /// address and the value the chip answered
    Read(u8, u8),
}

pub struct Chip {
    pub log: Vec<Transaction>,
    /// SPI traffic outside of a bracket, more than one call per bracket or odd frames
    pub violations: usize,
    pub cs_low: bool,
    calls_in_bracket: usize,
    pub fail_spi: bool,

    pub registers: [u8; 128],
    /// read only STAT bits besides busy
    pub stat: u8,
    pub display: [u8; 512],
    display_address: u16,
    pub shadow_ram: [u8; GLYPH_SIZE],
    pub nvm: Vec<[u8; GLYPH_SIZE]>,
    pub busy_stuck: bool,
    busy: bool,
    pub clear_stuck: bool,

    pub delayed_us: u64,
}

impl Chip {
    fn new() -> Chip {
        let mut chip = Chip {
            log: Vec::new(),
            violations: 0,
            cs_low: false,
            calls_in_bracket: 0,
            fail_spi: false,
            registers: [0; 128],
            stat: 0,
            display: [0; 512],
            display_address: 0,
            shadow_ram: [0; GLYPH_SIZE],
            nvm: vec![[0x55; GLYPH_SIZE]; 256],
            busy_stuck: false,
            busy: false,
            clear_stuck: false,
            delayed_us: 0,
        };
        chip.reset();
        chip
    }

    fn reset(&mut self) {
        self.registers = [0; 128];
        self.registers[0x01] = 0x47;
        self.registers[0x02] = 0x20;
        self.registers[0x03] = 0x10;
        self.registers[0x0C] = 0x1B;
        for rb in 0x10..0x20 {
            self.registers[rb] = 0x01;
        }
        // factory preset of the black level
        self.registers[0x6C] = 0x0A;
        self.display = [0; 512];
        self.display_address = 0;
    }

    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.log
            .iter()
            .filter_map(|t| match t {
                Transaction::Write(a, d) => Some((*a, *d)),
                _ => None,
            })
            .collect()
    }

    pub fn reads(&self) -> Vec<u8> {
        self.log
            .iter()
            .filter_map(|t| match t {
                Transaction::Read(a, _) => Some(*a),
                _ => None,
            })
            .collect()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// display memory from `address` on, as far as `len`
    pub fn text_at(&self, address: usize, len: usize) -> Vec<u8> {
        self.display[address..address + len].to_vec()
    }

    fn frame(&mut self) -> Result<(), SimError> {
        if !self.cs_low {
            self.violations += 1;
        }
        self.calls_in_bracket += 1;
        if self.calls_in_bracket > 1 {
            self.violations += 1;
        }
        if self.fail_spi {
            return Err(SimError);
        }
        Ok(())
    }

    fn write(&mut self, address: u8, data: u8) {
        self.log.push(Transaction::Write(address, data));
        let index = usize::from(address & 0x7F);

        match address {
            0x00 => {
                if data & 0x02 != 0 {
                    self.reset();
                }
                self.registers[index] = data & !0x02;
            }
            0x04 => {
                let mut dmm = data;
                if data & 0x04 != 0 {
                    self.display = [0; 512];
                    if !self.clear_stuck {
                        dmm &= !0x04;
                    }
                }
                self.registers[index] = dmm;
            }
            0x05 | 0x06 => {
                self.registers[index] = data;
                self.display_address =
                    u16::from(self.registers[0x05] & 0x01) << 8 | u16::from(self.registers[0x06]);
            }
            0x07 => {
                self.registers[index] = data;
                let auto_increment = self.registers[0x04] & 0x01 != 0;
                if auto_increment && data == 0xFF {
                    self.registers[0x04] &= !0x01;
                } else {
                    self.display[usize::from(self.display_address) % 512] = data;
                    if auto_increment {
                        self.display_address += 1;
                    }
                }
            }
            0x08 => {
                self.registers[index] = data;
                let slot = usize::from(self.registers[0x09]);
                match data {
                    0xA0 => {
                        self.nvm[slot] = self.shadow_ram;
                        self.busy = self.busy_stuck;
                    }
                    0x50 => self.shadow_ram = self.nvm[slot],
                    _ => {}
                }
            }
            0x0B => {
                self.registers[index] = data;
                let byte = usize::from(self.registers[0x0A]);
                if byte < GLYPH_SIZE {
                    self.shadow_ram[byte] = data;
                }
            }
            _ => self.registers[index] = data,
        }
    }

    fn read(&mut self, address: u8) -> u8 {
        let value = match address {
            0xA0 => self.stat | if self.busy { 0x20 } else { 0x00 },
            0xB0 => self.display[usize::from(self.display_address) % 512],
            0xC0 => {
                let byte = usize::from(self.registers[0x0A]);
                self.shadow_ram.get(byte).copied().unwrap_or(0)
            }
            _ => self.registers[usize::from(address & 0x7F)],
        };
        self.log.push(Transaction::Read(address, value));
        value
    }
}

pub type Shared = Rc<RefCell<Chip>>;

pub struct SimSpi(pub Shared);

impl Write<u8> for SimSpi {
    type Error = SimError;

    fn write(&mut self, words: &[u8]) -> Result<(), SimError> {
        let mut chip = self.0.borrow_mut();
        chip.frame()?;
        match words {
            [address, data] => chip.write(*address, *data),
            _ => chip.violations += 1,
        }
        Ok(())
    }
}

impl Transfer<u8> for SimSpi {
    type Error = SimError;

    fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], SimError> {
        let mut chip = self.0.borrow_mut();
        chip.frame()?;
        if words.len() == 2 && words[0] & 0x80 != 0 {
            let value = chip.read(words[0]);
            words[0] = 0;
            words[1] = value;
        } else {
            chip.violations += 1;
        }
        Ok(words)
    }
}

pub struct SimCs(pub Shared);

impl OutputPin for SimCs {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        let mut chip = self.0.borrow_mut();
        if chip.cs_low {
            chip.violations += 1;
        }
        chip.cs_low = true;
        chip.calls_in_bracket = 0;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().cs_low = false;
        Ok(())
    }
}

pub struct SimDelay(pub Shared);

impl DelayMs<u16> for SimDelay {
    fn delay_ms(&mut self, ms: u16) {
        self.0.borrow_mut().delayed_us += u64::from(ms) * 1000;
    }
}

impl DelayUs<u16> for SimDelay {
    fn delay_us(&mut self, us: u16) {
        self.0.borrow_mut().delayed_us += u64::from(us);
    }
}

pub type Osd = MAX7456<SimSpi, SimCs, SimDelay>;

/// an initialized driver on a fresh simulated chip, with the init traffic already logged
pub fn osd_with(config: Config) -> (Osd, Shared) {
    let chip = Rc::new(RefCell::new(Chip::new()));
    let osd = MAX7456::new(
        SimSpi(chip.clone()),
        SimCs(chip.clone()),
        SimDelay(chip.clone()),
        config,
    )
    .unwrap();
    (osd, chip)
}

/// like `osd_with` with the default config and an empty log
pub fn osd() -> (Osd, Shared) {
    let (osd, chip) = osd_with(Config::default());
    chip.borrow_mut().clear_log();
    (osd, chip)
}
