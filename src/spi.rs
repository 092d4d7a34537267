//! "Bit bang" SPI implementation
//!
//! The MAX7456 is read as well as written, so unlike a write-only display this needs a MISO
//! pin too. SPI mode 0, most significant bit first.

use core::marker::PhantomData;

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::blocking::spi::{Transfer, Write as SpiWrite};
use embedded_hal::digital::v2::{InputPin, OutputPin};

/// "Bit bang" SPI implementation.
/// Use when you don't want to sacrifice a SPI port
pub struct BitBangSpi<ERR, CLK, MOSI, MISO, DELAY> {
    clk: CLK,
    mosi: MOSI,
    miso: MISO,
    delay: DELAY,
    _phantom: PhantomData<ERR>,
}

/// Used to run without delay on a slow enough clock speed (the MAX7456 takes up to 10Mhz)
pub struct NoDelay {}

impl DelayUs<u8> for NoDelay {
    #[inline]
    fn delay_us(&mut self, _us: u8) {}
}

impl<ERR, CLK, MOSI, MISO> BitBangSpi<ERR, CLK, MOSI, MISO, NoDelay>
where
    CLK: OutputPin<Error = ERR>,
    MOSI: OutputPin<Error = ERR>,
    MISO: InputPin<Error = ERR>,
{
    /// Constructs a "bit bang" SPI implementation from clock, MOSI (chip DIN) and MISO
    /// (chip DOUT) pins.
    /// If your clock frequency is higher than 10Mhz please consider `new_with_delay`,
    /// otherwise the chip won't keep up.
    pub fn new(
        mut clk: CLK,
        mosi: MOSI,
        miso: MISO,
    ) -> Result<BitBangSpi<ERR, CLK, MOSI, MISO, NoDelay>, ERR> {
        clk.set_low()?;
        Ok(BitBangSpi {
            clk,
            mosi,
            miso,
            delay: NoDelay {},
            _phantom: PhantomData,
        })
    }
}

impl<ERR, CLK, MOSI, MISO, DELAY> BitBangSpi<ERR, CLK, MOSI, MISO, DELAY>
where
    CLK: OutputPin<Error = ERR>,
    MOSI: OutputPin<Error = ERR>,
    MISO: InputPin<Error = ERR>,
    DELAY: DelayUs<u8>,
{
    /// Constructs a "bit bang" SPI implementation with a delay of 1µs on every clock edge.
    pub fn new_with_delay(
        mut clk: CLK,
        mosi: MOSI,
        miso: MISO,
        delay: DELAY,
    ) -> Result<BitBangSpi<ERR, CLK, MOSI, MISO, DELAY>, ERR> {
        clk.set_low()?;
        Ok(BitBangSpi {
            clk,
            mosi,
            miso,
            delay,
            _phantom: PhantomData,
        })
    }

    /// give back the pins and the delay
    pub fn release(self) -> (CLK, MOSI, MISO, DELAY) {
        (self.clk, self.mosi, self.miso, self.delay)
    }

    // the chip samples DIN on the rising edge and shifts DOUT on the falling edge
    #[inline]
    fn transfer_bit(&mut self, high: bool) -> Result<bool, ERR> {
        if high {
            self.mosi.set_high()?;
        } else {
            self.mosi.set_low()?;
        }
        self.delay.delay_us(1);
        self.clk.set_high()?;
        let read = self.miso.is_high()?;
        self.delay.delay_us(1);
        self.clk.set_low()?;
        Ok(read)
    }

    fn transfer_byte(&mut self, value: u8) -> Result<u8, ERR> {
        let mut out = value;
        let mut read = 0u8;
        for _ in 0..8 {
            let bit = self.transfer_bit((out & 0x80) == 0x80)?;
            read = (read << 1) | bit as u8;
            out <<= 1;
        }
        Ok(read)
    }
}

impl<ERR, CLK, MOSI, MISO, DELAY> SpiWrite<u8> for BitBangSpi<ERR, CLK, MOSI, MISO, DELAY>
where
    CLK: OutputPin<Error = ERR>,
    MOSI: OutputPin<Error = ERR>,
    MISO: InputPin<Error = ERR>,
    DELAY: DelayUs<u8>,
{
    type Error = ERR;

    #[inline]
    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        for value in words {
            self.transfer_byte(*value)?;
        }
        Ok(())
    }
}

impl<ERR, CLK, MOSI, MISO, DELAY> Transfer<u8> for BitBangSpi<ERR, CLK, MOSI, MISO, DELAY>
where
    CLK: OutputPin<Error = ERR>,
    MOSI: OutputPin<Error = ERR>,
    MISO: InputPin<Error = ERR>,
    DELAY: DelayUs<u8>,
{
    type Error = ERR;

    fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], Self::Error> {
        for word in words.iter_mut() {
            *word = self.transfer_byte(*word)?;
        }
        Ok(words)
    }
}
