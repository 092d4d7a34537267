//! # Stand-ins for pins and delays
//!
//! Useful when the driver wants a peripheral the board doesn't have, or to run the driver on
//! a host without hardware. For example a board that never reads from the chip can leave DOUT
//! unconnected and give `BitBangSpi` a `DummyInputPin`. Reads then return 0x00, so the
//! busy polls finish right away and `load_glyph` returns a black glyph.

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::{InputPin, OutputPin};

/// An OutputPin that ignores everything, e.g. a chip select that is tied low on the board.
#[derive(Debug, Clone, Copy)]
pub struct DummyOutputPin;

impl OutputPin for DummyOutputPin {
    type Error = core::convert::Infallible;
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// An InputPin which is always low, for an unconnected MISO.
#[derive(Debug, Clone, Copy)]
pub struct DummyInputPin;

impl InputPin for DummyInputPin {
    type Error = core::convert::Infallible;
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(true)
    }

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}

/// A delay that returns immediately
#[derive(Debug, Clone, Copy)]
pub struct DummyDelay;

impl DelayMs<u16> for DummyDelay {
    fn delay_ms(&mut self, _ms: u16) {}
}

impl DelayUs<u16> for DummyDelay {
    fn delay_us(&mut self, _us: u16) {}
}

impl DelayUs<u8> for DummyDelay {
    fn delay_us(&mut self, _us: u8) {}
}
