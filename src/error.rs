//! Error type of the driver
//!
//! The MAX7456 has no way to report errors on its serial bus, so most of these come from the
//! SPI and GPIO implementations handed to the driver. The only failures the chip itself can
//! cause are operations that never complete.

/// Errors of the MAX7456 driver, generic over the SPI and chip select pin errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OsdError<SpiErr, PinErr> {
    /// the SPI implementation failed
    Spi(SpiErr),
    /// setting the chip select pin failed
    Pin(PinErr),
    /// STAT[5] did not clear after writing the character memory within the configured timeout
    CharacterMemoryBusy,
    /// DMM[2] did not clear after starting a display memory clear within the configured timeout
    ClearTimeout,
}

impl<SpiErr, PinErr> OsdError<SpiErr, PinErr> {
    /// map the result of an SPI operation
    pub fn spi<T>(result: Result<T, SpiErr>) -> Result<T, OsdError<SpiErr, PinErr>> {
        result.map_err(OsdError::Spi)
    }

    /// map the result of a pin operation
    pub fn pin<T>(result: Result<T, PinErr>) -> Result<T, OsdError<SpiErr, PinErr>> {
        result.map_err(OsdError::Pin)
    }

    /// `true` for the errors that come from polling the chip, not from the bus
    pub fn is_timeout(&self) -> bool {
        matches!(self, OsdError::CharacterMemoryBusy | OsdError::ClearTimeout)
    }
}
