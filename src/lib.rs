//! # Driver for the MAX7456 on-screen display chip
//!
//! The MAX7456 mixes characters into a PAL or NTSC video signal, as used on FPV goggles and
//! MinimOSD boards. It has a display memory with one glyph number per character cell of a
//! 30 column grid, and a non volatile character memory with 256 glyphs of 12x18 pixels.
//!
//! The driver talks to the chip over SPI (mode 0, up to 10Mhz) with a separate chip select
//! pin, using the blocking embedded-hal 0.2 traits. A bit banged SPI is available in the `spi`
//! module if no hardware SPI is free.
//!
//! ```ignore
//! use core::fmt::Write;
//! use max7456::{Config, TextMode, MAX7456};
//!
//! let mut osd = MAX7456::new(spi, cs, delay, Config::default())?;
//! osd.clear_screen()?;
//! osd.set_external_video(true)?;
//! osd.print_str("RSSI", 1, 1, false, false)?;
//! osd.render_number(87.5, 6, 1, 3, 1, false, false)?;
//! osd.set_osd_enabled(true)?;
//! ```
//!
//! Features:
//!  - "graphics": draw into glyphs with embedded-graphics
//!  - "defmt": defmt::Format for all public types and debug logging of the driver
#![no_std]

extern crate embedded_hal as hal;

pub mod charmem;
pub mod config;
pub mod display;
pub mod dummypins;
pub mod error;
pub mod glyph;
#[cfg(feature = "graphics")]
pub mod graphics;
mod logging;
pub mod registers;
pub mod settings;
pub mod spi;
pub mod textmode;

pub use charmem::CharacterMemory;
pub use config::Config;
pub use display::MAX7456;
pub use error::OsdError;
pub use glyph::{Glyph, Pixel};
pub use registers::{ShadowRegisters, SyncMode, VideoStandard};
pub use settings::Settings;
pub use textmode::TextMode;

/// character columns of the display
pub const COLUMNS: u8 = 30;
/// character rows of an NTSC picture
pub const ROWS_NTSC: u8 = 13;
/// character rows of a PAL picture
pub const ROWS_PAL: u8 = 16;
/// number of character cells in the display memory
pub const DISPLAY_MEMORY_SIZE: usize = COLUMNS as usize * ROWS_PAL as usize;
/// written to DMDI to leave auto-increment mode, so never a glyph in a text run
pub const END_OF_TEXT: u8 = 0xFF;
