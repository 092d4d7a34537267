//! Drawing into glyphs with embedded-graphics
//!
//! This module is behind a feature flag. Enable it in your Cargo.toml with feature flag
//! "graphics".
//!
//! A `Glyph` is a 12x18 `DrawTarget` with `Gray2` colors, so icons, bitmaps and fonts of the
//! embedded_graphics library can be drawn into a glyph and then uploaded with
//! `CharacterMemory::store_glyph()`. Luma 0 is black, luma 3 is white and the two in between
//! are transparent, which is the same order the chip mixes the pixels with the video signal.
//!
//! The typical workflow for a custom icon is:
//!  - start from `Glyph::transparent()`
//!  - draw "stuff" into it (Circle's, Line's, Image's)
//!  - store it into a free slot of the character memory
//!  - render the slot with `TextMode::render_glyph()`
//!
//!  The embedded_graphics library is well documented. Please look there for all the juicyness of
//!  graphics functions it provides.
//!  <https://docs.rs/embedded-graphics/latest/embedded_graphics/>
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Size},
    pixelcolor::{Gray2, GrayColor},
    Pixel,
};

use crate::glyph::{self, Glyph, GLYPH_ROWS, GLYPH_SIZE, GLYPH_WIDTH};

/// the glyph pixel for a `Gray2` color
pub fn pixel_for_color(color: Gray2) -> glyph::Pixel {
    match color.luma() {
        0 => glyph::Pixel::Black,
        3 => glyph::Pixel::White,
        _ => glyph::Pixel::Transparent,
    }
}

// Implementation of the embedded_graphics DrawTarget trait on a glyph.
// Pixels outside of the 12x18 cell are dropped.
impl DrawTarget for Glyph {
    type Color = Gray2;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bb = self.bounding_box();

        pixels
            .into_iter()
            .filter(|Pixel(pos, _color)| bb.contains(*pos))
            .for_each(|Pixel(pos, color)| {
                self.set_pixel(pos.x as usize, pos.y as usize, pixel_for_color(color));
            });

        Ok(())
    }

    fn clear(&mut self, color: Gray2) -> Result<(), Self::Error> {
        let bits = pixel_for_color(color) as u8;
        let byte = bits << 6 | bits << 4 | bits << 2 | bits;
        *self = Glyph::new([byte; GLYPH_SIZE]);
        Ok(())
    }
}

impl OriginDimensions for Glyph {
    fn size(&self) -> Size {
        Size::new(GLYPH_WIDTH as u32, GLYPH_ROWS as u32)
    }
}
