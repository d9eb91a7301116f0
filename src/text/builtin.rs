//! Embedded fallback face used when the preferred font cannot be loaded.
//!
//! The face is Tuffy (public domain, see `assets/fonts/Tuffy-LICENSE.txt`), compiled into the
//! binary and always drawn at [`BuiltinFont::SIZE_PX`]. A requested font size has no effect on
//! it.

use crate::{
    foundation::error::{GifcapError, GifcapResult},
    text::{
        font::{GlyphMask, OutlineFont},
        wrap::TextMeasure,
    },
};

/// Fixed-size fallback face.
#[derive(Debug)]
pub struct BuiltinFont {
    face: OutlineFont,
}

impl BuiltinFont {
    /// Raw bytes of the embedded TrueType face.
    pub const FONT_BYTES: &'static [u8] = include_bytes!("../../assets/fonts/Tuffy.ttf");
    /// Pixel size every fallback glyph is drawn at.
    pub const SIZE_PX: f32 = 24.0;

    pub fn new() -> GifcapResult<Self> {
        let face = OutlineFont::from_bytes(Self::FONT_BYTES.to_vec(), 0, Self::SIZE_PX)
            .map_err(|e| GifcapError::render(format!("built-in font failed to load: {e}")))?;
        Ok(Self { face })
    }

    pub fn outline(&self) -> &OutlineFont {
        &self.face
    }

    pub fn rasterize(&mut self, text: &str) -> GifcapResult<GlyphMask> {
        self.face.rasterize(text)
    }
}

impl TextMeasure for BuiltinFont {
    fn text_width(&mut self, text: &str) -> f32 {
        self.face.text_width(text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/builtin.rs"]
mod tests;
