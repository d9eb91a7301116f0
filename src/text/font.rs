use std::{borrow::Cow, path::PathBuf};

use anyhow::Context as _;
use sha2::Digest as _;

use crate::{
    foundation::error::{GifcapError, GifcapResult},
    text::{builtin::BuiltinFont, wrap::TextMeasure},
};

/// Where the preferred caption font comes from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSource {
    /// A TrueType/OpenType file on disk.
    File(PathBuf),
    /// An installed family, looked up among system fonts.
    Family(String),
}

impl Default for FontSource {
    fn default() -> Self {
        Self::Family("Verdana".to_string())
    }
}

impl std::fmt::Display for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(p) => write!(f, "file '{}'", p.display()),
            Self::Family(name) => write!(f, "family '{name}'"),
        }
    }
}

/// 8-bit coverage of one rendered line of text.
///
/// The mask's top-left corner sits at `(pen_x + offset_x, pen_y + offset_y)`, where the pen is
/// the top-left of the line box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphMask {
    pub width: u32,
    pub height: u32,
    /// Row-major, `width * height` bytes.
    pub coverage: Vec<u8>,
    pub offset_x: i32,
    pub offset_y: i32,
}

/// Outline font shaped with Parley and filled with `vello_cpu`.
pub struct OutlineFont {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
    font_bytes: parley::fontique::Blob<u8>,
    size_px: f32,
}

impl std::fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFont")
            .field("family_name", &self.family_name)
            .field("font_bytes_len", &self.font_bytes.len())
            .field("size_px", &self.size_px)
            .finish()
    }
}

// Blank border around rasterized lines so antialiased edges are not clipped.
const MASK_PAD: u32 = 2;

impl OutlineFont {
    /// Register face `index` of `font_bytes` and prepare to lay out text at `size_px`.
    pub fn from_bytes(font_bytes: Vec<u8>, index: u32, size_px: f32) -> GifcapResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(GifcapError::validation(
                "font size_px must be finite and > 0",
            ));
        }

        let font_bytes = parley::fontique::Blob::from(font_bytes);
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(font_bytes.clone(), None);
        let family_id = families
            .iter()
            .find(|(_, fonts)| fonts.iter().any(|f| f.index() == index))
            .map(|(id, _)| *id)
            .ok_or_else(|| {
                GifcapError::validation(format!("font bytes have no face at index {index}"))
            })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| GifcapError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_bytes,
            size_px,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    fn layout(&mut self, text: &str) -> parley::Layout<()> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Single(parley::style::FontFamily::Named(Cow::Owned(
                self.family_name.clone(),
            ))),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Rasterize one line; the mask's line box starts at its pen origin.
    pub fn rasterize(&mut self, text: &str) -> GifcapResult<GlyphMask> {
        let layout = self.layout(text);
        let width = layout.width().ceil().max(0.0) as u32 + 2 * MASK_PAD;
        let height = layout.height().ceil().max(0.0) as u32 + 2 * MASK_PAD;
        let (w16, h16) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(GifcapError::render(format!(
                    "text line too large to rasterize ({width}x{height})"
                )));
            }
        };

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        let pad = MASK_PAD as f32;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                // Absolute pen positions; the run may use a fallback face for missing glyphs.
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x + pad,
                    y: g.y + pad,
                });
                ctx.glyph_run(run.run().font())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);

        // White paint, so premultiplied alpha is the coverage.
        let coverage = pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .map(|px| px[3])
            .collect();

        Ok(GlyphMask {
            width,
            height,
            coverage,
            offset_x: -(MASK_PAD as i32),
            offset_y: -(MASK_PAD as i32),
        })
    }
}

impl TextMeasure for OutlineFont {
    fn text_width(&mut self, text: &str) -> f32 {
        self.layout(text).width()
    }
}

/// Result of font resolution: the preferred outline face, or the built-in fallback.
#[derive(Debug)]
pub enum FontHandle {
    Outline(OutlineFont),
    /// Fixed-size embedded face; the requested size has no effect on glyphs.
    Builtin(BuiltinFont),
}

/// Diagnostic summary of a resolved font.
#[derive(Clone, Debug, PartialEq)]
pub struct FontDescription {
    pub family: String,
    pub size_px: f32,
    pub fallback: bool,
    /// Hex SHA-256 of the font bytes.
    pub sha256: String,
}

impl FontHandle {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }

    pub fn rasterize(&mut self, text: &str) -> GifcapResult<GlyphMask> {
        match self {
            Self::Outline(f) => f.rasterize(text),
            Self::Builtin(f) => f.rasterize(text),
        }
    }

    pub fn describe(&self) -> FontDescription {
        let face = match self {
            Self::Outline(f) => f,
            Self::Builtin(f) => f.outline(),
        };
        FontDescription {
            family: face.family_name.clone(),
            size_px: face.size_px,
            fallback: self.is_fallback(),
            sha256: sha256_hex(face.font_bytes.data()),
        }
    }
}

impl TextMeasure for FontHandle {
    fn text_width(&mut self, text: &str) -> f32 {
        match self {
            Self::Outline(f) => f.text_width(text),
            Self::Builtin(f) => f.text_width(text),
        }
    }
}

/// Load the preferred font at `size_px`, degrading to the built-in face on any failure.
///
/// Errors only when the embedded face itself cannot be loaded.
pub fn resolve_font(source: &FontSource, size_px: f32) -> GifcapResult<FontHandle> {
    let loaded = load_font_bytes(source)
        .and_then(|(bytes, index)| OutlineFont::from_bytes(bytes, index, size_px));
    match loaded {
        Ok(font) => {
            tracing::debug!(%source, family = font.family_name(), size_px, "loaded caption font");
            Ok(FontHandle::Outline(font))
        }
        Err(err) => {
            tracing::warn!(
                %source,
                error = %err,
                "caption font unavailable, using built-in face (font size is ignored)"
            );
            Ok(FontHandle::Builtin(BuiltinFont::new()?))
        }
    }
}

fn load_font_bytes(source: &FontSource) -> GifcapResult<(Vec<u8>, u32)> {
    match source {
        FontSource::File(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read font file '{}'", path.display()))?;
            Ok((bytes, 0))
        }
        FontSource::Family(name) => {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            let query = usvg::fontdb::Query {
                families: &[usvg::fontdb::Family::Name(name)],
                ..usvg::fontdb::Query::default()
            };
            let id = db.query(&query).ok_or_else(|| {
                GifcapError::validation(format!("font family '{name}' is not installed"))
            })?;
            db.with_face_data(id, |data, index| (data.to_vec(), index))
                .ok_or_else(|| {
                    GifcapError::validation(format!("font family '{name}' has no readable data"))
                })
        }
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
