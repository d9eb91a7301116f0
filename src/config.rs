//! Tunable parameters for the scale and caption passes.
//!
//! Every default lives in a `Default` impl here; all structs deserialize with
//! `#[serde(default)]` so a JSON file only needs the fields it overrides.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::{
    foundation::core::Rgb8,
    foundation::error::{GifcapError, GifcapResult},
    text::font::FontSource,
};

/// Options for [`crate::scale_gif`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScaleOpts {
    /// Multiplier applied to both axes. Default `2.0`.
    pub scale_factor: f64,
    /// Output frame rate. `None` keeps the source rate.
    pub fps: Option<f64>,
    /// Output quality hint in `1..=100`. Default `90`.
    pub quality: u8,
    /// Rate used when neither `fps` nor the source declares one. Default `15.0`.
    pub fallback_fps: f64,
}

impl Default for ScaleOpts {
    fn default() -> Self {
        Self {
            scale_factor: 2.0,
            fps: None,
            quality: 90,
            fallback_fps: 15.0,
        }
    }
}

impl ScaleOpts {
    pub fn validate(&self) -> GifcapResult<()> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(GifcapError::validation(format!(
                "scale_factor must be finite and > 0 (got {})",
                self.scale_factor
            )));
        }
        validate_quality(self.quality)
    }
}

/// How the caption font size is chosen.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSizing {
    /// Always use this pixel size.
    Fixed(u32),
    /// `clamp(round(base * frame_width / reference_width), min, max)`.
    Auto {
        base: u32,
        min: u32,
        max: u32,
        reference_width: u32,
    },
}

impl Default for FontSizing {
    fn default() -> Self {
        Self::Auto {
            base: 70,
            min: 40,
            max: 150,
            reference_width: 800,
        }
    }
}

impl FontSizing {
    /// Pixel size for frames of the given width.
    pub fn resolve(self, frame_width: u32) -> u32 {
        match self {
            Self::Fixed(px) => px.max(1),
            Self::Auto {
                base,
                min,
                max,
                reference_width,
            } => {
                let lo = min.min(max);
                let hi = max.max(min);
                let scaled =
                    f64::from(base) * f64::from(frame_width) / f64::from(reference_width.max(1));
                (scaled.round() as u32).clamp(lo, hi).max(1)
            }
        }
    }
}

/// Styling for [`crate::caption_gif`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptionStyle {
    /// Preferred font. Falls back to the embedded face when unavailable.
    pub font: FontSource,
    pub font_size: FontSizing,
    pub font_color: Rgb8,
    pub stroke_color: Rgb8,
    /// Space between text and band edges, in pixels. Default `20`.
    pub margin: u32,
    /// Side border, and band height for an empty caption. Default `50`.
    pub border_size: u32,
    /// Smallest band height when the side has a caption. Default `100`.
    pub min_border_size: u32,
    /// Output frame rate. `None` keeps the source rate.
    pub fps: Option<f64>,
    pub quality: u8,
    pub fallback_fps: f64,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font: FontSource::default(),
            font_size: FontSizing::default(),
            font_color: Rgb8::BLACK,
            stroke_color: Rgb8::WHITE,
            margin: 20,
            border_size: 50,
            min_border_size: 100,
            fps: None,
            quality: 90,
            fallback_fps: 15.0,
        }
    }
}

impl CaptionStyle {
    pub fn validate(&self) -> GifcapResult<()> {
        if let FontSizing::Fixed(0) = self.font_size {
            return Err(GifcapError::validation("font size must be > 0"));
        }
        validate_quality(self.quality)
    }
}

/// Caption text for the two bands. Blank text counts as no caption.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Captions {
    pub top: Option<String>,
    pub bottom: Option<String>,
}

impl Captions {
    pub fn new(top: Option<impl Into<String>>, bottom: Option<impl Into<String>>) -> Self {
        Self {
            top: top.map(Into::into),
            bottom: bottom.map(Into::into),
        }
    }

    pub fn top_text(&self) -> Option<&str> {
        non_blank(self.top.as_deref())
    }

    pub fn bottom_text(&self) -> Option<&str> {
        non_blank(self.bottom.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Settings for the two-pass scale-then-caption pipeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub scale: ScaleOpts,
    pub caption: CaptionStyle,
    /// File name prefix of the intermediate scaled GIF. Default `"enhanced-"`.
    pub enhanced_prefix: String,
    /// File name prefix of the captioned GIF. Default `"final-"`.
    pub final_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scale: ScaleOpts::default(),
            caption: CaptionStyle::default(),
            enhanced_prefix: "enhanced-".to_string(),
            final_prefix: "final-".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_file(path: &Path) -> GifcapResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> GifcapResult<()> {
        self.scale.validate()?;
        self.caption.validate()?;
        if self.enhanced_prefix.is_empty() || self.final_prefix.is_empty() {
            return Err(GifcapError::validation("output prefixes must be non-empty"));
        }
        if self.enhanced_prefix == self.final_prefix {
            return Err(GifcapError::validation(
                "enhanced and final prefixes must differ",
            ));
        }
        Ok(())
    }
}

fn validate_quality(quality: u8) -> GifcapResult<()> {
    if !(1..=100).contains(&quality) {
        return Err(GifcapError::validation(format!(
            "quality must be in 1..=100 (got {quality})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
