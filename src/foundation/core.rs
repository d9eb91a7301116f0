use crate::foundation::error::{GifcapError, GifcapResult};

/// Straight (non-premultiplied) RGB8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_pixel(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

/// Frames per second of an animation.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Fps(f64);

impl Fps {
    pub fn new(fps: f64) -> GifcapResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(GifcapError::validation(format!(
                "fps must be finite and > 0 (got {fps})"
            )));
        }
        Ok(Self(fps))
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Frame rate implied by a per-frame delay in milliseconds. A zero delay carries no rate.
    pub fn from_delay_ms(delay_ms: f64) -> Option<Self> {
        if !delay_ms.is_finite() || delay_ms <= 0.0 {
            return None;
        }
        Some(Self(1000.0 / delay_ms))
    }

    /// GIF frame delay in hundredths of a second, never zero.
    pub fn delay_centis(self) -> u16 {
        let centis = (100.0 / self.0).round();
        centis.clamp(1.0, f64::from(u16::MAX)) as u16
    }
}

/// Pick the first explicit rate, then the source rate, then the fallback.
pub fn resolve_fps(
    explicit: Option<f64>,
    source: Option<Fps>,
    fallback: f64,
) -> GifcapResult<Fps> {
    match (explicit, source) {
        (Some(fps), _) => Fps::new(fps),
        (None, Some(fps)) => Ok(fps),
        (None, None) => Fps::new(fallback),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
