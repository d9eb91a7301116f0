use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use image::{AnimationDecoder as _, RgbImage};

use crate::foundation::{
    core::Fps,
    error::{GifcapError, GifcapResult},
};

/// Streaming reader over the fully composited frames of a GIF file.
///
/// The first frame is decoded on open so dimensions and frame rate are known before
/// iteration starts. Iterating yields every frame, first included, as RGB8.
pub struct GifSource {
    path: PathBuf,
    frames: image::Frames<'static>,
    pending_first: Option<RgbImage>,
    width: u32,
    height: u32,
    frame_rate: Option<Fps>,
}

impl std::fmt::Debug for GifSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifSource")
            .field("path", &self.path)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("frame_rate", &self.frame_rate)
            .finish()
    }
}

impl GifSource {
    pub fn open(path: impl AsRef<Path>) -> GifcapResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| {
            GifcapError::decode(format!("failed to open '{}': {e}", path.display()))
        })?;
        let decoder = image::codecs::gif::GifDecoder::new(BufReader::new(file)).map_err(|e| {
            GifcapError::decode(format!("failed to read gif '{}': {e}", path.display()))
        })?;

        let mut frames = decoder.into_frames();
        let first = match frames.next() {
            Some(frame) => frame.map_err(|e| {
                GifcapError::decode(format!("failed to decode '{}': {e}", path.display()))
            })?,
            None => {
                return Err(GifcapError::decode(format!(
                    "'{}' contains no frames",
                    path.display()
                )));
            }
        };

        let (numer, denom) = first.delay().numer_denom_ms();
        let frame_rate = if denom == 0 {
            None
        } else {
            Fps::from_delay_ms(f64::from(numer) / f64::from(denom))
        };

        let first = frame_to_rgb(first);
        let (width, height) = first.dimensions();
        tracing::debug!(path = %path.display(), width, height, ?frame_rate, "opened gif");

        Ok(Self {
            path,
            frames,
            pending_first: Some(first),
            width,
            height,
            frame_rate,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Width and height of the first frame.
    pub fn dims(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Rate implied by the first frame's delay; `None` when the file declares no delay.
    pub fn frame_rate(&self) -> Option<Fps> {
        self.frame_rate
    }
}

impl Iterator for GifSource {
    type Item = GifcapResult<RgbImage>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(first) = self.pending_first.take() {
            return Some(Ok(first));
        }
        let frame = self.frames.next()?;
        Some(frame.map(frame_to_rgb).map_err(|e| {
            GifcapError::decode(format!("failed to decode '{}': {e}", self.path.display()))
        }))
    }
}

fn frame_to_rgb(frame: image::Frame) -> RgbImage {
    image::DynamicImage::ImageRgba8(frame.into_buffer()).to_rgb8()
}

/// A whole animation held in memory.
#[derive(Clone, Debug)]
pub struct Animation {
    pub frames: Vec<RgbImage>,
    pub frame_rate: Option<Fps>,
}

/// Decode every frame of a GIF into memory.
pub fn read_gif(path: impl AsRef<Path>) -> GifcapResult<Animation> {
    let source = GifSource::open(path)?;
    let frame_rate = source.frame_rate();
    let frames = source.collect::<GifcapResult<Vec<_>>>()?;
    Ok(Animation { frames, frame_rate })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
