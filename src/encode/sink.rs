use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::RgbImage;

use crate::foundation::{
    core::Fps,
    error::{GifcapError, GifcapResult},
};

/// Output settings for [`GifSink`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GifSinkOpts {
    pub fps: Fps,
    /// Quality hint in `1..=100`; higher means slower, finer palette quantization.
    pub quality: u8,
}

impl GifSinkOpts {
    /// NeuQuant sampling speed for the `gif` crate (`1` = best, `30` = fastest).
    pub fn quantizer_speed(&self) -> i32 {
        let q = i32::from(self.quality.clamp(1, 100));
        1 + (100 - q) * 29 / 100
    }
}

pub fn ensure_parent_dir(path: &Path) -> GifcapResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

enum SinkState {
    Waiting(BufWriter<File>),
    Encoding {
        encoder: gif::Encoder<BufWriter<File>>,
        width: u16,
        height: u16,
    },
    Closed,
}

/// Looping GIF writer fed one RGB frame at a time.
///
/// The file is created up front; the encoder starts with the first frame, whose size every
/// later frame must match. [`GifSink::finish`] writes the trailer and flushes.
pub struct GifSink {
    path: PathBuf,
    opts: GifSinkOpts,
    state: SinkState,
    frames_written: usize,
}

impl GifSink {
    pub fn create(path: impl AsRef<Path>, opts: GifSinkOpts) -> GifcapResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !(1..=100).contains(&opts.quality) {
            return Err(GifcapError::validation(format!(
                "quality must be in 1..=100 (got {})",
                opts.quality
            )));
        }
        ensure_parent_dir(&path)?;
        let file = File::create(&path).map_err(|e| {
            GifcapError::encode(format!("failed to create '{}': {e}", path.display()))
        })?;

        Ok(Self {
            path,
            opts,
            state: SinkState::Waiting(BufWriter::new(file)),
            frames_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn push_frame(&mut self, frame: &RgbImage) -> GifcapResult<()> {
        let (w, h) = frame.dimensions();
        let (w16, h16) = match (u16::try_from(w), u16::try_from(h)) {
            (Ok(w16), Ok(h16)) if w16 > 0 && h16 > 0 => (w16, h16),
            _ => {
                return Err(GifcapError::validation(format!(
                    "gif frames must be between 1x1 and 65535x65535 (got {w}x{h})"
                )));
            }
        };

        self.state = match std::mem::replace(&mut self.state, SinkState::Closed) {
            SinkState::Waiting(writer) => {
                let mut encoder = gif::Encoder::new(writer, w16, h16, &[])
                    .map_err(|e| encode_error(&self.path, "start encoder", e))?;
                encoder
                    .set_repeat(gif::Repeat::Infinite)
                    .map_err(|e| encode_error(&self.path, "set repeat", e))?;
                SinkState::Encoding {
                    encoder,
                    width: w16,
                    height: h16,
                }
            }
            other => other,
        };

        let speed = self.opts.quantizer_speed();
        let delay = self.opts.fps.delay_centis();
        match &mut self.state {
            SinkState::Encoding {
                encoder,
                width,
                height,
            } => {
                if (*width, *height) != (w16, h16) {
                    return Err(GifcapError::validation(format!(
                        "frame size {w}x{h} does not match first frame {width}x{height}"
                    )));
                }
                let mut gif_frame = gif::Frame::from_rgb_speed(w16, h16, frame.as_raw(), speed);
                gif_frame.delay = delay;
                encoder
                    .write_frame(&gif_frame)
                    .map_err(|e| encode_error(&self.path, "write frame", e))?;
            }
            SinkState::Waiting(_) | SinkState::Closed => {
                return Err(GifcapError::encode(format!(
                    "sink for '{}' is closed",
                    self.path.display()
                )));
            }
        }

        self.frames_written += 1;
        Ok(())
    }

    /// Write the trailer and flush. Fails if no frame was pushed.
    pub fn finish(mut self) -> GifcapResult<usize> {
        match std::mem::replace(&mut self.state, SinkState::Closed) {
            SinkState::Encoding { encoder, .. } => {
                let mut writer = encoder
                    .into_inner()
                    .map_err(|e| encode_error(&self.path, "write trailer", e))?;
                writer
                    .flush()
                    .map_err(|e| encode_error(&self.path, "flush", e))?;
                tracing::debug!(
                    path = %self.path.display(),
                    frames = self.frames_written,
                    "finished gif"
                );
                Ok(self.frames_written)
            }
            SinkState::Waiting(_) | SinkState::Closed => Err(GifcapError::encode(format!(
                "no frames were written to '{}'",
                self.path.display()
            ))),
        }
    }
}

fn encode_error(path: &Path, what: &str, e: impl std::fmt::Display) -> GifcapError {
    GifcapError::encode(format!("{what} for '{}': {e}", path.display()))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
