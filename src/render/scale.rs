use std::path::Path;

use image::{RgbImage, imageops::FilterType};

use crate::{
    assets::decode::GifSource,
    config::ScaleOpts,
    encode::sink::{GifSink, GifSinkOpts},
    foundation::{
        core::resolve_fps,
        error::{GifcapError, GifcapResult},
    },
};

/// Summary of a finished scale pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleReport {
    pub frames: usize,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

/// `(floor(width * scale), floor(height * scale))`; both axes must stay non-zero.
pub fn scaled_dims(width: u32, height: u32, scale: f64) -> GifcapResult<(u32, u32)> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(GifcapError::validation(format!(
            "scale factor must be finite and > 0 (got {scale})"
        )));
    }
    let w = (f64::from(width) * scale).floor();
    let h = (f64::from(height) * scale).floor();
    if w < 1.0 || h < 1.0 || w > f64::from(u32::MAX) || h > f64::from(u32::MAX) {
        return Err(GifcapError::validation(format!(
            "scaling {width}x{height} by {scale} gives an empty or oversized frame"
        )));
    }
    Ok((w as u32, h as u32))
}

/// Lanczos resample to exactly `width` x `height`.
pub fn scale_frame(frame: &RgbImage, width: u32, height: u32) -> RgbImage {
    if frame.dimensions() == (width, height) {
        return frame.clone();
    }
    image::imageops::resize(frame, width, height, FilterType::Lanczos3)
}

/// Resize every frame of `input` by `opts.scale_factor` and write the result to `output`.
#[tracing::instrument(skip(opts), fields(scale = opts.scale_factor))]
pub fn scale_gif(input: &Path, output: &Path, opts: &ScaleOpts) -> GifcapResult<ScaleReport> {
    opts.validate()?;

    let source = GifSource::open(input)?;
    let (src_w, src_h) = source.dims();
    let (width, height) = scaled_dims(src_w, src_h, opts.scale_factor)?;
    let fps = resolve_fps(opts.fps, source.frame_rate(), opts.fallback_fps)?;

    let mut sink = GifSink::create(
        output,
        GifSinkOpts {
            fps,
            quality: opts.quality,
        },
    )?;

    for (i, frame) in source.enumerate() {
        let frame = frame?;
        let scaled = scale_frame(&frame, width, height);
        tracing::debug!(frame = i, width, height, "scaled frame");
        sink.push_frame(&scaled)?;
    }
    let frames = sink.finish()?;

    tracing::info!(
        frames,
        from = %format!("{src_w}x{src_h}"),
        to = %format!("{width}x{height}"),
        fps = fps.as_f64(),
        "scale pass complete"
    );
    Ok(ScaleReport {
        frames,
        width,
        height,
        fps: fps.as_f64(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/scale.rs"]
mod tests;
