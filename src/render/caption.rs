use std::path::Path;

use image::RgbImage;

use crate::{
    assets::decode::GifSource,
    config::{CaptionStyle, Captions},
    encode::sink::{GifSink, GifSinkOpts},
    foundation::{
        core::{Rgb8, resolve_fps},
        error::GifcapResult,
    },
    render::composite::stamp_stroked,
    text::{
        font::{FontHandle, GlyphMask, resolve_font},
        wrap::{TextMeasure, wrap_text},
    },
};

/// Wrapped text and band height for one side of the frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SideLayout {
    pub lines: Vec<String>,
    /// `lines.len() * line_height`.
    pub block_height: u32,
    /// Height of the white band holding the text.
    pub band: u32,
}

/// Canvas geometry shared by every frame of one caption pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionLayout {
    pub frame_width: u32,
    pub frame_height: u32,
    pub border_size: u32,
    pub font_size: u32,
    pub line_height: u32,
    pub top: SideLayout,
    pub bottom: SideLayout,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl CaptionLayout {
    /// Lay out both captions for frames of `frame_width` x `frame_height`.
    ///
    /// A side without text gets a band of `border_size`. A side with text gets
    /// `max(lines * line_height + 2 * margin, min_border_size)`.
    pub fn compute<M: TextMeasure + ?Sized>(
        frame_width: u32,
        frame_height: u32,
        captions: &Captions,
        style: &CaptionStyle,
        font_size: u32,
        measure: &mut M,
    ) -> Self {
        let border = style.border_size;
        let line_height = font_size.saturating_add(5);
        let max_width = frame_width
            .saturating_add(border.saturating_mul(2))
            .saturating_sub(style.margin.saturating_mul(2)) as f32;

        let mut side = |text: Option<&str>| match text {
            None => SideLayout {
                lines: Vec::new(),
                block_height: 0,
                band: border,
            },
            Some(text) => {
                let lines = wrap_text(text, &mut *measure, max_width);
                let block_height = (lines.len() as u32).saturating_mul(line_height);
                let band = block_height
                    .saturating_add(style.margin.saturating_mul(2))
                    .max(style.min_border_size);
                SideLayout {
                    lines,
                    block_height,
                    band,
                }
            }
        };
        let top = side(captions.top_text());
        let bottom = side(captions.bottom_text());

        let canvas_width = frame_width.saturating_add(border.saturating_mul(2));
        let canvas_height = frame_height
            .saturating_add(border.saturating_mul(2))
            .saturating_add(top.band)
            .saturating_add(bottom.band);

        Self {
            frame_width,
            frame_height,
            border_size: border,
            font_size,
            line_height,
            top,
            bottom,
            canvas_width,
            canvas_height,
        }
    }

    /// Where the source frame's top-left corner lands on the canvas.
    pub fn frame_origin(&self) -> (u32, u32) {
        (
            self.border_size,
            self.border_size.saturating_add(self.top.band),
        )
    }

    /// First row of the bottom band.
    pub fn bottom_band_start(&self) -> u32 {
        self.canvas_height.saturating_sub(self.bottom.band)
    }
}

#[derive(Clone, Debug)]
struct PlacedLine {
    mask: GlyphMask,
    x: i64,
    y: i64,
}

/// Pre-rasterized caption lines plus the layout they were placed in.
///
/// Text is rasterized once; [`CaptionPainter::compose`] only pastes and stamps.
#[derive(Clone, Debug)]
pub struct CaptionPainter {
    layout: CaptionLayout,
    lines: Vec<PlacedLine>,
    fill: Rgb8,
    stroke: Rgb8,
}

impl CaptionPainter {
    pub fn new(
        layout: CaptionLayout,
        font: &mut FontHandle,
        style: &CaptionStyle,
    ) -> GifcapResult<Self> {
        let mut lines = Vec::new();
        let bands = [
            (&layout.top, 0u32),
            (&layout.bottom, layout.bottom_band_start()),
        ];
        for (side, band_start) in bands {
            let slack = side.band.saturating_sub(side.block_height);
            let mut y = i64::from(band_start) + i64::from(slack / 2);
            for text in &side.lines {
                let width = font.text_width(text).ceil() as i64;
                let x = (i64::from(layout.canvas_width) - width).div_euclid(2);
                lines.push(PlacedLine {
                    mask: font.rasterize(text)?,
                    x,
                    y,
                });
                y += i64::from(layout.line_height);
            }
        }

        Ok(Self {
            layout,
            lines,
            fill: style.font_color,
            stroke: style.stroke_color,
        })
    }

    pub fn layout(&self) -> &CaptionLayout {
        &self.layout
    }

    /// Pad `frame` onto a white canvas and draw the captions.
    pub fn compose(&self, frame: &RgbImage) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(
            self.layout.canvas_width,
            self.layout.canvas_height,
            Rgb8::WHITE.to_pixel(),
        );
        let (ox, oy) = self.layout.frame_origin();
        image::imageops::replace(&mut canvas, frame, i64::from(ox), i64::from(oy));
        for line in &self.lines {
            stamp_stroked(
                &mut canvas,
                &line.mask,
                line.x,
                line.y,
                self.fill,
                self.stroke,
            );
        }
        canvas
    }
}

/// Summary of a finished caption pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionReport {
    pub frames: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub band_top: u32,
    pub band_bottom: u32,
    pub fps: f64,
    /// The preferred font was unavailable and the fixed-size built-in face was used.
    pub font_fallback: bool,
}

/// Add white border bands and captions to every frame of `input`, writing `output`.
#[tracing::instrument(skip(captions, style))]
pub fn caption_gif(
    input: &Path,
    output: &Path,
    captions: &Captions,
    style: &CaptionStyle,
) -> GifcapResult<CaptionReport> {
    style.validate()?;

    let source = GifSource::open(input)?;
    let (width, height) = source.dims();
    let font_size = style.font_size.resolve(width);
    let mut font = resolve_font(&style.font, font_size as f32)?;

    let layout = CaptionLayout::compute(width, height, captions, style, font_size, &mut font);
    tracing::debug!(
        font_size,
        top_lines = layout.top.lines.len(),
        bottom_lines = layout.bottom.lines.len(),
        band_top = layout.top.band,
        band_bottom = layout.bottom.band,
        "caption layout"
    );
    let painter = CaptionPainter::new(layout, &mut font, style)?;
    let fps = resolve_fps(style.fps, source.frame_rate(), style.fallback_fps)?;

    let mut sink = GifSink::create(
        output,
        GifSinkOpts {
            fps,
            quality: style.quality,
        },
    )?;
    for (i, frame) in source.enumerate() {
        let frame = frame?;
        sink.push_frame(&painter.compose(&frame))?;
        tracing::debug!(frame = i, "captioned frame");
    }
    let frames = sink.finish()?;

    let layout = painter.layout();
    let report = CaptionReport {
        frames,
        canvas_width: layout.canvas_width,
        canvas_height: layout.canvas_height,
        band_top: layout.top.band,
        band_bottom: layout.bottom.band,
        fps: fps.as_f64(),
        font_fallback: font.is_fallback(),
    };
    tracing::info!(
        frames,
        canvas = %format!("{}x{}", report.canvas_width, report.canvas_height),
        font_fallback = report.font_fallback,
        "caption pass complete"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/render/caption.rs"]
mod tests;
