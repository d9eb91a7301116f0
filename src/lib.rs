//! gifcap upscales animated GIFs and adds wrapped, stroked captions inside white border bands.
//!
//! The work happens in two passes over a [`GifSource`]:
//!
//! - [`scale_gif`] resizes every frame by a constant factor
//! - [`caption_gif`] pads every frame with white bands and draws the captions
//!
//! [`run_pipeline`] chains both and names the outputs the way the CLI does.
#![forbid(unsafe_code)]

mod assets;
mod foundation;

/// Tunable parameters and their defaults.
pub mod config;
/// Animation sinks.
pub mod encode;
/// Two-pass driver.
pub mod pipeline;
/// Frame transforms: scaling, caption layout and compositing.
pub mod render;
/// Fonts, measurement and line wrapping.
pub mod text;

pub use crate::foundation::core::{Fps, Rgb8, resolve_fps};
pub use crate::foundation::error::{GifcapError, GifcapResult};

pub use crate::assets::decode::{Animation, GifSource, read_gif};
pub use crate::config::{CaptionStyle, Captions, FontSizing, PipelineConfig, ScaleOpts};
pub use crate::encode::sink::{GifSink, GifSinkOpts};
pub use crate::pipeline::{PipelineOutputs, output_paths, run_pipeline};
pub use crate::render::caption::{CaptionLayout, CaptionPainter, CaptionReport, caption_gif};
pub use crate::render::scale::{ScaleReport, scale_frame, scale_gif, scaled_dims};
pub use crate::text::font::{FontDescription, FontHandle, FontSource, resolve_font};
pub use crate::text::wrap::{TextMeasure, wrap_text};
