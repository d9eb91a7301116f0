use std::path::{Path, PathBuf};

use crate::{
    config::{Captions, PipelineConfig},
    foundation::error::{GifcapError, GifcapResult},
    render::{
        caption::{CaptionReport, caption_gif},
        scale::{ScaleReport, scale_gif},
    },
};

/// Files written by [`run_pipeline`] and what each pass reported.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutputs {
    /// Scaled intermediate.
    pub enhanced: PathBuf,
    /// Captioned result.
    pub final_path: PathBuf,
    pub scale: ScaleReport,
    pub caption: CaptionReport,
}

/// `(enhanced, final)` output paths for `input`.
///
/// Both are the input's file name with the configured prefix, placed in `out_dir` when
/// given and next to the input otherwise.
pub fn output_paths(
    input: &Path,
    out_dir: Option<&Path>,
    cfg: &PipelineConfig,
) -> GifcapResult<(PathBuf, PathBuf)> {
    let name = input.file_name().ok_or_else(|| {
        GifcapError::validation(format!("input '{}' has no file name", input.display()))
    })?;
    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    let prefixed = |prefix: &str| {
        let mut file = std::ffi::OsString::from(prefix);
        file.push(name);
        dir.join(file)
    };
    Ok((
        prefixed(&cfg.enhanced_prefix),
        prefixed(&cfg.final_prefix),
    ))
}

/// Scale `input`, then caption the scaled copy.
///
/// The intermediate is kept on disk; a failure in either pass aborts the run.
#[tracing::instrument(skip(captions, cfg))]
pub fn run_pipeline(
    input: &Path,
    captions: &Captions,
    cfg: &PipelineConfig,
    out_dir: Option<&Path>,
) -> GifcapResult<PipelineOutputs> {
    cfg.validate()?;
    let (enhanced, final_path) = output_paths(input, out_dir, cfg)?;

    let scale = scale_gif(input, &enhanced, &cfg.scale)?;
    let caption = caption_gif(&enhanced, &final_path, captions, &cfg.caption)?;

    tracing::info!(
        enhanced = %enhanced.display(),
        final_path = %final_path.display(),
        "pipeline complete"
    );
    Ok(PipelineOutputs {
        enhanced,
        final_path,
        scale,
        caption,
    })
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
