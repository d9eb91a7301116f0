use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Upscale a GIF, then add top and bottom captions in white border bands.
///
/// Writes `enhanced-<name>` (scaled) and `final-<name>` (captioned) next to the input.
#[derive(Parser, Debug)]
#[command(name = "gifcap", version)]
struct Cli {
    /// Input GIF.
    input: PathBuf,

    /// Caption for the top band.
    top: Option<String>,

    /// Caption for the bottom band.
    bottom: Option<String>,

    /// Scale factor applied to both axes.
    #[arg(long)]
    scale: Option<f64>,

    /// Output frame rate for both passes (defaults to the source rate).
    #[arg(long)]
    fps: Option<f64>,

    /// Output quality hint, 1..=100.
    #[arg(long)]
    quality: Option<u8>,

    /// Caption font file (TTF/OTF).
    #[arg(long, conflicts_with = "font_family")]
    font_file: Option<PathBuf>,

    /// Caption font family, looked up among installed fonts.
    #[arg(long)]
    font_family: Option<String>,

    /// Fixed caption font size in pixels (defaults to a size derived from frame width).
    #[arg(long)]
    font_size: Option<u32>,

    /// JSON pipeline config; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the outputs (defaults to the input's directory).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print diagnostics about caption font resolution (family name + SHA-256 of font bytes).
    #[arg(long)]
    dump_font: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gifcap=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = build_config(&cli)?;

    if cli.dump_font {
        dump_font_diagnostics(&cli.input, &cfg)?;
    }

    let captions = gifcap::Captions::new(cli.top, cli.bottom);
    let out = gifcap::run_pipeline(&cli.input, &captions, &cfg, cli.out_dir.as_deref())
        .with_context(|| format!("process '{}'", cli.input.display()))?;

    eprintln!("wrote {}", out.enhanced.display());
    eprintln!("wrote {}", out.final_path.display());
    Ok(())
}

fn build_config(cli: &Cli) -> anyhow::Result<gifcap::PipelineConfig> {
    let mut cfg = match &cli.config {
        Some(path) => gifcap::PipelineConfig::from_json_file(path)?,
        None => gifcap::PipelineConfig::default(),
    };

    if let Some(scale) = cli.scale {
        cfg.scale.scale_factor = scale;
    }
    if let Some(fps) = cli.fps {
        cfg.scale.fps = Some(fps);
        cfg.caption.fps = Some(fps);
    }
    if let Some(quality) = cli.quality {
        cfg.scale.quality = quality;
        cfg.caption.quality = quality;
    }
    if let Some(path) = &cli.font_file {
        cfg.caption.font = gifcap::FontSource::File(path.clone());
    }
    if let Some(family) = &cli.font_family {
        cfg.caption.font = gifcap::FontSource::Family(family.clone());
    }
    if let Some(px) = cli.font_size {
        cfg.caption.font_size = gifcap::FontSizing::Fixed(px);
    }

    cfg.validate()?;
    Ok(cfg)
}

fn dump_font_diagnostics(input: &Path, cfg: &gifcap::PipelineConfig) -> anyhow::Result<()> {
    // Size as seen by the caption pass, which runs on the scaled frames.
    let source = gifcap::GifSource::open(input)?;
    let (w, h) = source.dims();
    let (scaled_w, _) = gifcap::scaled_dims(w, h, cfg.scale.scale_factor)?;
    let size_px = cfg.caption.font_size.resolve(scaled_w);

    let font = gifcap::resolve_font(&cfg.caption.font, size_px as f32)?;
    let desc = font.describe();
    eprintln!("caption font diagnostics:");
    eprintln!("  font_source: {}", cfg.caption.font);
    eprintln!("  family:      {}", desc.family);
    eprintln!("  size_px:     {}", desc.size_px);
    eprintln!("  fallback:    {}", desc.fallback);
    eprintln!("  sha256:      {}", desc.sha256);
    Ok(())
}
