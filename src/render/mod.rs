//! Per-frame passes: Lanczos scaling and caption compositing.

/// Caption layout, painting, and the caption pass.
pub mod caption;
/// Pixel-level blending, mask stamping, and pasting.
pub mod composite;
/// Frame scaling and the scale pass.
pub mod scale;
