//! Caption text: font resolution, measurement, rasterization, and word wrap.

/// Embedded fixed-size fallback face.
pub mod builtin;
/// Font sources, outline fonts, and the resolved font handle.
pub mod font;
/// Greedy word wrap over a width measure.
pub mod wrap;
