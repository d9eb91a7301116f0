use image::RgbImage;

use crate::{foundation::core::Rgb8, text::font::GlyphMask};

/// Blend `color` over `dst` with 8-bit `coverage`.
pub fn over(dst: [u8; 3], color: Rgb8, coverage: u8) -> [u8; 3] {
    if coverage == 0 {
        return dst;
    }
    if coverage == 255 {
        return [color.r, color.g, color.b];
    }

    let cov = u16::from(coverage);
    let inv = 255u16 - cov;
    let src = [color.r, color.g, color.b];
    let mut out = [0u8; 3];
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), cov);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Paint `color` through `mask` with the line's pen at `(x, y)`. Pixels outside `dst` are
/// clipped.
pub fn stamp_mask(dst: &mut RgbImage, mask: &GlyphMask, x: i64, y: i64, color: Rgb8) {
    let (dw, dh) = dst.dimensions();
    let x0 = x + i64::from(mask.offset_x);
    let y0 = y + i64::from(mask.offset_y);

    for my in 0..mask.height {
        let ty = y0 + i64::from(my);
        if ty < 0 || ty >= i64::from(dh) {
            continue;
        }
        let row = &mask.coverage[(my * mask.width) as usize..((my + 1) * mask.width) as usize];
        for (mx, &cov) in row.iter().enumerate() {
            if cov == 0 {
                continue;
            }
            let tx = x0 + mx as i64;
            if tx < 0 || tx >= i64::from(dw) {
                continue;
            }
            let px = dst.get_pixel_mut(tx as u32, ty as u32);
            px.0 = over(px.0, color, cov);
        }
    }
}

/// Diagonal one-pixel offsets used for the outline pass.
pub const STROKE_OFFSETS: [(i64, i64); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Draw a line as four offset stroke stamps followed by one fill stamp.
pub fn stamp_stroked(
    dst: &mut RgbImage,
    mask: &GlyphMask,
    x: i64,
    y: i64,
    fill: Rgb8,
    stroke: Rgb8,
) {
    for (dx, dy) in STROKE_OFFSETS {
        stamp_mask(dst, mask, x + dx, y + dy, stroke);
    }
    stamp_mask(dst, mask, x, y, fill);
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
