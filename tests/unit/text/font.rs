use std::path::PathBuf;

use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_font").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn embedded_face(size_px: f32) -> OutlineFont {
    OutlineFont::from_bytes(BuiltinFont::FONT_BYTES.to_vec(), 0, size_px).unwrap()
}

/// `(x0, y0, x1, y1, count)` of pixels with coverage above half.
fn ink(mask: &GlyphMask) -> (u32, u32, u32, u32, usize) {
    let (mut x0, mut y0, mut x1, mut y1, mut n) = (u32::MAX, u32::MAX, 0, 0, 0);
    for y in 0..mask.height {
        for x in 0..mask.width {
            if mask.coverage[(y * mask.width + x) as usize] >= 128 {
                x0 = x0.min(x);
                y0 = y0.min(y);
                x1 = x1.max(x);
                y1 = y1.max(y);
                n += 1;
            }
        }
    }
    (x0, y0, x1, y1, n)
}

#[test]
fn missing_font_file_falls_back_to_builtin() {
    let src = FontSource::File(PathBuf::from("target/definitely/not/here.ttf"));
    let font = resolve_font(&src, 48.0).unwrap();
    assert!(font.is_fallback());
    let desc = font.describe();
    assert!(desc.fallback);
    assert_eq!(desc.family, "Tuffy");
    assert_eq!(desc.size_px, BuiltinFont::SIZE_PX);
    assert_eq!(desc.sha256.len(), 64);
}

#[test]
fn corrupt_font_file_falls_back_to_builtin() {
    let dir = scratch_dir("corrupt");
    let path = dir.join("broken.ttf");
    std::fs::write(&path, b"this is not a font").unwrap();

    let font = resolve_font(&FontSource::File(path), 48.0).unwrap();
    assert!(font.is_fallback());
}

#[test]
fn unknown_family_falls_back_to_builtin() {
    let src = FontSource::Family("No Such Family 8d1f0c".to_string());
    assert!(resolve_font(&src, 30.0).unwrap().is_fallback());
}

#[test]
fn fallback_ignores_requested_size() {
    let src = FontSource::File(PathBuf::from("target/missing.ttf"));
    let mut small = resolve_font(&src, 10.0).unwrap();
    let mut large = resolve_font(&src, 150.0).unwrap();
    assert_eq!(small.text_width("caption"), large.text_width("caption"));
    assert_eq!(
        small.rasterize("caption").unwrap(),
        large.rasterize("caption").unwrap()
    );
}

#[test]
fn font_file_loads_as_outline_at_requested_size() {
    let dir = scratch_dir("file");
    let path = dir.join("Tuffy.ttf");
    std::fs::write(&path, BuiltinFont::FONT_BYTES).unwrap();

    let mut font = resolve_font(&FontSource::File(path), 60.0).unwrap();
    assert!(!font.is_fallback());
    let desc = font.describe();
    assert_eq!(desc.family, "Tuffy");
    assert_eq!(desc.size_px, 60.0);
    assert!(font.text_width("HI") > 2.0 * BuiltinFont::new().unwrap().text_width("HI"));
}

#[test]
fn outline_glyphs_land_inside_the_mask() {
    let size = 40.0;
    let mut font = embedded_face(size);
    let mask = font.rasterize("HI").unwrap();
    let (x0, y0, x1, y1, n) = ink(&mask);

    assert!(n * 20 > mask.coverage.len(), "only {n} inked pixels");
    // Glyphs are below the pad, not clipped at the top edge.
    assert!(y0 >= 2, "ink starts at row {y0}");
    assert!(y1 + 2 < mask.height, "ink reaches row {y1} of {}", mask.height);
    // Cap height of the face is about 0.7 em.
    let cap = (y1 - y0 + 1) as f32;
    assert!(cap > size * 0.55 && cap < size * 0.85, "cap height {cap}");
    assert!(x1 > x0);
}

#[test]
fn outline_ink_spans_measured_width() {
    let mut font = embedded_face(40.0);
    let width = font.text_width("Hello World");
    let mask = font.rasterize("Hello World").unwrap();
    let (x0, _, x1, _, _) = ink(&mask);
    assert!((x1 - x0) as f32 > width * 0.85, "ink x {x0}..{x1}, width {width}");
    assert!(x1 as f32 <= width + 4.0);
}

#[test]
fn installed_family_renders_when_present() {
    let mut font = resolve_font(&FontSource::Family("DejaVu Sans".to_string()), 32.0).unwrap();
    if font.is_fallback() {
        // Not installed on this machine.
        return;
    }
    let mask = font.rasterize("Hi").unwrap();
    let (_, y0, _, y1, n) = ink(&mask);
    assert!(n > 50);
    assert!(y0 >= 2);
    assert!((y1 - y0 + 1) as f32 > 32.0 * 0.55);
}

#[test]
fn face_index_must_exist() {
    assert!(OutlineFont::from_bytes(BuiltinFont::FONT_BYTES.to_vec(), 1, 24.0).is_err());
    assert_eq!(embedded_face(24.0).family_name(), "Tuffy");
}

#[test]
fn outline_font_rejects_bad_size_and_bytes() {
    assert!(OutlineFont::from_bytes(vec![0u8; 16], 0, 0.0).is_err());
    assert!(OutlineFont::from_bytes(vec![0u8; 16], 0, 12.0).is_err());
}

#[test]
fn font_source_display_and_default() {
    assert_eq!(FontSource::default(), FontSource::Family("Verdana".into()));
    assert_eq!(
        FontSource::Family("Arial".into()).to_string(),
        "family 'Arial'"
    );
    assert!(
        FontSource::File(PathBuf::from("a.ttf"))
            .to_string()
            .contains("a.ttf")
    );
}
