use super::*;
use crate::text::{builtin::BuiltinFont, font::OutlineFont};

/// Every character is 10px wide.
struct Monospace10;

impl TextMeasure for Monospace10 {
    fn text_width(&mut self, text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }
}

fn captions(top: Option<&str>, bottom: Option<&str>) -> Captions {
    Captions {
        top: top.map(str::to_string),
        bottom: bottom.map(str::to_string),
    }
}

fn gradient(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| image::Rgb([(x % 256) as u8, (y % 256) as u8, 77]))
}

fn is_white(p: &image::Rgb<u8>) -> bool {
    p.0 == [255, 255, 255]
}

fn builtin() -> FontHandle {
    FontHandle::Builtin(BuiltinFont::new().unwrap())
}

/// Bounding box and count of dark pixels in rows `y_range`.
fn dark_ink(
    img: &RgbImage,
    y_range: std::ops::Range<u32>,
) -> Option<(u32, u32, u32, u32, usize)> {
    let mut found: Option<(u32, u32, u32, u32, usize)> = None;
    for y in y_range {
        for x in 0..img.width() {
            if img.get_pixel(x, y).0.iter().any(|&c| c >= 100) {
                continue;
            }
            found = Some(match found {
                None => (x, y, x, y, 1),
                Some((x0, y0, x1, y1, n)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y), n + 1),
            });
        }
    }
    found
}

#[test]
fn empty_captions_use_base_border_on_both_sides() {
    let style = CaptionStyle::default();
    let layout =
        CaptionLayout::compute(200, 100, &Captions::default(), &style, 40, &mut Monospace10);
    assert_eq!(layout.top.band, 50);
    assert_eq!(layout.bottom.band, 50);
    assert_eq!((layout.canvas_width, layout.canvas_height), (300, 300));
    assert_eq!(layout.frame_origin(), (50, 100));

    let blank = captions(Some("   "), Some(""));
    let layout = CaptionLayout::compute(200, 100, &blank, &style, 40, &mut Monospace10);
    assert_eq!((layout.canvas_width, layout.canvas_height), (300, 300));
}

#[test]
fn short_caption_uses_min_border() {
    let style = CaptionStyle::default();
    let layout = CaptionLayout::compute(
        200,
        100,
        &captions(Some("Hello World"), None),
        &style,
        40,
        &mut Monospace10,
    );
    assert_eq!(layout.line_height, 45);
    assert_eq!(layout.top.lines, vec!["Hello World".to_string()]);
    assert_eq!(layout.top.block_height, 45);
    // 45 + 2 * 20 = 85 < 100.
    assert_eq!(layout.top.band, 100);
    assert_eq!(layout.bottom.band, 50);
    assert_eq!(layout.canvas_height, 100 + 100 + 100 + 50);
}

#[test]
fn tall_caption_uses_computed_border() {
    let style = CaptionStyle::default();
    // Max width 200 + 100 - 40 = 260px = 26 chars per line.
    let text = "the quick brown fox jumps over the lazy dog and keeps on running far away";
    let layout = CaptionLayout::compute(
        200,
        100,
        &captions(Some(text), None),
        &style,
        40,
        &mut Monospace10,
    );
    let n = layout.top.lines.len() as u32;
    assert!(n >= 3, "expected several lines, got {:?}", layout.top.lines);
    assert!(layout.top.lines.iter().all(|l| l.len() <= 26));
    assert_eq!(layout.top.block_height, n * 45);
    assert_eq!(layout.top.band, n * 45 + 40);
    assert!(layout.top.band > style.min_border_size);
    assert_eq!(layout.canvas_height, 100 + 100 + layout.top.band + 50);
}

#[test]
fn wrap_width_accounts_for_border_and_margin() {
    let style = CaptionStyle {
        border_size: 10,
        margin: 5,
        ..CaptionStyle::default()
    };
    // 20 + 20 - 10 = 30px = 3 chars.
    let layout = CaptionLayout::compute(
        20,
        20,
        &captions(None, Some("ab cd e")),
        &style,
        12,
        &mut Monospace10,
    );
    assert_eq!(layout.bottom.lines, vec!["ab".to_string(), "cd".to_string(), "e".to_string()]);
    assert_eq!(layout.bottom.band, 100);
    assert_eq!(layout.top.band, 10);
}

#[test]
fn compose_pastes_frame_at_origin() {
    let style = CaptionStyle::default();
    let mut font = builtin();
    let caps = captions(Some("Hello World"), None);
    let layout = CaptionLayout::compute(200, 100, &caps, &style, 40, &mut font);
    let painter = CaptionPainter::new(layout, &mut font, &style).unwrap();

    let frame = gradient(200, 100);
    let out = painter.compose(&frame);
    assert_eq!(out.dimensions(), (300, 350));

    let (ox, oy) = painter.layout().frame_origin();
    assert_eq!((ox, oy), (50, 150));
    for y in 0..100 {
        for x in 0..200 {
            assert_eq!(out.get_pixel(ox + x, oy + y), frame.get_pixel(x, y));
        }
    }
    assert!(is_white(out.get_pixel(ox - 1, oy)));
    assert!(is_white(out.get_pixel(ox, oy - 1)));
    assert!(is_white(out.get_pixel(ox + 200, oy + 99)));
    assert!(is_white(out.get_pixel(ox, oy + 100)));
}

#[test]
fn top_caption_is_centered_in_top_band() {
    let style = CaptionStyle::default();
    let mut font = builtin();
    let caps = captions(Some("Hi"), None);
    let layout = CaptionLayout::compute(200, 100, &caps, &style, 40, &mut font);
    let painter = CaptionPainter::new(layout, &mut font, &style).unwrap();
    let out = painter.compose(&gradient(200, 100));

    // Band 100, block 45: pen y = 27.
    let (x0, y0, x1, y1, n) = dark_ink(&out, 0..100).unwrap();
    assert!(n > 20, "only {n} dark pixels");
    assert!(y0 >= 27 && y1 < 27 + 45, "ink rows {y0}..={y1}");
    let center = (x0 + x1) as f32 / 2.0;
    assert!((center - 150.0).abs() <= 4.0, "ink centered at {center}");

    let bottom_start = painter.layout().bottom_band_start();
    assert!(
        (bottom_start..out.height())
            .all(|y| (0..out.width()).all(|x| is_white(out.get_pixel(x, y))))
    );
}

#[test]
fn outline_caption_draws_visible_text_at_requested_size() {
    let style = CaptionStyle::default();
    let face = OutlineFont::from_bytes(BuiltinFont::FONT_BYTES.to_vec(), 0, 40.0).unwrap();
    let mut font = FontHandle::Outline(face);
    let caps = captions(Some("HI"), None);
    let layout = CaptionLayout::compute(200, 100, &caps, &style, 40, &mut font);
    assert_eq!(layout.top.band, 100);
    let painter = CaptionPainter::new(layout, &mut font, &style).unwrap();
    let out = painter.compose(&gradient(200, 100));

    let (x0, y0, x1, y1, n) = dark_ink(&out, 0..100).unwrap();
    assert!(n > 100, "only {n} dark pixels");
    // Cap height is about 0.7 em, drawn below the pen at y = 27.
    let height = y1 - y0 + 1;
    assert!(height > 22 && height < 36, "ink height {height}");
    assert!(y0 > 27 && y1 < 27 + 45, "ink rows {y0}..={y1}");
    let center = (x0 + x1) as f32 / 2.0;
    assert!((center - 150.0).abs() <= 4.0, "ink centered at {center}");
}

#[test]
fn bottom_caption_lands_in_bottom_band() {
    let style = CaptionStyle {
        font_color: Rgb8::new(255, 0, 0),
        stroke_color: Rgb8::new(0, 0, 255),
        ..CaptionStyle::default()
    };
    let mut font = builtin();
    let caps = captions(None, Some("BYE"));
    let layout = CaptionLayout::compute(120, 60, &caps, &style, 40, &mut font);
    assert_eq!(layout.top.band, 50);
    assert_eq!(layout.bottom.band, 100);
    let painter = CaptionPainter::new(layout, &mut font, &style).unwrap();
    let out = painter.compose(&RgbImage::from_pixel(120, 60, image::Rgb([0, 255, 0])));

    let start = painter.layout().bottom_band_start();
    assert_eq!(start, out.height() - 100);
    let mut fill = 0;
    let mut stroke = 0;
    for (_, y, p) in out.enumerate_pixels() {
        let [r, g, b] = p.0;
        if r >= 128 && r > g && r > b {
            assert!(y >= start);
            fill += 1;
        } else if b >= 128 && b > r && b > g {
            assert!(y + 1 >= start);
            stroke += 1;
        }
    }
    assert!(fill > 0);
    assert!(stroke > 0);
}

#[test]
fn oversized_word_is_clipped_not_rejected() {
    let style = CaptionStyle {
        border_size: 4,
        margin: 0,
        ..CaptionStyle::default()
    };
    let mut font = builtin();
    let caps = captions(Some("WIDERTHANTHEFRAME"), None);
    let layout = CaptionLayout::compute(16, 16, &caps, &style, 12, &mut font);
    assert_eq!(layout.top.lines.len(), 1);
    let painter = CaptionPainter::new(layout, &mut font, &style).unwrap();
    let out = painter.compose(&RgbImage::new(16, 16));
    assert_eq!(out.width(), 24);
}
