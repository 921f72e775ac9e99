//! Integration tests for the zeno rasterizer on real outlines

use std::path::PathBuf;

use spritefont_core::image::Image;
use spritefont_core::traits::{FontFace, GlyphRasterizer};
use spritefont_core::types::{HintTarget, RenderMode, StrokeStyle};
use spritefont_fontdb::SkrifaFace;
use spritefont_render_zeno::ZenoRasterizer;

fn test_font() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("SPRITEFONT_TEST_FONT") {
        return Some(PathBuf::from(path));
    }
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|path| path.exists())
}

fn face(px: u32) -> Option<SkrifaFace> {
    let path = test_font().or_else(|| {
        eprintln!("Skipping: no test font found (set SPRITEFONT_TEST_FONT)");
        None
    })?;
    Some(SkrifaFace::from_file(path, px).unwrap())
}

fn glyph_id(face: &SkrifaFace, ch: char) -> u32 {
    face.char_map()
        .into_iter()
        .find(|m| m.code_point == ch as u32)
        .map(|m| m.glyph_id)
        .unwrap()
}

#[test]
fn test_renderer_name() {
    assert_eq!(ZenoRasterizer::new().name(), "zeno");
    assert_eq!(ZenoRasterizer::default().name(), "zeno");
}

#[test]
fn test_filled_letter_matches_grid_fitted_metrics() {
    let Some(face) = face(48) else { return };
    let glyph = face.load_glyph(glyph_id(&face, 'H'), HintTarget::Normal).unwrap();
    let bitmap = ZenoRasterizer::new()
        .rasterize(&glyph, StrokeStyle::None, RenderMode::Normal)
        .unwrap();

    // Metrics snap in 1/64 steps, bitmap bounds in floating point
    let m = glyph.metrics;
    assert!((bitmap.left - m.bearing_x.round_to_pixels()).abs() <= 1);
    assert!((bitmap.top - m.bearing_y.round_to_pixels()).abs() <= 1);
    assert!((bitmap.width as i32 - m.width.round_to_pixels()).abs() <= 1);
    assert!(bitmap.buffer.iter().any(|&c| c == 255));
}

#[test]
fn test_contour_has_less_ink_than_border() {
    let Some(face) = face(64) else { return };
    let glyph = face.load_glyph(glyph_id(&face, 'O'), HintTarget::Normal).unwrap();
    let rasterizer = ZenoRasterizer::new();

    let ink = |stroke| -> u64 {
        let bitmap = rasterizer.rasterize(&glyph, stroke, RenderMode::Normal).unwrap();
        bitmap.buffer.iter().map(|&c| c as u64).sum()
    };
    let fill = ink(StrokeStyle::None);
    let contour = ink(StrokeStyle::Contour { width: 2.0 });
    let border = ink(StrokeStyle::Border { radius: 3.0 });
    assert!(contour < fill);
    assert!(border > fill);
}

#[test]
fn test_mono_bitmap_converts_to_full_coverage() {
    let Some(face) = face(24) else { return };
    let glyph = face.load_glyph(glyph_id(&face, 'A'), HintTarget::Mono).unwrap();
    let bitmap = ZenoRasterizer::new()
        .rasterize(&glyph, StrokeStyle::None, RenderMode::Mono)
        .unwrap();

    let image = Image::from_raster(&bitmap).unwrap();
    assert_eq!(image.width(), bitmap.width);
    assert!(image.data().iter().all(|&c| c == 0 || c == 255));
    assert!(image.data().iter().any(|&c| c == 255));
}

#[test]
fn test_space_has_no_bitmap() {
    let Some(face) = face(24) else { return };
    let glyph = face.load_glyph(glyph_id(&face, ' '), HintTarget::Normal).unwrap();
    let bitmap = ZenoRasterizer::new()
        .rasterize(&glyph, StrokeStyle::Border { radius: 2.0 }, RenderMode::Normal)
        .unwrap();
    assert!(bitmap.is_empty());
}
