//! The contracts between the pipeline and its backends
//!
//! The generator never touches a font parser or a rasterizer directly. It
//! receives them as trait objects, so tests can plug in synthetic faces and
//! hosts can bring their own libraries.
//!
//! - [`FontLoader`] - turns font bytes into a sized [`FontFace`]
//! - [`FontFace`] - charmap, metrics and outlines at one pixel height
//! - [`GlyphRasterizer`] - outlines to coverage bitmaps
//! - [`PageSource`] - page images for fonts loaded from disk

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::image::Image;
use crate::types::*;

/// The font-backend context: opens faces from raw bytes
///
/// ```ignore
/// struct MyLoader;
///
/// impl FontLoader for MyLoader {
///     fn name(&self) -> &'static str {
///         "my-loader"
///     }
///
///     fn open(&self, data: Vec<u8>, pixel_height: u32) -> Result<Box<dyn FontFace>> {
///         Ok(Box::new(MyFace::parse(data, pixel_height)?))
///     }
/// }
/// ```
pub trait FontLoader: Send + Sync {
    fn name(&self) -> &'static str;

    /// Takes ownership of `data` for as long as the face lives
    ///
    /// Fails when the bytes are empty or unparsable, when there is no
    /// Unicode charmap, or when the face cannot be scaled to `pixel_height`.
    fn open(&self, data: Vec<u8>, pixel_height: u32) -> Result<Box<dyn FontFace>>;
}

/// A font face scaled to a fixed pixel height
pub trait FontFace: Send + Sync {
    /// Family name from the font's naming table, if it has one
    fn family_name(&self) -> Option<String>;

    fn pixel_height(&self) -> u32;

    fn size_metrics(&self) -> SizeMetrics;

    /// Every (code point, glyph) pair of the Unicode charmap
    ///
    /// Sorted by code point, one entry per code point, glyph 0 left out.
    fn char_map(&self) -> Vec<CharMapping>;

    /// Loads one outline, grid-fitted for `target`
    fn load_glyph(&self, glyph_id: GlyphId, target: HintTarget) -> Result<LoadedGlyph>;
}

/// Turns outlines into bitmaps
pub trait GlyphRasterizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Rasterizes `glyph` after applying `stroke`
    ///
    /// The bitmap's `left`/`top` place it relative to the glyph origin, the
    /// way a font backend reports them. Glyphs without ink give an empty
    /// bitmap rather than an error.
    fn rasterize(
        &self,
        glyph: &LoadedGlyph,
        stroke: StrokeStyle,
        mode: RenderMode,
    ) -> Result<RasterBitmap>;
}

/// Acquires page images for a font being loaded
///
/// The returned image may be shared with other fonts; implementations are
/// free to cache.
pub trait PageSource: Send + Sync {
    fn acquire(&self, path: &Path) -> Result<Arc<Image>>;
}
