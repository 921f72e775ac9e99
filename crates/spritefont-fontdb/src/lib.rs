//! Where font files become sized faces: the skrifa font source
//!
//! A [`SkrifaFace`] owns the raw font bytes for its whole life and parses
//! them on demand, so there is no self-referential borrowing and nothing is
//! leaked. Hinting instances are built once per face, one per target.
//!
//! Metrics follow the grid-fitted conventions of classic font rasterizers:
//! ascenders round up, descenders round down, bearings snap outward to the
//! pixel grid. All of them are reported in 26.6 fixed point.

use std::path::Path;

use kurbo::{BezPath, Shape};
use log::{debug, warn};
use read_fonts::FileRef;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{
    DrawSettings, Engine, HintingInstance, HintingOptions, OutlinePen, SmoothMode, Target,
};
use skrifa::string::StringId;
use skrifa::{FontRef, GlyphId as SkrifaGlyphId, MetadataProvider};

use spritefont_core::error::{FontLoadError, RenderError, Result};
use spritefont_core::fixed::F26Dot6;
use spritefont_core::traits::{FontFace, FontLoader};
use spritefont_core::types::*;

/// Opens faces with skrifa
#[derive(Debug, Default, Clone, Copy)]
pub struct SkrifaLoader;

impl SkrifaLoader {
    pub fn new() -> Self {
        Self
    }
}

impl FontLoader for SkrifaLoader {
    fn name(&self) -> &'static str {
        "skrifa"
    }

    fn open(&self, data: Vec<u8>, pixel_height: u32) -> Result<Box<dyn FontFace>> {
        Ok(Box::new(SkrifaFace::from_data(data, pixel_height)?))
    }
}

/// A font face at one pixel height
pub struct SkrifaFace {
    data: Vec<u8>,
    pixel_height: u32,
    size_metrics: SizeMetrics,
    family_name: Option<String>,
    /// Grid fitting for anti-aliased output
    hinting_normal: Option<HintingInstance>,
    /// Grid fitting for 1-bit output
    hinting_mono: Option<HintingInstance>,
}

impl SkrifaFace {
    /// Reads a font file and sizes its first face
    pub fn from_file(path: impl AsRef<Path>, pixel_height: u32) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|_| FontLoadError::FileNotFound(path.display().to_string()))?;
        if data.is_empty() {
            return Err(FontLoadError::EmptyData(path.display().to_string()).into());
        }
        Self::from_data(data, pixel_height)
    }

    /// Takes ownership of font bytes and sizes the first face
    ///
    /// Collections are accepted; only their first face is used.
    pub fn from_data(data: Vec<u8>, pixel_height: u32) -> Result<Self> {
        if data.is_empty() {
            return Err(FontLoadError::EmptyData("<memory>".to_string()).into());
        }
        if pixel_height == 0 {
            return Err(FontLoadError::InvalidPixelSize(pixel_height).into());
        }
        if let Ok(FileRef::Collection(collection)) = FileRef::new(&data) {
            warn!(
                "Font collection with {} faces, using the first one",
                collection.len()
            );
        }

        let font = FontRef::from_index(&data, 0).map_err(|_| FontLoadError::InvalidData)?;
        if !font.charmap().has_map() {
            return Err(FontLoadError::NoUnicodeCharmap.into());
        }

        let size = Size::new(pixel_height as f32);
        let metrics = font.metrics(size, LocationRef::default());
        if metrics.units_per_em == 0 {
            return Err(FontLoadError::InvalidPixelSize(pixel_height).into());
        }
        let size_metrics = SizeMetrics {
            ascender: F26Dot6::from_f32(metrics.ascent).ceil(),
            descender: F26Dot6::from_f32(metrics.descent).floor(),
            height: F26Dot6::from_f32(metrics.ascent - metrics.descent + metrics.leading).round(),
        };

        let family_name = font
            .localized_strings(StringId::FAMILY_NAME)
            .english_or_first()
            .map(|name| name.to_string())
            .filter(|name| !name.is_empty());

        let outlines = font.outline_glyphs();
        let hinting = |target: Target| {
            let options = HintingOptions {
                engine: Engine::AutoFallback,
                target,
            };
            HintingInstance::new(&outlines, size, LocationRef::default(), options)
                .inspect_err(|e| warn!("Hinting unavailable, outlines stay unhinted: {e}"))
                .ok()
        };
        let hinting_normal = hinting(Target::Smooth {
            mode: SmoothMode::Normal,
            symmetric_rendering: false,
            preserve_linear_metrics: true,
        });
        let hinting_mono = hinting(Target::Mono);

        debug!(
            "Opened {:?} at {}px: ascender {}, descender {}, height {}",
            family_name,
            pixel_height,
            size_metrics.ascender.to_f32(),
            size_metrics.descender.to_f32(),
            size_metrics.height.to_f32()
        );

        Ok(Self {
            data,
            pixel_height,
            size_metrics,
            family_name,
            hinting_normal,
            hinting_mono,
        })
    }

    /// Creates a FontRef on demand; the bytes were validated on open
    fn font_ref(&self) -> Result<FontRef<'_>> {
        FontRef::from_index(&self.data, 0).map_err(|_| FontLoadError::InvalidData.into())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn hinting_for(&self, target: HintTarget) -> Option<&HintingInstance> {
        match target {
            HintTarget::Normal => self.hinting_normal.as_ref(),
            HintTarget::Mono => self.hinting_mono.as_ref(),
        }
    }
}

impl FontFace for SkrifaFace {
    fn family_name(&self) -> Option<String> {
        self.family_name.clone()
    }

    fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    fn size_metrics(&self) -> SizeMetrics {
        self.size_metrics
    }

    fn char_map(&self) -> Vec<CharMapping> {
        let Ok(font) = self.font_ref() else {
            return Vec::new();
        };
        let mut mappings: Vec<CharMapping> = font
            .charmap()
            .mappings()
            .filter(|(_, gid)| gid.to_u32() != 0)
            .map(|(code_point, gid)| CharMapping {
                code_point,
                glyph_id: gid.to_u32(),
            })
            .collect();
        mappings.sort_by_key(|m| m.code_point);
        mappings.dedup_by_key(|m| m.code_point);
        mappings
    }

    fn load_glyph(&self, glyph_id: GlyphId, target: HintTarget) -> Result<LoadedGlyph> {
        let font = self.font_ref()?;
        let size = Size::new(self.pixel_height as f32);
        let gid = SkrifaGlyphId::new(glyph_id);

        let outline = font
            .outline_glyphs()
            .get(gid)
            .ok_or(RenderError::GlyphNotFound(glyph_id))?;

        let hinting = self.hinting_for(target);
        let settings = match hinting {
            Some(instance) => DrawSettings::hinted(instance, false),
            None => DrawSettings::unhinted(size, LocationRef::default()),
        };

        let mut pen = BezPathPen::default();
        let adjusted = outline
            .draw(settings, &mut pen)
            .map_err(|_| RenderError::OutlineExtractionFailed(glyph_id))?;

        let advance = adjusted
            .advance_width
            .or_else(|| {
                font.glyph_metrics(size, LocationRef::default())
                    .advance_width(gid)
            })
            .unwrap_or(0.0);
        let mut advance = F26Dot6::from_f32(advance);
        if hinting.is_some() {
            advance = advance.round();
        }

        Ok(LoadedGlyph {
            glyph_id,
            metrics: grid_fitted_metrics(&pen.path, advance),
            outline: pen.path,
        })
    }
}

/// Bearings and size of the outline's box, snapped outward to whole pixels
fn grid_fitted_metrics(path: &BezPath, advance: F26Dot6) -> GlyphMetrics {
    if path.elements().is_empty() {
        return GlyphMetrics {
            advance,
            ..GlyphMetrics::default()
        };
    }
    let bounds = path.bounding_box();
    let left = F26Dot6::from_f32(bounds.x0 as f32).floor();
    let right = F26Dot6::from_f32(bounds.x1 as f32).ceil();
    let bottom = F26Dot6::from_f32(bounds.y0 as f32).floor();
    let top = F26Dot6::from_f32(bounds.y1 as f32).ceil();
    GlyphMetrics {
        bearing_x: left,
        bearing_y: top,
        width: right - left,
        height: top - bottom,
        advance,
    }
}

/// Collects skrifa outline commands into a kurbo path, y up
#[derive(Default)]
struct BezPathPen {
    path: BezPath,
}

impl OutlinePen for BezPathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path
            .quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}
