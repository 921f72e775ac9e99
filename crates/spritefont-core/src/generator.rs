//! The generation pipeline: font file in, sprite font out
//!
//! Read the font → open a sized face → render every charmap entry in the
//! configured style → pack the bitmaps → colorize the pages → assemble.
//! Runs synchronously on the calling thread.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, info};

use crate::atlas::{self, Atlas};
use crate::error::{FontLoadError, Result, SpriteFontError};
use crate::font::SpriteFont;
use crate::render::{line_height, GlyphRenderer};
use crate::settings::{FontSettings, StyleSettings};
use crate::traits::{FontFace, FontLoader, GlyphRasterizer};

/// Generates sprite fonts with a given font backend and rasterizer
///
/// ```ignore
/// use spritefont_core::{FontGenerator, FontSettings};
///
/// let generator = FontGenerator::builder()
///     .loader(Arc::new(SkrifaLoader::new()))
///     .rasterizer(Arc::new(ZenoRasterizer::new()))
///     .build()?;
///
/// let font = generator.generate(&FontSettings::outlined("Ubuntu-R.ttf", 40, 3))?;
/// ```
pub struct FontGenerator {
    loader: Arc<dyn FontLoader>,
    rasterizer: Arc<dyn GlyphRasterizer>,
}

impl FontGenerator {
    pub fn builder() -> FontGeneratorBuilder {
        FontGeneratorBuilder::new()
    }

    pub fn new(loader: Arc<dyn FontLoader>, rasterizer: Arc<dyn GlyphRasterizer>) -> Self {
        Self { loader, rasterizer }
    }

    pub fn loader(&self) -> &Arc<dyn FontLoader> {
        &self.loader
    }

    pub fn rasterizer(&self) -> &Arc<dyn GlyphRasterizer> {
        &self.rasterizer
    }

    /// Reads the settings' font file and opens it at the settings' height
    pub fn open_face(&self, settings: &FontSettings) -> Result<Box<dyn FontFace>> {
        let path = settings.src_path();
        let data = read_font_file(path).inspect_err(|e| error!("{}: {}", path.display(), e))?;
        self.loader
            .open(data, settings.height)
            .inspect_err(|e| error!("{}: {}", path.display(), e))
    }

    /// Runs the whole pipeline for one settings value
    pub fn generate(&self, settings: &FontSettings) -> Result<SpriteFont> {
        let settings = settings.validated()?;
        let face = self.open_face(&settings)?;

        let face_name = face.family_name().unwrap_or_else(|| file_stem(settings.src_path()));
        self.generate_from_face(face.as_ref(), &face_name, &settings)
    }

    /// Runs the pipeline on an already opened face
    pub fn generate_from_face(
        &self,
        face: &dyn FontFace,
        face_name: &str,
        settings: &FontSettings,
    ) -> Result<SpriteFont> {
        let started = Instant::now();
        let settings = settings.validated()?;

        let Atlas { pages, glyphs } = self.build_atlas(face, &settings)?;

        let pages: Vec<_> = match settings.style.page_color() {
            Some(color) => pages.iter().map(|page| Arc::new(page.to_rgba(color))).collect(),
            None => pages.into_iter().map(Arc::new).collect(),
        };

        let line_height = line_height(&face.size_metrics(), &settings.style);
        let font = SpriteFont::new(face_name, settings.height, line_height, pages, glyphs);

        info!(
            "{} | {} style, {} glyphs on {} page(s), generated in {} ms",
            settings.src_path().display(),
            settings.style.name(),
            font.len(),
            font.pages().len(),
            started.elapsed().as_millis()
        );
        Ok(font)
    }

    /// Renders and packs every glyph of `face`, leaving pages uncolored
    ///
    /// Simple and contour pages are grayscale coverage; outlined pages are
    /// RGBA.
    pub fn build_atlas(&self, face: &dyn FontFace, settings: &FontSettings) -> Result<Atlas> {
        let settings = settings.validated()?;
        let renderer = GlyphRenderer::new(face, self.rasterizer.as_ref(), &settings);

        let char_map = face.char_map();
        debug!(
            "Rendering {} glyphs with {} at {}px",
            char_map.len(),
            self.rasterizer.name(),
            settings.height
        );

        let mut rendered: Vec<_> = char_map
            .into_iter()
            .map(|mapping| renderer.render(mapping))
            .collect();
        atlas::demote_oversized(&mut rendered, settings.texture_size);

        let channels = match settings.style {
            StyleSettings::Outlined(_) => 4,
            StyleSettings::Simple(_) | StyleSettings::Contour(_) => 1,
        };
        atlas::build_atlas(rendered, settings.texture_size, channels)
    }
}

fn read_font_file(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(FontLoadError::FileNotFound(path.display().to_string()).into());
    }
    let data = std::fs::read(path)?;
    if data.is_empty() {
        return Err(FontLoadError::EmptyData(path.display().to_string()).into());
    }
    Ok(data)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Collects the backends for a [`FontGenerator`]
#[derive(Default)]
pub struct FontGeneratorBuilder {
    loader: Option<Arc<dyn FontLoader>>,
    rasterizer: Option<Arc<dyn GlyphRasterizer>>,
}

impl FontGeneratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Who parses font files
    pub fn loader(mut self, loader: Arc<dyn FontLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Who turns outlines into pixels
    pub fn rasterizer(mut self, rasterizer: Arc<dyn GlyphRasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    pub fn build(self) -> Result<FontGenerator> {
        let loader = self
            .loader
            .ok_or_else(|| SpriteFontError::ConfigError("No font loader configured".into()))?;
        let rasterizer = self
            .rasterizer
            .ok_or_else(|| SpriteFontError::ConfigError("No rasterizer configured".into()))?;
        Ok(FontGenerator::new(loader, rasterizer))
    }
}
