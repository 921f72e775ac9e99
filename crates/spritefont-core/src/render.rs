//! Per-style glyph rendering
//!
//! Every style starts from the same loaded outline and the same layout
//! numbers. They differ in what gets rasterized and how the bitmaps are
//! combined:
//!
//! - **Simple**: the outline filled, optionally blurred
//! - **Contour**: only a stroke along the outline, optionally blurred
//! - **Outlined**: the filled outline drawn over a grown "shell", each in its
//!   own color; only the shell is blurred

use log::warn;

use crate::error::Result;
use crate::fixed::F26Dot6;
use crate::glyph::RenderedGlyph;
use crate::image::Image;
use crate::settings::{FontSettings, OutlinedStyle, StyleSettings};
use crate::traits::{FontFace, GlyphRasterizer};
use crate::types::*;

/// Line height of a face rendered in `style`
pub fn line_height(metrics: &SizeMetrics, style: &StyleSettings) -> i32 {
    metrics.height.round_to_pixels() + style.line_height_extra() as i32
}

/// Renders glyphs of one face in one style
pub struct GlyphRenderer<'a> {
    face: &'a dyn FontFace,
    rasterizer: &'a dyn GlyphRasterizer,
    style: StyleSettings,
    anti_aliasing: bool,
    ascender: F26Dot6,
}

impl<'a> GlyphRenderer<'a> {
    pub fn new(
        face: &'a dyn FontFace,
        rasterizer: &'a dyn GlyphRasterizer,
        settings: &FontSettings,
    ) -> Self {
        Self {
            face,
            rasterizer,
            style: settings.style,
            anti_aliasing: settings.anti_aliasing,
            ascender: face.size_metrics().ascender,
        }
    }

    /// Renders one charmap entry, never failing
    ///
    /// A glyph that cannot be loaded comes back blank with no advance. One
    /// that loads but cannot be rasterized keeps its advance and offset.
    pub fn render(&self, mapping: CharMapping) -> RenderedGlyph {
        let target = HintTarget::for_antialiasing(self.anti_aliasing);
        let loaded = match self.face.load_glyph(mapping.glyph_id, target) {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(
                    "U+{:04X} (glyph {}): load failed: {}",
                    mapping.code_point, mapping.glyph_id, e
                );
                return RenderedGlyph::blank(mapping.code_point, 0);
            },
        };

        let offset = self.base_offset(&loaded.metrics);
        let advance = loaded.metrics.advance.round_to_pixels() + self.style.advance_extra() as i32;

        let result = match self.style {
            StyleSettings::Simple(s) => self.render_plain(&loaded, StrokeStyle::None, s.blur_radius),
            StyleSettings::Contour(s) => {
                self.render_plain(&loaded, self.style.stroke(), s.blur_radius)
            },
            StyleSettings::Outlined(s) => self.render_outlined(&loaded, &s),
        };

        match result {
            Ok((image, shift)) => RenderedGlyph::new(
                mapping.code_point,
                image,
                Offset::new(offset.x - shift, offset.y - shift),
                advance,
            ),
            Err(e) => {
                warn!(
                    "U+{:04X} (glyph {}): rasterization failed: {}",
                    mapping.code_point, mapping.glyph_id, e
                );
                RenderedGlyph::new(mapping.code_point, Image::empty(), offset, advance)
            },
        }
    }

    /// Offset of the unstroked, unblurred bitmap from the line's top-left
    fn base_offset(&self, metrics: &GlyphMetrics) -> Offset {
        Offset::new(
            metrics.bearing_x.round_to_pixels(),
            (self.ascender - metrics.bearing_y).round_to_pixels(),
        )
    }

    fn render_mode(&self) -> RenderMode {
        RenderMode::for_antialiasing(self.anti_aliasing)
    }

    /// Simple and contour glyphs: one grayscale bitmap, blurred in a grown
    /// canvas. Returns the bitmap and how far its offset moves up-left.
    fn render_plain(
        &self,
        glyph: &LoadedGlyph,
        stroke: StrokeStyle,
        blur_radius: u32,
    ) -> Result<(Image, i32)> {
        let bitmap = self.rasterizer.rasterize(glyph, stroke, self.render_mode())?;
        let mut image = Image::from_raster(&bitmap)?;

        if blur_radius == 0 || image.is_empty() {
            return Ok((image, 0));
        }
        image.blur(blur_radius);
        Ok((image, blur_radius as i32))
    }

    /// Core glyph composited over its colored shell
    fn render_outlined(&self, glyph: &LoadedGlyph, style: &OutlinedStyle) -> Result<(Image, i32)> {
        let mode = self.render_mode();
        let core_bitmap = self.rasterizer.rasterize(glyph, StrokeStyle::None, mode)?;
        let shell_bitmap = self.rasterizer.rasterize(
            glyph,
            StrokeStyle::Border {
                radius: style.outline_thickness as f32,
            },
            mode,
        )?;

        let core = Image::from_raster(&core_bitmap)?;
        let mut shell = Image::from_raster(&shell_bitmap)?;
        if shell.is_empty() {
            return Ok((Image::empty(), 0));
        }

        // Where the core sits inside the shell; not always the thickness
        let mut delta = (
            core_bitmap.left - shell_bitmap.left,
            shell_bitmap.top - core_bitmap.top,
        );

        let mut shift = 0;
        if style.outline_blur_radius > 0 {
            let r = style.outline_blur_radius;
            shell.blur(r);
            delta.0 += r as i32;
            delta.1 += r as i32;
            shift = r as i32;
        }

        let mut image = shell.to_rgba(style.outline_color);
        if style.main_color != style.outline_color {
            image.composite_mask(&core, delta, style.main_color)?;
        }
        Ok((image, shift))
    }
}
