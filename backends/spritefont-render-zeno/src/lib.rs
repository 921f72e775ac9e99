//! Zeno rasterizer: outlines, contours and borders to coverage bitmaps
//!
//! Outlines arrive y-up with the origin on the baseline. They are flipped
//! while converting to zeno commands, so the rendered mask is already in
//! top-down row order and needs no post-flip.
//!
//! Three shapes come out of one outline:
//! - the filled outline
//! - a contour: the outline stroked with round joins and caps, unfilled
//! - a border: the filled outline grown outward by a radius

use kurbo::{BezPath, PathEl, Shape};
use log::trace;
use zeno::{Cap, Command, Join, Mask, Stroke};

use spritefont_core::error::{RenderError, Result};
use spritefont_core::traits::GlyphRasterizer;
use spritefont_core::types::*;

/// Coverage at or above this becomes a set bit in monochrome output
pub const MONO_THRESHOLD: u8 = 128;

/// Rasterizes glyph outlines with zeno
#[derive(Debug, Default, Clone, Copy)]
pub struct ZenoRasterizer;

impl ZenoRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Coverage mask of `commands` in a `width`x`height` box whose top-left
    /// corner sits at (`left`, `top`) in y-up glyph space
    fn render_mask(
        commands: &[Command],
        stroke: Option<f32>,
        left: i32,
        top: i32,
        width: u32,
        height: u32,
    ) -> Vec<u8> {
        let mut coverage = vec![0u8; width as usize * height as usize];
        let path: &[Command] = commands;
        let mut mask = Mask::new(path);
        mask.size(width, height).offset((-left, top));
        if let Some(width) = stroke {
            let mut style = Stroke::new(width);
            style.join(Join::Round).cap(Cap::Round);
            mask.style(style);
        }
        mask.render_into(&mut coverage, None);
        coverage
    }
}

impl GlyphRasterizer for ZenoRasterizer {
    fn name(&self) -> &'static str {
        "zeno"
    }

    fn rasterize(
        &self,
        glyph: &LoadedGlyph,
        stroke: StrokeStyle,
        mode: RenderMode,
    ) -> Result<RasterBitmap> {
        let outline = &glyph.outline;
        if outline.elements().is_empty() {
            return Ok(RasterBitmap::empty());
        }

        let bounds = outline.bounding_box();
        let finite = [bounds.x0, bounds.y0, bounds.x1, bounds.y1]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(RenderError::OutlineExtractionFailed(glyph.glyph_id).into());
        }

        let extent = stroke.extent().max(0.0) as f64;
        let left = (bounds.x0 - extent).floor() as i32;
        let right = (bounds.x1 + extent).ceil() as i32;
        let bottom = (bounds.y0 - extent).floor() as i32;
        let top = (bounds.y1 + extent).ceil() as i32;
        let width = (right - left).max(0) as u32;
        let rows = (top - bottom).max(0) as u32;
        if width == 0 || rows == 0 {
            return Ok(RasterBitmap::empty());
        }

        let commands = to_commands(outline);
        let coverage = match stroke {
            StrokeStyle::None => Self::render_mask(&commands, None, left, top, width, rows),
            StrokeStyle::Contour { width: stroke_width } => {
                if stroke_width <= 0.0 {
                    return Err(RenderError::BackendError(format!(
                        "contour width must be positive, got {stroke_width}"
                    ))
                    .into());
                }
                Self::render_mask(&commands, Some(stroke_width), left, top, width, rows)
            },
            StrokeStyle::Border { radius } => {
                let mut fill = Self::render_mask(&commands, None, left, top, width, rows);
                if radius > 0.0 {
                    let border =
                        Self::render_mask(&commands, Some(radius * 2.0), left, top, width, rows);
                    for (dst, src) in fill.iter_mut().zip(border) {
                        *dst = (*dst).max(src);
                    }
                }
                fill
            },
        };

        trace!(
            "Glyph {}: {}x{} at ({}, {}), {:?}",
            glyph.glyph_id,
            width,
            rows,
            left,
            top,
            stroke
        );

        Ok(match mode {
            RenderMode::Normal => RasterBitmap {
                left,
                top,
                width,
                rows,
                pitch: width as usize,
                pixel_mode: PixelMode::Gray,
                buffer: coverage,
            },
            RenderMode::Mono => {
                let pitch = (width as usize).div_ceil(8);
                RasterBitmap {
                    left,
                    top,
                    width,
                    rows,
                    pitch,
                    pixel_mode: PixelMode::Mono,
                    buffer: pack_mono(&coverage, width as usize, pitch),
                }
            },
        })
    }
}

/// Thresholds coverage into 1-bit rows, most significant bit first
fn pack_mono(coverage: &[u8], width: usize, pitch: usize) -> Vec<u8> {
    let rows = coverage.len() / width.max(1);
    let mut bits = vec![0u8; pitch * rows];
    for (y, row) in coverage.chunks_exact(width).enumerate() {
        for (x, &value) in row.iter().enumerate() {
            if value >= MONO_THRESHOLD {
                bits[y * pitch + (x >> 3)] |= 0x80 >> (x & 7);
            }
        }
    }
    bits
}

/// Converts a y-up kurbo path into y-down zeno commands
fn to_commands(path: &BezPath) -> Vec<Command> {
    let pt = |p: kurbo::Point| -> zeno::Vector { [p.x as f32, -p.y as f32].into() };
    path.elements()
        .iter()
        .map(|el| match *el {
            PathEl::MoveTo(p) => Command::MoveTo(pt(p)),
            PathEl::LineTo(p) => Command::LineTo(pt(p)),
            PathEl::QuadTo(c, p) => Command::QuadTo(pt(c), pt(p)),
            PathEl::CurveTo(c0, c1, p) => Command::CurveTo(pt(c0), pt(c1), pt(p)),
            PathEl::ClosePath => Command::Close,
        })
        .collect()
}
