//! Glyph records: the transient rasterized form and the persisted entry

use crate::image::Image;
use crate::types::{Offset, Rect};

/// One glyph straight out of a style rasterizer, not yet on a page
#[derive(Debug, Clone, Default)]
pub struct RenderedGlyph {
    pub code_point: u32,
    /// Grayscale mask, or RGBA for outlined glyphs. Empty for whitespace.
    pub image: Image,
    /// From the pen position on the line's top edge to the bitmap's top-left
    pub offset: Offset,
    /// Whole-pixel distance to the next glyph's origin
    pub advance: i32,
}

impl RenderedGlyph {
    pub fn new(code_point: u32, image: Image, offset: Offset, advance: i32) -> Self {
        Self {
            code_point,
            image,
            offset,
            advance,
        }
    }

    /// A glyph that takes space but has no bitmap
    pub fn blank(code_point: u32, advance: i32) -> Self {
        Self::new(code_point, Image::empty(), Offset::default(), advance)
    }

    pub fn has_bitmap(&self) -> bool {
        !self.image.is_empty()
    }
}

/// Where a glyph lives on the pages, and how to place it when drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph {
    /// Pixel rect on the page, padding excluded
    pub rect: Rect,
    pub offset: Offset,
    pub advance: i32,
    /// Index into the font's pages, or [`Glyph::NO_PAGE`]
    pub page: u32,
}

impl Glyph {
    /// Page index of glyphs without a bitmap
    pub const NO_PAGE: u32 = u32::MAX;

    /// A glyph with a bitmap on `page`
    pub const fn placed(rect: Rect, offset: Offset, advance: i32, page: u32) -> Self {
        Self {
            rect,
            offset,
            advance,
            page,
        }
    }

    /// A glyph with nothing to draw, only an advance
    pub const fn blank(offset: Offset, advance: i32) -> Self {
        Self {
            rect: Rect::ZERO,
            offset,
            advance,
            page: Self::NO_PAGE,
        }
    }

    pub const fn has_page(&self) -> bool {
        self.page != Self::NO_PAGE
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self::blank(Offset::default(), 0)
    }
}
