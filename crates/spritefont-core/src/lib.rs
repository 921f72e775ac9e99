//! Spritefont Core: from vector outlines to packed glyph atlases
//!
//! A sprite font is a set of texture pages plus a table telling a renderer
//! where each character lives on them. This crate holds everything needed to
//! build one, without caring which library parses fonts or rasterizes
//! outlines.
//!
//! ## The Pipeline
//!
//! 1. **Font source** - a [`traits::FontLoader`] opens the font bytes at a pixel height
//! 2. **Rasterization** - each glyph becomes a bitmap in one of three styles
//!    (plain, contour-only, outlined), optionally blurred ([`render`])
//! 3. **Packing** - bitmaps are spread over as many fixed-size pages as needed ([`atlas`])
//! 4. **Assembly** - pages and the glyph table become a [`SpriteFont`]
//!
//! ```rust,no_run
//! use spritefont_core::{FontGenerator, FontSettings};
//! use std::sync::Arc;
//! # use spritefont_core::traits::*;
//! # fn loader() -> Arc<dyn FontLoader> { unimplemented!() }
//! # fn rasterizer() -> Arc<dyn GlyphRasterizer> { unimplemented!() }
//!
//! let generator = FontGenerator::builder()
//!     .loader(loader())
//!     .rasterizer(rasterizer())
//!     .build()?;
//!
//! let font = generator.generate(&FontSettings::simple("Ubuntu-R.ttf", 20))?;
//! println!("{} pages, {} glyphs", font.pages().len(), font.len());
//! # Ok::<(), spritefont_core::SpriteFontError>(())
//! ```
//!
//! ## The Traits That Power Everything
//!
//! - [`traits::FontLoader`] / [`traits::FontFace`] - charmap, metrics and outlines
//! - [`traits::GlyphRasterizer`] - outlines (optionally stroked) to coverage bitmaps
//! - [`traits::PageSource`] - hands page images to a loaded font

pub mod atlas;
pub mod error;
pub mod fixed;
pub mod font;
pub mod generator;
pub mod glyph;
pub mod image;
pub mod render;
pub mod settings;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use error::{Result, SpriteFontError};
pub use font::SpriteFont;
pub use generator::{FontGenerator, FontGeneratorBuilder};
pub use glyph::{Glyph, RenderedGlyph};
pub use image::Image;
pub use settings::{
    ContourStyle, FontSettings, OutlinedStyle, SimpleStyle, StyleSettings, TextureSize,
};

use serde::{Deserialize, Serialize};

/// The data structures shared by backends and the pipeline
pub mod types {
    use crate::fixed::F26Dot6;

    /// Unique identifier for a glyph within a font
    pub type GlyphId = u32;

    /// Axis-aligned rectangle in page pixels
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Rect {
        pub x: u32,
        pub y: u32,
        pub width: u32,
        pub height: u32,
    }

    impl Rect {
        pub const ZERO: Rect = Rect::new(0, 0, 0, 0);

        pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
            Self {
                x,
                y,
                width,
                height,
            }
        }

        pub const fn is_empty(&self) -> bool {
            self.width == 0 || self.height == 0
        }

        pub const fn right(&self) -> u32 {
            self.x + self.width
        }

        pub const fn bottom(&self) -> u32 {
            self.y + self.height
        }

        pub fn intersects(&self, other: &Rect) -> bool {
            !self.is_empty()
                && !other.is_empty()
                && self.x < other.right()
                && other.x < self.right()
                && self.y < other.bottom()
                && other.y < self.bottom()
        }

        /// Whether the rect lies inside a `width`x`height` page
        pub const fn fits_within(&self, width: u32, height: u32) -> bool {
            self.right() <= width && self.bottom() <= height
        }
    }

    /// Signed pixel offset from the render origin
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Offset {
        pub x: i32,
        pub y: i32,
    }

    impl Offset {
        pub const fn new(x: i32, y: i32) -> Self {
            Self { x, y }
        }
    }

    /// One entry of the font's Unicode charmap
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CharMapping {
        pub code_point: u32,
        pub glyph_id: GlyphId,
    }

    /// Face-wide metrics at the configured pixel height
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct SizeMetrics {
        pub ascender: F26Dot6,
        pub descender: F26Dot6,
        /// Baseline-to-baseline distance
        pub height: F26Dot6,
    }

    /// Per-glyph layout metrics of a loaded outline
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct GlyphMetrics {
        /// Origin to the left edge of the outline box
        pub bearing_x: F26Dot6,
        /// Baseline to the top edge of the outline box (y-up)
        pub bearing_y: F26Dot6,
        pub width: F26Dot6,
        pub height: F26Dot6,
        pub advance: F26Dot6,
    }

    /// Hinting target requested when loading an outline
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub enum HintTarget {
        /// Grid fitting tuned for anti-aliased output
        #[default]
        Normal,
        /// Grid fitting tuned for 1-bit output
        Mono,
    }

    /// How coverage is turned into pixels
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub enum RenderMode {
        /// 256 coverage levels
        #[default]
        Normal,
        /// 1 bit per pixel
        Mono,
    }

    impl RenderMode {
        pub const fn for_antialiasing(anti_aliasing: bool) -> Self {
            if anti_aliasing {
                RenderMode::Normal
            } else {
                RenderMode::Mono
            }
        }
    }

    impl HintTarget {
        pub const fn for_antialiasing(anti_aliasing: bool) -> Self {
            if anti_aliasing {
                HintTarget::Normal
            } else {
                HintTarget::Mono
            }
        }
    }

    /// Stroke applied to an outline before rasterization
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    pub enum StrokeStyle {
        /// Fill the outline as-is
        #[default]
        None,
        /// Stroke only the outline, `width / 2` on each side, no fill
        Contour { width: f32 },
        /// Fill the outline and grow it outward by `radius`
        Border { radius: f32 },
    }

    impl StrokeStyle {
        /// How far the stroked shape can reach past the outline box
        pub fn extent(&self) -> f32 {
            match *self {
                StrokeStyle::None => 0.0,
                StrokeStyle::Contour { width } => width / 2.0,
                StrokeStyle::Border { radius } => radius,
            }
        }
    }

    /// How pixels are stored in a [`RasterBitmap`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum PixelMode {
        /// One byte per pixel
        Gray,
        /// One bit per pixel, most significant bit first
        Mono,
    }

    /// A rasterized glyph as a backend hands it over
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RasterBitmap {
        /// Pixel column of the left edge, relative to the glyph origin
        pub left: i32,
        /// Pixel row of the top edge, measured upward from the baseline
        pub top: i32,
        pub width: u32,
        pub rows: u32,
        /// Bytes per row
        pub pitch: usize,
        pub pixel_mode: PixelMode,
        pub buffer: Vec<u8>,
    }

    impl RasterBitmap {
        /// A zero-sized bitmap (whitespace, failed glyphs)
        pub fn empty() -> Self {
            Self {
                left: 0,
                top: 0,
                width: 0,
                rows: 0,
                pitch: 0,
                pixel_mode: PixelMode::Gray,
                buffer: Vec::new(),
            }
        }

        pub fn is_empty(&self) -> bool {
            self.width == 0 || self.rows == 0
        }
    }

    /// An outline loaded at the configured size, ready to rasterize
    #[derive(Debug, Clone)]
    pub struct LoadedGlyph {
        pub glyph_id: GlyphId,
        pub metrics: GlyphMetrics,
        /// Outline in pixels, y pointing up, origin on the baseline
        pub outline: kurbo::BezPath,
    }
}

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::rgba(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::rgba(255, 255, 255, 255)
    }

    /// From the packed `0xAABBGGRR` form
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            r: (packed & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: ((packed >> 16) & 0xFF) as u8,
            a: (packed >> 24) as u8,
        }
    }

    /// To the packed `0xAABBGGRR` form
    pub const fn to_packed(self) -> u32 {
        (self.r as u32) | (self.g as u32) << 8 | (self.b as u32) << 16 | (self.a as u32) << 24
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA` (the `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() || (digits.len() != 6 && digits.len() != 8) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::white()
    }
}
