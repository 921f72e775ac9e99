//! Spritefont - glyph atlases from TrueType and OpenType fonts
//!
//! Turns a font file into texture pages and a glyph table that a game or UI
//! renderer can draw text from, in one of three styles:
//!
//! - **Simple** - the filled glyph, optionally blurred
//! - **Contour** - only the stroked outline of the glyph
//! - **Outlined** - the glyph on top of a thicker, differently colored shell
//!
//! # Example
//!
//! ```no_run
//! use spritefont::prelude::*;
//!
//! let settings = FontSettings::outlined("DejaVuSans.ttf", 32, 3)
//!     .with_texture_size(TextureSize::square(512));
//! let font = spritefont::generate_font(&settings)?;
//! spritefont::export::save_font(&font, "dejavu.fnt")?;
//! # Ok::<(), SpriteFontError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `export` (default): saving and loading through [`export`]

use std::sync::Arc;

pub use spritefont_core::{
    atlas, error, traits, types, Color, ContourStyle, FontGenerator, FontSettings, Glyph, Image,
    OutlinedStyle, SimpleStyle, SpriteFont, StyleSettings, TextureSize,
};

pub use spritefont_fontdb as fontdb;
pub use spritefont_render_zeno as render_zeno;

#[cfg(feature = "export")]
pub use spritefont_export as export;

use spritefont_core::Result;
use spritefont_fontdb::SkrifaLoader;
use spritefont_render_zeno::ZenoRasterizer;

/// A generator wired to the skrifa font source and the zeno rasterizer
pub fn default_generator() -> FontGenerator {
    FontGenerator::new(Arc::new(SkrifaLoader::new()), Arc::new(ZenoRasterizer::new()))
}

/// Generates a sprite font with the default backends
pub fn generate_font(settings: &FontSettings) -> Result<SpriteFont> {
    default_generator().generate(settings)
}

/// Common imports for typical usage
pub mod prelude {
    pub use spritefont_core::{
        error::{Result, SpriteFontError},
        traits::{FontFace, FontLoader, GlyphRasterizer, PageSource},
        types::{Offset, Rect},
        Color, FontGenerator, FontSettings, Glyph, SpriteFont, StyleSettings, TextureSize,
    };

    #[cfg(feature = "export")]
    pub use spritefont_export::{load_font, save_font, PageCache};
}
