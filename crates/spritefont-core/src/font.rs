//! The finished sprite font: pages plus a glyph table

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{FormatError, Result};
use crate::glyph::Glyph;
use crate::image::Image;

/// Texture pages and the code point to glyph table
///
/// Pages are shared handles so that a page cache can hand the same image to
/// several fonts.
#[derive(Debug, Clone, Default)]
pub struct SpriteFont {
    face: String,
    size: u32,
    line_height: i32,
    pages: Vec<Arc<Image>>,
    glyphs: HashMap<u32, Glyph>,
}

impl SpriteFont {
    pub fn new(
        face: impl Into<String>,
        size: u32,
        line_height: i32,
        pages: Vec<Arc<Image>>,
        glyphs: HashMap<u32, Glyph>,
    ) -> Self {
        Self {
            face: face.into(),
            size,
            line_height,
            pages,
            glyphs,
        }
    }

    pub fn face(&self) -> &str {
        &self.face
    }

    /// Nominal pixel height the font was generated at
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    pub fn pages(&self) -> &[Arc<Image>] {
        &self.pages
    }

    pub fn glyph(&self, code_point: u32) -> Option<&Glyph> {
        self.glyphs.get(&code_point)
    }

    pub fn glyph_for_char(&self, ch: char) -> Option<&Glyph> {
        self.glyph(ch as u32)
    }

    /// Glyph map as stored, in no particular order
    pub fn glyph_map(&self) -> &HashMap<u32, Glyph> {
        &self.glyphs
    }

    /// All glyphs in ascending code point order
    pub fn glyphs(&self) -> impl Iterator<Item = (u32, &Glyph)> {
        let mut entries: Vec<_> = self.glyphs.iter().map(|(&cp, g)| (cp, g)).collect();
        entries.sort_unstable_by_key(|&(cp, _)| cp);
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Checks that every glyph with a page points at a real page and fits it
    pub fn validate(&self) -> Result<()> {
        for (code_point, glyph) in self.glyphs() {
            if !glyph.has_page() {
                continue;
            }
            let page = self
                .pages
                .get(glyph.page as usize)
                .ok_or(FormatError::MissingPage(glyph.page as usize))?;
            if !glyph.rect.fits_within(page.width(), page.height()) {
                return Err(FormatError::GlyphOutOfBounds {
                    code_point,
                    page: glyph.page,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Pixel extent of `text` laid out with advances only
    ///
    /// Lines break at `\n`; characters missing from the font take no space.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        if text.is_empty() {
            return (0, 0);
        }
        let mut widest = 0i64;
        let mut lines = 0u32;
        for line in text.split('\n') {
            lines += 1;
            let width: i64 = line
                .chars()
                .filter_map(|ch| self.glyph_for_char(ch))
                .map(|g| g.advance as i64)
                .sum();
            widest = widest.max(width);
        }
        let height = lines as i64 * self.line_height.max(0) as i64;
        (widest.max(0) as u32, height as u32)
    }
}
