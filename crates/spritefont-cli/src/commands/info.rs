//! Info command: summary of a saved sprite font

use anyhow::{Context, Result};
use spritefont::SpriteFont;
use spritefont_export::PngPageSource;

use crate::cli::InfoArgs;

pub fn run(args: &InfoArgs) -> Result<()> {
    let font = spritefont_export::load_font(&args.file, &PngPageSource::new())
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    print!("{}", describe(&font, args.glyphs));
    Ok(())
}

fn describe(font: &SpriteFont, with_glyphs: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("Face:        {}\n", font.face()));
    out.push_str(&format!("Size:        {}px\n", font.size()));
    out.push_str(&format!("Line height: {}px\n", font.line_height()));
    out.push_str(&format!("Pages:       {}\n", font.pages().len()));
    for (i, page) in font.pages().iter().enumerate() {
        let kind = if page.channels() == 1 { "gray" } else { "rgba" };
        out.push_str(&format!("  {i}: {}x{} {kind}\n", page.width(), page.height()));
    }
    let blank = font.glyphs().filter(|(_, g)| !g.has_page()).count();
    out.push_str(&format!("Glyphs:      {} ({blank} without bitmap)\n", font.len()));

    if with_glyphs {
        for (code_point, glyph) in font.glyphs() {
            let ch = char::from_u32(code_point)
                .filter(|c| !c.is_control())
                .unwrap_or('?');
            let page = if glyph.has_page() {
                glyph.page.to_string()
            } else {
                "-".to_string()
            };
            out.push_str(&format!(
                "  U+{code_point:04X} {ch} page {page} at {},{} {}x{} offset {},{} advance {}\n",
                glyph.rect.x,
                glyph.rect.y,
                glyph.rect.width,
                glyph.rect.height,
                glyph.offset.x,
                glyph.offset.y,
                glyph.advance
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use spritefont::types::{Offset, Rect};
    use spritefont::{Glyph, Image};
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn summary_lists_pages_and_glyphs() {
        let mut glyphs = HashMap::new();
        glyphs.insert(
            'A' as u32,
            Glyph::placed(Rect::new(2, 2, 8, 9), Offset::new(0, 3), 9, 0),
        );
        glyphs.insert(' ' as u32, Glyph::blank(Offset::default(), 4));
        let font = SpriteFont::new("Mini", 12, 14, vec![Arc::new(Image::new(64, 64, 4))], glyphs);

        let text = describe(&font, true);
        assert!(text.contains("Face:        Mini"));
        assert!(text.contains("  0: 64x64 rgba"));
        assert!(text.contains("Glyphs:      2 (1 without bitmap)"));
        assert!(text.contains("U+0041 A page 0 at 2,2 8x9 offset 0,3 advance 9"));
        assert!(text.contains("U+0020   page - at"));
    }
}
