//! Saving and loading sprite fonts
//!
//! A saved font is an XML descriptor (`name.fnt`) plus one PNG per page
//! (`name_0.png`, `name_1.png`, ...) in the same directory. See
//! [`descriptor`] for the document layout.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use spritefont_core::error::{ExportError, Result};
use spritefont_core::traits::PageSource;
use spritefont_core::SpriteFont;

pub mod cache;
pub mod descriptor;
pub mod png;

pub use cache::{PageCache, PngPageSource};
pub use descriptor::Descriptor;

/// Extension of font descriptors
pub const DESCRIPTOR_EXTENSION: &str = "fnt";

/// Writes `font` to `path` and its pages next to it
///
/// `path` must end in `.fnt` or have no extension at all. Every page is
/// encoded before anything touches the disk, so an encoding failure leaves
/// no partial output behind.
pub fn save_font(font: &SpriteFont, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    save(font, path).inspect_err(|e| error!("Saving {} failed: {e}", path.display()))
}

fn save(font: &SpriteFont, path: &Path) -> Result<()> {
    if let Some(ext) = path.extension() {
        if ext != DESCRIPTOR_EXTENSION {
            return Err(ExportError::BadExtension(path.display().to_string()).into());
        }
    }
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ExportError::BadExtension(path.display().to_string()))?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));

    let encoded = font
        .pages()
        .iter()
        .enumerate()
        .map(|(i, page)| Ok((page_file_name(stem, i), png::encode_page(page)?)))
        .collect::<Result<Vec<_>>>()?;

    let descriptor = Descriptor {
        face: font.face().to_string(),
        size: font.size(),
        line_height: font.line_height(),
        pages: encoded.iter().map(|(name, _)| name.clone()).collect(),
        chars: font.glyphs().map(|(cp, glyph)| (cp, *glyph)).collect(),
    };

    for (name, bytes) in &encoded {
        write_file(&dir.join(name), bytes)?;
    }
    write_file(path, descriptor.to_xml().as_bytes())?;

    info!(
        "Saved {} ({} glyphs, {} pages) to {}",
        font.face(),
        font.len(),
        encoded.len(),
        path.display()
    );
    Ok(())
}

/// Reads a font saved by [`save_font`]
///
/// Page files are resolved against the descriptor's directory and acquired
/// through `pages`, which may share them between fonts.
pub fn load_font(path: impl AsRef<Path>, pages: &dyn PageSource) -> Result<SpriteFont> {
    let path = path.as_ref();
    load(path, pages).inspect_err(|e| error!("Loading {} failed: {e}", path.display()))
}

fn load(path: &Path, source: &dyn PageSource) -> Result<SpriteFont> {
    let text = std::fs::read_to_string(path)?;
    let descriptor = Descriptor::parse(&text)?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));

    let pages = descriptor
        .pages
        .iter()
        .map(|file| {
            let page_path = resolve(dir, file);
            debug!("Acquiring page {}", page_path.display());
            source.acquire(&page_path)
        })
        .collect::<Result<Vec<_>>>()?;

    let glyphs: HashMap<_, _> = descriptor.chars.into_iter().collect();
    let font = SpriteFont::new(
        descriptor.face,
        descriptor.size,
        descriptor.line_height,
        pages,
        glyphs,
    );
    font.validate()?;

    info!(
        "Loaded {} ({} glyphs, {} pages) from {}",
        font.face(),
        font.len(),
        font.pages().len(),
        path.display()
    );
    Ok(font)
}

/// File name of page `index` for a descriptor named `stem`
pub fn page_file_name(stem: &str, index: usize) -> String {
    format!("{stem}_{index}.png")
}

fn resolve(dir: &Path, file: &str) -> PathBuf {
    let file = Path::new(file);
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        dir.join(file)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)
        .map_err(|e| ExportError::WriteFailed(format!("{}: {e}", path.display())).into())
}
