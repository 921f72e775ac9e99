//! Error types for sprite font generation and loading

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpriteFontError>;

/// Main error type for the sprite font pipeline
#[derive(Debug, Error)]
pub enum SpriteFontError {
    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Rendering failed: {0}")]
    RenderingFailed(#[from] RenderError),

    #[error("Packing failed: {0}")]
    PackingFailed(#[from] PackError),

    #[error("Descriptor format error: {0}")]
    Format(#[from] FormatError),

    #[error("Export failed: {0}")]
    ExportFailed(#[from] ExportError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Font file is empty: {0}")]
    EmptyData(String),

    #[error("Invalid font data")]
    InvalidData,

    #[error("Font has no Unicode charmap")]
    NoUnicodeCharmap,

    #[error("Pixel size {0} rejected by font")]
    InvalidPixelSize(u32),
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Glyph {0} not found")]
    GlyphNotFound(u32),

    #[error("Failed to extract outline of glyph {0}")]
    OutlineExtractionFailed(u32),

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Channel mismatch: expected {expected}, got {actual}")]
    ChannelMismatch { expected: u8, actual: u8 },

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Atlas packing errors
#[derive(Debug, Error)]
pub enum PackError {
    #[error("Rectangle {index} ({width}x{height}) does not fit a {page_width}x{page_height} page")]
    RectTooLarge {
        index: usize,
        width: u32,
        height: u32,
        page_width: u32,
        page_height: u32,
    },

    #[error("No rectangle could be placed on a fresh page")]
    NoProgress,
}

/// Descriptor parsing errors
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Descriptor is not well-formed: {0}")]
    Malformed(String),

    #[error("Unexpected root element <{0}>, expected <font>")]
    WrongRoot(String),

    #[error("Missing <{0}> section")]
    MissingSection(&'static str),

    #[error("Page {0} is declared but has no <page> entry")]
    MissingPage(usize),

    #[error("Glyph U+{code_point:04X} lies outside page {page}")]
    GlyphOutOfBounds { code_point: u32, page: u32 },

    #[error("Bad value for attribute {attribute:?} on <{element}>: {value:?}")]
    BadAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Descriptor must have the .fnt extension: {0}")]
    BadExtension(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Decoding failed: {0}")]
    DecodingFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),
}
