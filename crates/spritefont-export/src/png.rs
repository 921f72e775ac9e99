//! Page images as PNG
//!
//! Grayscale pages are stored as 8-bit luma, colored pages as 8-bit RGBA.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat};

use spritefont_core::error::{ExportError, Result};
use spritefont_core::Image;

/// Encodes a page, keeping its channel count
pub fn encode_page(page: &Image) -> Result<Vec<u8>> {
    let color = match page.channels() {
        1 => ExtendedColorType::L8,
        4 => ExtendedColorType::Rgba8,
        n => {
            return Err(
                ExportError::EncodingFailed(format!("Unsupported channel count {n}")).into(),
            )
        },
    };
    if page.is_empty() {
        return Err(ExportError::EncodingFailed(format!(
            "Cannot encode an empty {}x{} page",
            page.width(),
            page.height()
        ))
        .into());
    }

    let mut png_data = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut png_data, CompressionType::Default, FilterType::Sub);
    encoder
        .write_image(page.data(), page.width(), page.height(), color)
        .map_err(|e| ExportError::EncodingFailed(format!("PNG encoding failed: {e}")))?;
    Ok(png_data)
}

/// Decodes a page; luma PNGs stay grayscale, everything else becomes RGBA
pub fn decode_page(bytes: &[u8]) -> Result<Image> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| ExportError::DecodingFailed(format!("PNG decoding failed: {e}")))?;
    match decoded {
        DynamicImage::ImageLuma8(gray) => {
            let (width, height) = gray.dimensions();
            Image::from_gray(width, height, gray.into_raw())
        },
        other => {
            let rgba = other.to_rgba8();
            let (width, height) = rgba.dimensions();
            Image::from_rgba(width, height, rgba.into_raw())
        },
    }
}
