//! Pixel buffers for glyph bitmaps and atlas pages
//!
//! One type covers both grayscale coverage masks (1 channel) and colored
//! RGBA glyphs/pages (4 channels). A zero-sized image is valid and means
//! "no bitmap", which is what whitespace glyphs carry.

use crate::error::{RenderError, Result};
use crate::types::{PixelMode, RasterBitmap};
use crate::Color;

/// Owned 8-bit pixel storage, rows top to bottom, channels interleaved
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .finish()
    }
}

impl Image {
    /// Zero-filled image (transparent black for RGBA)
    pub fn new(width: u32, height: u32, channels: u8) -> Self {
        let len = width as usize * height as usize * channels as usize;
        Self {
            width,
            height,
            channels,
            data: vec![0; len],
        }
    }

    /// The "no bitmap" image
    pub fn empty() -> Self {
        Self::new(0, 0, 1)
    }

    /// Wraps existing grayscale pixels
    pub fn from_gray(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::from_raw(width, height, 1, data)
    }

    /// Wraps existing RGBA pixels
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::from_raw(width, height, 4, data)
    }

    fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Converts a backend bitmap into a grayscale image
    ///
    /// Monochrome rows carry 8 pixels per byte, most significant bit first;
    /// set bits become 255. Gray rows are copied honoring the pitch.
    pub fn from_raster(bitmap: &RasterBitmap) -> Result<Self> {
        if bitmap.is_empty() {
            return Ok(Self::empty());
        }

        let width = bitmap.width as usize;
        let rows = bitmap.rows as usize;
        let min_pitch = match bitmap.pixel_mode {
            PixelMode::Gray => width,
            PixelMode::Mono => width.div_ceil(8),
        };
        if bitmap.pitch < min_pitch || bitmap.buffer.len() < bitmap.pitch * (rows - 1) + min_pitch {
            return Err(RenderError::InvalidDimensions {
                width: bitmap.width,
                height: bitmap.rows,
            }
            .into());
        }

        let mut image = Self::new(bitmap.width, bitmap.rows, 1);
        for y in 0..rows {
            let src = &bitmap.buffer[y * bitmap.pitch..];
            let dest = &mut image.data[y * width..(y + 1) * width];
            match bitmap.pixel_mode {
                PixelMode::Gray => dest.copy_from_slice(&src[..width]),
                PixelMode::Mono => {
                    for (x, px) in dest.iter_mut().enumerate() {
                        *px = if src[x >> 3] & (0x80 >> (x & 7)) != 0 { 255 } else { 0 };
                    }
                },
            }
        }
        Ok(image)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// True for zero-area images
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }

    /// Channels of one pixel. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let i = self.index(x, y);
        &self.data[i..i + self.channels as usize]
    }

    /// Mutable channels of one pixel. Panics when out of bounds.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let i = self.index(x, y);
        let channels = self.channels as usize;
        &mut self.data[i..i + channels]
    }

    /// Copies `src` into this image with its top-left at (`x`, `y`)
    ///
    /// Parts falling outside are clipped. Both images must have the same
    /// number of channels.
    pub fn paste(&mut self, src: &Image, x: i32, y: i32) -> Result<()> {
        if src.channels != self.channels {
            return Err(RenderError::ChannelMismatch {
                expected: self.channels,
                actual: src.channels,
            }
            .into());
        }

        // Source columns/rows that land inside this image
        let src_x0 = (-x).max(0) as i64;
        let src_y0 = (-y).max(0) as i64;
        let src_x1 = (self.width as i64 - x as i64).min(src.width as i64);
        let src_y1 = (self.height as i64 - y as i64).min(src.height as i64);
        if src_x0 >= src_x1 || src_y0 >= src_y1 {
            return Ok(());
        }

        let channels = self.channels as usize;
        let row_len = (src_x1 - src_x0) as usize * channels;
        for src_y in src_y0..src_y1 {
            let dest_y = (src_y + y as i64) as u32;
            let dest_x = (src_x0 + x as i64) as u32;
            let s = src.index(src_x0 as u32, src_y as u32);
            let d = self.index(dest_x, dest_y);
            self.data[d..d + row_len].copy_from_slice(&src.data[s..s + row_len]);
        }
        Ok(())
    }

    /// Grows the canvas by `border` pixels on every side, zero-filled
    pub fn expand(&mut self, border: u32) {
        if border == 0 {
            return;
        }
        let mut grown = Image::new(
            self.width + border * 2,
            self.height + border * 2,
            self.channels,
        );
        if !self.is_empty() {
            let channels = self.channels as usize;
            let row_len = self.width as usize * channels;
            for y in 0..self.height {
                let s = self.index(0, y);
                let d = grown.index(border, y + border);
                grown.data[d..d + row_len].copy_from_slice(&self.data[s..s + row_len]);
            }
        }
        *self = grown;
    }

    /// Separable triangular blur, in place, without resizing
    ///
    /// Weights fall off linearly from `radius + 1` at the center to 1 at the
    /// edge of the kernel, summing to `(radius + 1)²`. Pixels outside the
    /// image count as zero. Runs vertically first, then horizontally.
    pub fn blur_triangle(&mut self, radius: u32) {
        if radius == 0 || self.is_empty() {
            return;
        }

        let w = self.width as usize;
        let h = self.height as usize;
        let c = self.channels as usize;
        let r = radius as usize;
        let total_weight = ((r + 1) * (r + 1)) as f32;
        let center_weight = (r + 1) as f32;

        let mut tmp = vec![0f32; self.data.len()];

        // Vertical pass into tmp
        for y in 0..h {
            for x in 0..w {
                for ch in 0..c {
                    let at = |yy: usize| (yy * w + x) * c + ch;
                    let mut value = self.data[at(y)] as f32 * center_weight;
                    for dist in 1..=r {
                        let weight = (r + 1 - dist) as f32;
                        if y + dist < h {
                            value += self.data[at(y + dist)] as f32 * weight;
                        }
                        if y >= dist {
                            value += self.data[at(y - dist)] as f32 * weight;
                        }
                    }
                    tmp[at(y)] = value / total_weight;
                }
            }
        }

        // Horizontal pass back into the image
        for y in 0..h {
            for x in 0..w {
                for ch in 0..c {
                    let at = |xx: usize| (y * w + xx) * c + ch;
                    let mut value = tmp[at(x)] * center_weight;
                    for dist in 1..=r {
                        let weight = (r + 1 - dist) as f32;
                        if x + dist < w {
                            value += tmp[at(x + dist)] * weight;
                        }
                        if x >= dist {
                            value += tmp[at(x - dist)] * weight;
                        }
                    }
                    self.data[at(x)] = (value / total_weight).round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }

    /// Expands by `radius` and blurs, so the halo is not clipped
    ///
    /// The result is `2 * radius` wider and taller than before.
    pub fn blur(&mut self, radius: u32) {
        if radius == 0 {
            return;
        }
        self.expand(radius);
        self.blur_triangle(radius);
    }

    /// Colors a grayscale mask: RGB from `color`, alpha scaled by coverage
    ///
    /// RGBA images are returned unchanged.
    pub fn to_rgba(&self, color: Color) -> Image {
        if self.channels == 4 {
            return self.clone();
        }

        let mut out = Image::new(self.width, self.height, 4);
        for (dest, &gray) in out.data.chunks_exact_mut(4).zip(self.data.iter()) {
            dest[0] = color.r;
            dest[1] = color.g;
            dest[2] = color.b;
            dest[3] = ((color.a as u32 * gray as u32 + 127) / 255) as u8;
        }
        out
    }

    /// Blends a flat `color` over this RGBA image through a grayscale `mask`
    ///
    /// For each mask pixel `m` placed at `at`, every channel (alpha included)
    /// becomes `(color·m + back·(255 − m)) / 255`. Mask pixels falling outside
    /// are ignored.
    pub fn composite_mask(&mut self, mask: &Image, at: (i32, i32), color: Color) -> Result<()> {
        if self.channels != 4 {
            return Err(RenderError::ChannelMismatch {
                expected: 4,
                actual: self.channels,
            }
            .into());
        }
        if mask.channels != 1 {
            return Err(RenderError::ChannelMismatch {
                expected: 1,
                actual: mask.channels,
            }
            .into());
        }

        let front = color.to_array();
        for my in 0..mask.height {
            let y = my as i64 + at.1 as i64;
            if y < 0 || y >= self.height as i64 {
                continue;
            }
            for mx in 0..mask.width {
                let x = mx as i64 + at.0 as i64;
                if x < 0 || x >= self.width as i64 {
                    continue;
                }
                let m = mask.data[mask.index(mx, my)] as u32;
                let back = self.pixel_mut(x as u32, y as u32);
                for (dst, &f) in back.iter_mut().zip(front.iter()) {
                    *dst = ((f as u32 * m + *dst as u32 * (255 - m)) / 255) as u8;
                }
            }
        }
        Ok(())
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32, data: &[u8]) -> Image {
        Image::from_gray(width, height, data.to_vec()).unwrap()
    }

    #[test]
    fn new_image_is_zero_filled_with_exact_storage() {
        let img = Image::new(3, 2, 4);
        assert_eq!(img.data().len(), 24);
        assert!(img.data().iter().all(|&b| b == 0));
        assert!(Image::empty().is_empty());
        assert!(Image::from_rgba(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn mono_raster_is_promoted_to_full_coverage() {
        let bitmap = RasterBitmap {
            left: 0,
            top: 0,
            width: 10,
            rows: 2,
            pitch: 2,
            pixel_mode: PixelMode::Mono,
            buffer: vec![0b1000_0001, 0b0100_0000, 0b0000_0000, 0b1000_0000],
        };
        let img = Image::from_raster(&bitmap).unwrap();
        assert_eq!(
            &img.data()[..10],
            &[255, 0, 0, 0, 0, 0, 0, 255, 0, 255]
        );
        assert_eq!(&img.data()[10..], &[0, 0, 0, 0, 0, 0, 0, 0, 255, 0]);
    }

    #[test]
    fn gray_raster_honors_pitch() {
        let bitmap = RasterBitmap {
            left: 0,
            top: 0,
            width: 2,
            rows: 2,
            pitch: 4,
            pixel_mode: PixelMode::Gray,
            buffer: vec![1, 2, 99, 99, 3, 4],
        };
        let img = Image::from_raster(&bitmap).unwrap();
        assert_eq!(img.data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn paste_clips_at_every_edge() {
        let src = gray(2, 2, &[1, 2, 3, 4]);

        let mut dst = Image::new(3, 3, 1);
        dst.paste(&src, -1, -1).unwrap();
        assert_eq!(dst.data(), &[4, 0, 0, 0, 0, 0, 0, 0, 0]);

        let mut dst = Image::new(3, 3, 1);
        dst.paste(&src, 2, 2).unwrap();
        assert_eq!(dst.data(), &[0, 0, 0, 0, 0, 0, 0, 0, 1]);

        let mut dst = Image::new(3, 3, 1);
        dst.paste(&src, 5, 0).unwrap();
        assert!(dst.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn paste_rejects_channel_mismatch() {
        let mut dst = Image::new(4, 4, 4);
        assert!(dst.paste(&Image::new(1, 1, 1), 0, 0).is_err());
    }

    #[test]
    fn expand_centers_content() {
        let mut img = gray(1, 1, &[200]);
        img.expand(2);
        assert_eq!((img.width(), img.height()), (5, 5));
        assert_eq!(img.pixel(2, 2), &[200]);
        assert_eq!(img.data().iter().filter(|&&b| b != 0).count(), 1);
    }

    #[test]
    fn triangle_blur_spreads_single_pixel() {
        let mut img = gray(1, 1, &[255]);
        img.blur(1);
        assert_eq!((img.width(), img.height()), (3, 3));
        // 255 * 2 * 2 / 16, 255 * 2 / 16, 255 / 16
        assert_eq!(img.pixel(1, 1), &[64]);
        assert_eq!(img.pixel(1, 0), &[32]);
        assert_eq!(img.pixel(0, 0), &[16]);
        assert_eq!(img.pixel(2, 2), &[16]);
    }

    #[test]
    fn blur_keeps_uniform_interior() {
        let mut img = gray(9, 9, &[100; 81]);
        img.blur_triangle(2);
        assert_eq!(img.pixel(4, 4), &[100]);
        // Corner loses weight to the zero border
        assert!(img.pixel(0, 0)[0] < 100);
    }

    #[test]
    fn blur_of_zero_radius_is_noop() {
        let mut img = gray(2, 1, &[10, 20]);
        img.blur(0);
        assert_eq!(img.data(), &[10, 20]);
    }

    #[test]
    fn to_rgba_scales_alpha_by_coverage() {
        let img = gray(2, 1, &[255, 128]);
        let rgba = img.to_rgba(Color::rgba(10, 20, 30, 200));
        assert_eq!(rgba.channels(), 4);
        assert_eq!(rgba.pixel(0, 0), &[10, 20, 30, 200]);
        assert_eq!(rgba.pixel(1, 0), &[10, 20, 30, 100]);
    }

    #[test]
    fn composite_mask_blends_every_channel() {
        let mut back = gray(2, 1, &[255, 255]).to_rgba(Color::rgba(0, 0, 0, 255));
        let mask = gray(2, 1, &[255, 0]);
        back.composite_mask(&mask, (0, 0), Color::rgba(255, 255, 255, 128))
            .unwrap();
        assert_eq!(back.pixel(0, 0), &[255, 255, 255, 128]);
        assert_eq!(back.pixel(1, 0), &[0, 0, 0, 255]);
    }

    #[test]
    fn composite_mask_ignores_out_of_bounds_pixels() {
        let mut back = Image::new(1, 1, 4);
        let mask = gray(2, 2, &[255; 4]);
        back.composite_mask(&mask, (-1, -1), Color::white()).unwrap();
        assert_eq!(back.pixel(0, 0), &[255, 255, 255, 255]);
    }
}
