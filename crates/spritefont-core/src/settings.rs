//! What to generate: source font, size, style and page size
//!
//! Each style carries its own parameters, so switching style never drags a
//! clamped value from one style into another. [`FontSettings::validated`]
//! is the one place where ranges are enforced.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpriteFontError};
use crate::types::StrokeStyle;
use crate::Color;

pub const MAX_HEIGHT: u32 = 1024;
pub const MAX_BLUR_RADIUS: u32 = 20;
pub const MAX_THICKNESS: u32 = 20;
pub const MIN_TEXTURE_SIZE: u32 = 64;
pub const MAX_TEXTURE_SIZE: u32 = 4096;

/// Page dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

impl TextureSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    /// Both sides rounded up to a power of two within the supported range
    pub fn clamped(self) -> Self {
        let fix = |side: u32| {
            side.clamp(MIN_TEXTURE_SIZE, MAX_TEXTURE_SIZE)
                .next_power_of_two()
                .min(MAX_TEXTURE_SIZE)
        };
        Self::new(fix(self.width), fix(self.height))
    }
}

impl Default for TextureSize {
    fn default() -> Self {
        Self::square(1024)
    }
}

impl std::str::FromStr for TextureSize {
    type Err = SpriteFontError;

    /// Parses `512` or `512x256`
    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| SpriteFontError::ConfigError(format!("Invalid texture size: {s}")))
        };
        match s.split_once(['x', 'X']) {
            Some((w, h)) => Ok(Self::new(parse(w)?, parse(h)?)),
            None => Ok(Self::square(parse(s)?)),
        }
    }
}

/// Plain glyphs in one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleStyle {
    pub color: Color,
    pub blur_radius: u32,
}

impl Default for SimpleStyle {
    fn default() -> Self {
        Self {
            color: Color::white(),
            blur_radius: 0,
        }
    }
}

/// Only the outline of each glyph, stroked `thickness` pixels wide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourStyle {
    pub color: Color,
    pub thickness: u32,
    pub blur_radius: u32,
}

impl Default for ContourStyle {
    fn default() -> Self {
        Self {
            color: Color::white(),
            thickness: 10,
            blur_radius: 0,
        }
    }
}

/// Filled glyphs on top of a grown, separately colored shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlinedStyle {
    pub main_color: Color,
    pub outline_color: Color,
    pub outline_thickness: u32,
    /// Blurs the shell only
    pub outline_blur_radius: u32,
}

impl Default for OutlinedStyle {
    fn default() -> Self {
        Self {
            main_color: Color::white(),
            outline_color: Color::black(),
            outline_thickness: 10,
            outline_blur_radius: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StyleSettings {
    Simple(SimpleStyle),
    Contour(ContourStyle),
    Outlined(OutlinedStyle),
}

impl StyleSettings {
    pub fn name(&self) -> &'static str {
        match self {
            StyleSettings::Simple(_) => "simple",
            StyleSettings::Contour(_) => "contour",
            StyleSettings::Outlined(_) => "outlined",
        }
    }

    /// Pixels the style adds to the font's line height
    pub fn line_height_extra(&self) -> u32 {
        match self {
            StyleSettings::Simple(_) => 0,
            StyleSettings::Contour(s) => s.thickness,
            StyleSettings::Outlined(s) => 2 * s.outline_thickness,
        }
    }

    /// Pixels the style adds to every glyph's advance
    pub fn advance_extra(&self) -> u32 {
        self.line_height_extra()
    }

    /// Stroke used for the glyph body (the shell, for outlined glyphs)
    pub fn stroke(&self) -> StrokeStyle {
        match self {
            StyleSettings::Simple(_) => StrokeStyle::None,
            StyleSettings::Contour(s) => StrokeStyle::Contour {
                width: s.thickness as f32,
            },
            StyleSettings::Outlined(s) => StrokeStyle::Border {
                radius: s.outline_thickness as f32,
            },
        }
    }

    /// Color used to tint grayscale pages; outlined pages are already RGBA
    pub fn page_color(&self) -> Option<Color> {
        match self {
            StyleSettings::Simple(s) => Some(s.color),
            StyleSettings::Contour(s) => Some(s.color),
            StyleSettings::Outlined(_) => None,
        }
    }

    fn clamped(self) -> Self {
        match self {
            StyleSettings::Simple(s) => StyleSettings::Simple(SimpleStyle {
                blur_radius: s.blur_radius.min(MAX_BLUR_RADIUS),
                ..s
            }),
            StyleSettings::Contour(s) => StyleSettings::Contour(ContourStyle {
                thickness: s.thickness.clamp(1, MAX_THICKNESS),
                blur_radius: s.blur_radius.min(MAX_BLUR_RADIUS),
                ..s
            }),
            StyleSettings::Outlined(s) => StyleSettings::Outlined(OutlinedStyle {
                outline_thickness: s.outline_thickness.min(MAX_THICKNESS),
                outline_blur_radius: s.outline_blur_radius.min(MAX_BLUR_RADIUS),
                ..s
            }),
        }
    }
}

impl Default for StyleSettings {
    fn default() -> Self {
        StyleSettings::Simple(SimpleStyle::default())
    }
}

fn default_height() -> u32 {
    60
}

fn default_anti_aliasing() -> bool {
    true
}

/// Everything one generation run needs
///
/// ```rust
/// use spritefont_core::settings::{FontSettings, TextureSize};
///
/// let settings = FontSettings::contour("DejaVuSans.ttf", 32, 3)
///     .with_texture_size(TextureSize::new(300, 200))
///     .validated()
///     .unwrap();
/// assert_eq!(settings.texture_size, TextureSize::new(512, 256));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSettings {
    #[serde(default)]
    pub src_path: PathBuf,
    /// Target pixel height
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_anti_aliasing")]
    pub anti_aliasing: bool,
    #[serde(default)]
    pub texture_size: TextureSize,
    #[serde(default)]
    pub style: StyleSettings,
}

impl FontSettings {
    pub fn new(src_path: impl Into<PathBuf>, height: u32, style: StyleSettings) -> Self {
        Self {
            src_path: src_path.into(),
            height,
            anti_aliasing: true,
            texture_size: TextureSize::default(),
            style,
        }
    }

    pub fn simple(src_path: impl Into<PathBuf>, height: u32) -> Self {
        Self::new(src_path, height, StyleSettings::Simple(SimpleStyle::default()))
    }

    pub fn contour(src_path: impl Into<PathBuf>, height: u32, thickness: u32) -> Self {
        let style = ContourStyle {
            thickness,
            ..ContourStyle::default()
        };
        Self::new(src_path, height, StyleSettings::Contour(style))
    }

    pub fn outlined(src_path: impl Into<PathBuf>, height: u32, outline_thickness: u32) -> Self {
        let style = OutlinedStyle {
            outline_thickness,
            ..OutlinedStyle::default()
        };
        Self::new(src_path, height, StyleSettings::Outlined(style))
    }

    pub fn with_style(mut self, style: StyleSettings) -> Self {
        self.style = style;
        self
    }

    pub fn with_texture_size(mut self, texture_size: TextureSize) -> Self {
        self.texture_size = texture_size;
        self
    }

    pub fn with_anti_aliasing(mut self, anti_aliasing: bool) -> Self {
        self.anti_aliasing = anti_aliasing;
        self
    }

    pub fn src_path(&self) -> &Path {
        &self.src_path
    }

    /// Copy with every parameter forced into its supported range
    ///
    /// Only a missing source path or a zero height are errors; everything
    /// else is clamped.
    pub fn validated(&self) -> Result<FontSettings> {
        if self.src_path.as_os_str().is_empty() {
            return Err(SpriteFontError::ConfigError(
                "Source font path is empty".to_string(),
            ));
        }
        if self.height == 0 {
            return Err(SpriteFontError::ConfigError(
                "Font height must be at least 1 pixel".to_string(),
            ));
        }

        Ok(FontSettings {
            src_path: self.src_path.clone(),
            height: self.height.min(MAX_HEIGHT),
            anti_aliasing: self.anti_aliasing,
            texture_size: self.texture_size.clamped(),
            style: self.style.clamped(),
        })
    }
}

impl Default for FontSettings {
    /// No source font yet; every other field at its usual value
    fn default() -> Self {
        Self::new(PathBuf::new(), default_height(), StyleSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_style_clamps_its_own_ranges() {
        let contour = FontSettings::contour("a.ttf", 20, 0).validated().unwrap();
        assert!(matches!(contour.style, StyleSettings::Contour(s) if s.thickness == 1));

        let outlined = FontSettings::outlined("a.ttf", 20, 0).validated().unwrap();
        assert!(
            matches!(outlined.style, StyleSettings::Outlined(s) if s.outline_thickness == 0)
        );

        let style = StyleSettings::Outlined(OutlinedStyle {
            outline_thickness: 99,
            outline_blur_radius: 50,
            ..OutlinedStyle::default()
        });
        let outlined = FontSettings::new("a.ttf", 20, style).validated().unwrap();
        assert!(matches!(
            outlined.style,
            StyleSettings::Outlined(s) if s.outline_thickness == 20 && s.outline_blur_radius == 20
        ));

        let style = StyleSettings::Simple(SimpleStyle {
            blur_radius: 21,
            ..SimpleStyle::default()
        });
        let simple = FontSettings::new("a.ttf", 20, style).validated().unwrap();
        assert!(matches!(simple.style, StyleSettings::Simple(s) if s.blur_radius == 20));
    }

    #[test]
    fn height_and_path_are_checked() {
        assert!(FontSettings::simple("a.ttf", 0).validated().is_err());
        assert!(FontSettings::simple("", 10).validated().is_err());
        let big = FontSettings::simple("a.ttf", 5000).validated().unwrap();
        assert_eq!(big.height, MAX_HEIGHT);
    }

    #[test]
    fn texture_size_snaps_to_powers_of_two() {
        assert_eq!(TextureSize::new(1, 5000).clamped(), TextureSize::new(64, 4096));
        assert_eq!(TextureSize::new(256, 257).clamped(), TextureSize::new(256, 512));
        assert_eq!("512".parse::<TextureSize>().unwrap(), TextureSize::square(512));
        assert_eq!(
            "256x128".parse::<TextureSize>().unwrap(),
            TextureSize::new(256, 128)
        );
        assert!("big".parse::<TextureSize>().is_err());
    }

    #[test]
    fn style_extras_follow_thickness() {
        let contour = StyleSettings::Contour(ContourStyle {
            thickness: 4,
            ..ContourStyle::default()
        });
        assert_eq!(contour.line_height_extra(), 4);
        assert_eq!(contour.stroke(), StrokeStyle::Contour { width: 4.0 });

        let outlined = StyleSettings::Outlined(OutlinedStyle {
            outline_thickness: 3,
            ..OutlinedStyle::default()
        });
        assert_eq!(outlined.line_height_extra(), 6);
        assert_eq!(outlined.page_color(), None);
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let json = r#"{
            "src_path": "fonts/Ubuntu-R.ttf",
            "style": { "kind": "outlined", "outline_thickness": 2 }
        }"#;
        let settings: FontSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.height, 60);
        assert!(settings.anti_aliasing);
        assert_eq!(settings.texture_size, TextureSize::square(1024));
        match settings.style {
            StyleSettings::Outlined(s) => {
                assert_eq!(s.outline_thickness, 2);
                assert_eq!(s.outline_color, Color::black());
            },
            other => panic!("unexpected style {other:?}"),
        }
    }
}
