//! Generate command: font file in, descriptor and pages out

use std::time::Instant;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use spritefont::{
    ContourStyle, FontSettings, OutlinedStyle, SimpleStyle, SpriteFont, StyleSettings,
};

use crate::cli::{GenerateArgs, StyleKind};

pub fn run(args: &GenerateArgs) -> Result<()> {
    let settings = build_settings(args)?;
    let start = Instant::now();

    let font = spritefont::generate_font(&settings)
        .with_context(|| format!("Failed to generate from {}", settings.src_path.display()))?;
    spritefont_export::save_font(&font, &args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    info!("Done in {} ms", start.elapsed().as_millis());
    print_summary(&font, &settings, args);
    Ok(())
}

/// Settings from `--config` (if any) with every given flag applied on top
pub fn build_settings(args: &GenerateArgs) -> Result<FontSettings> {
    let mut settings = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<FontSettings>(&text)
                .with_context(|| format!("Invalid settings in {}", path.display()))?
        },
        None => FontSettings::default(),
    };

    if let Some(font) = &args.font {
        settings.src_path = font.clone();
    }
    if settings.src_path.as_os_str().is_empty() {
        bail!("No font given: pass --font or set src_path in --config");
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if args.no_antialias {
        settings.anti_aliasing = false;
    }
    if let Some(texture) = args.texture {
        settings.texture_size = texture;
    }
    if let Some(kind) = args.style {
        settings.style = switch_style(settings.style, kind);
    }
    apply_style_flags(&mut settings.style, args);

    Ok(settings)
}

/// Keeps the current style when it already is `kind`, else starts from defaults
fn switch_style(style: StyleSettings, kind: StyleKind) -> StyleSettings {
    match (style, kind) {
        (StyleSettings::Simple(_), StyleKind::Simple)
        | (StyleSettings::Contour(_), StyleKind::Contour)
        | (StyleSettings::Outlined(_), StyleKind::Outlined) => style,
        (_, StyleKind::Simple) => StyleSettings::Simple(SimpleStyle::default()),
        (_, StyleKind::Contour) => StyleSettings::Contour(ContourStyle::default()),
        (_, StyleKind::Outlined) => StyleSettings::Outlined(OutlinedStyle::default()),
    }
}

fn apply_style_flags(style: &mut StyleSettings, args: &GenerateArgs) {
    match style {
        StyleSettings::Simple(s) => {
            if let Some(color) = args.color {
                s.color = color;
            }
            if let Some(blur) = args.blur {
                s.blur_radius = blur;
            }
            if args.thickness.is_some() {
                warn!("--thickness has no effect on the simple style");
            }
        },
        StyleSettings::Contour(s) => {
            if let Some(color) = args.color {
                s.color = color;
            }
            if let Some(thickness) = args.thickness {
                s.thickness = thickness;
            }
            if let Some(blur) = args.blur {
                s.blur_radius = blur;
            }
        },
        StyleSettings::Outlined(s) => {
            if let Some(color) = args.color {
                s.main_color = color;
            }
            if let Some(color) = args.outline_color {
                s.outline_color = color;
            }
            if let Some(thickness) = args.thickness {
                s.outline_thickness = thickness;
            }
            if let Some(blur) = args.blur {
                s.outline_blur_radius = blur;
            }
        },
    }
    if args.outline_color.is_some() && !matches!(style, StyleSettings::Outlined(_)) {
        warn!("--outline-color only applies to the outlined style");
    }
}

fn print_summary(font: &SpriteFont, settings: &FontSettings, args: &GenerateArgs) {
    println!(
        "{} {}px ({}): {} glyphs on {} page(s) of {}x{}",
        font.face(),
        font.size(),
        settings.style.name(),
        font.len(),
        font.pages().len(),
        settings.texture_size.width,
        settings.texture_size.height
    );
    println!("Saved to {}", args.output.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use spritefont::{Color, TextureSize};
    use std::path::PathBuf;

    fn args() -> GenerateArgs {
        GenerateArgs {
            font: Some(PathBuf::from("a.ttf")),
            output: PathBuf::from("out.fnt"),
            ..GenerateArgs::default()
        }
    }

    #[test]
    fn flags_alone_give_simple_defaults() {
        let settings = build_settings(&args()).unwrap();
        assert_eq!(settings.src_path, PathBuf::from("a.ttf"));
        assert_eq!(settings.height, 60);
        assert!(settings.anti_aliasing);
        assert_eq!(settings.style, StyleSettings::Simple(SimpleStyle::default()));
    }

    #[test]
    fn style_flags_land_in_the_chosen_style() {
        let settings = build_settings(&GenerateArgs {
            style: Some(StyleKind::Outlined),
            color: Some(Color::rgba(1, 2, 3, 255)),
            outline_color: Some(Color::rgba(9, 9, 9, 255)),
            thickness: Some(4),
            blur: Some(2),
            height: Some(24),
            no_antialias: true,
            texture: Some(TextureSize::square(256)),
            ..args()
        })
        .unwrap();

        assert_eq!(settings.height, 24);
        assert!(!settings.anti_aliasing);
        assert_eq!(settings.texture_size, TextureSize::square(256));
        let StyleSettings::Outlined(style) = settings.style else {
            panic!("expected outlined");
        };
        assert_eq!(style.main_color, Color::rgba(1, 2, 3, 255));
        assert_eq!(style.outline_color, Color::rgba(9, 9, 9, 255));
        assert_eq!(style.outline_thickness, 4);
        assert_eq!(style.outline_blur_radius, 2);
    }

    #[test]
    fn config_file_is_overridden_by_flags() {
        let path = std::env::temp_dir().join(format!("spritefont_cfg_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{
                "src_path": "from_config.ttf",
                "height": 40,
                "style": { "kind": "contour", "thickness": 3, "blur_radius": 1 }
            }"#,
        )
        .unwrap();

        let settings = build_settings(&GenerateArgs {
            config: Some(path.clone()),
            font: None,
            blur: Some(5),
            ..args()
        })
        .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.src_path, PathBuf::from("from_config.ttf"));
        assert_eq!(settings.height, 40);
        let StyleSettings::Contour(style) = settings.style else {
            panic!("expected contour");
        };
        assert_eq!(style.thickness, 3);
        assert_eq!(style.blur_radius, 5);
    }

    #[test]
    fn switching_style_starts_from_its_defaults() {
        let contour = StyleSettings::Contour(ContourStyle {
            thickness: 7,
            ..ContourStyle::default()
        });
        assert_eq!(switch_style(contour, StyleKind::Contour), contour);
        assert_eq!(
            switch_style(contour, StyleKind::Outlined),
            StyleSettings::Outlined(OutlinedStyle::default())
        );
    }

    #[test]
    fn missing_font_is_an_error() {
        let result = build_settings(&GenerateArgs {
            font: None,
            ..args()
        });
        assert!(result.is_err());
    }
}
