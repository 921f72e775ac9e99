//! Command-line definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use spritefont::{Color, TextureSize};
use std::path::PathBuf;

/// Spritefont - turn TrueType and OpenType fonts into glyph atlases
#[derive(Parser, Debug)]
#[command(name = "spritefont")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// More logging (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a sprite font and save it as a descriptor plus PNG pages
    #[command(alias = "g")]
    Generate(Box<GenerateArgs>),

    /// Show what a saved sprite font contains
    #[command(alias = "i")]
    Info(InfoArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StyleKind {
    Simple,
    Contour,
    Outlined,
}

/// Arguments for the generate command
///
/// Flags override values read from `--config`.
#[derive(Parser, Debug, Default)]
pub struct GenerateArgs {
    /// Font file (.ttf, .otf)
    #[arg(short = 'f', long = "font")]
    pub font: Option<PathBuf>,

    /// JSON settings file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Glyph style
    #[arg(short = 's', long = "style", value_enum)]
    pub style: Option<StyleKind>,

    /// Glyph height in pixels
    #[arg(short = 'H', long = "height")]
    pub height: Option<u32>,

    /// Glyph color, #RRGGBB or #RRGGBBAA
    #[arg(long = "color", value_parser = parse_color)]
    pub color: Option<Color>,

    /// Shell color of the outlined style
    #[arg(long = "outline-color", value_parser = parse_color)]
    pub outline_color: Option<Color>,

    /// Contour or outline thickness in pixels
    #[arg(short = 't', long = "thickness")]
    pub thickness: Option<u32>,

    /// Blur radius in pixels
    #[arg(short = 'b', long = "blur")]
    pub blur: Option<u32>,

    /// Render 1-bit glyphs
    #[arg(long = "no-antialias")]
    pub no_antialias: bool,

    /// Page size: <size> or <width>x<height>
    #[arg(long = "texture")]
    pub texture: Option<TextureSize>,

    /// Output descriptor (.fnt); pages are written next to it
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

/// Arguments for the info command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Font descriptor (.fnt)
    pub file: PathBuf,

    /// Also list every glyph
    #[arg(long = "glyphs")]
    pub glyphs: bool,
}

fn parse_color(s: &str) -> Result<Color, String> {
    Color::from_hex(s).ok_or_else(|| format!("invalid color '{s}', expected #RRGGBB or #RRGGBBAA"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definitions_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_flags_parse() {
        let cli = Cli::try_parse_from([
            "spritefont",
            "-vv",
            "generate",
            "--font",
            "a.ttf",
            "--style",
            "outlined",
            "--color",
            "#ff0000",
            "--texture",
            "512x256",
            "-o",
            "out.fnt",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.style, Some(StyleKind::Outlined));
        assert_eq!(args.color, Some(Color::rgba(255, 0, 0, 255)));
        assert_eq!(args.texture, Some(TextureSize::new(512, 256)));
    }

    #[test]
    fn bad_color_is_a_usage_error() {
        let result = Cli::try_parse_from([
            "spritefont", "generate", "--color", "red", "-o", "out.fnt",
        ]);
        assert!(result.is_err());
    }
}
