//! CLI smoke tests
//!
//! - `generate`: font file to descriptor + pages (skipped without a system font)
//! - `info`: reading a saved font back
//! - failure cases: missing font, bad descriptor, bad flags

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use spritefont::types::{Offset, Rect};
use spritefont::{Glyph, Image, SpriteFont};

fn spritefont_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_spritefont"))
}

/// A real TrueType font: `SPRITEFONT_TEST_FONT`, or one of the usual system fonts
fn test_font() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("SPRITEFONT_TEST_FONT") {
        return Some(PathBuf::from(path));
    }
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|path| path.exists())
}

/// A fresh directory for one test's output
fn temp_dir(name: &str) -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("spritefont_cli_{name}_{id}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_lists_subcommands() {
    let output = spritefont_binary().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("info"));
}

#[test]
fn test_generate_help_describes_flags() {
    let output = spritefont_binary().args(["generate", "--help"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--outline-color"));
    assert!(stdout.contains("--texture"));
}

// ============================================================================
// Info
// ============================================================================

#[test]
fn test_info_reads_saved_font() {
    let dir = temp_dir("info");
    let path = dir.join("mini.fnt");

    let mut glyphs = HashMap::new();
    glyphs.insert(
        'A' as u32,
        Glyph::placed(Rect::new(2, 2, 8, 9), Offset::new(0, 3), 9, 0),
    );
    let font = SpriteFont::new("Mini", 12, 14, vec![Arc::new(Image::new(64, 64, 1))], glyphs);
    spritefont_export::save_font(&font, &path).unwrap();

    let output = spritefont_binary()
        .args(["info", "--glyphs"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Mini"));
    assert!(stdout.contains("Pages:       1"));
    assert!(stdout.contains("U+0041"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_info_fails_on_wrong_root() {
    let dir = temp_dir("bad_root");
    let path = dir.join("bad.fnt");
    std::fs::write(&path, "<html/>").unwrap();

    let output = spritefont_binary().arg("info").arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

// ============================================================================
// Generate
// ============================================================================

#[test]
fn test_generate_fails_for_missing_font() {
    let dir = temp_dir("missing");
    let output = spritefont_binary()
        .args(["generate", "--font", "/no/such/font.ttf", "-o"])
        .arg(dir.join("out.fnt"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.join("out.fnt").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_generate_rejects_bad_style() {
    let output = spritefont_binary()
        .args(["generate", "--font", "a.ttf", "--style", "shadow", "-o", "x.fnt"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_generate_outlined_font_then_info() {
    let Some(font) = test_font() else {
        eprintln!("Skipping: no test font found (set SPRITEFONT_TEST_FONT)");
        return;
    };
    let dir = temp_dir("generate");
    let path = dir.join("outlined.fnt");

    let output = spritefont_binary()
        .arg("generate")
        .arg("--font")
        .arg(&font)
        .args(["--style", "outlined", "--height", "16", "--thickness", "2"])
        .args(["--color", "#ffffff", "--outline-color", "#000000", "--texture", "512"])
        .arg("-o")
        .arg(&path)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(path.exists());
    assert!(dir.join("outlined_0.png").exists());

    let info = spritefont_binary().arg("info").arg(&path).output().unwrap();
    assert!(info.status.success());
    let stdout = String::from_utf8_lossy(&info.stdout);
    assert!(stdout.contains("Size:        16px"));
    assert!(stdout.contains("rgba"));

    std::fs::remove_dir_all(&dir).ok();
}
