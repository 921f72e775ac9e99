//! The XML font descriptor
//!
//! ```xml
//! <font>
//!     <info face="Sans" size="32"/>
//!     <common lineHeight="38" pages="1"/>
//!     <pages>
//!         <page id="0" file="sans_0.png"/>
//!     </pages>
//!     <chars count="1">
//!         <char id="65" x="2" y="2" width="20" height="24" xoffset="1" yoffset="6" xadvance="21" page="0"/>
//!     </chars>
//! </font>
//! ```
//!
//! Glyphs without a bitmap are written with `page="-1"`.

use std::fmt::Write;
use std::str::FromStr;

use roxmltree::{Document, Node};

use spritefont_core::error::{FormatError, Result};
use spritefont_core::types::{Offset, Rect};
use spritefont_core::Glyph;

const INDENT: &str = "    ";

/// Everything the descriptor file records, page images aside
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    pub face: String,
    pub size: u32,
    pub line_height: i32,
    /// Page file names, relative to the descriptor, in page order
    pub pages: Vec<String>,
    /// Glyphs by code point, ascending
    pub chars: Vec<(u32, Glyph)>,
}

impl Descriptor {
    /// Renders the descriptor as an indented XML document
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(256 + self.chars.len() * 96);
        // Writing into a String cannot fail
        let _ = self.write_xml(&mut out);
        out
    }

    fn write_xml(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writeln!(out, "<font>")?;
        writeln!(
            out,
            "{INDENT}<info face=\"{}\" size=\"{}\"/>",
            escape(&self.face),
            self.size
        )?;
        writeln!(
            out,
            "{INDENT}<common lineHeight=\"{}\" pages=\"{}\"/>",
            self.line_height,
            self.pages.len()
        )?;

        writeln!(out, "{INDENT}<pages>")?;
        for (id, file) in self.pages.iter().enumerate() {
            writeln!(
                out,
                "{INDENT}{INDENT}<page id=\"{id}\" file=\"{}\"/>",
                escape(file)
            )?;
        }
        writeln!(out, "{INDENT}</pages>")?;

        writeln!(out, "{INDENT}<chars count=\"{}\">", self.chars.len())?;
        for (code_point, glyph) in &self.chars {
            let page = if glyph.has_page() {
                i64::from(glyph.page)
            } else {
                -1
            };
            writeln!(
                out,
                "{INDENT}{INDENT}<char id=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" \
                 xoffset=\"{}\" yoffset=\"{}\" xadvance=\"{}\" page=\"{}\"/>",
                code_point,
                glyph.rect.x,
                glyph.rect.y,
                glyph.rect.width,
                glyph.rect.height,
                glyph.offset.x,
                glyph.offset.y,
                glyph.advance,
                page
            )?;
        }
        writeln!(out, "{INDENT}</chars>")?;
        writeln!(out, "</font>")
    }

    /// Parses a descriptor document
    ///
    /// `common` and `pages` are required, `info` and `chars` are not. Every
    /// page declared by `common` needs its own `<page>` entry; extra entries
    /// are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let doc = Document::parse(text).map_err(|e| FormatError::Malformed(e.to_string()))?;
        let root = doc.root_element();
        if root.tag_name().name() != "font" {
            return Err(FormatError::WrongRoot(root.tag_name().name().to_string()).into());
        }

        let mut descriptor = Descriptor::default();
        if let Some(info) = child(root, "info") {
            descriptor.face = info.attribute("face").unwrap_or_default().to_string();
            descriptor.size = attr(info, "info", "size", 0)?;
        }

        let common = child(root, "common").ok_or(FormatError::MissingSection("common"))?;
        descriptor.line_height = attr(common, "common", "lineHeight", 0)?;
        let page_count: usize = attr(common, "common", "pages", 0)?;

        let pages = child(root, "pages").ok_or(FormatError::MissingSection("pages"))?;
        let mut entries = pages.children().filter(|n| n.has_tag_name("page"));
        for index in 0..page_count {
            let entry = entries.next().ok_or(FormatError::MissingPage(index))?;
            let file = entry.attribute("file").ok_or_else(|| FormatError::BadAttribute {
                element: "page",
                attribute: "file",
                value: String::new(),
            })?;
            descriptor.pages.push(file.to_string());
        }

        if let Some(chars) = child(root, "chars") {
            for node in chars.children().filter(|n| n.has_tag_name("char")) {
                descriptor.chars.push(parse_char(node)?);
            }
        }
        descriptor.chars.sort_unstable_by_key(|&(cp, _)| cp);
        descriptor.chars.dedup_by_key(|&mut (cp, _)| cp);
        Ok(descriptor)
    }
}

fn parse_char(node: Node<'_, '_>) -> Result<(u32, Glyph)> {
    let id = required(node, "char", "id")?;
    let rect = Rect::new(
        attr(node, "char", "x", 0)?,
        attr(node, "char", "y", 0)?,
        attr(node, "char", "width", 0)?,
        attr(node, "char", "height", 0)?,
    );
    let offset = Offset::new(
        attr(node, "char", "xoffset", 0)?,
        attr(node, "char", "yoffset", 0)?,
    );
    let advance = attr(node, "char", "xadvance", 0)?;
    let page: i64 = attr(node, "char", "page", -1)?;
    let glyph = match page {
        -1 => Glyph::blank(offset, advance),
        p => {
            let page = u32::try_from(p).map_err(|_| bad("char", "page", &p.to_string()))?;
            Glyph::placed(rect, offset, advance, page)
        },
    };
    Ok((id, glyph))
}

fn child<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.children().find(|n| n.has_tag_name(name))
}

/// Numeric attribute, `default` when absent, an error when unparsable
fn attr<T: FromStr>(
    node: Node<'_, '_>,
    element: &'static str,
    attribute: &'static str,
    default: T,
) -> Result<T> {
    match node.attribute(attribute) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| bad(element, attribute, value).into()),
        None => Ok(default),
    }
}

fn required<T: FromStr>(
    node: Node<'_, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<T> {
    let value = node
        .attribute(attribute)
        .ok_or_else(|| bad(element, attribute, ""))?;
    value
        .trim()
        .parse()
        .map_err(|_| bad(element, attribute, value).into())
}

fn bad(element: &'static str, attribute: &'static str, value: &str) -> FormatError {
    FormatError::BadAttribute {
        element,
        attribute,
        value: value.to_string(),
    }
}

/// Escapes text for use inside a double-quoted attribute
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
