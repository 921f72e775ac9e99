//! Spreading glyph bitmaps over fixed-size pages
//!
//! A skyline bottom-left packer fills one page at a time. Whatever does not
//! fit on the current page is retried on a fresh one, until every rectangle
//! has a home. Rectangles larger than a page are refused before packing
//! starts, so the page loop always terminates.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::{PackError, Result};
use crate::glyph::{Glyph, RenderedGlyph};
use crate::image::Image;
use crate::settings::TextureSize;
use crate::types::Rect;

/// Empty margin kept around every glyph so texture filtering never samples
/// a neighbor
pub const GLYPH_PADDING: u32 = 2;

/// Where one rectangle ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub page: u32,
    pub x: u32,
    pub y: u32,
}

/// Output of [`pack_pages`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagePacking {
    pub page_count: u32,
    /// One entry per input rectangle, same order
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, Copy)]
struct SkylineNode {
    x: u32,
    y: u32,
    width: u32,
}

/// Skyline bottom-left packer for a single page
///
/// The skyline is the upper contour of everything placed so far, stored as
/// horizontal segments covering the full page width from left to right.
#[derive(Debug, Clone)]
pub struct SkylinePacker {
    width: u32,
    height: u32,
    nodes: Vec<SkylineNode>,
}

impl SkylinePacker {
    pub fn new(width: u32, height: u32) -> Self {
        let mut packer = Self {
            width,
            height,
            nodes: Vec::with_capacity(width as usize),
        };
        packer.reset();
        packer
    }

    /// Back to an empty page
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(SkylineNode {
            x: 0,
            y: 0,
            width: self.width,
        });
    }

    /// Places as many of `sizes` as fit on this page
    ///
    /// Taller rectangles go first (then wider ones). The result is in input
    /// order: `Some((x, y))` for placed rectangles, `None` for the rest.
    pub fn pack(&mut self, sizes: &[(u32, u32)]) -> Vec<Option<(u32, u32)>> {
        let mut order: Vec<usize> = (0..sizes.len()).collect();
        order.sort_by(|&a, &b| {
            let (wa, ha) = sizes[a];
            let (wb, hb) = sizes[b];
            hb.cmp(&ha).then(wb.cmp(&wa))
        });

        let mut result = vec![None; sizes.len()];
        for index in order {
            let (w, h) = sizes[index];
            if w == 0 || h == 0 {
                result[index] = Some((0, 0));
                continue;
            }
            if let Some((node, x, y)) = self.find_position(w, h) {
                self.insert(node, x, y, w, h);
                result[index] = Some((x, y));
            }
        }
        result
    }

    /// Lowest spot for a `w`x`h` rectangle, least wasted area on ties
    fn find_position(&self, w: u32, h: u32) -> Option<(usize, u32, u32)> {
        let mut best: Option<(usize, u32, u32)> = None;
        let mut best_waste = u64::MAX;

        for start in 0..self.nodes.len() {
            let x = self.nodes[start].x;
            if x + w > self.width {
                break;
            }

            let (y, waste) = self.rest_height(start, w);
            if y + h > self.height {
                continue;
            }

            let better = match best {
                None => true,
                Some((_, _, best_y)) => y < best_y || (y == best_y && waste < best_waste),
            };
            if better {
                best = Some((start, x, y));
                best_waste = waste;
            }
        }
        best
    }

    /// Height a rectangle starting at node `start` would rest on, and the
    /// area left unusable underneath it
    fn rest_height(&self, start: usize, w: u32) -> (u32, u64) {
        let left = self.nodes[start].x;
        let right = left + w;

        let covered = self.nodes[start..]
            .iter()
            .take_while(|node| node.x < right);

        let y = covered.clone().map(|node| node.y).max().unwrap_or(0);
        let waste = covered
            .map(|node| {
                let overlap = (node.x + node.width).min(right) - node.x;
                (y - node.y) as u64 * overlap as u64
            })
            .sum();
        (y, waste)
    }

    fn insert(&mut self, start: usize, x: u32, y: u32, w: u32, h: u32) {
        let right = x + w;

        // Drop nodes fully under the new rect, trim the one it partly covers
        let mut end = start;
        while end < self.nodes.len() && self.nodes[end].x + self.nodes[end].width <= right {
            end += 1;
        }
        if end < self.nodes.len() && self.nodes[end].x < right {
            let node = &mut self.nodes[end];
            node.width -= right - node.x;
            node.x = right;
        }
        self.nodes.splice(
            start..end,
            [SkylineNode {
                x,
                y: y + h,
                width: w,
            }],
        );

        // Merge neighbors at the same height
        let mut i = 0;
        while i + 1 < self.nodes.len() {
            if self.nodes[i].y == self.nodes[i + 1].y {
                self.nodes[i].width += self.nodes[i + 1].width;
                self.nodes.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }
}

/// Distributes rectangles over as few `page_width`x`page_height` pages as
/// the skyline heuristic manages
///
/// Pages are filled in order: everything that does not fit on page N is
/// retried on page N + 1. No rectangles means no pages.
pub fn pack_pages(sizes: &[(u32, u32)], page_width: u32, page_height: u32) -> Result<PagePacking> {
    for (index, &(width, height)) in sizes.iter().enumerate() {
        if width > page_width || height > page_height {
            return Err(PackError::RectTooLarge {
                index,
                width,
                height,
                page_width,
                page_height,
            }
            .into());
        }
    }

    let mut placements = vec![Placement { page: 0, x: 0, y: 0 }; sizes.len()];
    let mut remaining: Vec<usize> = (0..sizes.len()).collect();
    let mut packer = SkylinePacker::new(page_width, page_height);
    let mut page_count = 0u32;

    while !remaining.is_empty() {
        packer.reset();
        let batch: Vec<(u32, u32)> = remaining.iter().map(|&i| sizes[i]).collect();
        let packed = packer.pack(&batch);

        let mut left_over = Vec::new();
        for (&index, spot) in remaining.iter().zip(packed) {
            match spot {
                Some((x, y)) => {
                    placements[index] = Placement {
                        page: page_count,
                        x,
                        y,
                    }
                },
                None => left_over.push(index),
            }
        }

        if left_over.len() == remaining.len() {
            return Err(PackError::NoProgress.into());
        }

        debug!(
            "Page {}: packed {} rects, {} left",
            page_count,
            remaining.len() - left_over.len(),
            left_over.len()
        );
        page_count += 1;
        remaining = left_over;
    }

    Ok(PagePacking {
        page_count,
        placements,
    })
}

/// Padded pack size of a glyph bitmap
pub fn padded_size(image: &Image) -> (u32, u32) {
    (
        image.width() + 2 * GLYPH_PADDING,
        image.height() + 2 * GLYPH_PADDING,
    )
}

/// Replaces bitmaps too large for a page with nothing
///
/// The glyph keeps its advance, so text still lays out; it just does not
/// draw. Returns how many glyphs were affected.
pub fn demote_oversized(glyphs: &mut [RenderedGlyph], texture: TextureSize) -> usize {
    let mut demoted = 0;
    for glyph in glyphs.iter_mut().filter(|g| g.has_bitmap()) {
        let (w, h) = padded_size(&glyph.image);
        if w > texture.width || h > texture.height {
            warn!(
                "Glyph U+{:04X} ({}x{} with padding) does not fit a {}x{} page, dropping its bitmap",
                glyph.code_point, w, h, texture.width, texture.height
            );
            glyph.image = Image::empty();
            demoted += 1;
        }
    }
    demoted
}

/// Packed pages and the glyph table, before any colorization
#[derive(Debug, Clone, Default)]
pub struct Atlas {
    pub pages: Vec<Image>,
    pub glyphs: HashMap<u32, Glyph>,
}

/// Packs rendered glyphs onto `channels`-channel pages
///
/// Bitmaps are pasted inside their padded slot; the recorded rect is the
/// bitmap itself. Glyphs without a bitmap get [`Glyph::NO_PAGE`].
pub fn build_atlas(glyphs: Vec<RenderedGlyph>, texture: TextureSize, channels: u8) -> Result<Atlas> {
    let inked: Vec<usize> = glyphs
        .iter()
        .enumerate()
        .filter(|(_, g)| g.has_bitmap())
        .map(|(i, _)| i)
        .collect();
    let sizes: Vec<(u32, u32)> = inked.iter().map(|&i| padded_size(&glyphs[i].image)).collect();

    let packing = pack_pages(&sizes, texture.width, texture.height)?;

    let mut pages: Vec<Image> = (0..packing.page_count)
        .map(|_| Image::new(texture.width, texture.height, channels))
        .collect();
    let mut placed: HashMap<usize, Placement> = HashMap::with_capacity(inked.len());
    for (&index, &placement) in inked.iter().zip(packing.placements.iter()) {
        placed.insert(index, placement);
    }

    let mut table = HashMap::with_capacity(glyphs.len());
    for (index, glyph) in glyphs.into_iter().enumerate() {
        let entry = match placed.get(&index) {
            Some(p) => {
                let x = p.x + GLYPH_PADDING;
                let y = p.y + GLYPH_PADDING;
                pages[p.page as usize].paste(&glyph.image, x as i32, y as i32)?;
                let rect = Rect::new(x, y, glyph.image.width(), glyph.image.height());
                Glyph::placed(rect, glyph.offset, glyph.advance, p.page)
            },
            None => Glyph::blank(glyph.offset, glyph.advance),
        };
        table.insert(glyph.code_point, entry);
    }

    Ok(Atlas {
        pages,
        glyphs: table,
    })
}
