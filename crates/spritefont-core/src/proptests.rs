use crate::atlas::{pack_pages, SkylinePacker};
use crate::image::Image;
use crate::types::Rect;
use proptest::prelude::*;

fn rect_sizes(max_side: u32) -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((1..=max_side, 1..=max_side), 0..120)
}

// Property: every rect lands inside its page and rects on a page never overlap
proptest! {
    #[test]
    fn prop_packed_rects_are_disjoint_and_in_bounds(sizes in rect_sizes(64)) {
        let packing = pack_pages(&sizes, 128, 96).unwrap();
        prop_assert_eq!(packing.placements.len(), sizes.len());

        let rects: Vec<(u32, Rect)> = packing
            .placements
            .iter()
            .zip(&sizes)
            .map(|(p, &(w, h))| (p.page, Rect::new(p.x, p.y, w, h)))
            .collect();

        for (page, rect) in &rects {
            prop_assert!(*page < packing.page_count);
            prop_assert!(rect.fits_within(128, 96), "{:?} outside page", rect);
        }
        for (i, (page_a, a)) in rects.iter().enumerate() {
            for (page_b, b) in &rects[i + 1..] {
                prop_assert!(page_a != page_b || !a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }
}

// Property: no page is left empty
proptest! {
    #[test]
    fn prop_every_page_is_used(sizes in rect_sizes(100)) {
        let packing = pack_pages(&sizes, 128, 128).unwrap();
        for page in 0..packing.page_count {
            prop_assert!(packing.placements.iter().any(|p| p.page == page));
        }
    }
}

// Property: a single page never places past its edges
proptest! {
    #[test]
    fn prop_skyline_never_places_past_the_edge(sizes in rect_sizes(40)) {
        let mut packer = SkylinePacker::new(100, 100);
        for (spot, &(w, h)) in packer.pack(&sizes).iter().zip(&sizes) {
            if let Some((x, y)) = spot {
                prop_assert!(x + w <= 100 && y + h <= 100);
            }
        }
    }
}

// Property: blur grows the canvas by twice the radius and never creates ink
// from nothing
proptest! {
    #[test]
    fn prop_blur_expands_by_radius(w in 1u32..12, h in 1u32..12, r in 0u32..6) {
        let mut image = Image::new(w, h, 1);
        image.blur(r);
        prop_assert_eq!((image.width(), image.height()), (w + 2 * r, h + 2 * r));
        prop_assert!(image.data().iter().all(|&b| b == 0));
    }
}
