use proptest::prelude::*;

use super::*;

#[test]
fn bottom_center_1000_square() {
    let g = AnchoredLayout::bottom_center().plan(ImageSize::new(1000, 1000));
    assert_eq!(
        g,
        BadgeGeometry {
            width: 800,
            height: 150,
            x: 100,
            y: 800,
            font_size: 60,
        }
    );
}

#[test]
fn bottom_center_non_round_sizes_floor() {
    // 1234 * 0.8 = 987.2, 777 * 0.15 = 116.55, 116 * 0.4 = 46.4,
    // (1234 - 987) / 2 = 123.5, 777 - 116 - 38.85 = 622.15
    let g = AnchoredLayout::bottom_center().plan(ImageSize::new(1234, 777));
    assert_eq!(g.width, 987);
    assert_eq!(g.height, 116);
    assert_eq!(g.font_size, 46);
    assert_eq!(g.x, 123);
    assert_eq!(g.y, 622);
}

#[test]
fn tiny_images_clamp_to_zero() {
    let g = AnchoredLayout::bottom_center().plan(ImageSize::new(1, 1));
    assert_eq!(g.width, 0);
    assert_eq!(g.height, 0);
    assert_eq!(g.font_size, 0);
    assert!(g.fits_within(ImageSize::new(1, 1)));

    let g = AnchoredLayout::bottom_center().plan(ImageSize::new(0, 0));
    assert_eq!(g, BadgeGeometry { width: 0, height: 0, x: 0, y: 0, font_size: 0 });
}

#[test]
fn corner_anchors_use_width_margin() {
    let img = ImageSize::new(1000, 1000);
    let tl = AnchoredLayout::new(Anchor::TopLeft).plan(img);
    assert_eq!((tl.x, tl.y), (50, 50));
    let br = AnchoredLayout::new(Anchor::BottomRight).plan(img);
    assert_eq!((br.x, br.y), (150, 800));
    let tc = AnchoredLayout::new(Anchor::TopCenter).plan(img);
    assert_eq!((tc.x, tc.y), (100, 50));
}

#[test]
fn anchor_parses_and_displays() {
    for a in Anchor::ALL {
        assert_eq!(a.as_str().parse::<Anchor>().unwrap(), a);
        assert_eq!(a.to_string(), a.as_str());
    }
    assert_eq!("Bottom_Center".parse::<Anchor>().unwrap(), Anchor::BottomCenter);
    assert!("middle".parse::<Anchor>().is_err());

    let a: Anchor = serde_json::from_str("\"top-right\"").unwrap();
    assert_eq!(a, Anchor::TopRight);
}

proptest! {
    #[test]
    fn geometry_is_always_inside_the_image(
        w in 0u32..20_000,
        h in 0u32..20_000,
        anchor_idx in 0usize..6,
    ) {
        let img = ImageSize::new(w, h);
        let g = AnchoredLayout::new(Anchor::ALL[anchor_idx]).plan(img);
        prop_assert!(g.width <= w);
        prop_assert!(g.height <= h);
        prop_assert!(u64::from(g.x) + u64::from(g.width) <= u64::from(w));
        prop_assert!(u64::from(g.y) + u64::from(g.height) <= u64::from(h));
        prop_assert!(g.font_size <= g.height);
    }
}
