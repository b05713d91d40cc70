use super::*;
use crate::foundation::error::ErrorKind;
use crate::layout::policy::BadgeGeometry;
use crate::render::badge::{BadgeStyle, render_badge};

fn solid_source(width: u32, height: u32, px: [u8; 4]) -> SourceImage {
    let data = px.repeat((width * height) as usize);
    SourceImage::from_rgba8(width, height, data).unwrap()
}

fn compositor() -> Compositor {
    Compositor::new(Arc::new(usvg::fontdb::Database::new()))
}

fn geometry(width: u32, height: u32, x: u32, y: u32) -> BadgeGeometry {
    BadgeGeometry {
        width,
        height,
        x,
        y,
        font_size: 4,
    }
}

#[test]
fn over_opaque_and_transparent() {
    assert_eq!(over([1, 2, 3, 255], [0, 0, 0, 0]), [1, 2, 3, 255]);
    assert_eq!(over([1, 2, 3, 255], [9, 8, 7, 255]), [9, 8, 7, 255]);
    let half = over([0, 0, 255, 255], [128, 0, 0, 128]);
    assert_eq!(half[3], 255);
    assert_eq!(half[0], 128);
    assert!((i32::from(half[2]) - 127).abs() <= 1);
}

#[test]
fn overlay_rejects_out_of_bounds() {
    let mut dst = vec![0u8; 4 * 4 * 4];
    let overlay = vec![255u8; 2 * 2 * 4];
    let err = overlay_premul_in_place(
        &mut dst,
        ImageSize::new(4, 4),
        &overlay,
        ImageSize::new(2, 2),
        Position::new(3, 0),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Composite);
}

#[test]
fn overlay_touches_only_badge_pixels() {
    let mut dst = [10u8, 20, 30, 255].repeat(4 * 4);
    let overlay = [255u8, 255, 255, 255].repeat(2 * 2);
    overlay_premul_in_place(
        &mut dst,
        ImageSize::new(4, 4),
        &overlay,
        ImageSize::new(2, 2),
        Position::new(1, 2),
    )
    .unwrap();

    for y in 0..4usize {
        for x in 0..4usize {
            let i = (y * 4 + x) * 4;
            let inside = (1..3).contains(&x) && (2..4).contains(&y);
            let want = if inside {
                [255, 255, 255, 255]
            } else {
                [10, 20, 30, 255]
            };
            assert_eq!(&dst[i..i + 4], &want, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn composite_paints_badge_and_keeps_surroundings() {
    let src = solid_source(40, 40, [0, 0, 255, 255]);
    let style = BadgeStyle {
        corner_radius: 0,
        ..BadgeStyle::default()
    };
    let g = geometry(20, 10, 10, 25);
    let badge = render_badge(&g, "", &style);
    let png = compositor().composite(&src, &badge, g.position()).unwrap();

    let out = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(out.dimensions(), (40, 40));
    assert_eq!(out.get_pixel(0, 0).0, [0, 0, 255, 255]);
    assert_eq!(out.get_pixel(39, 39).0, [0, 0, 255, 255]);

    // 95% orange over blue.
    let p = out.get_pixel(20, 30).0;
    assert_eq!(p[3], 255);
    assert!(p[0] > 230, "{p:?}");
    assert!(p[2] < 70, "{p:?}");

    // The source is untouched.
    assert_eq!(&src.rgba8()[..4], &[0, 0, 255, 255]);
}

#[test]
fn composite_rejects_out_of_bounds_and_empty_badges() {
    let src = solid_source(10, 10, [0, 0, 0, 255]);
    let style = BadgeStyle::default();

    let g = geometry(8, 4, 5, 0);
    let err = compositor()
        .composite(&src, &render_badge(&g, "x", &style), g.position())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Composite);
    assert!(err.to_string().contains("outside"));

    let g = geometry(0, 0, 0, 0);
    let err = compositor()
        .composite(&src, &render_badge(&g, "x", &style), g.position())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Composite);
    assert!(err.to_string().contains("zero area"));
}

#[test]
fn composite_is_deterministic() {
    let src = solid_source(50, 50, [200, 200, 200, 255]);
    let g = geometry(40, 7, 5, 40);
    let badge = render_badge(&g, "HELLO", &BadgeStyle::default());
    let a = compositor().composite(&src, &badge, g.position()).unwrap();
    let b = compositor().composite(&src, &badge, g.position()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn encode_png_roundtrips_pixels() {
    let px = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let png = encode_png(&px, ImageSize::new(2, 1)).unwrap();
    let back = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(back.into_raw(), px);
}
