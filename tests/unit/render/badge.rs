use serde_json::json;

use super::*;

fn geometry() -> BadgeGeometry {
    BadgeGeometry {
        width: 800,
        height: 150,
        x: 100,
        y: 800,
        font_size: 60,
    }
}

#[test]
fn default_style_values() {
    let s = BadgeStyle::default();
    assert_eq!(s.background_color.to_svg_rgb(), "#ff6b35");
    assert_eq!(s.text_color.to_rgba8(), [255, 255, 255, 255]);
    assert_eq!(s.corner_radius, 12);
}

#[test]
fn style_accepts_camel_and_snake_case() {
    let s: BadgeStyle = serde_json::from_value(json!({
        "backgroundColor": "#000000",
        "text_color": "#ff0000",
        "cornerRadius": 4
    }))
    .unwrap();
    assert_eq!(s.background_color.to_svg_rgb(), "#000000");
    assert_eq!(s.text_color.to_svg_rgb(), "#ff0000");
    assert_eq!(s.corner_radius, 4);
    assert_eq!(s.font_family, "sans-serif");

    assert!(serde_json::from_value::<BadgeStyle>(json!({"border": 1})).is_err());
}

#[test]
fn render_badge_uses_geometry_and_style() {
    let badge = render_badge(&geometry(), "SALE", &BadgeStyle::default());
    assert_eq!(badge.size(), ImageSize::new(800, 150));
    assert_eq!(badge.rect.corner_radius, 12);
    assert_eq!(badge.rect.fill_opacity, BACKGROUND_OPACITY);
    assert_eq!(badge.text.font_size, 60);
    assert_eq!(badge.text.content, "SALE");
}

#[test]
fn svg_contains_centered_bold_text_and_rounded_rect() {
    let svg = render_badge(&geometry(), "SALE", &BadgeStyle::default()).to_svg();
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"800\" height=\"150\""));
    assert!(svg.contains(r#"rx="12" ry="12""#), "{svg}");
    assert!(svg.contains(r##"fill="#ff6b35" fill-opacity="0.95""##), "{svg}");
    assert!(svg.contains(r#"x="400" y="75" text-anchor="middle" dominant-baseline="central""#), "{svg}");
    assert!(svg.contains(r#"font-size="60" font-weight="bold""#), "{svg}");
    assert!(svg.contains(">SALE</text>"), "{svg}");
}

#[test]
fn svg_escapes_label_markup() {
    let svg = render_badge(&geometry(), "<b>&\"x\"", &BadgeStyle::default()).to_svg();
    assert!(svg.contains("&lt;b&gt;&amp;&quot;x&quot;"), "{svg}");
    assert!(!svg.contains("<b>"));
}

#[test]
fn empty_text_omits_text_node() {
    let svg = render_badge(&geometry(), "", &BadgeStyle::default()).to_svg();
    assert!(!svg.contains("<text"));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn rendering_is_deterministic() {
    let a = render_badge(&geometry(), "x", &BadgeStyle::default()).to_svg();
    let b = render_badge(&geometry(), "x", &BadgeStyle::default()).to_svg();
    assert_eq!(a, b);
}
