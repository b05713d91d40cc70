use std::fmt::Write as _;

use crate::assets::color::Color;
use crate::foundation::core::ImageSize;
use crate::layout::policy::BadgeGeometry;

/// Opacity applied on top of the background color's own alpha.
pub const BACKGROUND_OPACITY: f64 = 0.95;

/// Caller-supplied badge appearance, shared read-only across a batch.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BadgeStyle {
    /// Rectangle fill (drawn at [`BACKGROUND_OPACITY`]).
    #[serde(alias = "backgroundColor")]
    pub background_color: Color,
    /// Label fill.
    #[serde(alias = "textColor")]
    pub text_color: Color,
    /// Rectangle corner radius in pixels.
    #[serde(alias = "cornerRadius")]
    pub corner_radius: u32,
    /// CSS font-family list for the label.
    #[serde(alias = "fontFamily")]
    pub font_family: String,
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self {
            background_color: Color::BRAND_ORANGE,
            text_color: Color::WHITE,
            corner_radius: 12,
            font_family: "sans-serif".to_owned(),
        }
    }
}

/// Rounded background rectangle of a badge.
#[derive(Clone, Debug, PartialEq)]
pub struct BadgeRect {
    /// Rectangle size; also the size of the whole badge.
    pub size: ImageSize,
    /// Corner radius in pixels.
    pub corner_radius: u32,
    /// Fill color.
    pub fill: Color,
    /// Fill opacity in `0..=1`.
    pub fill_opacity: f64,
}

/// Bold label centered in the badge rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct BadgeText {
    /// Already fitted display text.
    pub content: String,
    /// Font size in pixels.
    pub font_size: u32,
    /// CSS font-family list.
    pub font_family: String,
    /// Fill color.
    pub fill: Color,
}

/// Vector description of a badge: one rectangle and one text node, in badge-local pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedBadge {
    /// Background.
    pub rect: BadgeRect,
    /// Label.
    pub text: BadgeText,
}

impl RenderedBadge {
    /// Badge size in pixels.
    pub fn size(&self) -> ImageSize {
        self.rect.size
    }

    /// Serialize to a standalone SVG document sized to the badge.
    pub fn to_svg(&self) -> String {
        let ImageSize { width, height } = self.rect.size;
        let cx = f64::from(width) / 2.0;
        let cy = f64::from(height) / 2.0;
        let fill_opacity = (self.rect.fill.alpha() * self.rect.fill_opacity).clamp(0.0, 1.0);

        let mut svg = String::with_capacity(512);
        // `write!` into a `String` is infallible.
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        let _ = write!(
            svg,
            r#"<rect x="0" y="0" width="{width}" height="{height}" rx="{r}" ry="{r}" fill="{fill}" fill-opacity="{fill_opacity}"/>"#,
            r = self.rect.corner_radius,
            fill = self.rect.fill.to_svg_rgb(),
        );
        if !self.text.content.is_empty() {
            let _ = write!(
                svg,
                r#"<text x="{cx}" y="{cy}" text-anchor="middle" dominant-baseline="central" font-family="{family}" font-size="{size}" font-weight="bold" fill="{fill}" fill-opacity="{opacity}">{content}</text>"#,
                family = escape_xml(&self.text.font_family),
                size = self.text.font_size,
                fill = self.text.fill.to_svg_rgb(),
                opacity = self.text.fill.alpha(),
                content = escape_xml(&self.text.content),
            );
        }
        svg.push_str("</svg>");
        svg
    }
}

/// Build the vector badge for `geometry`, `display_text` and `style`.
pub fn render_badge(geometry: &BadgeGeometry, display_text: &str, style: &BadgeStyle) -> RenderedBadge {
    RenderedBadge {
        rect: BadgeRect {
            size: geometry.size(),
            corner_radius: style.corner_radius,
            fill: style.background_color,
            fill_opacity: BACKGROUND_OPACITY,
        },
        text: BadgeText {
            content: display_text.to_owned(),
            font_size: geometry.font_size,
            font_family: style.font_family.clone(),
            fill: style.text_color,
        },
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/badge.rs"]
mod tests;
