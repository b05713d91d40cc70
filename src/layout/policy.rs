use std::str::FromStr;

use crate::foundation::core::{ImageSize, Position};

/// Badge box, anchor and font size for one image, in pixels.
///
/// A pure function of the image dimensions; computed once per label and never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BadgeGeometry {
    /// Badge width.
    pub width: u32,
    /// Badge height.
    pub height: u32,
    /// Left edge, relative to the image.
    pub x: u32,
    /// Top edge, relative to the image.
    pub y: u32,
    /// Label font size.
    pub font_size: u32,
}

impl BadgeGeometry {
    /// Badge box size.
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    /// Top-left anchor.
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Return `true` when the badge lies fully inside `image`.
    pub fn fits_within(&self, image: ImageSize) -> bool {
        self.position().fits(self.size(), image)
    }
}

/// Rule set mapping image dimensions to badge geometry.
///
/// Implementations must be total: every input yields a geometry fully inside the image.
pub trait LayoutPolicy: Send + Sync + std::fmt::Debug {
    /// Compute the badge geometry for an image of `image` size.
    fn plan(&self, image: ImageSize) -> BadgeGeometry;
}

/// Where the badge box sits inside the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// Horizontally centered, 5% above the bottom edge.
    #[default]
    BottomCenter,
    /// Horizontally centered, 5% below the top edge.
    TopCenter,
    /// 5% in from the top and left edges.
    TopLeft,
    /// 5% in from the top and right edges.
    TopRight,
    /// 5% in from the bottom and left edges.
    BottomLeft,
    /// 5% in from the bottom and right edges.
    BottomRight,
}

impl Anchor {
    /// All anchors, in declaration order.
    pub const ALL: [Anchor; 6] = [
        Anchor::BottomCenter,
        Anchor::TopCenter,
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
    ];

    /// Stable kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::BottomCenter => "bottom-center",
            Anchor::TopCenter => "top-center",
            Anchor::TopLeft => "top-left",
            Anchor::TopRight => "top-right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::BottomRight => "bottom-right",
        }
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase().replace('_', "-");
        Anchor::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Anchor::ALL.iter().map(|a| a.as_str()).collect();
                format!("unknown anchor \"{s}\" (expected one of: {})", names.join(", "))
            })
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed 80% x 15% badge box, 40% font ratio and 5% margins, placed at an [`Anchor`].
///
/// For [`Anchor::BottomCenter`]:
///
/// - `width = floor(w * 0.8)`, `height = floor(h * 0.15)`, `font_size = floor(height * 0.4)`
/// - `x = floor((w - width) / 2)`, `y = floor(h - height - h * 0.05)`
///
/// All ratios are evaluated as exact integer fractions so results never depend on float rounding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnchoredLayout {
    /// Placement of the badge box.
    pub anchor: Anchor,
}

impl AnchoredLayout {
    /// Layout at `anchor`.
    pub fn new(anchor: Anchor) -> Self {
        Self { anchor }
    }

    /// The default bottom-center layout.
    pub fn bottom_center() -> Self {
        Self::new(Anchor::BottomCenter)
    }
}

impl LayoutPolicy for AnchoredLayout {
    fn plan(&self, image: ImageSize) -> BadgeGeometry {
        let w = u64::from(image.width);
        let h = u64::from(image.height);

        let width = w * 4 / 5;
        let height = h * 3 / 20;
        let font_size = height * 2 / 5;

        // floor(n - h/20) == n - ceil(h/20) for integer n.
        let margin_y = h.div_ceil(20);
        let margin_x = w.div_ceil(20);
        let free_x = w - width;
        let free_y = h - height;

        let x = match self.anchor {
            Anchor::BottomCenter | Anchor::TopCenter => free_x / 2,
            Anchor::TopLeft | Anchor::BottomLeft => margin_x.min(free_x),
            Anchor::TopRight | Anchor::BottomRight => free_x.saturating_sub(margin_x),
        };
        let y = match self.anchor {
            Anchor::TopCenter | Anchor::TopLeft | Anchor::TopRight => margin_y.min(free_y),
            Anchor::BottomCenter | Anchor::BottomLeft | Anchor::BottomRight => {
                free_y.saturating_sub(margin_y)
            }
        };

        // Every value is bounded by the (u32) image dimensions.
        BadgeGeometry {
            width: width as u32,
            height: height as u32,
            x: x as u32,
            y: y as u32,
            font_size: font_size as u32,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/policy.rs"]
mod tests;
