/// Raster dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageSize {
    /// Create a size from `width` and `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels (`width * height`).
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Return `true` when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Top-left anchored pixel offset inside an image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// Horizontal offset from the left edge.
    pub x: u32,
    /// Vertical offset from the top edge.
    pub y: u32,
}

impl Position {
    /// Create a position.
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Return `true` when a `size` box placed here lies fully inside `bounds`.
    pub fn fits(self, size: ImageSize, bounds: ImageSize) -> bool {
        u64::from(self.x) + u64::from(size.width) <= u64::from(bounds.width)
            && u64::from(self.y) + u64::from(size.height) <= u64::from(bounds.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
