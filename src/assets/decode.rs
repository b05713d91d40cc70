use std::io::Cursor;
use std::sync::Arc;

use crate::foundation::core::ImageSize;
use crate::foundation::error::{BadgeError, BadgeResult};

/// A fully decoded source raster, shared read-only across the labels of one call.
#[derive(Clone, Debug)]
pub struct SourceImage {
    size: ImageSize,
    /// Straight-alpha RGBA8, row-major, tightly packed.
    rgba8: Arc<Vec<u8>>,
}

impl SourceImage {
    /// Decode `bytes` (any format enabled in `image`) into straight-alpha RGBA8.
    ///
    /// Truncated or corrupt bodies are rejected here even when the header alone would probe fine.
    pub fn decode(bytes: &[u8]) -> BadgeResult<Self> {
        let dyn_img = image::load_from_memory(bytes)
            .map_err(|e| BadgeError::decode(format!("decode image from memory: {e}")))?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(BadgeError::decode(format!(
                "image has empty dimensions {width}x{height}"
            )));
        }

        Ok(Self {
            size: ImageSize::new(width, height),
            rgba8: Arc::new(rgba.into_raw()),
        })
    }

    /// Build a source directly from straight-alpha RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> BadgeResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| BadgeError::decode("image buffer size overflow"))?;
        if rgba8.len() != expected || expected == 0 {
            return Err(BadgeError::decode(format!(
                "expected {expected} rgba8 bytes for {width}x{height}, got {}",
                rgba8.len()
            )));
        }
        Ok(Self {
            size: ImageSize::new(width, height),
            rgba8: Arc::new(rgba8),
        })
    }

    /// Pixel dimensions.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Borrow the straight-alpha RGBA8 pixels.
    pub fn rgba8(&self) -> &[u8] {
        &self.rgba8
    }
}

/// Probe the pixel dimensions of an encoded raster without decoding its body.
pub fn read_dimensions(bytes: &[u8]) -> BadgeResult<ImageSize> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| BadgeError::decode(format!("sniff image format: {e}")))?;
    if reader.format().is_none() {
        return Err(BadgeError::decode("unrecognized image format"));
    }
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| BadgeError::decode(format!("read image header: {e}")))?;
    Ok(ImageSize::new(width, height))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
