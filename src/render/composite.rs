use std::sync::Arc;

use image::ImageEncoder as _;

use crate::assets::decode::SourceImage;
use crate::foundation::core::{ImageSize, Position};
use crate::foundation::error::{BadgeError, BadgeResult};
use crate::foundation::math::{mul_div255_u8, premultiply, unpremultiply};
use crate::render::badge::RenderedBadge;
use crate::render::svg_raster::{parse_svg, rasterize_svg_to_premul_rgba8};

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Blend a premultiplied `overlay` of `overlay_size` onto straight-alpha `dst` at `at`.
///
/// Pixels outside the overlay, and overlay pixels with zero coverage, are left untouched.
pub fn overlay_premul_in_place(
    dst: &mut [u8],
    dst_size: ImageSize,
    overlay: &[u8],
    overlay_size: ImageSize,
    at: Position,
) -> BadgeResult<()> {
    let expected_dst = dst_size.area() as usize * 4;
    let expected_overlay = overlay_size.area() as usize * 4;
    if dst.len() != expected_dst || overlay.len() != expected_overlay {
        return Err(BadgeError::composite(
            "overlay_premul_in_place expects buffers matching width*height*4",
        ));
    }
    if !at.fits(overlay_size, dst_size) {
        return Err(BadgeError::composite(format!(
            "badge {}x{} at ({}, {}) falls outside the {}x{} image",
            overlay_size.width, overlay_size.height, at.x, at.y, dst_size.width, dst_size.height
        )));
    }

    let dst_stride = dst_size.width as usize * 4;
    let src_stride = overlay_size.width as usize * 4;
    for row in 0..overlay_size.height as usize {
        let src_row = &overlay[row * src_stride..(row + 1) * src_stride];
        let start = (at.y as usize + row) * dst_stride + at.x as usize * 4;
        let dst_row = &mut dst[start..start + src_stride];

        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            if s[3] == 0 {
                continue;
            }
            let below = premultiply([d[0], d[1], d[2], d[3]]);
            let out = unpremultiply(over(below, [s[0], s[1], s[2], s[3]]));
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Encode straight-alpha RGBA8 as PNG.
pub fn encode_png(rgba8: &[u8], size: ImageSize) -> BadgeResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(
            rgba8,
            size.width,
            size.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| BadgeError::composite(format!("encode png: {e}")))?;
    Ok(buf)
}

/// Rasterizes vector badges and overlays them onto decoded sources.
///
/// Holds only the shared font database; cheap to clone into worker threads.
#[derive(Clone, Debug)]
pub struct Compositor {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl Compositor {
    /// Create a compositor resolving label text against `fontdb`.
    pub fn new(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { fontdb }
    }

    /// Overlay `badge` onto `source` with its top-left corner at `at`, returning PNG bytes.
    ///
    /// The source is never modified; each call composites into its own copy.
    pub fn composite(
        &self,
        source: &SourceImage,
        badge: &RenderedBadge,
        at: Position,
    ) -> BadgeResult<Vec<u8>> {
        let size = badge.size();
        if size.is_empty() {
            return Err(BadgeError::composite(format!(
                "badge has zero area ({}x{}) for a {}x{} image",
                size.width,
                size.height,
                source.width(),
                source.height()
            )));
        }
        if !at.fits(size, source.size()) {
            return Err(BadgeError::composite(format!(
                "badge {}x{} at ({}, {}) falls outside the {}x{} image",
                size.width,
                size.height,
                at.x,
                at.y,
                source.width(),
                source.height()
            )));
        }

        let tree = parse_svg(&badge.to_svg(), &self.fontdb)?;
        let overlay = rasterize_svg_to_premul_rgba8(&tree, size.width, size.height)?;

        let mut out = source.rgba8().to_vec();
        overlay_premul_in_place(&mut out, source.size(), &overlay, size, at)?;
        encode_png(&out, source.size())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
