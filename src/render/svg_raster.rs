use std::sync::Arc;

use crate::foundation::error::{BadgeError, BadgeResult};

// Larger badges than this mean a runaway source image; refuse instead of allocating.
const MAX_DIM: u32 = 16_384;

/// Parse an SVG document, resolving text against `fontdb`.
pub fn parse_svg(svg: &str, fontdb: &Arc<usvg::fontdb::Database>) -> BadgeResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb: Arc::clone(fontdb),
        ..Default::default()
    };
    usvg::Tree::from_str(svg, &opts)
        .map_err(|e| BadgeError::composite(format!("parse badge svg: {e}")))
}

/// Rasterize `tree` into a `width x height` premultiplied RGBA8 buffer.
///
/// The tree is scaled to fill the target exactly.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> BadgeResult<Vec<u8>> {
    if width > MAX_DIM || height > MAX_DIM {
        return Err(BadgeError::composite(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        BadgeError::composite(format!("failed to allocate {width}x{height} svg pixmap"))
    })?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.take())
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg_raster.rs"]
mod tests;
