//! Label truncation against a badge box.
//!
//! The width estimate is a heuristic: every glyph is assumed to be `0.6 * font_size` wide, with
//! no font metrics involved. Wide glyphs (CJK, `W`, emoji) can still overflow the box and narrow
//! ones get truncated early. Replacing it with shaped-text measurement changes which labels get
//! an ellipsis, so it has to be a deliberate behavior change.

/// Marker appended to truncated labels.
pub const ELLIPSIS: &str = "...";

const ELLIPSIS_CHARS: usize = 3;

/// Maximum number of characters that fit in `box_width` at `font_size`.
///
/// `floor(box_width / (0.6 * font_size))`, computed as `floor(10 * box_width / (6 * font_size))`.
/// A zero font size fits nothing.
pub fn max_chars(box_width: u32, font_size: u32) -> usize {
    if font_size == 0 {
        return 0;
    }
    let n = u64::from(box_width) * 10 / (u64::from(font_size) * 6);
    usize::try_from(n).unwrap_or(usize::MAX)
}

/// Fit `text` into a box of `box_width` pixels at `font_size`.
///
/// Text that fits is returned unchanged. Longer text keeps its first `max_chars - 3` characters
/// followed by [`ELLIPSIS`]. When the box fits three characters or fewer, the result is the
/// ellipsis alone if exactly three fit and empty otherwise. Length is counted in `char`s and the
/// result never exceeds [`max_chars`], so fitting is idempotent.
pub fn fit_text(text: &str, box_width: u32, font_size: u32) -> String {
    let max = max_chars(box_width, font_size);
    let len = text.chars().count();
    if len <= max {
        return text.to_owned();
    }
    if max < ELLIPSIS_CHARS {
        return String::new();
    }

    let keep = max - ELLIPSIS_CHARS;
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
