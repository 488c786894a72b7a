//! Auto font size for single-line fields.

use crate::font::FieldFont;
use crate::geometry::Rect;

/// Smallest size [`fit_font_size`] returns unless told otherwise.
pub const MIN_FONT_SIZE: f64 = 4.0;

/// Fraction of the available width used as side padding in narrow fields.
const RELATIVE_PADDING: f64 = 0.15;

/// Fixed side padding used once the relative padding reaches this value.
const FIXED_PADDING: f64 = 4.0;

/// Compute the largest font size at which `text` fits into `bbox`.
///
/// The height estimate scales the font's glyph bounding box to the box
/// height minus the border on both sides. When the text has a non-zero
/// advance, the size is further clamped so the text fits the available
/// width minus side padding. The result is never below `min_size`.
///
/// The height term is `(h - 2 * border) * upem / (top - bottom)`, so a
/// glyph box of `top - bottom` units spans exactly the inner height.
pub fn fit_font_size(
    font: &dyn FieldFont,
    bbox: &Rect,
    text: &str,
    border_width: f64,
    min_size: f64,
) -> f64 {
    let [_, bottom, _, top] = font.bbox();
    let glyph_height = top - bottom;
    let mut size = if glyph_height > 0.0 {
        (bbox.height() - 2.0 * border_width) * font.units_per_em() / glyph_height
    } else {
        min_size
    };

    let advance = font.width(text, 1.0);
    if advance > 0.0 {
        let mut available = (bbox.width() - 2.0 * border_width).max(0.0);
        let relative = RELATIVE_PADDING * available;
        if relative < FIXED_PADDING {
            available -= 2.0 * relative;
        } else {
            available -= 2.0 * FIXED_PADDING;
        }
        size = size.min(available / advance);
    }

    if !size.is_finite() {
        return min_size;
    }
    size.max(min_size)
}
