//! Appearance generation settings.

use crate::color::Color;
use crate::field::ConformanceLevel;
use crate::font_fit::MIN_FONT_SIZE;

/// Options controlling appearance synthesis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AppearanceOptions {
    /// Size used for auto-sized multiline fields.
    pub default_font_size: f64,
    /// Floor for auto-fit font sizes.
    pub min_font_size: f64,
    /// Horizontal padding inside single-line fields, added to the border width.
    pub text_padding: f64,
    /// Padding on each side of multiline and list fields.
    pub multiline_padding: f64,
    /// Background of selected list entries.
    pub highlight_color: Color,
    /// Text color of selected list entries.
    pub highlight_text_color: Color,
    /// Conformance level applied to fields that do not set their own.
    pub conformance: Option<ConformanceLevel>,
}

impl Default for AppearanceOptions {
    fn default() -> Self {
        Self {
            default_font_size: 12.0,
            min_font_size: MIN_FONT_SIZE,
            text_padding: 2.0,
            multiline_padding: 3.0,
            highlight_color: Color::rgb8(10, 36, 106),
            highlight_text_color: Color::LIGHT_GRAY,
            conformance: None,
        }
    }
}
