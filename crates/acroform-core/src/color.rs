//! Device color values used by default appearances and appearance characteristics.

/// A device color with components in `[0.0, 1.0]`.
///
/// The variant determines the color-set operator emitted into content
/// streams: `g`/`G` for gray, `rg`/`RG` for RGB and `k`/`K` for CMYK.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// DeviceGray (1 component).
    Gray(f64),
    /// DeviceRGB (3 components).
    Rgb(f64, f64, f64),
    /// DeviceCMYK (4 components).
    Cmyk(f64, f64, f64, f64),
}

impl Color {
    pub const BLACK: Color = Color::Gray(0.0);
    pub const WHITE: Color = Color::Gray(1.0);
    pub const LIGHT_GRAY: Color = Color::Gray(0.75);

    /// Build an RGB color from 8-bit channel values.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Build a color from a component list, choosing the color space by length.
    ///
    /// Returns `None` for lengths other than 1, 3 or 4. An empty list (the
    /// "transparent" `MK` array form) also yields `None`.
    pub fn from_components(components: &[f64]) -> Option<Self> {
        match *components {
            [g] => Some(Color::Gray(g)),
            [r, g, b] => Some(Color::Rgb(r, g, b)),
            [c, m, y, k] => Some(Color::Cmyk(c, m, y, k)),
            _ => None,
        }
    }

    /// Number of color channels.
    pub fn channel_count(&self) -> usize {
        match self {
            Color::Gray(_) => 1,
            Color::Rgb(..) => 3,
            Color::Cmyk(..) => 4,
        }
    }

    /// Components in channel order.
    pub fn components(&self) -> Vec<f64> {
        match *self {
            Color::Gray(g) => vec![g],
            Color::Rgb(r, g, b) => vec![r, g, b],
            Color::Cmyk(c, m, y, k) => vec![c, m, y, k],
        }
    }

    /// Non-stroking color operator for this color space.
    pub fn fill_operator(&self) -> &'static str {
        match self {
            Color::Gray(_) => "g",
            Color::Rgb(..) => "rg",
            Color::Cmyk(..) => "k",
        }
    }

    /// Stroking color operator for this color space.
    pub fn stroke_operator(&self) -> &'static str {
        match self {
            Color::Gray(_) => "G",
            Color::Rgb(..) => "RG",
            Color::Cmyk(..) => "K",
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
