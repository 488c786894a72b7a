//! Font collaborator interface and font resource bookkeeping.
//!
//! The appearance engine never parses font programs. It consumes fonts
//! through [`FieldFont`], which exposes the handful of metrics needed to
//! position text: glyph bounding box, units per em, ascent/descent, advance
//! widths and a width-constrained line breaker.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a font.
pub type FontRef = Arc<dyn FieldFont>;

/// Read-only font metrics used for text placement.
///
/// Metric values (`bbox`, `ascent`, `descent`, `glyph_width`) are expressed
/// in glyph space, i.e. in units of `1 / units_per_em()` of the font size.
pub trait FieldFont: fmt::Debug + Send + Sync {
    /// PostScript / base font name (e.g. `Helvetica`).
    fn name(&self) -> &str;

    /// Font bounding box `[llx, lly, urx, ury]` in glyph space.
    fn bbox(&self) -> [f64; 4];

    /// Glyph space units per em (1000 for Type1 fonts).
    fn units_per_em(&self) -> f64 {
        1000.0
    }

    /// Ascent above the baseline, in glyph space (positive).
    fn ascent(&self) -> f64;

    /// Descent below the baseline, in glyph space (negative).
    fn descent(&self) -> f64;

    /// Advance width of a single character, in glyph space.
    fn glyph_width(&self, ch: char) -> f64;

    /// Encode text into the byte string shown by `Tj`.
    fn encode(&self, text: &str) -> Vec<u8>;

    /// Symbolic fonts (ZapfDingbats, Symbol) use their built-in encoding.
    fn is_symbolic(&self) -> bool {
        false
    }

    /// Advance width of `text` at `size`, in text space units.
    fn width(&self, text: &str, size: f64) -> f64 {
        let glyphs: f64 = text.chars().map(|c| self.glyph_width(c)).sum();
        glyphs * size / self.units_per_em()
    }

    /// Split `text` into lines no wider than `max_width` at `size`.
    fn split_lines(&self, text: &str, size: f64, max_width: f64) -> Vec<String> {
        wrap_text(self, text, size, max_width)
    }
}

/// Requested font size for a field.
///
/// `Auto` corresponds to the `0` size sentinel of a default appearance
/// string. An unset size is represented as `Option::<FontSize>::None`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontSize {
    /// Fit the text into the widget box.
    Auto,
    /// A fixed size in points.
    Fixed(f64),
}

impl FontSize {
    /// Interpret a `Tf` size operand: `0` means auto, negatives are unset.
    pub fn from_value(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(FontSize::Auto)
        } else if value > 0.0 {
            Some(FontSize::Fixed(value))
        } else {
            None
        }
    }

    /// The `Tf` operand for this size.
    pub fn value(&self) -> f64 {
        match self {
            FontSize::Auto => 0.0,
            FontSize::Fixed(v) => *v,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, FontSize::Auto)
    }
}

/// Named font resources (a `/Font` resource sub-dictionary).
#[derive(Debug, Clone, Default)]
pub struct FontResources {
    fonts: BTreeMap<String, FontRef>,
}

impl FontResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look a font up by resource name (without the leading `/`).
    pub fn get(&self, resource_name: &str) -> Option<&FontRef> {
        self.fonts.get(resource_name)
    }

    /// Bind `font` under an explicit resource name, replacing any previous binding.
    pub fn insert(&mut self, resource_name: impl Into<String>, font: FontRef) {
        self.fonts.insert(resource_name.into(), font);
    }

    /// Register `font` and return its resource name.
    ///
    /// A font whose base name is already bound keeps its existing resource
    /// name; otherwise the first free `F<n>` name is allocated.
    pub fn add(&mut self, font: &FontRef) -> String {
        if let Some(name) = self.name_of(font) {
            return name;
        }
        let mut n = 1;
        let name = loop {
            let candidate = format!("F{n}");
            if !self.fonts.contains_key(&candidate) {
                break candidate;
            }
            n += 1;
        };
        self.fonts.insert(name.clone(), Arc::clone(font));
        name
    }

    /// Resource name bound to a font with the same base name, if any.
    pub fn name_of(&self, font: &FontRef) -> Option<String> {
        self.fonts
            .iter()
            .find(|(_, f)| f.name() == font.name())
            .map(|(k, _)| k.clone())
    }

    /// Find a font by its base name (e.g. a DA that names `/Helvetica` directly).
    pub fn find_base_font(&self, base_name: &str) -> Option<&FontRef> {
        self.fonts.values().find(|f| f.name() == base_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FontRef)> {
        self.fonts.iter()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// Greedy word wrap used by the default [`FieldFont::split_lines`].
///
/// Explicit line breaks (`\n`, `\r\n`, `\r`) always start a new line.
/// Words wider than `max_width` are broken between characters. A
/// non-positive width yields one line per paragraph.
pub fn wrap_text<F: FieldFont + ?Sized>(
    font: &F,
    text: &str,
    size: f64,
    max_width: f64,
) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = Vec::new();
    for paragraph in normalized.split('\n') {
        if max_width <= 0.0 {
            lines.push(paragraph.to_string());
            continue;
        }
        wrap_paragraph(font, paragraph, size, max_width, &mut lines);
    }
    lines
}

fn wrap_paragraph<F: FieldFont + ?Sized>(
    font: &F,
    paragraph: &str,
    size: f64,
    max_width: f64,
    lines: &mut Vec<String>,
) {
    let mut current = String::new();
    let mut pushed_any = false;
    for word in paragraph.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if font.width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            pushed_any = true;
        }
        if font.width(word, size) <= max_width {
            current = word.to_string();
        } else {
            // Break an over-long word between characters.
            for ch in word.chars() {
                let mut next = current.clone();
                next.push(ch);
                if !current.is_empty() && font.width(&next, size) > max_width {
                    lines.push(std::mem::take(&mut current));
                    pushed_any = true;
                    current.push(ch);
                } else {
                    current = next;
                }
            }
        }
    }
    if !current.is_empty() || !pushed_any {
        lines.push(current);
    }
}

#[cfg(test)]
pub(crate) mod test_font {
    use super::*;

    /// Monospaced test font: every glyph is 500 units wide.
    #[derive(Debug)]
    pub struct MonoFont;

    impl FieldFont for MonoFont {
        fn name(&self) -> &str {
            "Mono"
        }
        fn bbox(&self) -> [f64; 4] {
            [0.0, -200.0, 500.0, 800.0]
        }
        fn ascent(&self) -> f64 {
            800.0
        }
        fn descent(&self) -> f64 {
            -200.0
        }
        fn glyph_width(&self, _ch: char) -> f64 {
            500.0
        }
        fn encode(&self, text: &str) -> Vec<u8> {
            text.bytes().collect()
        }
    }

    pub fn mono() -> FontRef {
        Arc::new(MonoFont)
    }
}
