//! Field fonts described by a PDF font dictionary.
//!
//! Parses /Widths, /FirstChar, /LastChar and /FontDescriptor of a simple
//! font found in the AcroForm `/DR` resources, so fields can be laid out
//! with fonts that are not one of the standard 14.

use acroform_core::FieldFont;

use crate::standard_fonts::win_ansi_code;

/// Default ascent when not specified (750/1000 of text space).
const DEFAULT_ASCENT: f64 = 750.0;

/// Default descent when not specified (-250/1000 of text space).
const DEFAULT_DESCENT: f64 = -250.0;

/// Default character width when not specified (600/1000 of text space).
const DEFAULT_WIDTH: f64 = 600.0;

/// A simple font whose metrics come from its font dictionary.
///
/// Text is encoded with WinAnsiEncoding; width lookups go through the same
/// code mapping. Width values are in glyph space units (1/1000 of text space).
#[derive(Debug, Clone)]
pub struct DictionaryFont {
    base_font: String,
    /// Glyph widths indexed by (char_code - first_char).
    widths: Vec<f64>,
    first_char: u32,
    /// Width for codes outside the widths array.
    missing_width: f64,
    ascent: f64,
    descent: f64,
    font_bbox: Option<[f64; 4]>,
    symbolic: bool,
}

impl DictionaryFont {
    pub fn base_font(&self) -> &str {
        &self.base_font
    }

    /// Width for a character code in glyph space.
    pub fn code_width(&self, code: u32) -> f64 {
        code.checked_sub(self.first_char)
            .and_then(|index| self.widths.get(index as usize))
            .copied()
            .unwrap_or(self.missing_width)
    }

    fn code(&self, ch: char) -> Option<u8> {
        if self.symbolic {
            u8::try_from(u32::from(ch)).ok()
        } else {
            win_ansi_code(ch)
        }
    }
}

impl FieldFont for DictionaryFont {
    fn name(&self) -> &str {
        &self.base_font
    }

    fn bbox(&self) -> [f64; 4] {
        self.font_bbox
            .unwrap_or([0.0, self.descent, 1000.0, self.ascent])
    }

    fn ascent(&self) -> f64 {
        self.ascent
    }

    fn descent(&self) -> f64 {
        self.descent
    }

    fn glyph_width(&self, ch: char) -> f64 {
        match self.code(ch) {
            Some(code) => self.code_width(u32::from(code)),
            None => self.missing_width,
        }
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|ch| {
                self.code(ch).unwrap_or_else(|| {
                    tracing::debug!(font = %self.base_font, ?ch, "character not encodable, using '?'");
                    b'?'
                })
            })
            .collect()
    }

    fn is_symbolic(&self) -> bool {
        self.symbolic
    }
}

/// Build a [`DictionaryFont`] from a lopdf font dictionary.
///
/// Returns `None` for composite (Type0) fonts, which field appearances
/// cannot address with single-byte strings.
pub fn extract_font_metrics(
    doc: &lopdf::Document,
    font_dict: &lopdf::Dictionary,
) -> Option<DictionaryFont> {
    if matches!(font_dict.get(b"Subtype"), Ok(lopdf::Object::Name(n)) if n == b"Type0") {
        return None;
    }
    let base_font = match font_dict.get(b"BaseFont") {
        Ok(lopdf::Object::Name(name)) => String::from_utf8_lossy(name).into_owned(),
        _ => return None,
    };

    let first_char = font_dict
        .get(b"FirstChar")
        .ok()
        .and_then(object_to_f64_opt)
        .map(|v| v as u32)
        .unwrap_or(0);

    let widths = match font_dict.get(b"Widths") {
        Ok(obj) => match resolve_object(doc, obj).as_array() {
            Ok(arr) => arr
                .iter()
                .map(|o| object_to_f64_opt(resolve_object(doc, o)).unwrap_or(0.0))
                .collect(),
            Err(_) => Vec::new(),
        },
        Err(_) => Vec::new(),
    };

    let descriptor = font_dict
        .get(b"FontDescriptor")
        .ok()
        .map(|obj| resolve_object(doc, obj))
        .and_then(|obj| obj.as_dict().ok());

    let number = |key: &[u8], default: f64| {
        descriptor
            .and_then(|d| d.get(key).ok())
            .and_then(object_to_f64_opt)
            .unwrap_or(default)
    };
    let ascent = number(b"Ascent", DEFAULT_ASCENT);
    let descent = number(b"Descent", DEFAULT_DESCENT);
    let missing_width = number(b"MissingWidth", DEFAULT_WIDTH);
    // Bit 3 of /Flags
    let symbolic = (number(b"Flags", 0.0) as u32) & 4 != 0;

    let font_bbox = descriptor
        .and_then(|d| d.get(b"FontBBox").ok())
        .and_then(|o| resolve_object(doc, o).as_array().ok())
        .and_then(|arr| {
            let vals: Vec<f64> = arr.iter().filter_map(object_to_f64_opt).collect();
            match vals.as_slice() {
                [a, b, c, d] => Some([*a, *b, *c, *d]),
                _ => None,
            }
        });

    Some(DictionaryFont {
        base_font,
        widths,
        first_char,
        missing_width,
        ascent,
        descent,
        font_bbox,
        symbolic,
    })
}

/// Resolve an indirect reference to the actual object.
fn resolve_object<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Convert a lopdf object to f64, returning None if not a number.
fn object_to_f64_opt(obj: &lopdf::Object) -> Option<f64> {
    match obj {
        lopdf::Object::Integer(i) => Some(*i as f64),
        lopdf::Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Document, Object, dictionary};

    fn font_doc() -> (Document, lopdf::Dictionary) {
        let mut doc = Document::with_version("1.5");
        let descriptor = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => "Custom",
            "Ascent" => Object::Integer(700),
            "Descent" => Object::Integer(-300),
            "MissingWidth" => Object::Integer(250),
            "Flags" => Object::Integer(32),
            "FontBBox" => vec![Object::Integer(-100), Object::Integer(-300), Object::Integer(900), Object::Integer(800)],
        });
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => "Custom",
            "FirstChar" => Object::Integer(65),
            "LastChar" => Object::Integer(67),
            "Widths" => vec![Object::Integer(500), Object::Integer(600), Object::Integer(700)],
            "FontDescriptor" => descriptor,
        };
        (doc, font)
    }

    #[test]
    fn reads_widths_and_descriptor() {
        let (doc, dict) = font_doc();
        let font = extract_font_metrics(&doc, &dict).unwrap();
        assert_eq!(font.name(), "Custom");
        assert_eq!(font.glyph_width('A'), 500.0);
        assert_eq!(font.glyph_width('C'), 700.0);
        assert_eq!(font.glyph_width('Z'), 250.0);
        assert_eq!(font.ascent(), 700.0);
        assert_eq!(font.descent(), -300.0);
        assert_eq!(font.bbox(), [-100.0, -300.0, 900.0, 800.0]);
        assert!(!font.is_symbolic());
        assert!((font.width("AB", 10.0) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn missing_descriptor_uses_defaults() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! { "Type" => "Font", "Subtype" => "Type1", "BaseFont" => "Plain" };
        let font = extract_font_metrics(&doc, &dict).unwrap();
        assert_eq!(font.ascent(), DEFAULT_ASCENT);
        assert_eq!(font.glyph_width('x'), DEFAULT_WIDTH);
        assert_eq!(font.bbox(), [0.0, DEFAULT_DESCENT, 1000.0, DEFAULT_ASCENT]);
    }

    #[test]
    fn composite_fonts_are_rejected() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! { "Type" => "Font", "Subtype" => "Type0", "BaseFont" => "CJK" };
        assert!(extract_font_metrics(&doc, &dict).is_none());
    }

    #[test]
    fn encodes_win_ansi() {
        let (doc, dict) = font_doc();
        let font = extract_font_metrics(&doc, &dict).unwrap();
        assert_eq!(font.encode("A\u{20AC}\u{4E00}"), vec![b'A', 0x80, b'?']);
    }
}
