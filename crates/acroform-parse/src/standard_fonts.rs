//! Built-in metrics for the standard Type1 fonts used in form fields.
//!
//! Appearance streams for text fields normally reference one of the base-14
//! fonts (`/Helv`, `/ZaDb`, ...) without embedding it. [`StandardFont`]
//! implements [`FieldFont`] from AFM advance widths indexed by
//! WinAnsiEncoding codes (ZapfDingbats uses its built-in encoding).

use std::sync::Arc;

use acroform_core::{FieldFont, FontRef};

/// AFM metrics for one standard font.
#[derive(Debug)]
struct Metrics {
    widths: &'static [u16; 256],
    bbox: [i16; 4],
    ascent: i16,
    descent: i16,
}

/// A standard Type1 font with built-in metrics.
#[derive(Debug, Clone)]
pub struct StandardFont {
    name: &'static str,
    metrics: &'static Metrics,
    symbolic: bool,
}

impl StandardFont {
    /// Look up a standard font by base font name.
    ///
    /// Oblique variants share the widths of their upright face.
    pub fn from_name(name: &str) -> Option<Self> {
        let (name, metrics, symbolic): (&'static str, &'static Metrics, bool) = match name {
            "Helvetica" => ("Helvetica", &HELVETICA, false),
            "Helvetica-Oblique" => ("Helvetica-Oblique", &HELVETICA, false),
            "Helvetica-Bold" => ("Helvetica-Bold", &HELVETICA_BOLD, false),
            "Helvetica-BoldOblique" => ("Helvetica-BoldOblique", &HELVETICA_BOLD, false),
            "Courier" => ("Courier", &COURIER, false),
            "Courier-Bold" => ("Courier-Bold", &COURIER, false),
            "Courier-Oblique" => ("Courier-Oblique", &COURIER, false),
            "Courier-BoldOblique" => ("Courier-BoldOblique", &COURIER, false),
            "Times-Roman" => ("Times-Roman", &TIMES_ROMAN, false),
            "ZapfDingbats" => ("ZapfDingbats", &ZAPF_DINGBATS, true),
            _ => return None,
        };
        Some(Self {
            name,
            metrics,
            symbolic,
        })
    }

    /// Resolve the conventional AcroForm resource aliases (`Helv`, `ZaDb`, ...)
    /// as well as plain base font names.
    pub fn from_alias(alias: &str) -> Option<Self> {
        let base = match alias {
            "Helv" => "Helvetica",
            "HeBo" => "Helvetica-Bold",
            "Cour" => "Courier",
            "TiRo" => "Times-Roman",
            "ZaDb" => "ZapfDingbats",
            other => other,
        };
        Self::from_name(base)
    }

    /// The conventional resource alias for this font, if it has one.
    pub fn alias(&self) -> Option<&'static str> {
        match self.name {
            "Helvetica" => Some("Helv"),
            "Helvetica-Bold" => Some("HeBo"),
            "Courier" => Some("Cour"),
            "Times-Roman" => Some("TiRo"),
            "ZapfDingbats" => Some("ZaDb"),
            _ => None,
        }
    }

    pub fn helvetica() -> FontRef {
        Arc::new(Self {
            name: "Helvetica",
            metrics: &HELVETICA,
            symbolic: false,
        })
    }

    pub fn zapf_dingbats() -> FontRef {
        Arc::new(Self {
            name: "ZapfDingbats",
            metrics: &ZAPF_DINGBATS,
            symbolic: true,
        })
    }

    pub fn into_ref(self) -> FontRef {
        Arc::new(self)
    }

    fn code(&self, ch: char) -> Option<u8> {
        if self.symbolic {
            u8::try_from(u32::from(ch)).ok()
        } else {
            win_ansi_code(ch)
        }
    }
}

impl FieldFont for StandardFont {
    fn name(&self) -> &str {
        self.name
    }

    fn bbox(&self) -> [f64; 4] {
        self.metrics.bbox.map(f64::from)
    }

    fn ascent(&self) -> f64 {
        f64::from(self.metrics.ascent)
    }

    fn descent(&self) -> f64 {
        f64::from(self.metrics.descent)
    }

    fn glyph_width(&self, ch: char) -> f64 {
        let code = self.code(ch).unwrap_or(b'?');
        f64::from(self.metrics.widths[usize::from(code)])
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|ch| {
                self.code(ch).unwrap_or_else(|| {
                    tracing::debug!(font = self.name, ?ch, "character not encodable, using '?'");
                    b'?'
                })
            })
            .collect()
    }

    fn is_symbolic(&self) -> bool {
        self.symbolic
    }
}

/// WinAnsiEncoding code for a Unicode character.
pub fn win_ansi_code(ch: char) -> Option<u8> {
    let code = match ch {
        '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => return u8::try_from(u32::from(ch)).ok(),
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(code)
}

static COURIER: Metrics = Metrics {
    widths: &[600; 256],
    bbox: [-23, -250, 715, 805],
    ascent: 629,
    descent: -157,
};

static HELVETICA: Metrics = Metrics {
    widths: &HELVETICA_WIDTHS,
    bbox: [-166, -225, 1000, 931],
    ascent: 718,
    descent: -207,
};

static HELVETICA_BOLD: Metrics = Metrics {
    widths: &HELVETICA_BOLD_WIDTHS,
    bbox: [-170, -228, 1003, 962],
    ascent: 718,
    descent: -207,
};

static TIMES_ROMAN: Metrics = Metrics {
    widths: &TIMES_ROMAN_WIDTHS,
    bbox: [-168, -218, 1000, 898],
    ascent: 683,
    descent: -217,
};

static ZAPF_DINGBATS: Metrics = Metrics {
    widths: &ZAPF_DINGBATS_WIDTHS,
    bbox: [-1, -143, 981, 820],
    ascent: 820,
    descent: -143,
};

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 0,
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

#[rustfmt::skip]
static TIMES_ROMAN_WIDTHS: [u16; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541, 0,
    500, 0, 333, 500, 444, 1000, 500, 500, 333, 1000, 556, 333, 889, 0, 611, 0,
    0, 333, 333, 444, 444, 350, 500, 1000, 333, 980, 389, 333, 722, 0, 444, 722,
    250, 333, 500, 500, 500, 500, 200, 500, 333, 760, 276, 500, 564, 333, 760, 333,
    400, 564, 300, 300, 333, 500, 453, 250, 333, 300, 310, 500, 750, 750, 750, 444,
    722, 722, 722, 722, 722, 722, 889, 667, 611, 611, 611, 611, 333, 333, 333, 333,
    722, 722, 722, 722, 722, 722, 722, 564, 722, 722, 722, 722, 722, 722, 556, 500,
    444, 444, 444, 444, 444, 444, 667, 444, 444, 444, 444, 444, 278, 278, 278, 278,
    500, 500, 500, 500, 500, 500, 500, 564, 500, 500, 500, 500, 500, 500, 500, 500,
];

#[rustfmt::skip]
static ZAPF_DINGBATS_WIDTHS: [u16; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    278, 974, 961, 974, 980, 719, 789, 790, 791, 690, 960, 939, 549, 855, 911, 933,
    911, 945, 974, 755, 846, 762, 761, 571, 677, 763, 760, 759, 754, 494, 552, 537,
    577, 692, 786, 788, 788, 790, 793, 794, 816, 823, 789, 841, 823, 833, 816, 831,
    923, 744, 723, 749, 790, 792, 695, 776, 768, 792, 759, 707, 708, 682, 701, 826,
    815, 789, 789, 707, 687, 696, 689, 786, 787, 713, 791, 785, 791, 873, 761, 762,
    762, 759, 759, 892, 892, 788, 784, 438, 138, 277, 415, 392, 392, 668, 668, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 732, 544, 544, 910, 667, 760, 760, 776, 595, 694, 626, 788, 788, 788, 788,
    788, 788, 788, 788, 788, 788, 788, 788, 788, 788, 788, 788, 788, 788, 788, 788,
    788, 788, 788, 788, 788, 788, 788, 788, 788, 788, 788, 788, 788, 788, 788, 788,
    788, 788, 788, 788, 894, 838, 1016, 458, 748, 924, 748, 918, 927, 928, 928, 834,
    873, 828, 924, 924, 917, 930, 931, 463, 883, 836, 836, 867, 867, 696, 696, 874,
    0, 874, 760, 946, 771, 865, 771, 888, 967, 888, 831, 873, 927, 970, 918, 0,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_known_widths() {
        let font = StandardFont::from_name("Helvetica").unwrap();
        assert_eq!(font.glyph_width('A'), 667.0);
        assert_eq!(font.glyph_width(' '), 278.0);
        assert_eq!(font.glyph_width('\u{20AC}'), 556.0);
    }

    #[test]
    fn courier_is_monospaced() {
        let font = StandardFont::from_name("Courier-Bold").unwrap();
        assert_eq!(font.width("iiii", 10.0), font.width("MMMM", 10.0));
        assert_eq!(font.width("ab", 10.0), 12.0);
    }

    #[test]
    fn aliases_resolve_to_base_fonts() {
        assert_eq!(StandardFont::from_alias("Helv").unwrap().name(), "Helvetica");
        assert_eq!(StandardFont::from_alias("ZaDb").unwrap().name(), "ZapfDingbats");
        assert_eq!(StandardFont::from_alias("Times-Roman").unwrap().name(), "Times-Roman");
        assert_eq!(StandardFont::from_name("Courier").unwrap().alias(), Some("Cour"));
        assert!(StandardFont::from_alias("Arial").is_none());
        assert!(StandardFont::from_name("helvetica").is_none());
    }

    #[test]
    fn win_ansi_encoding() {
        let font = StandardFont::helvetica();
        assert_eq!(font.encode("Caf\u{e9}"), vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(font.encode("\u{201C}x\u{201D}"), vec![0x93, b'x', 0x94]);
        assert_eq!(font.encode("\u{4e2d}"), vec![b'?']);
        assert!(!font.is_symbolic());
    }

    #[test]
    fn zapf_dingbats_uses_builtin_codes() {
        let font = StandardFont::zapf_dingbats();
        assert!(font.is_symbolic());
        assert_eq!(font.encode("4"), vec![b'4']);
        // check mark glyph (code 0x34)
        assert_eq!(font.glyph_width('4'), 846.0);
    }

    #[test]
    fn metrics_are_consistent() {
        for name in ["Helvetica", "Helvetica-Bold", "Courier", "Times-Roman", "ZapfDingbats"] {
            let font = StandardFont::from_name(name).unwrap();
            let [_, bottom, _, top] = font.bbox();
            assert!(top > font.ascent() - 1.0 || name == "ZapfDingbats", "{name}");
            assert!(bottom <= font.descent(), "{name}");
            assert!(font.ascent() > 0.0 && font.descent() < 0.0, "{name}");
        }
    }

    #[test]
    fn oblique_shares_upright_widths() {
        let regular = StandardFont::from_name("Helvetica").unwrap();
        let oblique = StandardFont::from_name("Helvetica-Oblique").unwrap();
        assert_eq!(regular.width("Hello", 12.0), oblique.width("Hello", 12.0));
        assert_eq!(oblique.name(), "Helvetica-Oblique");
    }
}
