//! Default appearance (`/DA`) codec.
//!
//! A DA string is a tiny content-stream fragment such as
//! `/Helv 12 Tf 0 0 1 rg`. Only the font selection (`Tf`) and the
//! non-stroking color (`g`, `rg`, `k`) are meaningful; every other operator
//! is ignored.
//!
//! Decoding never fails. Input from legacy producers is often malformed, so
//! the decoder stops at the first bad token and returns what it captured.

use acroform_core::{Color, FontRef, FontResources, FontSize};

use crate::tokenizer::{Operand, OperatorStream};

/// Structured content of a DA string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultAppearance {
    /// Font resource name, without the leading `/`.
    pub font_name: Option<String>,
    /// Raw `Tf` size operand; `0` requests auto-fit.
    pub font_size: Option<f64>,
    /// Non-stroking text color.
    pub color: Option<Color>,
}

impl DefaultAppearance {
    /// The size interpreted as [`FontSize`]; negative sizes read as unset.
    pub fn size(&self) -> Option<FontSize> {
        self.font_size.and_then(FontSize::from_value)
    }
}

/// Decode a DA string into its font, size and color.
pub fn decode(da: &str) -> DefaultAppearance {
    decode_bytes(da.as_bytes())
}

/// Decode raw DA bytes (the `/DA` string object content).
pub fn decode_bytes(da: &[u8]) -> DefaultAppearance {
    let mut out = DefaultAppearance::default();
    for item in OperatorStream::new(da) {
        let op = match item {
            Ok(op) => op,
            Err(e) => {
                tracing::debug!(error = %e, "malformed default appearance, keeping partial result");
                break;
            }
        };
        let operands = &op.operands;
        match op.name.as_str() {
            "Tf" => {
                if let [.., name, size] = operands.as_slice() {
                    if let (Some(name), Some(size)) = (name.as_name(), size.as_number()) {
                        out.font_name = Some(name.to_string());
                        out.font_size = Some(size);
                    }
                }
            }
            "g" => {
                if let Some([gray]) = trailing_numbers::<1>(operands) {
                    // 0 g is the implicit default
                    if gray != 0.0 {
                        out.color = Some(Color::Gray(gray));
                    }
                }
            }
            "rg" => {
                if let Some([r, g, b]) = trailing_numbers::<3>(operands) {
                    out.color = Some(Color::Rgb(r, g, b));
                }
            }
            "k" => {
                if let Some([c, m, y, k]) = trailing_numbers::<4>(operands) {
                    out.color = Some(Color::Cmyk(c, m, y, k));
                }
            }
            _ => {}
        }
    }
    out
}

/// The last `N` operands as numbers, if there are that many numeric ones.
fn trailing_numbers<const N: usize>(operands: &[Operand]) -> Option<[f64; N]> {
    let start = operands.len().checked_sub(N)?;
    let mut values = [0.0; N];
    for (slot, operand) in values.iter_mut().zip(&operands[start..]) {
        *slot = operand.as_number()?;
    }
    Some(values)
}

/// Encode a DA string for `font` at `size`, registering the font in
/// `resources` to obtain its resource name.
pub fn encode(
    font: &FontRef,
    size: f64,
    color: Option<Color>,
    resources: &mut FontResources,
) -> String {
    let resource_name = resources.add(font);
    format_da(&resource_name, size, color)
}

/// Build a DA string from an already registered resource name.
///
/// Line breaks are replaced by spaces so the result stays a single string
/// token.
pub fn format_da(resource_name: &str, size: f64, color: Option<Color>) -> String {
    let mut da = format!("/{} {} Tf", escape_name(resource_name), format_number(size));
    if let Some(color) = color {
        for component in color.components() {
            da.push(' ');
            da.push_str(&format_number(component));
        }
        da.push(' ');
        da.push_str(color.fill_operator());
    }
    da.replace(['\r', '\n'], " ")
}

/// Format a number compactly: integers without a fraction, reals with at
/// most six decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let formatted = format!("{value:.6}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Escape a name for PDF name syntax (`#xx` for delimiters, whitespace and
/// bytes outside the printable ASCII range).
fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for b in name.bytes() {
        let plain = (b'!'..=b'~').contains(&b)
            && !matches!(
                b,
                b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
            );
        if plain {
            out.push(b as char);
        } else {
            out.push_str(&format!("#{b:02X}"));
        }
    }
    out
}
