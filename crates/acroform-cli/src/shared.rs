use std::path::Path;

use acroform::acroform_core::{ButtonKind, ChoiceKind, FieldKind};
use acroform::PdfForm;

/// Open a PDF form with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found
/// or cannot be read as a PDF.
pub fn open_form(file: &Path) -> Result<PdfForm, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    PdfForm::open_file(file).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}

/// Write the form to `output`.
pub fn save_form(pdf: &mut PdfForm, output: &Path) -> Result<(), i32> {
    pdf.save_file(output).map_err(|e| {
        eprintln!("Error: failed to write {}: {e}", output.display());
        1
    })
}

/// Split a `NAME=VALUE` assignment at the first `=`.
pub fn parse_assignment(input: &str) -> Result<(&str, &str), String> {
    match input.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(format!("invalid assignment '{input}': expected NAME=VALUE")),
    }
}

/// Short lowercase name of a field kind.
pub fn kind_name(kind: Option<FieldKind>) -> &'static str {
    match kind {
        Some(FieldKind::Text) => "text",
        Some(FieldKind::Button(ButtonKind::Checkbox)) => "checkbox",
        Some(FieldKind::Button(ButtonKind::Radio)) => "radio",
        Some(FieldKind::Button(ButtonKind::Push)) => "push",
        Some(FieldKind::Choice(ChoiceKind::Combo)) => "combo",
        Some(FieldKind::Choice(ChoiceKind::List)) => "list",
        Some(FieldKind::Signature) => "signature",
        None => "group",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_at_first_equals() {
        assert_eq!(parse_assignment("a.b=x=y").unwrap(), ("a.b", "x=y"));
        assert_eq!(parse_assignment("name=").unwrap(), ("name", ""));
    }

    #[test]
    fn assignment_needs_a_name() {
        assert!(parse_assignment("=x").unwrap_err().contains("NAME=VALUE"));
        assert!(parse_assignment("novalue").is_err());
    }

    #[test]
    fn kind_names() {
        assert_eq!(kind_name(None), "group");
        assert_eq!(kind_name(Some(FieldKind::Choice(ChoiceKind::Combo))), "combo");
    }
}
