use std::path::Path;

use acroform::PdfForm;

use crate::cli::ConformanceArg;
use crate::form_file::FormFile;
use crate::shared::save_form;

pub fn run(input: &Path, output: &Path, conformance: Option<ConformanceArg>) -> Result<(), i32> {
    let json = std::fs::read_to_string(input).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", input.display());
        1
    })?;
    let description: FormFile = serde_json::from_str(&json).map_err(|e| {
        eprintln!("Error: invalid form description: {e}");
        1
    })?;

    let mut pdf = PdfForm::new(description.pages());
    description.populate(pdf.form_mut()).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    if let Some(level) = conformance {
        pdf.form_mut().options_mut().conformance = Some(level.into());
    }
    pdf.form_mut().regenerate_all().map_err(|e| {
        eprintln!("Error: failed to generate appearances: {e}");
        1
    })?;
    save_form(&mut pdf, output)?;
    tracing::info!(fields = pdf.form().tree().len(), output = %output.display(), "rendered");
    Ok(())
}
