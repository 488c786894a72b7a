use std::path::Path;

use acroform::{FieldType, FieldValue};

use crate::cli::ConformanceArg;
use crate::shared::{open_form, parse_assignment, save_form};

pub fn run(
    file: &Path,
    output: &Path,
    assignments: &[String],
    conformance: Option<ConformanceArg>,
) -> Result<(), i32> {
    let mut pdf = open_form(file)?;
    if let Some(level) = conformance {
        pdf.form_mut().options_mut().conformance = Some(level.into());
    }

    for assignment in assignments {
        let (name, value) = parse_assignment(assignment).map_err(|e| {
            eprintln!("Error: {e}");
            2
        })?;
        let form = pdf.form_mut();
        let Some(id) = form.field_by_name(name) else {
            eprintln!("Error: no field named '{name}'");
            return Err(1);
        };
        let value = match form.tree().field_type(id) {
            Some(FieldType::Button) => FieldValue::Name(value.to_string()),
            _ => FieldValue::Text(value.to_string()),
        };
        form.set_value(id, value, false).map_err(|e| {
            eprintln!("Error: failed to set '{name}': {e}");
            1
        })?;
    }

    pdf.form_mut().regenerate_all().map_err(|e| {
        eprintln!("Error: failed to generate appearances: {e}");
        1
    })?;
    save_form(&mut pdf, output)
}
