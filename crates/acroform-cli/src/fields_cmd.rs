use std::path::Path;

use acroform::acroform_core::FieldValue;
use acroform::{FieldId, Form};

use crate::cli::OutputFormat;
use crate::shared::{kind_name, open_form};

pub fn run(file: &Path, format: &OutputFormat) -> Result<(), i32> {
    let pdf = open_form(file)?;
    let form = pdf.form();
    let fields: Vec<FieldId> = form
        .tree()
        .field_ids()
        .filter(|&id| form.tree().is_terminal(id))
        .collect();

    match format {
        OutputFormat::Text => {
            println!("name\ttype\tvalue\tpage\tstate");
            for id in fields {
                let row = FieldRow::new(form, id);
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    row.name,
                    row.kind,
                    row.value.as_deref().unwrap_or(""),
                    row.page.map(|p| (p + 1).to_string()).unwrap_or_default(),
                    row.state.as_deref().unwrap_or(""),
                );
            }
        }
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = fields
                .into_iter()
                .map(|id| {
                    let row = FieldRow::new(form, id);
                    serde_json::json!({
                        "name": row.name,
                        "type": row.kind,
                        "value": row.value,
                        "page": row.page.map(|p| p + 1),
                        "state": row.state,
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&rows).map_err(|e| {
                eprintln!("Error: JSON serialization failed: {e}");
                1
            })?;
            println!("{json}");
        }
    }
    Ok(())
}

struct FieldRow {
    name: String,
    kind: &'static str,
    value: Option<String>,
    page: Option<usize>,
    state: Option<String>,
}

impl FieldRow {
    fn new(form: &Form, id: FieldId) -> Self {
        let tree = form.tree();
        let widget = tree.widgets(id).first().and_then(|w| tree.widget(*w).ok());
        Self {
            name: tree.fully_qualified_name(id),
            kind: kind_name(tree.kind(id)),
            value: tree.value(id).map(|v| match v {
                FieldValue::Choices(values) => values.join(", "),
                other => other.as_str().unwrap_or("").to_string(),
            }),
            page: widget.and_then(|w| w.page),
            state: widget.and_then(|w| w.appearance_state.clone()),
        }
    }
}
