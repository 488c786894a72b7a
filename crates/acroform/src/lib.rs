//! acroform: synthesize and keep in sync the appearance streams of PDF form fields.
//!
//! This is the public API facade crate for acroform-rs. It re-exports types
//! from acroform-core and uses acroform-parse for DA strings, fonts and
//! document I/O.
//!
//! # Architecture
//!
//! - **acroform-core**: Field model, geometry, font-fit and content operations
//! - **acroform-parse**: DA codec, standard fonts and the lopdf backend
//! - **acroform** (this crate): Appearance synthesis and the [`Form`] / [`PdfForm`] API
//!
//! ```ignore
//! let mut pdf = PdfForm::open_file("form.pdf")?;
//! let id = pdf.form().field_by_name("person.name").unwrap();
//! pdf.form_mut().set_value(id, FieldValue::Text("Ada".into()), true)?;
//! pdf.save_file("filled.pdf")?;
//! ```

mod appearance;
mod document;
mod form;

pub use acroform_core;
pub use acroform_core::{
    AppearanceCharacteristics, AppearanceDict, AppearanceEntry, AppearanceOptions,
    AppearanceStream, BorderKind, BorderStyle, CheckType, ChoiceOption, Color, ConformanceLevel,
    Field, FieldFlags, FieldId, FieldTree, FieldType, FieldValue, FontRef, FontSize, FormDefaults,
    FormError, Justification, Page, Rect, Widget, WidgetId,
};
pub use acroform_parse;
pub use acroform_parse::{DefaultAppearance, StandardFont};
pub use document::PdfForm;
pub use form::Form;
