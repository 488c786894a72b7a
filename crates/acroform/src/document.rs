//! [`PdfForm`]: a [`Form`] bound to a lopdf document.

use acroform_core::{AppearanceOptions, FormError, Page};
use acroform_parse::{FormBackend, LopdfBackend, LopdfDocument};

use crate::form::Form;

/// A PDF document together with its interactive form.
///
/// Edits go through [`PdfForm::form_mut`]; [`PdfForm::to_bytes`] writes the
/// field tree and every synthesized appearance back into the document.
pub struct PdfForm {
    doc: LopdfDocument,
    form: Form,
}

impl std::fmt::Debug for PdfForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfForm")
            .field("pages", &self.form.pages().len())
            .field("fields", &self.form.tree().len())
            .finish_non_exhaustive()
    }
}

impl PdfForm {
    /// A blank document with the given pages and an empty form.
    pub fn new(pages: Vec<Page>) -> Self {
        Self {
            doc: LopdfDocument::new(&pages),
            form: Form::new(pages),
        }
    }

    /// Open a PDF document from a file path.
    ///
    /// Convenience wrapper around [`PdfForm::open`] that reads the file into
    /// memory first.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::IoError`] if the file cannot be read, or any
    /// error of [`PdfForm::open`].
    pub fn open_file(path: impl AsRef<std::path::Path>) -> Result<Self, FormError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| FormError::IoError(e.to_string()))?;
        Self::open(&bytes)
    }

    /// Open a PDF document from bytes and load its form.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Raw PDF file bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::ParseError`] if the bytes are not a valid PDF
    /// document or the document is encrypted.
    pub fn open(bytes: &[u8]) -> Result<Self, FormError> {
        let doc = LopdfBackend::open(bytes).map_err(FormError::from)?;
        let page_count = LopdfBackend::page_count(&doc);
        let pages = (0..page_count)
            .map(|index| LopdfBackend::page(&doc, index))
            .collect::<Result<Vec<_>, _>>()
            .map_err(FormError::from)?;
        let defaults = LopdfBackend::form_defaults(&doc).map_err(FormError::from)?;
        let tree = LopdfBackend::load_fields(&doc).map_err(FormError::from)?;
        tracing::info!(pages = page_count, fields = tree.len(), "form loaded");
        Ok(Self {
            doc,
            form: Form::from_parts(tree, defaults, pages),
        })
    }

    pub fn with_options(mut self, options: AppearanceOptions) -> Self {
        self.form = self.form.with_options(options);
        self
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn document(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Write the form into the document and serialise it.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] if an appearance stream cannot be encoded or
    /// the document cannot be serialised.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, FormError> {
        LopdfBackend::write_form(&mut self.doc, self.form.tree(), self.form.defaults())
            .map_err(FormError::from)?;
        LopdfBackend::save(&mut self.doc).map_err(FormError::from)
    }

    /// Write the form and save the document to `path`.
    pub fn save_file(&mut self, path: impl AsRef<std::path::Path>) -> Result<(), FormError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes).map_err(|e| FormError::IoError(e.to_string()))
    }
}
