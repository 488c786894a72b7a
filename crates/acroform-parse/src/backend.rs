//! Document backend trait.
//!
//! Defines the [`FormBackend`] trait that abstracts the document operations
//! appearance regeneration needs: page lookup, the AcroForm-level defaults,
//! reading the field tree and persisting generated appearances.

use acroform_core::{FieldTree, FormDefaults, FormError, Page};

/// Trait abstracting the document collaborator.
///
/// # Associated Types
///
/// - `Document`: The parsed document representation.
/// - `Error`: Backend-specific error type, convertible to [`FormError`].
///
/// # Usage
///
/// ```ignore
/// let mut doc = MyBackend::open(pdf_bytes)?;
/// let defaults = MyBackend::form_defaults(&doc)?;
/// let tree = MyBackend::load_fields(&doc)?;
/// // ... regenerate appearances ...
/// MyBackend::write_form(&mut doc, &tree, &defaults)?;
/// let bytes = MyBackend::save(&mut doc)?;
/// ```
pub trait FormBackend {
    /// The parsed document type.
    type Document;

    /// Backend-specific error type, convertible to [`FormError`].
    type Error: std::error::Error + Into<FormError>;

    /// Parse document bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not represent a readable document.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Return the number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Media box and rotation of a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    fn page(doc: &Self::Document, index: usize) -> Result<Page, Self::Error>;

    /// The AcroForm `/DA` and `/DR` font resources.
    ///
    /// A document without an AcroForm yields empty defaults.
    fn form_defaults(doc: &Self::Document) -> Result<FormDefaults, Self::Error>;

    /// Read the AcroForm field hierarchy into a [`FieldTree`].
    fn load_fields(doc: &Self::Document) -> Result<FieldTree, Self::Error>;

    /// Persist fields, widgets and their current appearance dictionaries.
    ///
    /// Objects that came from the document are updated in place; new
    /// fields and widgets get freshly allocated objects.
    fn write_form(
        doc: &mut Self::Document,
        tree: &FieldTree,
        defaults: &FormDefaults,
    ) -> Result<(), Self::Error>;

    /// Serialize the document.
    fn save(doc: &mut Self::Document) -> Result<Vec<u8>, Self::Error>;
}
