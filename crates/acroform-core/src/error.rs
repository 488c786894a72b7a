//! Error types for acroform-rs.
//!
//! [`FormError`] covers the fatal conditions of appearance regeneration:
//! structural problems in the field graph, resource (font) failures and
//! invalid input rejected at the API boundary. Malformed default-appearance
//! strings are not errors; they decode to partial results.

use std::fmt;

/// Fatal error types for form field processing.
#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    /// A terminal field has neither its own rectangle nor any widget rectangle.
    MissingRect {
        /// Fully qualified name of the offending field.
        field: String,
    },
    /// A font could not be created or resolved from the available resources.
    FontError(String),
    /// A rotation that is not a multiple of 90 degrees was requested.
    InvalidRotation(i32),
    /// A field flag bit position outside `1..=32`.
    InvalidFlagBit(u32),
    /// A field id that does not belong to the tree.
    UnknownField(usize),
    /// A widget id that does not belong to the tree.
    UnknownWidget(usize),
    /// A page index that does not exist in the document.
    UnknownPage(usize),
    /// The document structure could not be read.
    ParseError(String),
    /// I/O error while persisting appearances.
    IoError(String),
    /// Any other error not covered by specific variants.
    Other(String),
}

impl FormError {
    /// Returns true for errors caused by a malformed field graph.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            FormError::MissingRect { .. } | FormError::UnknownField(_) | FormError::UnknownWidget(_)
        )
    }

    /// Returns true for errors caused by missing or unusable resources.
    pub fn is_resource(&self) -> bool {
        matches!(self, FormError::FontError(_))
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::MissingRect { field } => {
                write!(f, "field '{field}' has no rectangle and no widget rectangles")
            }
            FormError::FontError(msg) => write!(f, "font error: {msg}"),
            FormError::InvalidRotation(deg) => {
                write!(f, "invalid rotation {deg}: must be a multiple of 90 degrees")
            }
            FormError::InvalidFlagBit(bit) => {
                write!(f, "invalid field flag bit {bit}: expected 1..=32")
            }
            FormError::UnknownField(id) => write!(f, "unknown field id {id}"),
            FormError::UnknownWidget(id) => write!(f, "unknown widget id {id}"),
            FormError::UnknownPage(index) => write!(f, "unknown page index {index}"),
            FormError::ParseError(msg) => write!(f, "parse error: {msg}"),
            FormError::IoError(msg) => write!(f, "I/O error: {msg}"),
            FormError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FormError {}

impl From<std::io::Error> for FormError {
    fn from(err: std::io::Error) -> Self {
        FormError::IoError(err.to_string())
    }
}
