//! Error types for the parsing and document backend layers.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`BackendError`]
//! that wraps backend-specific errors and converts them to [`FormError`].

use acroform_core::FormError;
use thiserror::Error;

/// Error type for document backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Malformed document structure or token stream.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading or writing PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A font could not be resolved or described.
    #[error("font error: {0}")]
    Font(String),

    /// Appearance or field objects could not be written.
    #[error("write error: {0}")]
    Write(String),

    /// Error reported by lopdf.
    #[error("lopdf error: {0}")]
    Lopdf(#[from] lopdf::Error),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] FormError),
}

impl From<BackendError> for FormError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => FormError::ParseError(msg),
            BackendError::Io(e) => FormError::IoError(e.to_string()),
            BackendError::Font(msg) => FormError::FontError(msg),
            BackendError::Write(msg) => FormError::Other(msg),
            BackendError::Lopdf(e) => FormError::ParseError(e.to_string()),
            BackendError::Core(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_parse() {
        let err = BackendError::Parse("missing /AcroForm".to_string());
        assert_eq!(err.to_string(), "PDF parse error: missing /AcroForm");
    }

    #[test]
    fn backend_error_io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BackendError = io_err.into();
        assert!(matches!(err, BackendError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn backend_error_from_form_error() {
        let err: BackendError = FormError::FontError("no /F9".to_string()).into();
        assert!(matches!(err, BackendError::Core(_)));
        assert_eq!(err.to_string(), "font error: no /F9");
    }

    #[test]
    fn backend_error_to_form_error() {
        let font: FormError = BackendError::Font("bad metrics".to_string()).into();
        assert_eq!(font, FormError::FontError("bad metrics".to_string()));
        assert!(font.is_resource());

        let parse: FormError = BackendError::Parse("bad xref".to_string()).into();
        assert_eq!(parse, FormError::ParseError("bad xref".to_string()));

        let core: FormError = BackendError::Core(FormError::InvalidRotation(45)).into();
        assert_eq!(core, FormError::InvalidRotation(45));
    }
}
