//! acroform-parse: default-appearance codec, font metrics and document backend.
//!
//! This crate implements the text-level plumbing of form appearance
//! regeneration: tokenizing and encoding `/DA` strings, the standard 14 font
//! metrics, font dictionaries from `/DR`, and reading and writing AcroForm
//! structures through pluggable backends. It depends on acroform-core for
//! the field model.

pub mod backend;
pub mod content_encoder;
pub mod da;
pub mod error;
pub mod font_metrics;
pub mod lopdf_backend;
pub mod standard_fonts;
pub mod tokenizer;

pub use acroform_core;
pub use backend::FormBackend;
pub use content_encoder::encode_ops;
pub use da::{DefaultAppearance, format_da, format_number};
pub use error::BackendError;
pub use font_metrics::{DictionaryFont, extract_font_metrics};
pub use lopdf_backend::{LopdfBackend, LopdfDocument};
pub use standard_fonts::{StandardFont, win_ansi_code};
pub use tokenizer::{Operand, Operator, OperatorStream, tokenize};
