//! acroform-core: Backend-independent form field model and appearance algorithms.
//!
//! This crate provides the field/widget arena with attribute inheritance,
//! the appearance object model, the rotation pipeline, font-fit sizing and
//! the content-operation builder used by the appearance synthesizer. It has
//! no PDF backend dependency.

pub mod appearance;
pub mod color;
pub mod content;
pub mod error;
pub mod field;
pub mod flags;
pub mod font;
pub mod font_fit;
pub mod geometry;
pub mod options;
pub mod page;
pub mod rotation;
pub mod tree;

pub use appearance::{
    AppearanceDict, AppearanceEntry, AppearanceStream, OFF_STATE, ObjectRef, XObjectKind,
    XObjectRef,
};
pub use color::Color;
pub use content::{ContentBuilder, ContentOp};
pub use error::FormError;
pub use field::{
    AppearanceCharacteristics, BorderKind, BorderStyle, ButtonKind, CheckType, ChoiceKind,
    ChoiceOption, ConformanceLevel, Field, FieldKind, FieldType, FieldValue, Justification, Kid,
    Widget,
};
pub use flags::{AnnotationFlags, FieldFlags, flag_mask};
pub use font::{FieldFont, FontRef, FontResources, FontSize, wrap_text};
pub use font_fit::{MIN_FONT_SIZE, fit_font_size};
pub use geometry::{Matrix, Point, Rect};
pub use options::AppearanceOptions;
pub use page::Page;
pub use rotation::{FieldTransform, compute_transform, normalize_page_angle};
pub use tree::{
    Attribute, AttributeValue, FieldId, FieldTree, FormDefaults, RadioRole, WidgetId,
};
