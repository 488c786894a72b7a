//! Field and widget entities.
//!
//! A [`Field`] stores only its *local* attributes; inherited values are
//! resolved through [`FieldTree`](crate::tree::FieldTree). A [`Widget`] is one
//! visual placement of a terminal field.

use std::sync::Arc;

use crate::appearance::{AppearanceDict, ObjectRef, XObjectRef};
use crate::color::Color;
use crate::flags::{AnnotationFlags, FieldFlags};
use crate::font::{FontRef, FontSize};
use crate::geometry::Rect;
use crate::tree::{FieldId, WidgetId};

/// The type of a PDF form field.
///
/// Corresponds to the `/FT` entry in a field dictionary (PDF 1.7 Table 220).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldType {
    /// Text field (`/FT /Tx`).
    Text,
    /// Button field (`/FT /Btn`): checkboxes, radio buttons, push buttons.
    Button,
    /// Choice field (`/FT /Ch`): combo boxes and list boxes.
    Choice,
    /// Signature field (`/FT /Sig`).
    Signature,
}

impl FieldType {
    /// Parse a field type from its PDF name string.
    ///
    /// Returns `None` if the string is not a recognized field type.
    pub fn from_pdf_name(name: &str) -> Option<Self> {
        match name {
            "Tx" => Some(Self::Text),
            "Btn" => Some(Self::Button),
            "Ch" => Some(Self::Choice),
            "Sig" => Some(Self::Signature),
            _ => None,
        }
    }

    /// Return the PDF name string for this field type.
    pub fn as_pdf_name(&self) -> &'static str {
        match self {
            Self::Text => "Tx",
            Self::Button => "Btn",
            Self::Choice => "Ch",
            Self::Signature => "Sig",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "Text"),
            Self::Button => write!(f, "Button"),
            Self::Choice => write!(f, "Choice"),
            Self::Signature => write!(f, "Signature"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ButtonKind {
    Push,
    Checkbox,
    Radio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChoiceKind {
    Combo,
    List,
}

/// Field variant derived from `/FT` and the type-selecting flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldKind {
    Text,
    Button(ButtonKind),
    Choice(ChoiceKind),
    Signature,
}

impl FieldKind {
    /// Classify a field from its (resolved) type and flags.
    ///
    /// Push button takes precedence over radio when both flags are set.
    pub fn classify(field_type: FieldType, flags: FieldFlags) -> Self {
        match field_type {
            FieldType::Text => FieldKind::Text,
            FieldType::Signature => FieldKind::Signature,
            FieldType::Button if flags.contains(FieldFlags::PUSH_BUTTON) => {
                FieldKind::Button(ButtonKind::Push)
            }
            FieldType::Button if flags.contains(FieldFlags::RADIO) => {
                FieldKind::Button(ButtonKind::Radio)
            }
            FieldType::Button => FieldKind::Button(ButtonKind::Checkbox),
            FieldType::Choice if flags.contains(FieldFlags::COMBO) => {
                FieldKind::Choice(ChoiceKind::Combo)
            }
            FieldType::Choice => FieldKind::Choice(ChoiceKind::List),
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Text => FieldType::Text,
            FieldKind::Button(_) => FieldType::Button,
            FieldKind::Choice(_) => FieldType::Choice,
            FieldKind::Signature => FieldType::Signature,
        }
    }
}

/// A field value (`/V` or `/DV`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldValue {
    /// Text string (text fields, single-select choice fields).
    Text(String),
    /// Name object (button on-state, or `Off`).
    Name(String),
    /// Multiple selected export values (multi-select list boxes).
    Choices(Vec<String>),
    /// Signature dictionary reference.
    Signature(ObjectRef),
}

impl FieldValue {
    /// The value as a single string: text, name, or the first choice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Name(s) => Some(s),
            FieldValue::Choices(values) => values.first().map(String::as_str),
            FieldValue::Signature(_) => None,
        }
    }

    /// Whether `candidate` is this value or one of the selected choices.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            FieldValue::Text(s) | FieldValue::Name(s) => s == candidate,
            FieldValue::Choices(values) => values.iter().any(|v| v == candidate),
            FieldValue::Signature(_) => false,
        }
    }
}

/// Quadding (`/Q`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Justification {
    #[default]
    Left,
    Center,
    Right,
}

impl Justification {
    /// Map a `/Q` integer; unknown values read as left.
    pub fn from_quadding(q: i64) -> Self {
        match q {
            1 => Justification::Center,
            2 => Justification::Right,
            _ => Justification::Left,
        }
    }

    pub fn quadding(&self) -> i64 {
        match self {
            Justification::Left => 0,
            Justification::Center => 1,
            Justification::Right => 2,
        }
    }
}

/// Checkbox symbol, as named by the `/MK /CA` caption conventions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CheckType {
    #[default]
    Check,
    Circle,
    Cross,
    Diamond,
    Square,
    Star,
}

impl CheckType {
    /// ZapfDingbats character drawn for this symbol.
    pub fn dingbat(&self) -> char {
        match self {
            CheckType::Check => '4',
            CheckType::Circle => 'l',
            CheckType::Cross => '8',
            CheckType::Diamond => 'u',
            CheckType::Square => 'n',
            CheckType::Star => 'H',
        }
    }

    /// Reverse of [`dingbat`](Self::dingbat), used to read `/MK /CA`.
    pub fn from_dingbat(ch: char) -> Option<Self> {
        match ch {
            '4' => Some(CheckType::Check),
            'l' => Some(CheckType::Circle),
            '8' => Some(CheckType::Cross),
            'u' => Some(CheckType::Diamond),
            'n' => Some(CheckType::Square),
            'H' => Some(CheckType::Star),
            _ => None,
        }
    }
}

/// One entry of a choice field's `/Opt` array.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoiceOption {
    /// Export value stored in `/V`.
    pub export: String,
    /// Text shown to the user.
    pub display: String,
}

impl ChoiceOption {
    pub fn new(export: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            export: export.into(),
            display: display.into(),
        }
    }

    /// An option whose export value is also its display text.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            export: value.clone(),
            display: value,
        }
    }
}

/// Archival conformance level that switches button rendering to vector
/// primitives and state-keyed push-button appearances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConformanceLevel {
    PdfA1b,
    PdfA2b,
    PdfA3b,
}

/// Border style (`/BS /S`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderKind {
    #[default]
    Solid,
    /// Dashed with one on/off dash pair.
    Dashed { on: f64, off: f64 },
    Beveled,
    Inset,
    Underline,
}

/// Border width and style (`/BS`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderStyle {
    pub width: f64,
    pub kind: BorderKind,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            kind: BorderKind::Solid,
        }
    }
}

/// Appearance characteristics (`/MK`).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppearanceCharacteristics {
    /// `/BG`
    pub background: Option<Color>,
    /// `/BC`
    pub border_color: Option<Color>,
    /// `/R`, counter-clockwise degrees relative to the page.
    pub rotation: i32,
    /// `/CA`
    pub caption: Option<String>,
}

/// A child of a field: either another field or a widget annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kid {
    Field(FieldId),
    Widget(WidgetId),
}

/// A field node with its local (non-inherited) attributes.
#[derive(Debug, Clone, Default)]
pub struct Field {
    /// Partial name `/T`.
    pub partial_name: Option<String>,
    /// `/FT`, inheritable.
    pub field_type: Option<FieldType>,
    /// `/Ff`, inheritable.
    pub flags: Option<FieldFlags>,
    /// `/V`, inheritable.
    pub value: Option<FieldValue>,
    /// `/DV`, inheritable.
    pub default_value: Option<FieldValue>,
    /// `/DA`, inheritable with the AcroForm fallback.
    pub default_appearance: Option<String>,
    /// `/Q`, inheritable.
    pub justification: Option<Justification>,
    /// `/MaxLen`, inheritable.
    pub max_len: Option<u32>,
    /// `/Opt`
    pub options: Vec<ChoiceOption>,
    /// `/TI`
    pub top_index: Option<usize>,
    /// `/I`, indices into `options`.
    pub selected_indices: Vec<usize>,
    pub check_type: CheckType,
    /// Font override; wins over the font named in the DA string.
    pub font: Option<FontRef>,
    /// Size override; wins over the size in the DA string.
    pub font_size: Option<FontSize>,
    /// Text color override; wins over the DA color.
    pub color: Option<Color>,
    pub conformance: Option<ConformanceLevel>,
    /// Push button image (`/MK /I`).
    pub image: Option<XObjectRef>,
    /// Push button embedded form.
    pub form: Option<XObjectRef>,
    /// Back-reference for name and attribute resolution only.
    pub parent: Option<FieldId>,
    pub kids: Vec<Kid>,
    /// Source object when loaded from a document.
    pub object: Option<ObjectRef>,
}

impl Field {
    /// A field with a partial name and type and nothing else set.
    pub fn new(partial_name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            partial_name: Some(partial_name.into()),
            field_type: Some(field_type),
            ..Default::default()
        }
    }

    /// A non-terminal field that only contributes a name segment.
    pub fn group(partial_name: impl Into<String>) -> Self {
        Self {
            partial_name: Some(partial_name.into()),
            ..Default::default()
        }
    }

    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags = Some(flags);
        self
    }

    pub fn with_value(mut self, value: FieldValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_default_appearance(mut self, da: impl Into<String>) -> Self {
        self.default_appearance = Some(da.into());
        self
    }

    pub fn with_justification(mut self, justification: Justification) -> Self {
        self.justification = Some(justification);
        self
    }

    pub fn with_max_len(mut self, max_len: u32) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn with_options(mut self, options: Vec<ChoiceOption>) -> Self {
        self.options = options;
        self
    }

    /// Widget kids in order.
    pub fn widget_kids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.kids.iter().filter_map(|kid| match kid {
            Kid::Widget(id) => Some(*id),
            Kid::Field(_) => None,
        })
    }

    /// Field kids in order.
    pub fn field_kids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.kids.iter().filter_map(|kid| match kid {
            Kid::Field(id) => Some(*id),
            Kid::Widget(_) => None,
        })
    }
}

/// One visual placement of a field on a page.
#[derive(Debug, Clone, Default)]
pub struct Widget {
    /// `/Rect` in default user space.
    pub rect: Option<Rect>,
    /// 0-based page index.
    pub page: Option<usize>,
    /// The field and this widget share one dictionary.
    pub merged: bool,
    pub characteristics: AppearanceCharacteristics,
    pub border: BorderStyle,
    /// Name of the "on" appearance state for checkboxes and radio buttons.
    pub on_state: Option<String>,
    /// `/F`
    pub flags: AnnotationFlags,
    /// `/AS`
    pub appearance_state: Option<String>,
    /// `/AP`, replaced wholesale on regeneration.
    pub appearance: Option<Arc<AppearanceDict>>,
    /// Owning field, set when the widget is attached.
    pub field: Option<FieldId>,
    /// Source object when loaded from a document.
    pub object: Option<ObjectRef>,
}

impl Widget {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: Some(rect),
            ..Default::default()
        }
    }

    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn merged(mut self) -> Self {
        self.merged = true;
        self
    }

    pub fn with_on_state(mut self, state: impl Into<String>) -> Self {
        self.on_state = Some(state.into());
        self
    }

    pub fn with_characteristics(mut self, mk: AppearanceCharacteristics) -> Self {
        self.characteristics = mk;
        self
    }

    pub fn with_border(mut self, border: BorderStyle) -> Self {
        self.border = border;
        self
    }
}
