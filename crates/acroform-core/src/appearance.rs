//! Appearance object model: the output of regeneration.
//!
//! An [`AppearanceDict`] is built in full and then swapped into the widget;
//! existing dictionaries are never patched in place.

use std::collections::BTreeMap;

use crate::content::ContentOp;
use crate::font::FontRef;
use crate::geometry::{Matrix, Rect};

/// Reserved appearance state name for the deselected state.
pub const OFF_STATE: &str = "Off";

/// Indirect object reference `(object number, generation)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectRef {
    pub number: u32,
    pub generation: u16,
}

impl ObjectRef {
    pub fn new(number: u32, generation: u16) -> Self {
        Self { number, generation }
    }
}

/// Kind of an external XObject referenced by a push button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum XObjectKind {
    Image,
    Form,
}

/// An existing XObject with its natural size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XObjectRef {
    pub object: ObjectRef,
    pub kind: XObjectKind,
    /// Natural width: pixels for images, `/BBox` width for forms.
    pub width: f64,
    /// Natural height: pixels for images, `/BBox` height for forms.
    pub height: f64,
}

/// One self-contained drawable state of a widget (a form XObject).
#[derive(Debug, Clone, Default)]
pub struct AppearanceStream {
    pub bbox: Rect,
    pub matrix: Matrix,
    /// `/Resources /Font` entries, keyed by resource name.
    pub fonts: BTreeMap<String, FontRef>,
    /// `/Resources /XObject` entries, keyed by resource name.
    pub xobjects: BTreeMap<String, XObjectRef>,
    pub ops: Vec<ContentOp>,
}

/// Value of one appearance sub-dictionary entry (`/N`, for example).
#[derive(Debug, Clone)]
pub enum AppearanceEntry {
    /// A single unconditional stream (text and choice fields).
    Stream(AppearanceStream),
    /// Streams keyed by appearance state name (button family).
    States(BTreeMap<String, AppearanceStream>),
}

impl AppearanceEntry {
    /// State names in sorted order; empty for a plain stream.
    pub fn state_names(&self) -> Vec<&str> {
        match self {
            AppearanceEntry::Stream(_) => Vec::new(),
            AppearanceEntry::States(states) => states.keys().map(String::as_str).collect(),
        }
    }

    /// The stream for `state`, or the unconditional stream.
    pub fn get(&self, state: &str) -> Option<&AppearanceStream> {
        match self {
            AppearanceEntry::Stream(stream) => Some(stream),
            AppearanceEntry::States(states) => states.get(state),
        }
    }

    pub fn as_stream(&self) -> Option<&AppearanceStream> {
        match self {
            AppearanceEntry::Stream(stream) => Some(stream),
            AppearanceEntry::States(_) => None,
        }
    }
}

/// A widget appearance dictionary (`/AP`).
#[derive(Debug, Clone)]
pub struct AppearanceDict {
    pub normal: AppearanceEntry,
}

impl AppearanceDict {
    pub fn stream(stream: AppearanceStream) -> Self {
        Self {
            normal: AppearanceEntry::Stream(stream),
        }
    }

    pub fn states(states: BTreeMap<String, AppearanceStream>) -> Self {
        Self {
            normal: AppearanceEntry::States(states),
        }
    }
}
