//! lopdf-based document backend.
//!
//! Implements [`FormBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate. Reads the AcroForm field hierarchy into a [`FieldTree`] and writes
//! fields, widgets and generated appearance streams back into the document.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use acroform_core::{
    AnnotationFlags, AppearanceCharacteristics, AppearanceEntry, AppearanceStream, BorderKind,
    BorderStyle, ButtonKind, CheckType, ChoiceOption, Color, Field, FieldFlags, FieldId,
    FieldKind, FieldTree, FieldType, FieldValue, FontRef, FormDefaults, FormError, Justification,
    Kid, ObjectRef, Page, Rect, Widget, XObjectKind, XObjectRef,
};
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::backend::FormBackend;
use crate::content_encoder::{encode_ops, number};
use crate::error::BackendError;
use crate::font_metrics::extract_font_metrics;
use crate::standard_fonts::StandardFont;

/// Field trees deeper than this are treated as circular.
const MAX_FIELD_DEPTH: usize = 64;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    /// The underlying lopdf document.
    inner: lopdf::Document,
    /// Cached ordered list of page ObjectIds (indexed by 0-based page number).
    page_ids: Vec<ObjectId>,
}

impl LopdfDocument {
    /// Create an empty document with one page per entry of `pages`.
    pub fn new(pages: &[Page]) -> Self {
        let mut inner = lopdf::Document::with_version("1.7");
        let pages_id = inner.new_object_id();

        let mut page_ids = Vec::with_capacity(pages.len());
        for page in pages {
            let mut dict = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => rect_object(&page.media_box),
            };
            if page.rotation != 0 {
                dict.set("Rotate", Object::Integer(i64::from(page.rotation)));
            }
            page_ids.push(inner.add_object(dict));
        }

        let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
        inner.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(pages.len() as i64),
            }),
        );

        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        Self { inner, page_ids }
    }

    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// The lopdf-based document backend.
///
/// # Example
///
/// ```ignore
/// use acroform_parse::{FormBackend, LopdfBackend};
///
/// let doc = LopdfBackend::open(pdf_bytes)?;
/// let tree = LopdfBackend::load_fields(&doc)?;
/// ```
pub struct LopdfBackend;

impl FormBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Parse(
                "encrypted documents are not supported".to_string(),
            ));
        }

        // get_pages returns BTreeMap<u32, ObjectId> with 1-based keys
        let page_ids: Vec<ObjectId> = inner.get_pages().values().copied().collect();
        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn page(doc: &Self::Document, index: usize) -> Result<Page, Self::Error> {
        let Some(&page_id) = doc.page_ids.get(index) else {
            return Err(FormError::UnknownPage(index).into());
        };
        let media_box = resolve_inherited(&doc.inner, page_id, b"MediaBox")?
            .map(|obj| resolve(&doc.inner, obj))
            .ok_or_else(|| BackendError::Parse("MediaBox not found on page or ancestors".into()))?
            .as_array()
            .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))
            .and_then(|array| extract_rect_from_array(array))?;
        let rotation = match resolve_inherited(&doc.inner, page_id, b"Rotate")? {
            Some(obj) => obj
                .as_i64()
                .map_err(|e| BackendError::Parse(format!("Rotate is not an integer: {e}")))?,
            None => 0,
        };
        Ok(Page::new(media_box, rotation as i32))
    }

    fn form_defaults(doc: &Self::Document) -> Result<FormDefaults, Self::Error> {
        let pdf = &doc.inner;
        let mut defaults = FormDefaults::default();
        let Some(acroform) = acroform_dict(pdf) else {
            return Ok(defaults);
        };

        defaults.default_appearance = dict_get(pdf, acroform, b"DA").and_then(string_of);

        let fonts = dict_get(pdf, acroform, b"DR")
            .and_then(|o| o.as_dict().ok())
            .and_then(|dr| dict_get(pdf, dr, b"Font"))
            .and_then(|o| o.as_dict().ok());
        if let Some(fonts) = fonts {
            for (key, value) in fonts.iter() {
                let resource = String::from_utf8_lossy(key).into_owned();
                match load_font(pdf, &resource, resolve(pdf, value)) {
                    Some(font) => defaults.resources.insert(resource, font),
                    None => {
                        tracing::warn!(resource = %resource, "unsupported font in form resources")
                    }
                }
            }
        }
        Ok(defaults)
    }

    fn load_fields(doc: &Self::Document) -> Result<FieldTree, Self::Error> {
        let pdf = &doc.inner;
        let Some(acroform) = acroform_dict(pdf) else {
            return Ok(FieldTree::new());
        };
        let Some(fields) = dict_get(pdf, acroform, b"Fields").and_then(|o| o.as_array().ok())
        else {
            return Ok(FieldTree::new());
        };

        let mut loader = FieldLoader {
            doc,
            annotation_pages: annotation_pages(doc),
            visited: BTreeSet::new(),
            tree: FieldTree::new(),
        };
        for entry in fields {
            match entry {
                Object::Reference(id) => loader.load(*id, None, 0)?,
                other => tracing::debug!(?other, "skipping direct object in /Fields"),
            }
        }
        tracing::debug!(
            fields = loader.tree.len(),
            widgets = loader.tree.widget_ids().count(),
            "loaded form fields"
        );
        Ok(loader.tree)
    }

    fn write_form(
        doc: &mut Self::Document,
        tree: &FieldTree,
        defaults: &FormDefaults,
    ) -> Result<(), Self::Error> {
        let LopdfDocument { inner, page_ids } = doc;
        let acroform_id = ensure_acroform(inner)?;
        let fonts = existing_font_objects(inner, acroform_id);
        let mut writer = FormWriter {
            pdf: inner,
            page_ids,
            fonts,
        };
        writer.write(tree, defaults, acroform_id)
    }

    fn save(doc: &mut Self::Document) -> Result<Vec<u8>, Self::Error> {
        // Replaced appearance streams are no longer reachable from the trailer.
        let pruned = doc.inner.prune_objects();
        if !pruned.is_empty() {
            tracing::debug!(objects = pruned.len(), "dropped unreferenced objects");
        }
        let mut buf = Vec::new();
        doc.inner.save_to(&mut buf)?;
        Ok(buf)
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Look up a key in the page dictionary, walking up the page tree
/// (via /Parent) if the key is not found on the page itself.
///
/// Returns `None` if the key is not found anywhere in the tree.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current_id = page_id;
    for _ in 0..MAX_FIELD_DEPTH {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent_obj) => {
                current_id = parent_obj
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::Parse("page tree /Parent chain is circular".into()))
}

/// Resolve an indirect reference to the actual object.
fn resolve<'a>(doc: &'a lopdf::Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Dictionary lookup that follows one level of indirection.
fn dict_get<'a>(doc: &'a lopdf::Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    dict.get(key).ok().map(|obj| resolve(doc, obj))
}

fn catalog_dict(doc: &lopdf::Document) -> Option<&Dictionary> {
    let root = doc.trailer.get(b"Root").ok()?;
    resolve(doc, root).as_dict().ok()
}

fn acroform_dict(doc: &lopdf::Document) -> Option<&Dictionary> {
    let catalog = catalog_dict(doc)?;
    dict_get(doc, catalog, b"AcroForm")?.as_dict().ok()
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
fn object_to_f64(obj: &Object) -> Result<f64, BackendError> {
    match obj {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(f) => Ok(*f as f64),
        _ => Err(BackendError::Parse(format!("expected number, got {obj:?}"))),
    }
}

fn integer_of(obj: &Object) -> Option<i64> {
    match obj {
        Object::Integer(i) => Some(*i),
        Object::Real(f) => Some(*f as i64),
        _ => None,
    }
}

fn name_of(obj: &Object) -> Option<String> {
    match obj {
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

fn string_of(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Extract a [`Rect`] from a lopdf array of 4 numbers `[llx, lly, urx, ury]`.
fn extract_rect_from_array(array: &[Object]) -> Result<Rect, BackendError> {
    if array.len() != 4 {
        return Err(BackendError::Parse(format!(
            "expected 4-element array for rectangle, got {}",
            array.len()
        )));
    }
    let llx = object_to_f64(&array[0])?;
    let lly = object_to_f64(&array[1])?;
    let urx = object_to_f64(&array[2])?;
    let ury = object_to_f64(&array[3])?;
    Ok(Rect::new(llx, lly, urx, ury))
}

/// Decode a PDF text string: UTF-16BE or UTF-8 with a byte order mark,
/// otherwise one byte per character (PDFDocEncoding read as Latin-1).
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        String::from_utf8_lossy(rest).into_owned()
    } else {
        bytes.iter().map(|&b| char::from(b)).collect()
    }
}

fn object_ref(id: ObjectId) -> ObjectRef {
    ObjectRef::new(id.0, id.1)
}

fn object_id(r: ObjectRef) -> ObjectId {
    (r.number, r.generation)
}

/// Resolve a `/DR /Font` entry to a field font.
///
/// Standard 14 base names use built-in metrics; other simple fonts use
/// their `/Widths`. A resource that names no usable font falls back to its
/// conventional alias (`Helv`, `ZaDb`, ...).
fn load_font(doc: &lopdf::Document, resource: &str, obj: &Object) -> Option<FontRef> {
    let dict = obj.as_dict().ok();
    let base = dict
        .and_then(|d| d.get(b"BaseFont").ok())
        .and_then(name_of);
    if let Some(font) = base.as_deref().and_then(StandardFont::from_name) {
        return Some(font.into_ref());
    }
    if let Some(font) = dict.and_then(|d| extract_font_metrics(doc, d)) {
        return Some(Arc::new(font));
    }
    StandardFont::from_alias(resource).map(StandardFont::into_ref)
}

/// Map each annotation referenced from a page's `/Annots` to its page index.
fn annotation_pages(doc: &LopdfDocument) -> BTreeMap<ObjectId, usize> {
    let pdf = &doc.inner;
    let mut pages = BTreeMap::new();
    for (index, page_id) in doc.page_ids.iter().enumerate() {
        let Some(page) = pdf.get_object(*page_id).ok().and_then(|o| o.as_dict().ok()) else {
            continue;
        };
        let Some(annots) = dict_get(pdf, page, b"Annots").and_then(|o| o.as_array().ok()) else {
            continue;
        };
        for annot in annots {
            if let Object::Reference(id) = annot {
                pages.entry(*id).or_insert(index);
            }
        }
    }
    pages
}

/// A dictionary that carries widget annotation entries.
fn is_widget_dict(dict: &Dictionary) -> bool {
    matches!(dict.get(b"Subtype"), Ok(Object::Name(n)) if n == b"Widget") || dict.get(b"Rect").is_ok()
}

/// A kid without `/T` that is not itself a field group is a pure widget.
fn is_widget_kid(dict: &Dictionary) -> bool {
    dict.get(b"T").is_err() && (is_widget_dict(dict) || dict.get(b"Kids").is_err())
}

/// Builds a [`FieldTree`] while walking the field hierarchy.
struct FieldLoader<'a> {
    doc: &'a LopdfDocument,
    annotation_pages: BTreeMap<ObjectId, usize>,
    visited: BTreeSet<ObjectId>,
    tree: FieldTree,
}

impl<'a> FieldLoader<'a> {
    fn load(
        &mut self,
        id: ObjectId,
        parent: Option<FieldId>,
        depth: usize,
    ) -> Result<(), BackendError> {
        if depth >= MAX_FIELD_DEPTH {
            tracing::warn!(object = ?id, "field tree too deep, skipping subtree");
            return Ok(());
        }
        if !self.visited.insert(id) {
            tracing::warn!(object = ?id, "field object referenced twice, skipping");
            return Ok(());
        }

        let doc: &'a LopdfDocument = self.doc;
        let pdf = &doc.inner;
        let Some(dict) = pdf.get_object(id).ok().and_then(|o| o.as_dict().ok()) else {
            tracing::debug!(object = ?id, "field is not a dictionary, skipping");
            return Ok(());
        };

        let mut field = read_field(pdf, dict);
        field.object = Some(object_ref(id));
        let field_id = match parent {
            Some(parent) => self.tree.add_kid(parent, field)?,
            None => self.tree.add_root(field),
        };

        let kids: Vec<ObjectId> = dict_get(pdf, dict, b"Kids")
            .and_then(|o| o.as_array().ok())
            .map(|kids| kids.iter().filter_map(|k| k.as_reference().ok()).collect())
            .unwrap_or_default();

        if kids.is_empty() {
            if is_widget_dict(dict) {
                self.attach_widget(field_id, id, dict, true)?;
            }
            return Ok(());
        }

        for kid in kids {
            let Some(kid_dict) = pdf.get_object(kid).ok().and_then(|o| o.as_dict().ok()) else {
                continue;
            };
            if is_widget_kid(kid_dict) {
                if self.visited.insert(kid) {
                    self.attach_widget(field_id, kid, kid_dict, false)?;
                }
            } else {
                self.load(kid, Some(field_id), depth + 1)?;
            }
        }
        Ok(())
    }

    fn attach_widget(
        &mut self,
        field_id: FieldId,
        id: ObjectId,
        dict: &Dictionary,
        merged: bool,
    ) -> Result<(), BackendError> {
        let doc: &'a LopdfDocument = self.doc;
        let pdf = &doc.inner;

        let mut widget = read_widget(pdf, dict, &doc.page_ids);
        widget.merged = merged;
        widget.object = Some(object_ref(id));
        if widget.page.is_none() {
            widget.page = self.annotation_pages.get(&id).copied();
        }

        let first = self.tree.widgets(field_id).is_empty();
        let caption = widget.characteristics.caption.clone();
        let icon = dict_get(pdf, dict, b"MK")
            .and_then(|o| o.as_dict().ok())
            .and_then(|mk| read_icon(pdf, mk));
        self.tree.add_widget(field_id, widget)?;

        if first {
            let kind = self.tree.kind(field_id);
            let field = self.tree.field_mut(field_id)?;
            match kind {
                Some(FieldKind::Button(ButtonKind::Checkbox | ButtonKind::Radio)) => {
                    let symbol = caption
                        .filter(|c| c.chars().count() == 1)
                        .and_then(|c| c.chars().next())
                        .and_then(CheckType::from_dingbat);
                    if let Some(check_type) = symbol {
                        field.check_type = check_type;
                    }
                }
                Some(FieldKind::Button(ButtonKind::Push)) => field.image = icon,
                _ => {}
            }
        }
        Ok(())
    }
}

/// Local attributes of a field dictionary.
fn read_field(doc: &lopdf::Document, dict: &Dictionary) -> Field {
    Field {
        partial_name: dict_get(doc, dict, b"T").and_then(string_of),
        field_type: dict_get(doc, dict, b"FT")
            .and_then(name_of)
            .and_then(|name| FieldType::from_pdf_name(&name)),
        flags: dict_get(doc, dict, b"Ff")
            .and_then(integer_of)
            .map(|bits| FieldFlags(bits as u32)),
        value: read_value(doc, dict, b"V"),
        default_value: read_value(doc, dict, b"DV"),
        default_appearance: dict_get(doc, dict, b"DA").and_then(string_of),
        justification: dict_get(doc, dict, b"Q")
            .and_then(integer_of)
            .map(Justification::from_quadding),
        max_len: dict_get(doc, dict, b"MaxLen")
            .and_then(integer_of)
            .and_then(|v| u32::try_from(v).ok()),
        options: read_options(doc, dict),
        top_index: dict_get(doc, dict, b"TI")
            .and_then(integer_of)
            .and_then(|v| usize::try_from(v).ok()),
        selected_indices: dict_get(doc, dict, b"I")
            .and_then(|o| o.as_array().ok())
            .map(|items| {
                items
                    .iter()
                    .filter_map(integer_of)
                    .filter_map(|v| usize::try_from(v).ok())
                    .collect()
            })
            .unwrap_or_default(),
        ..Default::default()
    }
}

/// Read `/V` or `/DV`. A reference to a dictionary is a signature value.
fn read_value(doc: &lopdf::Document, dict: &Dictionary, key: &[u8]) -> Option<FieldValue> {
    let raw = dict.get(key).ok()?;
    if let Object::Reference(id) = raw {
        if let Ok(Object::Dictionary(_)) = doc.get_object(*id) {
            return Some(FieldValue::Signature(object_ref(*id)));
        }
    }
    match resolve(doc, raw) {
        Object::String(bytes, _) => Some(FieldValue::Text(decode_pdf_string(bytes))),
        Object::Name(name) => Some(FieldValue::Name(String::from_utf8_lossy(name).into_owned())),
        Object::Array(items) => Some(FieldValue::Choices(
            items
                .iter()
                .filter_map(|item| {
                    let item = resolve(doc, item);
                    string_of(item).or_else(|| name_of(item))
                })
                .collect(),
        )),
        _ => None,
    }
}

/// Read `/Opt`: plain strings or `[export display]` pairs.
fn read_options(doc: &lopdf::Document, dict: &Dictionary) -> Vec<ChoiceOption> {
    let Some(items) = dict_get(doc, dict, b"Opt").and_then(|o| o.as_array().ok()) else {
        return Vec::new();
    };
    let text = |obj: &Object| {
        let obj = resolve(doc, obj);
        string_of(obj).or_else(|| name_of(obj))
    };
    items
        .iter()
        .filter_map(|item| match resolve(doc, item) {
            Object::Array(pair) => match pair.as_slice() {
                [export, display, ..] => Some(ChoiceOption::new(text(export)?, text(display)?)),
                [single] => text(single).map(ChoiceOption::plain),
                [] => None,
            },
            other => text(other).map(ChoiceOption::plain),
        })
        .collect()
}

/// Widget annotation entries.
fn read_widget(doc: &lopdf::Document, dict: &Dictionary, page_ids: &[ObjectId]) -> Widget {
    let rect = dict_get(doc, dict, b"Rect")
        .and_then(|o| o.as_array().ok())
        .and_then(|a| extract_rect_from_array(a).ok());
    let page = match dict.get(b"P") {
        Ok(Object::Reference(page_ref)) => page_ids.iter().position(|id| id == page_ref),
        _ => None,
    };
    let characteristics = dict_get(doc, dict, b"MK")
        .and_then(|o| o.as_dict().ok())
        .map(|mk| read_characteristics(doc, mk))
        .unwrap_or_default();
    let flags = dict_get(doc, dict, b"F")
        .and_then(integer_of)
        .map(|bits| AnnotationFlags(bits as u32))
        .unwrap_or_default();

    Widget {
        rect,
        page,
        characteristics,
        border: read_border(doc, dict),
        on_state: read_on_state(doc, dict),
        flags,
        appearance_state: dict_get(doc, dict, b"AS").and_then(name_of),
        ..Default::default()
    }
}

fn read_color(doc: &lopdf::Document, dict: &Dictionary, key: &[u8]) -> Option<Color> {
    let items = dict_get(doc, dict, key)?.as_array().ok()?;
    let components: Vec<f64> = items.iter().filter_map(|o| object_to_f64(o).ok()).collect();
    Color::from_components(&components)
}

fn read_characteristics(doc: &lopdf::Document, mk: &Dictionary) -> AppearanceCharacteristics {
    AppearanceCharacteristics {
        background: read_color(doc, mk, b"BG"),
        border_color: read_color(doc, mk, b"BC"),
        rotation: dict_get(doc, mk, b"R")
            .and_then(integer_of)
            .map(quadrant_rotation)
            .unwrap_or(0),
        caption: dict_get(doc, mk, b"CA").and_then(string_of),
    }
}

/// Normalise `/MK /R` into `0..360`; angles off a right angle become 0.
fn quadrant_rotation(degrees: i64) -> i32 {
    let normalized = degrees.rem_euclid(360);
    if normalized % 90 == 0 {
        normalized as i32
    } else {
        tracing::warn!(degrees, "widget rotation is not a multiple of 90, ignored");
        0
    }
}

/// Read `/BS`, falling back to the legacy `/Border` array.
fn read_border(doc: &lopdf::Document, dict: &Dictionary) -> BorderStyle {
    if let Some(bs) = dict_get(doc, dict, b"BS").and_then(|o| o.as_dict().ok()) {
        let width = dict_get(doc, bs, b"W")
            .and_then(|o| object_to_f64(o).ok())
            .unwrap_or(1.0);
        let kind = match dict_get(doc, bs, b"S").and_then(name_of).as_deref() {
            Some("D") => {
                let dashes: Vec<f64> = dict_get(doc, bs, b"D")
                    .and_then(|o| o.as_array().ok())
                    .map(|d| d.iter().filter_map(|o| object_to_f64(o).ok()).collect())
                    .unwrap_or_default();
                match dashes.as_slice() {
                    [] => BorderKind::Dashed { on: 3.0, off: 3.0 },
                    [on] => BorderKind::Dashed { on: *on, off: *on },
                    [on, off, ..] => BorderKind::Dashed { on: *on, off: *off },
                }
            }
            Some("B") => BorderKind::Beveled,
            Some("I") => BorderKind::Inset,
            Some("U") => BorderKind::Underline,
            _ => BorderKind::Solid,
        };
        return BorderStyle { width, kind };
    }
    let legacy_width = dict_get(doc, dict, b"Border")
        .and_then(|o| o.as_array().ok())
        .and_then(|b| b.get(2))
        .and_then(|o| object_to_f64(o).ok());
    match legacy_width {
        Some(width) => BorderStyle {
            width,
            kind: BorderKind::Solid,
        },
        None => BorderStyle::default(),
    }
}

/// The first non-`Off` state name of the normal (or down) appearance.
fn read_on_state(doc: &lopdf::Document, dict: &Dictionary) -> Option<String> {
    let ap = dict_get(doc, dict, b"AP")?.as_dict().ok()?;
    [b"N".as_slice(), b"D".as_slice()].iter().find_map(|key| {
        let states = dict_get(doc, ap, key)?.as_dict().ok()?;
        states
            .iter()
            .map(|(name, _)| String::from_utf8_lossy(name).into_owned())
            .find(|name| name != acroform_core::OFF_STATE)
    })
}

/// Push button icon (`/MK /I`) with its natural size.
fn read_icon(doc: &lopdf::Document, mk: &Dictionary) -> Option<XObjectRef> {
    let id = mk.get(b"I").ok()?.as_reference().ok()?;
    let Object::Stream(stream) = doc.get_object(id).ok()? else {
        return None;
    };
    let dict = &stream.dict;
    match dict_get(doc, dict, b"Subtype").and_then(name_of).as_deref() {
        Some("Image") => Some(XObjectRef {
            object: object_ref(id),
            kind: XObjectKind::Image,
            width: dict_get(doc, dict, b"Width").and_then(|o| object_to_f64(o).ok())?,
            height: dict_get(doc, dict, b"Height").and_then(|o| object_to_f64(o).ok())?,
        }),
        Some("Form") => {
            let bbox = dict_get(doc, dict, b"BBox")
                .and_then(|o| o.as_array().ok())
                .and_then(|a| extract_rect_from_array(a).ok())?;
            Some(XObjectRef {
                object: object_ref(id),
                kind: XObjectKind::Form,
                width: bbox.width(),
                height: bbox.height(),
            })
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Encode a text string as PDFDocEncoding when possible, UTF-16BE otherwise.
fn encode_pdf_string(text: &str) -> Object {
    let single_byte = text
        .chars()
        .all(|c| (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)));
    if single_byte {
        Object::String(text.chars().map(|c| c as u8).collect(), StringFormat::Literal)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            bytes.extend(unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

fn name_object(name: &str) -> Object {
    Object::Name(name.as_bytes().to_vec())
}

fn rect_object(rect: &Rect) -> Object {
    Object::Array(rect.to_array().iter().copied().map(number).collect())
}

fn color_object(color: &Color) -> Object {
    Object::Array(color.components().into_iter().map(number).collect())
}

fn value_object(value: &FieldValue) -> Object {
    match value {
        FieldValue::Text(text) => encode_pdf_string(text),
        FieldValue::Name(name) => name_object(name),
        FieldValue::Choices(values) => {
            Object::Array(values.iter().map(|v| encode_pdf_string(v)).collect())
        }
        FieldValue::Signature(r) => Object::Reference(object_id(*r)),
    }
}

fn set_or_remove(dict: &mut Dictionary, key: &str, value: Option<Object>) {
    match value {
        Some(value) => dict.set(key, value),
        None => {
            dict.remove(key.as_bytes());
        }
    }
}

/// Catalog `/AcroForm` as an indirect object, creating it when missing.
fn ensure_acroform(pdf: &mut lopdf::Document) -> Result<ObjectId, BackendError> {
    let catalog_id = pdf
        .trailer
        .get(b"Root")
        .and_then(|o| o.as_reference())
        .map_err(|e| BackendError::Write(format!("document has no catalog reference: {e}")))?;
    let existing = pdf
        .get_object(catalog_id)?
        .as_dict()?
        .get(b"AcroForm")
        .ok()
        .cloned();
    match existing {
        Some(Object::Reference(id)) => Ok(id),
        other => {
            let dict = match other {
                Some(Object::Dictionary(dict)) => dict,
                _ => Dictionary::new(),
            };
            let id = pdf.add_object(dict);
            pdf.get_object_mut(catalog_id)?
                .as_dict_mut()?
                .set("AcroForm", Object::Reference(id));
            Ok(id)
        }
    }
}

/// Indirect font objects already listed in `/DR /Font`, keyed by base font.
fn existing_font_objects(pdf: &lopdf::Document, acroform_id: ObjectId) -> BTreeMap<String, ObjectId> {
    let mut fonts = BTreeMap::new();
    let Some(acroform) = pdf.get_object(acroform_id).ok().and_then(|o| o.as_dict().ok()) else {
        return fonts;
    };
    let font_dict = dict_get(pdf, acroform, b"DR")
        .and_then(|o| o.as_dict().ok())
        .and_then(|dr| dict_get(pdf, dr, b"Font"))
        .and_then(|o| o.as_dict().ok());
    for (_, value) in font_dict.into_iter().flat_map(|d| d.iter()) {
        let Object::Reference(id) = value else {
            continue;
        };
        let base = pdf
            .get_object(*id)
            .ok()
            .and_then(|o| o.as_dict().ok())
            .and_then(|d| d.get(b"BaseFont").ok())
            .and_then(name_of);
        if let Some(base) = base {
            fonts.entry(base).or_insert(*id);
        }
    }
    fonts
}

/// Writes a [`FieldTree`] into a lopdf document.
struct FormWriter<'a> {
    pdf: &'a mut lopdf::Document,
    page_ids: &'a [ObjectId],
    /// Font objects by base font name.
    fonts: BTreeMap<String, ObjectId>,
}

impl FormWriter<'_> {
    fn write(
        &mut self,
        tree: &FieldTree,
        defaults: &FormDefaults,
        acroform_id: ObjectId,
    ) -> Result<(), BackendError> {
        let mut field_objects = Vec::with_capacity(tree.len());
        for id in tree.field_ids() {
            let object = match tree.field(id)?.object {
                Some(r) => object_id(r),
                None => self.pdf.new_object_id(),
            };
            field_objects.push(object);
        }

        let mut widget_objects = Vec::new();
        for id in tree.widget_ids() {
            let widget = tree.widget(id)?;
            let object = match (widget.merged, widget.field, widget.object) {
                (true, Some(field), _) => field_objects[field.index()],
                (_, _, Some(r)) => object_id(r),
                _ => self.pdf.new_object_id(),
            };
            widget_objects.push(object);
        }

        for id in tree.field_ids() {
            let field = tree.field(id)?;
            let object = field_objects[id.index()];
            let mut dict = self.existing_dict(object);
            write_field_entries(&mut dict, tree, field, &field_objects, &widget_objects)?;
            for widget_id in field.widget_kids() {
                let widget = tree.widget(widget_id)?;
                if widget.merged {
                    self.write_widget_entries(&mut dict, widget, field)?;
                }
            }
            self.pdf.objects.insert(object, Object::Dictionary(dict));
        }

        for id in tree.widget_ids() {
            let widget = tree.widget(id)?;
            let object = widget_objects[id.index()];
            if !widget.merged {
                let mut dict = self.existing_dict(object);
                let field = match widget.field {
                    Some(field) => {
                        dict.set("Parent", Object::Reference(field_objects[field.index()]));
                        tree.field(field)?
                    }
                    None => return Err(FormError::UnknownWidget(id.index()).into()),
                };
                self.write_widget_entries(&mut dict, widget, field)?;
                self.pdf.objects.insert(object, Object::Dictionary(dict));
            }
            match widget.page {
                Some(page) => self.add_annotation(page, object)?,
                None => tracing::debug!(widget = id.index(), "widget has no page, not listed in /Annots"),
            }
        }

        let mut acroform = self.existing_dict(acroform_id);
        let roots = tree
            .roots()
            .iter()
            .map(|id| Object::Reference(field_objects[id.index()]))
            .collect::<Vec<_>>();
        acroform.set("Fields", Object::Array(roots));
        if let Some(da) = &defaults.default_appearance {
            acroform.set("DA", encode_pdf_string(da));
        }

        let mut dr = acroform
            .get(b"DR")
            .ok()
            .map(|o| resolve(self.pdf, o))
            .and_then(|o| o.as_dict().ok())
            .cloned()
            .unwrap_or_default();
        let mut font_dict = dr
            .get(b"Font")
            .ok()
            .map(|o| resolve(self.pdf, o))
            .and_then(|o| o.as_dict().ok())
            .cloned()
            .unwrap_or_default();
        for (name, font) in defaults.resources.iter() {
            let font_object = self.font_object(font);
            font_dict.set(name.as_str(), Object::Reference(font_object));
        }
        if !font_dict.is_empty() {
            dr.set("Font", font_dict);
        }
        if !dr.is_empty() {
            acroform.set("DR", dr);
        }
        self.pdf.objects.insert(acroform_id, Object::Dictionary(acroform));

        tracing::debug!(
            fields = field_objects.len(),
            widgets = widget_objects.len(),
            "wrote form"
        );
        Ok(())
    }

    fn existing_dict(&self, id: ObjectId) -> Dictionary {
        self.pdf
            .get_object(id)
            .ok()
            .and_then(|o| o.as_dict().ok())
            .cloned()
            .unwrap_or_default()
    }

    fn write_widget_entries(
        &mut self,
        dict: &mut Dictionary,
        widget: &Widget,
        field: &Field,
    ) -> Result<(), BackendError> {
        dict.set("Type", name_object("Annot"));
        dict.set("Subtype", name_object("Widget"));
        set_or_remove(dict, "Rect", widget.rect.as_ref().map(rect_object));
        set_or_remove(
            dict,
            "P",
            widget
                .page
                .and_then(|p| self.page_ids.get(p))
                .map(|id| Object::Reference(*id)),
        );
        set_or_remove(
            dict,
            "F",
            (widget.flags.0 != 0).then(|| Object::Integer(i64::from(widget.flags.0))),
        );

        set_or_remove(
            dict,
            "MK",
            characteristics_object(&widget.characteristics, field.image.as_ref()),
        );
        dict.set("BS", border_object(&widget.border));
        set_or_remove(
            dict,
            "AS",
            widget.appearance_state.as_deref().map(name_object),
        );

        if let Some(ap) = &widget.appearance {
            let normal = self.write_entry(&ap.normal)?;
            dict.set("AP", dictionary! { "N" => normal });
        }
        Ok(())
    }

    fn write_entry(&mut self, entry: &AppearanceEntry) -> Result<Object, BackendError> {
        match entry {
            AppearanceEntry::Stream(stream) => Ok(Object::Reference(self.write_stream(stream)?)),
            AppearanceEntry::States(states) => {
                let mut dict = Dictionary::new();
                for (state, stream) in states {
                    let id = self.write_stream(stream)?;
                    dict.set(state.as_str(), Object::Reference(id));
                }
                Ok(Object::Dictionary(dict))
            }
        }
    }

    /// Write one appearance as a form XObject.
    fn write_stream(&mut self, stream: &AppearanceStream) -> Result<ObjectId, BackendError> {
        let content = encode_ops(&stream.ops)?;

        let mut resources = Dictionary::new();
        if !stream.fonts.is_empty() {
            let mut fonts = Dictionary::new();
            for (name, font) in &stream.fonts {
                let font_object = self.font_object(font);
                fonts.set(name.as_str(), Object::Reference(font_object));
            }
            resources.set("Font", fonts);
        }
        if !stream.xobjects.is_empty() {
            let mut xobjects = Dictionary::new();
            for (name, xobject) in &stream.xobjects {
                xobjects.set(name.as_str(), Object::Reference(object_id(xobject.object)));
            }
            resources.set("XObject", xobjects);
        }

        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => rect_object(&stream.bbox),
            "Matrix" => Object::Array(stream.matrix.to_array().iter().copied().map(number).collect()),
            "Resources" => resources,
        };
        Ok(self.pdf.add_object(Stream::new(dict, content)))
    }

    /// Object id of a font dictionary for `font`, creating a simple Type1
    /// dictionary the first time a base font is used.
    fn font_object(&mut self, font: &FontRef) -> ObjectId {
        if let Some(id) = self.fonts.get(font.name()) {
            return *id;
        }
        let mut dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => name_object(font.name()),
        };
        if !font.is_symbolic() {
            dict.set("Encoding", name_object("WinAnsiEncoding"));
        }
        let id = self.pdf.add_object(dict);
        self.fonts.insert(font.name().to_string(), id);
        id
    }

    /// List `annot` in the `/Annots` array of a page.
    fn add_annotation(&mut self, page_index: usize, annot: ObjectId) -> Result<(), BackendError> {
        let Some(&page_id) = self.page_ids.get(page_index) else {
            return Err(FormError::UnknownPage(page_index).into());
        };
        let listed = |items: &[Object]| {
            items
                .iter()
                .any(|o| matches!(o, Object::Reference(id) if *id == annot))
        };
        let annots = self.pdf.get_object(page_id)?.as_dict()?.get(b"Annots").ok().cloned();
        match annots {
            Some(Object::Reference(array_id)) => {
                let items = self.pdf.get_object_mut(array_id)?.as_array_mut()?;
                if !listed(items) {
                    items.push(Object::Reference(annot));
                }
            }
            Some(Object::Array(mut items)) => {
                if !listed(&items) {
                    items.push(Object::Reference(annot));
                }
                self.pdf
                    .get_object_mut(page_id)?
                    .as_dict_mut()?
                    .set("Annots", Object::Array(items));
            }
            _ => {
                self.pdf
                    .get_object_mut(page_id)?
                    .as_dict_mut()?
                    .set("Annots", Object::Array(vec![Object::Reference(annot)]));
            }
        }
        Ok(())
    }
}

fn write_field_entries(
    dict: &mut Dictionary,
    tree: &FieldTree,
    field: &Field,
    field_objects: &[ObjectId],
    widget_objects: &[ObjectId],
) -> Result<(), BackendError> {
    set_or_remove(dict, "T", field.partial_name.as_deref().map(encode_pdf_string));
    set_or_remove(dict, "FT", field.field_type.map(|ft| name_object(ft.as_pdf_name())));
    set_or_remove(
        dict,
        "Ff",
        field.flags.map(|f| Object::Integer(i64::from(f.bits()))),
    );
    set_or_remove(dict, "V", field.value.as_ref().map(value_object));
    set_or_remove(dict, "DV", field.default_value.as_ref().map(value_object));
    set_or_remove(
        dict,
        "DA",
        field.default_appearance.as_deref().map(encode_pdf_string),
    );
    set_or_remove(
        dict,
        "Q",
        field.justification.map(|q| Object::Integer(q.quadding())),
    );
    set_or_remove(
        dict,
        "MaxLen",
        field.max_len.map(|n| Object::Integer(i64::from(n))),
    );

    let options = (!field.options.is_empty()).then(|| {
        Object::Array(
            field
                .options
                .iter()
                .map(|opt| {
                    if opt.export == opt.display {
                        encode_pdf_string(&opt.display)
                    } else {
                        Object::Array(vec![
                            encode_pdf_string(&opt.export),
                            encode_pdf_string(&opt.display),
                        ])
                    }
                })
                .collect(),
        )
    });
    set_or_remove(dict, "Opt", options);
    set_or_remove(
        dict,
        "TI",
        field.top_index.map(|ti| Object::Integer(ti as i64)),
    );
    let selected = (!field.selected_indices.is_empty()).then(|| {
        Object::Array(
            field
                .selected_indices
                .iter()
                .map(|&i| Object::Integer(i as i64))
                .collect(),
        )
    });
    set_or_remove(dict, "I", selected);
    set_or_remove(
        dict,
        "Parent",
        field
            .parent
            .map(|parent| Object::Reference(field_objects[parent.index()])),
    );

    let mut kids = Vec::with_capacity(field.kids.len());
    for kid in &field.kids {
        match *kid {
            Kid::Field(id) => kids.push(Object::Reference(field_objects[id.index()])),
            Kid::Widget(id) => {
                if !tree.widget(id)?.merged {
                    kids.push(Object::Reference(widget_objects[id.index()]));
                }
            }
        }
    }
    set_or_remove(dict, "Kids", (!kids.is_empty()).then_some(Object::Array(kids)));
    Ok(())
}

fn characteristics_object(
    mk: &AppearanceCharacteristics,
    icon: Option<&XObjectRef>,
) -> Option<Object> {
    let mut dict = Dictionary::new();
    if let Some(bg) = &mk.background {
        dict.set("BG", color_object(bg));
    }
    if let Some(bc) = &mk.border_color {
        dict.set("BC", color_object(bc));
    }
    if mk.rotation != 0 {
        dict.set("R", Object::Integer(i64::from(mk.rotation)));
    }
    if let Some(caption) = &mk.caption {
        dict.set("CA", encode_pdf_string(caption));
    }
    if let Some(icon) = icon {
        dict.set("I", Object::Reference(object_id(icon.object)));
    }
    (!dict.is_empty()).then_some(Object::Dictionary(dict))
}

fn border_object(border: &BorderStyle) -> Object {
    let style = match border.kind {
        BorderKind::Solid => "S",
        BorderKind::Dashed { .. } => "D",
        BorderKind::Beveled => "B",
        BorderKind::Inset => "I",
        BorderKind::Underline => "U",
    };
    let mut dict = dictionary! {
        "Type" => "Border",
        "W" => number(border.width),
        "S" => name_object(style),
    };
    if let BorderKind::Dashed { on, off } = border.kind {
        dict.set("D", Object::Array(vec![number(on), number(off)]));
    }
    Object::Dictionary(dict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acroform_core::{AppearanceDict, ContentOp, RadioRole};
    use lopdf::Document;

    /// Create a minimal valid PDF document with the given number of pages.
    fn create_test_pdf(page_count: usize) -> Vec<u8> {
        let mut doc = LopdfDocument::new(&vec![Page::letter(); page_count]);
        LopdfBackend::save(&mut doc).expect("failed to save test PDF")
    }

    /// A one-page form with a hierarchical text field, a checkbox, a radio
    /// group with two widget kids and a combo box.
    fn create_test_pdf_with_form() -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Rotate" => Object::Integer(90),
        });
        let helv = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let state = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), 20.into(), 20.into()],
            },
            Vec::new(),
        ));

        let person_id = doc.new_object_id();
        let name_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "T" => Object::string_literal("name"),
            "FT" => "Tx",
            "V" => Object::string_literal("John"),
            "Q" => Object::Integer(1),
            "MaxLen" => Object::Integer(10),
            "Rect" => vec![50.into(), 700.into(), 200.into(), 720.into()],
            "P" => Object::Reference(page_id),
            "Parent" => Object::Reference(person_id),
        });
        doc.objects.insert(
            person_id,
            Object::Dictionary(dictionary! {
                "T" => Object::string_literal("person"),
                "DA" => Object::string_literal("/Helv 0 Tf 0 0 1 rg"),
                "Kids" => vec![Object::Reference(name_id)],
            }),
        );

        let agree_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "T" => Object::string_literal("agree"),
            "FT" => "Btn",
            "V" => "Yes",
            "AS" => "Yes",
            "Rect" => vec![50.into(), 650.into(), 70.into(), 670.into()],
            "MK" => dictionary! { "CA" => Object::string_literal("8") },
            "AP" => dictionary! { "N" => dictionary! { "Yes" => state, "Off" => state } },
            "P" => Object::Reference(page_id),
        });

        let choice_id = doc.new_object_id();
        let mut radio_kids = Vec::new();
        for (state_name, x) in [("a", 50), ("b", 80)] {
            let mut states = Dictionary::new();
            states.set(state_name, Object::Reference(state));
            states.set("Off", Object::Reference(state));
            radio_kids.push(doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Widget",
                "Parent" => Object::Reference(choice_id),
                "Rect" => vec![x.into(), 600.into(), (x + 20).into(), 620.into()],
                "AS" => "Off",
                "AP" => dictionary! { "N" => states },
            }));
        }
        doc.objects.insert(
            choice_id,
            Object::Dictionary(dictionary! {
                "T" => Object::string_literal("choice"),
                "FT" => "Btn",
                "Ff" => Object::Integer(49152),
                "Kids" => radio_kids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            }),
        );

        let country_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "T" => Object::string_literal("country"),
            "FT" => "Ch",
            "Ff" => Object::Integer(1 << 17),
            "V" => Object::string_literal("UK"),
            "Opt" => vec![
                Object::Array(vec![Object::string_literal("US"), Object::string_literal("United States")]),
                Object::string_literal("UK"),
            ],
            "Rect" => vec![50.into(), 550.into(), 200.into(), 570.into()],
            "P" => Object::Reference(page_id),
        });

        let mut annots = vec![Object::Reference(name_id), Object::Reference(agree_id)];
        annots.extend(radio_kids.iter().map(|id| Object::Reference(*id)));
        annots.push(Object::Reference(country_id));
        doc.get_object_mut(page_id)
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .set("Annots", annots);

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => Object::Integer(1),
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "AcroForm" => dictionary! {
                "Fields" => vec![
                    Object::Reference(person_id),
                    Object::Reference(agree_id),
                    Object::Reference(choice_id),
                    Object::Reference(country_id),
                ],
                "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
                "DR" => dictionary! { "Font" => dictionary! { "Helv" => helv } },
            },
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("failed to save test PDF");
        buf
    }

    fn open_form() -> LopdfDocument {
        LopdfBackend::open(&create_test_pdf_with_form()).unwrap()
    }

    #[test]
    fn open_reports_page_count() {
        let doc = LopdfBackend::open(&create_test_pdf(3)).unwrap();
        assert_eq!(LopdfBackend::page_count(&doc), 3);
        assert!(format!("{doc:?}").contains("page_count: 3"));
    }

    #[test]
    fn open_rejects_garbage() {
        let err = LopdfBackend::open(b"not a pdf").unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
    }

    #[test]
    fn page_geometry_and_rotation() {
        let doc = open_form();
        let page = LopdfBackend::page(&doc, 0).unwrap();
        assert_eq!(page.media_box, Rect::new(0.0, 0.0, 612.0, 792.0));
        assert_eq!(page.rotation, 90);

        let err = LopdfBackend::page(&doc, 1).unwrap_err();
        assert!(matches!(err, BackendError::Core(FormError::UnknownPage(1))));
    }

    #[test]
    fn new_document_keeps_page_rotation() {
        let mut doc = LopdfDocument::new(&[Page::new(Rect::new(0.0, 0.0, 300.0, 400.0), 270)]);
        let bytes = LopdfBackend::save(&mut doc).unwrap();
        let reopened = LopdfBackend::open(&bytes).unwrap();
        let page = LopdfBackend::page(&reopened, 0).unwrap();
        assert_eq!(page.rotation, 270);
        assert_eq!(page.media_box.width(), 300.0);
    }

    #[test]
    fn form_defaults_read_da_and_fonts() {
        let doc = open_form();
        let defaults = LopdfBackend::form_defaults(&doc).unwrap();
        assert_eq!(defaults.default_appearance.as_deref(), Some("/Helv 0 Tf 0 g"));
        assert_eq!(defaults.resources.get("Helv").map(|f| f.name()), Some("Helvetica"));
    }

    #[test]
    fn document_without_form_has_empty_tree() {
        let doc = LopdfBackend::open(&create_test_pdf(1)).unwrap();
        assert!(LopdfBackend::load_fields(&doc).unwrap().is_empty());
        let defaults = LopdfBackend::form_defaults(&doc).unwrap();
        assert!(defaults.default_appearance.is_none());
        assert!(defaults.resources.is_empty());
    }

    #[test]
    fn load_hierarchical_text_field() {
        let doc = open_form();
        let defaults = LopdfBackend::form_defaults(&doc).unwrap();
        let tree = LopdfBackend::load_fields(&doc).unwrap();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.roots().len(), 4);

        let name = tree.find_by_name("person.name").unwrap();
        assert_eq!(tree.value(name), Some(&FieldValue::Text("John".into())));
        assert_eq!(tree.justification(name), Some(Justification::Center));
        assert_eq!(tree.max_len(name), Some(10));
        assert_eq!(
            tree.default_appearance(name, &defaults),
            Some("/Helv 0 Tf 0 0 1 rg")
        );

        let widgets = tree.widgets(name);
        assert_eq!(widgets.len(), 1);
        let widget = tree.widget(widgets[0]).unwrap();
        assert!(widget.merged);
        assert_eq!(widget.page, Some(0));
        assert_eq!(widget.rect, Some(Rect::new(50.0, 700.0, 200.0, 720.0)));
    }

    #[test]
    fn load_checkbox_state_and_symbol() {
        let doc = open_form();
        let tree = LopdfBackend::load_fields(&doc).unwrap();
        let agree = tree.find_by_name("agree").unwrap();
        assert_eq!(tree.kind(agree), Some(FieldKind::Button(ButtonKind::Checkbox)));
        assert_eq!(tree.field(agree).unwrap().check_type, CheckType::Cross);

        let widget = tree.widget(tree.widgets(agree)[0]).unwrap();
        assert_eq!(widget.on_state.as_deref(), Some("Yes"));
        assert_eq!(widget.appearance_state.as_deref(), Some("Yes"));
        assert_eq!(widget.characteristics.caption.as_deref(), Some("8"));
    }

    #[test]
    fn load_radio_group_widgets() {
        let doc = open_form();
        let tree = LopdfBackend::load_fields(&doc).unwrap();
        let choice = tree.find_by_name("choice").unwrap();
        assert_eq!(tree.kind(choice), Some(FieldKind::Button(ButtonKind::Radio)));
        assert_eq!(tree.radio_role(choice), RadioRole::GroupRoot);
        assert!(tree.field_flag(choice, FieldFlags::NO_TOGGLE_TO_OFF));

        let states: Vec<_> = tree
            .widgets(choice)
            .into_iter()
            .map(|w| tree.widget(w).unwrap())
            .map(|w| (w.on_state.clone(), w.merged, w.page))
            .collect();
        assert_eq!(
            states,
            vec![
                (Some("a".to_string()), false, Some(0)),
                (Some("b".to_string()), false, Some(0)),
            ]
        );
    }

    #[test]
    fn load_choice_options() {
        let doc = open_form();
        let tree = LopdfBackend::load_fields(&doc).unwrap();
        let country = tree.find_by_name("country").unwrap();
        assert_eq!(tree.kind(country), Some(FieldKind::Choice(acroform_core::ChoiceKind::Combo)));
        assert_eq!(
            tree.field(country).unwrap().options,
            vec![
                ChoiceOption::new("US", "United States"),
                ChoiceOption::plain("UK"),
            ]
        );
    }

    fn text_appearance(font: FontRef) -> AppearanceDict {
        let mut fonts = BTreeMap::new();
        fonts.insert("Helv".to_string(), font);
        AppearanceDict::stream(AppearanceStream {
            bbox: Rect::from_size(150.0, 20.0),
            fonts,
            ops: vec![
                ContentOp::BeginText,
                ContentOp::SetFont {
                    name: "Helv".into(),
                    size: 12.0,
                },
                ContentOp::ShowText(b"Jane".to_vec()),
                ContentOp::EndText,
            ],
            ..Default::default()
        })
    }

    #[test]
    fn write_updates_existing_field_in_place() {
        let mut doc = open_form();
        let defaults = LopdfBackend::form_defaults(&doc).unwrap();
        let mut tree = LopdfBackend::load_fields(&doc).unwrap();
        let name = tree.find_by_name("person.name").unwrap();
        let original_object = tree.field(name).unwrap().object;
        tree.set_value(name, FieldValue::Text("Jane".into())).unwrap();
        let widget = tree.widgets(name)[0];
        let helv = defaults.resources.get("Helv").cloned().unwrap();
        tree.widget_mut(widget).unwrap().appearance = Some(Arc::new(text_appearance(helv)));

        LopdfBackend::write_form(&mut doc, &tree, &defaults).unwrap();
        let bytes = LopdfBackend::save(&mut doc).unwrap();

        let reopened = LopdfBackend::open(&bytes).unwrap();
        let tree = LopdfBackend::load_fields(&reopened).unwrap();
        assert_eq!(tree.len(), 5);
        let name = tree.find_by_name("person.name").unwrap();
        assert_eq!(tree.field(name).unwrap().object, original_object);
        assert_eq!(tree.value(name), Some(&FieldValue::Text("Jane".into())));

        let pdf = reopened.inner();
        let dict = pdf
            .get_object(object_id(original_object.unwrap()))
            .unwrap()
            .as_dict()
            .unwrap();
        let ap = dict_get(pdf, dict, b"AP").unwrap().as_dict().unwrap();
        let Object::Stream(stream) = dict_get(pdf, ap, b"N").unwrap() else {
            panic!("normal appearance is not a stream");
        };
        let bbox = dict_get(pdf, &stream.dict, b"BBox").unwrap().as_array().unwrap();
        assert_eq!(extract_rect_from_array(bbox).unwrap(), Rect::from_size(150.0, 20.0));

        // The /DR Helvetica object is reused by the appearance resources
        let acroform = acroform_dict(pdf).unwrap();
        let dr_fonts = dict_get(pdf, acroform, b"DR")
            .and_then(|o| o.as_dict().ok())
            .and_then(|dr| dr.get(b"Font").ok())
            .and_then(|o| o.as_dict().ok())
            .unwrap();
        let resources = dict_get(pdf, &stream.dict, b"Resources").unwrap().as_dict().unwrap();
        let ap_fonts = dict_get(pdf, resources, b"Font").unwrap().as_dict().unwrap();
        assert_eq!(
            ap_fonts.get(b"Helv").unwrap().as_reference().unwrap(),
            dr_fonts.get(b"Helv").unwrap().as_reference().unwrap()
        );
    }

    #[test]
    fn write_new_form_into_blank_document() {
        let mut doc = LopdfDocument::new(&[Page::letter()]);
        let mut tree = FieldTree::new();
        let text = tree.add_root(Field::new("comment", FieldType::Text).with_value(FieldValue::Text("Grüße 日本".into())));
        tree.add_widget(text, Widget::new(Rect::new(10.0, 10.0, 110.0, 30.0)).on_page(0).merged())
            .unwrap();
        let radio = tree.add_root(
            Field::new("size", FieldType::Button)
                .with_flags(FieldFlags::empty().with(FieldFlags::RADIO)),
        );
        for (state, x) in [("S", 10.0), ("L", 40.0)] {
            tree.add_widget(
                radio,
                Widget::new(Rect::new(x, 50.0, x + 20.0, 70.0)).on_page(0).with_on_state(state),
            )
            .unwrap();
        }
        let mut defaults = FormDefaults {
            default_appearance: Some("/Helv 0 Tf 0 g".into()),
            ..Default::default()
        };
        defaults.resources.insert("Helv", StandardFont::helvetica());

        LopdfBackend::write_form(&mut doc, &tree, &defaults).unwrap();
        let bytes = LopdfBackend::save(&mut doc).unwrap();

        let reopened = LopdfBackend::open(&bytes).unwrap();
        let loaded = LopdfBackend::load_fields(&reopened).unwrap();
        assert_eq!(loaded.len(), 2);
        let comment = loaded.find_by_name("comment").unwrap();
        assert_eq!(
            loaded.value(comment),
            Some(&FieldValue::Text("Grüße 日本".into()))
        );
        let size = loaded.find_by_name("size").unwrap();
        let widgets = loaded.widgets(size);
        assert_eq!(widgets.len(), 2);
        assert!(widgets.iter().all(|w| !loaded.widget(*w).unwrap().merged));

        let defaults = LopdfBackend::form_defaults(&reopened).unwrap();
        assert_eq!(defaults.resources.get("Helv").map(|f| f.name()), Some("Helvetica"));

        let pdf = reopened.inner();
        let page = pdf.get_object(reopened.page_ids[0]).unwrap().as_dict().unwrap();
        let annots = dict_get(pdf, page, b"Annots").unwrap().as_array().unwrap();
        assert_eq!(annots.len(), 3);
    }

    #[test]
    fn rewriting_does_not_duplicate_annotations() {
        let mut doc = open_form();
        let defaults = LopdfBackend::form_defaults(&doc).unwrap();
        let tree = LopdfBackend::load_fields(&doc).unwrap();
        LopdfBackend::write_form(&mut doc, &tree, &defaults).unwrap();
        LopdfBackend::write_form(&mut doc, &tree, &defaults).unwrap();

        let pdf = doc.inner();
        let page = pdf.get_object(doc.page_ids[0]).unwrap().as_dict().unwrap();
        let annots = dict_get(pdf, page, b"Annots").unwrap().as_array().unwrap();
        assert_eq!(annots.len(), 5);
    }

    #[test]
    fn border_style_round_trip() {
        let border = BorderStyle {
            width: 2.0,
            kind: BorderKind::Dashed { on: 4.0, off: 2.0 },
        };
        let mut dict = Dictionary::new();
        dict.set("BS", border_object(&border));
        let doc = Document::with_version("1.7");
        assert_eq!(read_border(&doc, &dict), border);
    }

    #[test]
    fn widget_rotation_snaps_to_quadrants() {
        assert_eq!(quadrant_rotation(90), 90);
        assert_eq!(quadrant_rotation(-90), 270);
        assert_eq!(quadrant_rotation(450), 90);
        assert_eq!(quadrant_rotation(45), 0);

        let mk = dictionary! { "R" => 45 };
        let doc = lopdf::Document::with_version("1.7");
        assert_eq!(read_characteristics(&doc, &mk).rotation, 0);
    }

    #[test]
    fn legacy_border_array_sets_width() {
        let mut dict = Dictionary::new();
        dict.set("Border", vec![0.into(), 0.into(), 3.into()]);
        let doc = Document::with_version("1.7");
        assert_eq!(read_border(&doc, &dict).width, 3.0);
    }

    #[test]
    fn pdf_strings_round_trip() {
        for text in ["plain", "Ünïcödé", "日本語", ""] {
            let Object::String(bytes, _) = encode_pdf_string(text) else {
                panic!("not a string");
            };
            assert_eq!(decode_pdf_string(&bytes), text);
        }
        assert_eq!(decode_pdf_string(&[0xEF, 0xBB, 0xBF, 0x41]), "A");
    }
}
