//! Arena field tree with attribute inheritance.
//!
//! Fields and widgets live in two vectors and refer to each other by index.
//! The parent link is a plain [`FieldId`], so inherited attributes are
//! resolved by walking indices instead of following shared pointers.

use crate::error::FormError;
use crate::field::{ButtonKind, Field, FieldKind, FieldType, FieldValue, Justification, Kid, Widget};
use crate::flags::FieldFlags;
use crate::font::FontResources;

/// Parent chains longer than this are treated as cycles.
const MAX_INHERITANCE_DEPTH: usize = 64;

/// Index of a field in a [`FieldTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(usize);

impl FieldId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Index of a widget in a [`FieldTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(usize);

impl WidgetId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Form-level defaults: the AcroForm `/DA` and `/DR /Font`.
#[derive(Debug, Clone, Default)]
pub struct FormDefaults {
    pub default_appearance: Option<String>,
    pub resources: FontResources,
}

/// Attributes that [`FieldTree::resolve`] can look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    FieldType,
    Flags,
    Value,
    DefaultValue,
    DefaultAppearance,
    Justification,
    MaxLen,
}

/// A resolved attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    FieldType(FieldType),
    Flags(FieldFlags),
    Value(FieldValue),
    DefaultValue(FieldValue),
    DefaultAppearance(String),
    Justification(Justification),
    MaxLen(u32),
}

/// Structural role of a radio button field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioRole {
    /// Owns the group value and reconciles every sibling widget.
    GroupRoot,
    /// A widget-merged kid of a group.
    RadioChild,
    /// Not recognised as either.
    Other,
}

/// Owner of all fields and widgets of one form.
#[derive(Debug, Clone, Default)]
pub struct FieldTree {
    fields: Vec<Field>,
    widgets: Vec<Widget>,
    roots: Vec<FieldId>,
}

impl FieldTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level field (an entry of the AcroForm `/Fields` array).
    pub fn add_root(&mut self, mut field: Field) -> FieldId {
        let id = FieldId(self.fields.len());
        field.parent = None;
        field.kids.clear();
        self.fields.push(field);
        self.roots.push(id);
        id
    }

    /// Add `field` as the last kid of `parent`.
    pub fn add_kid(&mut self, parent: FieldId, mut field: Field) -> Result<FieldId, FormError> {
        self.field(parent)?;
        let id = FieldId(self.fields.len());
        field.parent = Some(parent);
        field.kids.clear();
        self.fields.push(field);
        self.fields[parent.0].kids.push(Kid::Field(id));
        Ok(id)
    }

    /// Attach a widget annotation as the last kid of `field`.
    pub fn add_widget(&mut self, field: FieldId, mut widget: Widget) -> Result<WidgetId, FormError> {
        self.field(field)?;
        let id = WidgetId(self.widgets.len());
        widget.field = Some(field);
        self.widgets.push(widget);
        self.fields[field.0].kids.push(Kid::Widget(id));
        Ok(id)
    }

    pub fn field(&self, id: FieldId) -> Result<&Field, FormError> {
        self.fields.get(id.0).ok_or(FormError::UnknownField(id.0))
    }

    pub fn field_mut(&mut self, id: FieldId) -> Result<&mut Field, FormError> {
        self.fields.get_mut(id.0).ok_or(FormError::UnknownField(id.0))
    }

    pub fn widget(&self, id: WidgetId) -> Result<&Widget, FormError> {
        self.widgets.get(id.0).ok_or(FormError::UnknownWidget(id.0))
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Result<&mut Widget, FormError> {
        self.widgets.get_mut(id.0).ok_or(FormError::UnknownWidget(id.0))
    }

    pub fn roots(&self) -> &[FieldId] {
        &self.roots
    }

    /// All field ids in insertion order.
    pub fn field_ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        (0..self.fields.len()).map(FieldId)
    }

    /// All widget ids in insertion order.
    pub fn widget_ids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        (0..self.widgets.len()).map(WidgetId)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn parent(&self, id: FieldId) -> Option<FieldId> {
        self.fields.get(id.0).and_then(|f| f.parent)
    }

    /// A terminal field has no field kids, only widgets.
    pub fn is_terminal(&self, id: FieldId) -> bool {
        self.fields
            .get(id.0)
            .is_some_and(|f| f.field_kids().next().is_none())
    }

    /// Widgets that are direct kids of `id`.
    pub fn widgets(&self, id: FieldId) -> Vec<WidgetId> {
        self.fields
            .get(id.0)
            .map(|f| f.widget_kids().collect())
            .unwrap_or_default()
    }

    /// Widgets of `id` and of all its descendant fields, depth-first.
    pub fn all_widgets(&self, id: FieldId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        self.collect_widgets(id, 0, &mut out);
        out
    }

    fn collect_widgets(&self, id: FieldId, depth: usize, out: &mut Vec<WidgetId>) {
        let Some(field) = self.fields.get(id.0) else {
            return;
        };
        if depth > MAX_INHERITANCE_DEPTH {
            return;
        }
        for kid in &field.kids {
            match *kid {
                Kid::Widget(w) => out.push(w),
                Kid::Field(f) => self.collect_widgets(f, depth + 1, out),
            }
        }
    }

    /// Descendant fields of `id` (excluding `id`), depth-first.
    pub fn descendants(&self, id: FieldId) -> Vec<FieldId> {
        let mut out = Vec::new();
        let mut stack: Vec<(FieldId, usize)> = vec![(id, 0)];
        while let Some((current, depth)) = stack.pop() {
            if depth > MAX_INHERITANCE_DEPTH {
                continue;
            }
            let Some(field) = self.fields.get(current.0) else {
                continue;
            };
            if depth > 0 {
                out.push(current);
            }
            let kids: Vec<FieldId> = field.field_kids().collect();
            for kid in kids.into_iter().rev() {
                stack.push((kid, depth + 1));
            }
        }
        out
    }

    /// Walk `id` and its ancestors, returning the first local value.
    fn inherited<'a, T>(
        &'a self,
        id: FieldId,
        local: impl Fn(&'a Field) -> Option<&'a T>,
    ) -> Option<&'a T> {
        let mut current = Some(id);
        for _ in 0..=MAX_INHERITANCE_DEPTH {
            let field = self.fields.get(current?.0)?;
            if let Some(value) = local(field) {
                return Some(value);
            }
            current = field.parent;
        }
        tracing::warn!(field = id.0, "field parent chain too deep, assuming a cycle");
        None
    }

    /// Resolve an inheritable attribute for `id`.
    ///
    /// The default appearance falls back to the form-level value.
    pub fn resolve(
        &self,
        attribute: Attribute,
        id: FieldId,
        defaults: &FormDefaults,
    ) -> Option<AttributeValue> {
        match attribute {
            Attribute::FieldType => self.field_type(id).map(AttributeValue::FieldType),
            Attribute::Flags => self
                .inherited(id, |f| f.flags.as_ref())
                .copied()
                .map(AttributeValue::Flags),
            Attribute::Value => self.value(id).cloned().map(AttributeValue::Value),
            Attribute::DefaultValue => self
                .inherited(id, |f| f.default_value.as_ref())
                .cloned()
                .map(AttributeValue::DefaultValue),
            Attribute::DefaultAppearance => self
                .default_appearance(id, defaults)
                .map(|da| AttributeValue::DefaultAppearance(da.to_string())),
            Attribute::Justification => self.justification(id).map(AttributeValue::Justification),
            Attribute::MaxLen => self.max_len(id).map(AttributeValue::MaxLen),
        }
    }

    pub fn field_type(&self, id: FieldId) -> Option<FieldType> {
        self.inherited(id, |f| f.field_type.as_ref()).copied()
    }

    /// Inherited flags; zero when no ancestor defines `/Ff`.
    pub fn flags(&self, id: FieldId) -> FieldFlags {
        self.inherited(id, |f| f.flags.as_ref())
            .copied()
            .unwrap_or_default()
    }

    /// Replace the field's local flags.
    pub fn set_flags(&mut self, id: FieldId, flags: FieldFlags) -> Result<(), FormError> {
        self.field_mut(id)?.flags = Some(flags);
        Ok(())
    }

    /// Whether a 1-based flag bit is set in the inherited flags.
    pub fn field_flag(&self, id: FieldId, bit: u32) -> bool {
        self.flags(id).contains(bit)
    }

    /// Set one flag bit, materialising the inherited flags locally.
    pub fn set_field_flag(&mut self, id: FieldId, bit: u32, value: bool) -> Result<(), FormError> {
        let mut flags = self.flags(id);
        flags.set(bit, value)?;
        self.set_flags(id, flags)
    }

    pub fn kind(&self, id: FieldId) -> Option<FieldKind> {
        self.field_type(id)
            .map(|ft| FieldKind::classify(ft, self.flags(id)))
    }

    /// Inherited `/V`.
    pub fn value(&self, id: FieldId) -> Option<&FieldValue> {
        self.inherited(id, |f| f.value.as_ref())
    }

    /// Set `/V` on `id`, returning every field whose appearance is affected.
    ///
    /// Non-button fields push the value down to all descendant fields first.
    /// Button groups keep kid values untouched because the group value names
    /// the selected kid. Choice fields get `/I` rebuilt from the new value.
    pub fn set_value(&mut self, id: FieldId, value: FieldValue) -> Result<Vec<FieldId>, FormError> {
        self.field(id)?;
        let field_type = self.field_type(id);
        let mut affected = Vec::new();
        if field_type != Some(FieldType::Button) {
            affected = self.descendants(id);
        }
        affected.insert(0, id);
        for &field in &affected {
            if field_type == Some(FieldType::Choice) {
                let selected = self.option_indices(field, &value);
                self.fields[field.0].selected_indices = selected;
            }
            self.fields[field.0].value = Some(value.clone());
        }
        Ok(affected)
    }

    /// Indices of the inherited options whose export value `value` selects.
    fn option_indices(&self, id: FieldId, value: &FieldValue) -> Vec<usize> {
        self.inherited(id, |f| (!f.options.is_empty()).then_some(&f.options))
            .map(|options| {
                options
                    .iter()
                    .enumerate()
                    .filter(|(_, o)| value.matches(&o.export))
                    .map(|(i, _)| i)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Inherited default appearance, falling back to the form default.
    pub fn default_appearance<'a>(&'a self, id: FieldId, defaults: &'a FormDefaults) -> Option<&'a str> {
        self.inherited(id, |f| f.default_appearance.as_ref())
            .or(defaults.default_appearance.as_ref())
            .map(String::as_str)
    }

    /// Inherited `/Q`; `None` when no ancestor defines it.
    pub fn justification(&self, id: FieldId) -> Option<Justification> {
        self.inherited(id, |f| f.justification.as_ref()).copied()
    }

    pub fn max_len(&self, id: FieldId) -> Option<u32> {
        self.inherited(id, |f| f.max_len.as_ref()).copied()
    }

    /// Dot-joined partial names from the root down to `id`.
    ///
    /// Ancestors without a partial name contribute no segment.
    pub fn fully_qualified_name(&self, id: FieldId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        let mut depth = 0;
        while let Some(cid) = current {
            let Some(field) = self.fields.get(cid.0) else {
                break;
            };
            if let Some(name) = &field.partial_name {
                segments.push(name.as_str());
            }
            current = field.parent;
            depth += 1;
            if depth > MAX_INHERITANCE_DEPTH {
                break;
            }
        }
        segments.reverse();
        segments.join(".")
    }

    /// Look a field up by its fully qualified name.
    pub fn find_by_name(&self, name: &str) -> Option<FieldId> {
        self.field_ids()
            .find(|&id| self.fully_qualified_name(id) == name)
    }

    /// Whether the field shares its dictionary with one of its widgets.
    fn is_widget_merged(&self, id: FieldId) -> bool {
        self.widgets(id)
            .iter()
            .any(|w| self.widgets.get(w.0).is_some_and(|w| w.merged))
    }

    /// Classify a radio button field structurally.
    ///
    /// A widget-merged field is a group kid when it has a parent and its own
    /// group root otherwise. A field with no local `/V` whose first kid is a
    /// widget (or a widget-merged field) is a group root.
    pub fn radio_role(&self, id: FieldId) -> RadioRole {
        if self.kind(id) != Some(FieldKind::Button(ButtonKind::Radio)) {
            return RadioRole::Other;
        }
        let Some(field) = self.fields.get(id.0) else {
            return RadioRole::Other;
        };
        if self.is_widget_merged(id) {
            return if field.parent.is_some() {
                RadioRole::RadioChild
            } else {
                RadioRole::GroupRoot
            };
        }
        if field.value.is_none() {
            let first_is_widget = match field.kids.first() {
                Some(Kid::Widget(_)) => true,
                Some(Kid::Field(kid)) => self.is_widget_merged(*kid),
                None => false,
            };
            if first_is_widget {
                return RadioRole::GroupRoot;
            }
        }
        RadioRole::Other
    }
}
