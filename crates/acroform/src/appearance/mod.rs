//! Appearance synthesis, one module per field variant.
//!
//! Synthesis reads the field tree immutably and returns a list of
//! [`WidgetUpdate`]s; [`Form`](crate::Form) swaps them into the widgets
//! afterwards. A failing field therefore leaves every widget untouched.

mod border;
mod checkbox;
mod choice;
mod push_button;
mod radio;
mod text;

use std::collections::BTreeMap;

use acroform_core::{
    AppearanceDict, AppearanceOptions, AppearanceStream, ButtonKind, Color, ConformanceLevel,
    ContentBuilder, Field, FieldId, FieldKind, FieldTree, FontRef, FontSize, FormDefaults,
    FormError, Matrix, Page, Rect, Widget, WidgetId, compute_transform,
};
use acroform_parse::StandardFont;
use acroform_parse::da;

/// Ancestor chains are cut off at this depth.
const MAX_OVERRIDE_DEPTH: usize = 64;

/// Everything synthesis reads.
#[derive(Clone, Copy)]
pub(crate) struct Context<'a> {
    pub tree: &'a FieldTree,
    pub defaults: &'a FormDefaults,
    pub pages: &'a [Page],
    pub options: &'a AppearanceOptions,
}

/// A freshly built appearance for one widget.
#[derive(Debug)]
pub(crate) struct WidgetUpdate {
    pub widget: WidgetId,
    pub appearance: AppearanceDict,
    /// New `/AS`; `None` removes it.
    pub state: Option<String>,
    /// Set the Print annotation flag.
    pub print: bool,
}

/// Build appearances for every widget that renders field `id`.
///
/// Signature fields keep their signer-supplied appearance and yield no
/// updates. Fields without a type (pure groups) yield no updates either.
pub(crate) fn synthesize(ctx: &Context<'_>, id: FieldId) -> Result<Vec<WidgetUpdate>, FormError> {
    let Some(kind) = ctx.tree.kind(id) else {
        tracing::debug!(field = %ctx.tree.fully_qualified_name(id), "field has no type, nothing to draw");
        return Ok(Vec::new());
    };
    let _span = tracing::debug_span!("synthesize", field = %ctx.tree.fully_qualified_name(id), ?kind)
        .entered();
    match kind {
        FieldKind::Text => text::synthesize(ctx, id),
        FieldKind::Choice(kind) => choice::synthesize(ctx, id, kind),
        FieldKind::Button(ButtonKind::Checkbox) => checkbox::synthesize(ctx, id),
        FieldKind::Button(ButtonKind::Radio) => radio::synthesize(ctx, id),
        FieldKind::Button(ButtonKind::Push) => push_button::synthesize(ctx, id),
        FieldKind::Signature => {
            tracing::debug!("signature appearance is supplied by the signer");
            Ok(Vec::new())
        }
    }
}

/// Font, size and color a field's text is drawn with.
#[derive(Debug, Clone)]
pub(crate) struct TextStyle {
    pub font: FontRef,
    /// Resource name the font is bound to in the appearance stream.
    pub resource: String,
    pub size: FontSize,
    pub color: Color,
}

impl TextStyle {
    pub fn fonts(&self) -> BTreeMap<String, FontRef> {
        BTreeMap::from([(self.resource.clone(), self.font.clone())])
    }
}

/// First value of `local` on `id` or one of its ancestors.
pub(crate) fn inherited_override<T>(
    tree: &FieldTree,
    id: FieldId,
    local: impl Fn(&Field) -> Option<T>,
) -> Option<T> {
    let mut current = Some(id);
    for _ in 0..MAX_OVERRIDE_DEPTH {
        let field = tree.field(current?).ok()?;
        if let Some(value) = local(field) {
            return Some(value);
        }
        current = field.parent;
    }
    None
}

/// Look a DA font name up in the form resources, then among the standard
/// fonts by alias or base name.
pub(crate) fn resolve_font(defaults: &FormDefaults, name: &str) -> Result<FontRef, FormError> {
    if let Some(font) = defaults.resources.get(name) {
        return Ok(font.clone());
    }
    if let Some(font) = defaults.resources.find_base_font(name) {
        return Ok(font.clone());
    }
    StandardFont::from_alias(name)
        .map(StandardFont::into_ref)
        .ok_or_else(|| FormError::FontError(format!("font /{name} is not in the form resources")))
}

/// Resolve the text style of `id`.
///
/// Local overrides (font, size, color) win over the inherited DA string.
/// Without a DA font, Helvetica is used; an unset size falls back to the
/// configured default size.
pub(crate) fn resolve_style(ctx: &Context<'_>, id: FieldId) -> Result<TextStyle, FormError> {
    let tree = ctx.tree;
    let decoded = tree
        .default_appearance(id, ctx.defaults)
        .map(da::decode)
        .unwrap_or_default();

    let (font, resource) = match inherited_override(tree, id, |f| f.font.clone()) {
        Some(font) => {
            let mut resources = ctx.defaults.resources.clone();
            let resource = resources.add(&font);
            (font, resource)
        }
        None => match &decoded.font_name {
            Some(name) => (resolve_font(ctx.defaults, name)?, name.clone()),
            None => (StandardFont::helvetica(), "Helv".to_string()),
        },
    };

    let size = inherited_override(tree, id, |f| f.font_size)
        .or(decoded.size())
        .unwrap_or(FontSize::Fixed(ctx.options.default_font_size));
    let color = inherited_override(tree, id, |f| f.color)
        .or(decoded.color)
        .unwrap_or(Color::BLACK);

    Ok(TextStyle {
        font,
        resource,
        size,
        color,
    })
}

/// Conformance level of the field, or the form-wide default.
pub(crate) fn conformance(ctx: &Context<'_>, id: FieldId) -> Option<ConformanceLevel> {
    inherited_override(ctx.tree, id, |f| f.conformance).or(ctx.options.conformance)
}

/// Appearance-space geometry of one widget.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub bbox: Rect,
    pub matrix: Matrix,
    pub width: f64,
    pub height: f64,
    pub border_width: f64,
}

impl Frame {
    pub fn stream(&self, content: ContentBuilder, fonts: BTreeMap<String, FontRef>) -> AppearanceStream {
        AppearanceStream {
            bbox: self.bbox,
            matrix: self.matrix,
            fonts,
            xobjects: BTreeMap::new(),
            ops: content.into_ops(),
        }
    }
}

/// Frames of the widgets that have a rectangle.
///
/// Widgets without a rectangle are skipped; if none has one the field is
/// malformed.
pub(crate) fn widget_frames<'a>(
    ctx: &Context<'a>,
    id: FieldId,
    widgets: &[WidgetId],
) -> Result<Vec<(WidgetId, &'a Widget, Frame)>, FormError> {
    let mut frames = Vec::with_capacity(widgets.len());
    for &widget_id in widgets {
        let widget = ctx.tree.widget(widget_id)?;
        let Some(rect) = widget.rect else {
            tracing::warn!(widget = widget_id.index(), "widget has no rectangle, skipping");
            continue;
        };
        let page_rotation = widget
            .page
            .and_then(|p| ctx.pages.get(p))
            .map(|p| p.rotation)
            .unwrap_or(0);
        let transform = compute_transform(&rect, page_rotation, widget.characteristics.rotation);
        frames.push((
            widget_id,
            widget,
            Frame {
                bbox: transform.bbox,
                matrix: transform.matrix,
                width: transform.bbox.width(),
                height: transform.bbox.height(),
                border_width: border::border_width(widget),
            },
        ));
    }
    if frames.is_empty() {
        return Err(FormError::MissingRect {
            field: ctx.tree.fully_qualified_name(id),
        });
    }
    Ok(frames)
}
