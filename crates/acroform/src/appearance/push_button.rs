//! Push button appearances: an image, an imported form, or a caption.

use std::collections::BTreeMap;

use acroform_core::{
    AppearanceDict, ContentBuilder, FieldId, FormError, Justification, Matrix, XObjectKind,
    XObjectRef,
};

use super::border::draw_box;
use super::text::draw_single_line;
use super::{Context, Frame, WidgetUpdate, conformance, resolve_style, widget_frames};

/// State name of the single appearance written under archival conformance.
pub(crate) const PUSH_STATE: &str = "push";

/// XObject resource name used for the button content.
const CONTENT_RESOURCE: &str = "Btn0";

pub(super) fn synthesize(ctx: &Context<'_>, id: FieldId) -> Result<Vec<WidgetUpdate>, FormError> {
    let tree = ctx.tree;
    let field = tree.field(id)?;
    let content = field.image.or(field.form);
    // Fonts are resolved for captions only.
    let style = match content {
        Some(_) => None,
        None => Some(resolve_style(ctx, id)?),
    };
    let conforming = conformance(ctx, id).is_some();

    let frames = widget_frames(ctx, id, &tree.widgets(id))?;
    let mut updates = Vec::with_capacity(frames.len());
    for (widget_id, widget, frame) in frames {
        let mut b = ContentBuilder::new();
        draw_box(&mut b, widget, frame.width, frame.height);
        let mut xobjects = BTreeMap::new();
        let mut fonts = BTreeMap::new();
        if let Some(xobject) = content {
            draw_xobject(&mut b, &frame, &xobject);
            xobjects.insert(CONTENT_RESOURCE.to_string(), xobject);
        } else if let (Some(style), Some(caption)) = (&style, &widget.characteristics.caption) {
            draw_single_line(&mut b, ctx, style, &frame, caption, Justification::Center, None, false);
            fonts = style.fonts();
        }
        let mut stream = frame.stream(b, fonts);
        stream.xobjects = xobjects;

        let (appearance, state) = if conforming {
            (
                AppearanceDict::states(BTreeMap::from([(PUSH_STATE.to_string(), stream)])),
                Some(PUSH_STATE.to_string()),
            )
        } else {
            (AppearanceDict::stream(stream), None)
        };
        updates.push(WidgetUpdate {
            widget: widget_id,
            appearance,
            state,
            print: conforming,
        });
    }
    Ok(updates)
}

/// Scale the XObject to fit inside the border, keeping its aspect ratio,
/// and centre it.
fn draw_xobject(b: &mut ContentBuilder, frame: &Frame, xobject: &XObjectRef) {
    if xobject.width <= 0.0 || xobject.height <= 0.0 {
        tracing::warn!(?xobject, "button content has no size, not drawn");
        return;
    }
    let bw = frame.border_width;
    let available_w = (frame.width - 2.0 * bw).max(0.0);
    let available_h = (frame.height - 2.0 * bw).max(0.0);
    let scale = (available_w / xobject.width).min(available_h / xobject.height);
    let (w, h) = (xobject.width * scale, xobject.height * scale);
    let (x, y) = ((frame.width - w) / 2.0, (frame.height - h) / 2.0);
    // Images paint into the unit square, forms into their own bbox.
    let matrix = match xobject.kind {
        XObjectKind::Image => Matrix::new(w, 0.0, 0.0, h, x, y),
        XObjectKind::Form => Matrix::new(scale, 0.0, 0.0, scale, x, y),
    };
    b.save_state()
        .transform(matrix)
        .paint_xobject(CONTENT_RESOURCE)
        .restore_state();
}
