//! Checkbox appearances: an on state and `Off`.

use std::collections::BTreeMap;

use acroform_core::{
    AppearanceDict, CheckType, Color, ContentBuilder, FieldId, FontRef, FontSize, FormError,
    OFF_STATE, fit_font_size,
};
use acroform_parse::StandardFont;

use super::border::draw_box;
use super::{Context, Frame, WidgetUpdate, conformance, inherited_override, resolve_style, widget_frames};

/// On-state name used when a widget does not declare one.
pub(super) const DEFAULT_ON_STATE: &str = "Yes";

pub(super) fn synthesize(ctx: &Context<'_>, id: FieldId) -> Result<Vec<WidgetUpdate>, FormError> {
    let tree = ctx.tree;
    let symbol = SymbolStyle::resolve(ctx, id)?;
    let check_type = tree.field(id)?.check_type;
    let vector = conformance(ctx, id).is_some();
    let value = tree.value(id);

    let frames = widget_frames(ctx, id, &tree.widgets(id))?;
    Ok(frames
        .into_iter()
        .map(|(widget_id, widget, frame)| {
            let on_state = widget.on_state.as_deref().unwrap_or(DEFAULT_ON_STATE);
            let mut on = ContentBuilder::new();
            draw_box(&mut on, widget, frame.width, frame.height);
            if vector {
                draw_vector_symbol(&mut on, &frame, check_type, symbol.color);
            } else {
                symbol.draw_glyph(&mut on, ctx, &frame, check_type.dingbat());
            }
            let mut off = ContentBuilder::new();
            draw_box(&mut off, widget, frame.width, frame.height);

            let fonts = if vector { BTreeMap::new() } else { symbol.fonts() };
            let states = BTreeMap::from([
                (on_state.to_string(), frame.stream(on, fonts)),
                (OFF_STATE.to_string(), frame.stream(off, BTreeMap::new())),
            ]);
            let checked = value.is_some_and(|v| v.matches(on_state));
            WidgetUpdate {
                widget: widget_id,
                appearance: AppearanceDict::states(states),
                state: Some(if checked { on_state } else { OFF_STATE }.to_string()),
                print: vector,
            }
        })
        .collect())
}

/// ZapfDingbats binding and size for the check glyph.
#[derive(Debug, Clone)]
struct SymbolStyle {
    font: FontRef,
    resource: String,
    size: FontSize,
    color: Color,
}

impl SymbolStyle {
    /// The glyph is always drawn with ZapfDingbats. A DA that already names
    /// a symbolic font keeps its resource name; size and color come from
    /// the field style.
    fn resolve(ctx: &Context<'_>, id: FieldId) -> Result<Self, FormError> {
        let style = resolve_style(ctx, id)?;
        let has_override = inherited_override(ctx.tree, id, |f| f.font.clone()).is_some();
        let (font, resource) = if style.font.is_symbolic() && !has_override {
            (style.font, style.resource)
        } else {
            (StandardFont::zapf_dingbats(), "ZaDb".to_string())
        };
        Ok(Self {
            font,
            resource,
            size: style.size,
            color: style.color,
        })
    }

    fn fonts(&self) -> BTreeMap<String, FontRef> {
        BTreeMap::from([(self.resource.clone(), self.font.clone())])
    }

    /// Centre the glyph by its width and the font ascent.
    fn draw_glyph(&self, b: &mut ContentBuilder, ctx: &Context<'_>, frame: &Frame, glyph: char) {
        let text = glyph.to_string();
        let font = self.font.as_ref();
        let size = match self.size {
            FontSize::Auto => fit_font_size(
                font,
                &frame.bbox,
                &text,
                frame.border_width,
                ctx.options.min_font_size,
            ),
            FontSize::Fixed(size) => size,
        };
        let x = (frame.width - font.width(&text, size)) / 2.0;
        let y = (frame.height - font.ascent() * size / font.units_per_em()) / 2.0;
        b.save_state()
            .begin_text()
            .fill_color(self.color)
            .set_font(self.resource.clone(), size)
            .move_text(x, y)
            .show_text(font.encode(&text))
            .end_text()
            .restore_state();
    }
}

/// Draw the check symbol with path primitives only, so the appearance does
/// not depend on an unembedded font.
pub(super) fn draw_vector_symbol(b: &mut ContentBuilder, frame: &Frame, check_type: CheckType, color: Color) {
    let bw = frame.border_width;
    let s = (frame.width.min(frame.height) - 2.0 * bw).max(0.0);
    let (cx, cy) = (frame.width / 2.0, frame.height / 2.0);
    b.save_state().fill_color(color).stroke_color(color);
    match check_type {
        CheckType::Check => {
            b.line_width(s / 8.0)
                .move_to(cx - 0.3 * s, cy)
                .line_to(cx - 0.1 * s, cy - 0.25 * s)
                .line_to(cx + 0.3 * s, cy + 0.25 * s)
                .stroke();
        }
        CheckType::Cross => {
            let d = 0.3 * s;
            b.line_width(s / 10.0)
                .move_to(cx - d, cy - d)
                .line_to(cx + d, cy + d)
                .move_to(cx - d, cy + d)
                .line_to(cx + d, cy - d)
                .stroke();
        }
        CheckType::Circle => {
            b.circle(cx, cy, s / 4.0).fill();
        }
        CheckType::Square => {
            b.rectangle(cx - s / 4.0, cy - s / 4.0, s / 2.0, s / 2.0).fill();
        }
        CheckType::Diamond => {
            let r = s / 3.0;
            b.move_to(cx, cy + r)
                .line_to(cx + r, cy)
                .line_to(cx, cy - r)
                .line_to(cx - r, cy)
                .close_path()
                .fill();
        }
        CheckType::Star => {
            let (outer, inner) = (s / 3.0, s / 7.5);
            for i in 0..10 {
                let r = if i % 2 == 0 { outer } else { inner };
                let angle = std::f64::consts::FRAC_PI_2 + f64::from(i) * std::f64::consts::PI / 5.0;
                let (x, y) = (cx + r * angle.cos(), cy + r * angle.sin());
                if i == 0 {
                    b.move_to(x, y);
                } else {
                    b.line_to(x, y);
                }
            }
            b.close_path().fill();
        }
    }
    b.restore_state();
}
