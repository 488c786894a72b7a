//! Widget background and border drawing.

use acroform_core::{BorderKind, Color, ContentBuilder, Widget};

/// Border width that is actually drawn: zero without a border color.
pub(crate) fn border_width(widget: &Widget) -> f64 {
    if widget.characteristics.border_color.is_some() {
        widget.border.width.max(0.0)
    } else {
        0.0
    }
}

fn stroke_style(b: &mut ContentBuilder, widget: &Widget, color: Color, width: f64) {
    b.stroke_color(color).line_width(width.max(1.0));
    if let BorderKind::Dashed { on, off } = widget.border.kind {
        b.dash(vec![on, off], 0.0);
    }
}

/// Fill the background and stroke the border of a rectangular widget.
///
/// The border is inset by half its width so it stays inside the box.
pub(crate) fn draw_box(b: &mut ContentBuilder, widget: &Widget, width: f64, height: f64) {
    let mk = &widget.characteristics;
    if let Some(background) = mk.background {
        b.fill_color(background)
            .rectangle(0.0, 0.0, width, height)
            .fill();
    }
    let bw = border_width(widget);
    if let Some(color) = mk.border_color.filter(|_| bw > 0.0) {
        b.save_state();
        stroke_style(b, widget, color, bw);
        let half = bw / 2.0;
        b.rectangle(half, half, width - bw, height - bw).stroke();
        b.restore_state();
    }
}

/// Round variant used by radio buttons.
pub(crate) fn draw_round(b: &mut ContentBuilder, widget: &Widget, width: f64, height: f64) {
    let mk = &widget.characteristics;
    let (cx, cy) = (width / 2.0, height / 2.0);
    let radius = width.min(height) / 2.0;
    if let Some(background) = mk.background {
        b.fill_color(background).circle(cx, cy, radius).fill();
    }
    let bw = border_width(widget);
    if let Some(color) = mk.border_color.filter(|_| bw > 0.0) {
        b.save_state();
        stroke_style(b, widget, color, bw);
        b.circle(cx, cy, (width.min(height) - bw) / 2.0).stroke();
        b.restore_state();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acroform_core::{AppearanceCharacteristics, BorderStyle, ContentOp, Rect};

    fn widget(bg: Option<Color>, border: Option<Color>, style: BorderStyle) -> Widget {
        Widget::new(Rect::new(0.0, 0.0, 100.0, 20.0))
            .with_characteristics(AppearanceCharacteristics {
                background: bg,
                border_color: border,
                ..Default::default()
            })
            .with_border(style)
    }

    #[test]
    fn no_colors_draw_nothing() {
        let mut b = ContentBuilder::new();
        draw_box(&mut b, &widget(None, None, BorderStyle::default()), 100.0, 20.0);
        assert!(b.is_empty());
    }

    #[test]
    fn border_is_inset_by_half_width() {
        let mut b = ContentBuilder::new();
        let style = BorderStyle {
            width: 2.0,
            kind: BorderKind::Solid,
        };
        draw_box(&mut b, &widget(Some(Color::WHITE), Some(Color::BLACK), style), 100.0, 20.0);
        assert!(b.ops().contains(&ContentOp::Rectangle {
            x: 1.0,
            y: 1.0,
            width: 98.0,
            height: 18.0
        }));
        assert!(b.ops().contains(&ContentOp::LineWidth(2.0)));
        assert_eq!(b.ops()[0], ContentOp::FillColor(Color::WHITE));
    }

    #[test]
    fn dashed_border_sets_dash_pattern() {
        let mut b = ContentBuilder::new();
        let style = BorderStyle {
            width: 0.5,
            kind: BorderKind::Dashed { on: 3.0, off: 1.0 },
        };
        draw_box(&mut b, &widget(None, Some(Color::BLACK), style), 100.0, 20.0);
        assert!(b.ops().contains(&ContentOp::Dash {
            array: vec![3.0, 1.0],
            phase: 0.0
        }));
        assert!(b.ops().contains(&ContentOp::LineWidth(1.0)));
    }

    #[test]
    fn zero_width_border_is_not_stroked() {
        let mut b = ContentBuilder::new();
        let style = BorderStyle {
            width: 0.0,
            kind: BorderKind::Solid,
        };
        draw_box(&mut b, &widget(None, Some(Color::BLACK), style), 100.0, 20.0);
        assert!(!b.ops().contains(&ContentOp::Stroke));
    }
}
