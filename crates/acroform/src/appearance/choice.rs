//! Combo box and list box appearances.

use acroform_core::{
    AppearanceDict, ChoiceKind, ChoiceOption, ContentBuilder, FieldId, FieldValue, FormError,
};

use super::border::draw_box;
use super::text::{draw_multiline, draw_single_line};
use super::{
    Context, WidgetUpdate, conformance, inherited_override, resolve_style, widget_frames,
};

pub(super) fn synthesize(
    ctx: &Context<'_>,
    id: FieldId,
    kind: ChoiceKind,
) -> Result<Vec<WidgetUpdate>, FormError> {
    let tree = ctx.tree;
    let style = resolve_style(ctx, id)?;
    let justification = tree.justification(id).unwrap_or_default();
    let options: Vec<ChoiceOption> =
        inherited_override(tree, id, |f| (!f.options.is_empty()).then(|| f.options.clone()))
            .unwrap_or_default();
    let value = tree.value(id);
    let print = conformance(ctx, id).is_some();

    let frames = widget_frames(ctx, id, &tree.widgets(id))?;
    let mut updates = Vec::with_capacity(frames.len());
    for (widget_id, widget, frame) in frames {
        let mut b = ContentBuilder::new();
        draw_box(&mut b, widget, frame.width, frame.height);
        match kind {
            ChoiceKind::Combo => {
                let text = display_text(&options, value);
                draw_single_line(&mut b, ctx, &style, &frame, &text, justification, None, true);
            }
            ChoiceKind::List => {
                let field = tree.field(id)?;
                let top = field.top_index.unwrap_or(0).min(options.len());
                let selected = selected_indices(&field.selected_indices, &options, value);
                let visible: Vec<String> =
                    options[top..].iter().map(|o| o.display.clone()).collect();
                let relative: Vec<usize> = selected
                    .into_iter()
                    .filter_map(|index| index.checked_sub(top))
                    .collect();
                draw_multiline(&mut b, ctx, &style, &frame, &visible, &relative, justification);
            }
        }
        updates.push(WidgetUpdate {
            widget: widget_id,
            appearance: AppearanceDict::stream(frame.stream(b, style.fonts())),
            state: None,
            print,
        });
    }
    Ok(updates)
}

/// Text shown by a combo box: the display string of the selected option,
/// or the raw value for editable combos with a custom entry.
fn display_text(options: &[ChoiceOption], value: Option<&FieldValue>) -> String {
    let Some(value) = value.and_then(FieldValue::as_str) else {
        return String::new();
    };
    options
        .iter()
        .find(|o| o.export == value)
        .map(|o| o.display.clone())
        .unwrap_or_else(|| value.to_string())
}

/// Absolute option indices to highlight.
///
/// An explicit `/I` array wins; otherwise every option whose export value is
/// selected by `/V` is highlighted.
fn selected_indices(
    explicit: &[usize],
    options: &[ChoiceOption],
    value: Option<&FieldValue>,
) -> Vec<usize> {
    if !explicit.is_empty() {
        return explicit.to_vec();
    }
    let Some(value) = value else {
        return Vec::new();
    };
    options
        .iter()
        .enumerate()
        .filter(|(_, o)| value.matches(&o.export))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Fixture, shown_text};
    use super::*;
    use acroform_core::{AppearanceStream, Color, ContentOp, Field, FieldFlags, FieldType, Rect, Widget};

    fn choice(fx: &mut Fixture, field: Field, rect: Rect) -> FieldId {
        let id = fx.tree.add_root(field);
        fx.tree.add_widget(id, Widget::new(rect)).unwrap();
        id
    }

    fn countries() -> Vec<ChoiceOption> {
        vec![
            ChoiceOption::new("de", "Germany"),
            ChoiceOption::new("fr", "France"),
            ChoiceOption::plain("Italy"),
            ChoiceOption::plain("Spain"),
        ]
    }

    fn stream(updates: &[WidgetUpdate]) -> &AppearanceStream {
        updates[0].appearance.normal.as_stream().unwrap()
    }

    #[test]
    fn combo_shows_display_string() {
        let mut fx = Fixture::new();
        let field = Field::new("country", FieldType::Choice)
            .with_flags(FieldFlags::empty().with(FieldFlags::COMBO))
            .with_options(countries())
            .with_value(FieldValue::Text("fr".into()));
        let id = choice(&mut fx, field, Rect::new(0.0, 0.0, 120.0, 20.0));
        let updates = synthesize(&fx.ctx(), id, ChoiceKind::Combo).unwrap();
        assert_eq!(shown_text(stream(&updates)), vec![b"France".to_vec()]);
    }

    #[test]
    fn combo_with_custom_value_shows_raw_value() {
        let mut fx = Fixture::new();
        let field = Field::new("country", FieldType::Choice)
            .with_flags(FieldFlags::empty().with(FieldFlags::COMBO).with(FieldFlags::EDIT))
            .with_options(countries())
            .with_value(FieldValue::Text("Atlantis".into()));
        let id = choice(&mut fx, field, Rect::new(0.0, 0.0, 120.0, 20.0));
        let updates = synthesize(&fx.ctx(), id, ChoiceKind::Combo).unwrap();
        assert_eq!(shown_text(stream(&updates)), vec![b"Atlantis".to_vec()]);
    }

    #[test]
    fn list_highlights_selection_relative_to_top_index() {
        let mut fx = Fixture::new();
        let mut field = Field::new("list", FieldType::Choice)
            .with_default_appearance("/Helv 10 Tf 0 g")
            .with_options(countries())
            .with_value(FieldValue::Text("Italy".into()));
        field.top_index = Some(1);
        let id = choice(&mut fx, field, Rect::new(0.0, 0.0, 120.0, 60.0));
        let updates = synthesize(&fx.ctx(), id, ChoiceKind::List).unwrap();
        let stream = stream(&updates);

        assert_eq!(
            shown_text(stream),
            vec![b"France".to_vec(), b"Italy".to_vec(), b"Spain".to_vec()]
        );
        let highlight = fx.options.highlight_color;
        let bar = stream
            .ops
            .iter()
            .position(|op| *op == ContentOp::FillColor(highlight))
            .unwrap();
        // Italy is the second visible line.
        let ContentOp::Rectangle { y, height, .. } = stream.ops[bar + 1] else {
            panic!("highlight color not followed by a bar");
        };
        let first_baseline = 60.0 - 3.0 - 7.18;
        assert!((y - (first_baseline - 10.0 - 2.07)).abs() < 1e-9);
        assert_eq!(height, 10.0);
        assert!(stream.ops.contains(&ContentOp::FillColor(Color::LIGHT_GRAY)));
    }

    #[test]
    fn explicit_selected_indices_win() {
        let options = countries();
        let value = FieldValue::Text("de".into());
        assert_eq!(selected_indices(&[3], &options, Some(&value)), vec![3]);
        assert_eq!(selected_indices(&[], &options, Some(&value)), vec![0]);
        let multi = FieldValue::Choices(vec!["fr".into(), "Spain".into()]);
        assert_eq!(selected_indices(&[], &options, Some(&multi)), vec![1, 3]);
        assert!(selected_indices(&[], &options, None).is_empty());
    }
}
