//! Radio button appearances and group state reconciliation.

use std::collections::BTreeMap;

use acroform_core::{
    AppearanceDict, ContentBuilder, FieldId, FormError, OFF_STATE, RadioRole,
};

use super::border::draw_round;
use super::checkbox::DEFAULT_ON_STATE;
use super::{Context, Frame, WidgetUpdate, conformance, resolve_style, widget_frames};

/// Build appearances for a radio field and reconcile `/AS` of the widgets
/// it controls against the group value.
///
/// A group root controls its own widgets and those of its kid fields; a
/// group kid and an unclassified radio field control their own widgets.
/// In every case the value is the inherited one, so a kid compares against
/// its group's selection.
pub(super) fn synthesize(ctx: &Context<'_>, id: FieldId) -> Result<Vec<WidgetUpdate>, FormError> {
    let tree = ctx.tree;
    let role = tree.radio_role(id);
    let widgets = match role {
        RadioRole::GroupRoot => tree.all_widgets(id),
        RadioRole::RadioChild | RadioRole::Other => tree.widgets(id),
    };
    tracing::trace!(?role, widgets = widgets.len(), "reconciling radio group");
    let style = resolve_style(ctx, id)?;
    let print = conformance(ctx, id).is_some();
    let value = tree.value(id);

    let frames = widget_frames(ctx, id, &widgets)?;
    Ok(frames
        .into_iter()
        .map(|(widget_id, widget, frame)| {
            let on_state = widget.on_state.as_deref().unwrap_or(DEFAULT_ON_STATE);
            let mut on = ContentBuilder::new();
            draw_round(&mut on, widget, frame.width, frame.height);
            draw_dot(&mut on, &frame, style.color);
            let mut off = ContentBuilder::new();
            draw_round(&mut off, widget, frame.width, frame.height);

            let states = BTreeMap::from([
                (on_state.to_string(), frame.stream(on, BTreeMap::new())),
                (OFF_STATE.to_string(), frame.stream(off, BTreeMap::new())),
            ]);
            let selected = value.is_some_and(|v| v.matches(on_state));
            WidgetUpdate {
                widget: widget_id,
                appearance: AppearanceDict::states(states),
                state: Some(if selected { on_state } else { OFF_STATE }.to_string()),
                print,
            }
        })
        .collect())
}

fn draw_dot(b: &mut ContentBuilder, frame: &Frame, color: acroform_core::Color) {
    let radius = frame.width.min(frame.height) / 4.0;
    b.save_state()
        .fill_color(color)
        .circle(frame.width / 2.0, frame.height / 2.0, radius)
        .fill()
        .restore_state();
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use acroform_core::{
        ContentOp, Field, FieldFlags, FieldType, FieldValue, Rect, Widget,
    };

    fn radio_flags() -> FieldFlags {
        FieldFlags::empty()
            .with(FieldFlags::RADIO)
            .with(FieldFlags::NO_TOGGLE_TO_OFF)
    }

    fn button(x: f64, state: &str) -> Widget {
        Widget::new(Rect::new(x, 0.0, x + 12.0, 12.0)).with_on_state(state)
    }

    #[test]
    fn group_root_reconciles_every_widget() {
        let mut fx = Fixture::new();
        let root = fx
            .tree
            .add_root(Field::new("choice", FieldType::Button).with_flags(radio_flags()));
        let a = fx.tree.add_widget(root, button(0.0, "a")).unwrap();
        let b = fx.tree.add_widget(root, button(20.0, "b")).unwrap();
        assert_eq!(fx.tree.radio_role(root), RadioRole::GroupRoot);

        fx.tree.field_mut(root).unwrap().value = Some(FieldValue::Name("b".into()));
        let updates = synthesize(&fx.ctx(), root).unwrap();
        let states: Vec<_> = updates
            .iter()
            .map(|u| (u.widget, u.state.clone()))
            .collect();
        assert_eq!(
            states,
            vec![(a, Some("Off".to_string())), (b, Some("b".to_string()))]
        );
        assert_eq!(updates[0].appearance.normal.state_names(), vec!["Off", "a"]);
    }

    #[test]
    fn kid_fields_compare_against_group_value() {
        let mut fx = Fixture::new();
        let root = fx.tree.add_root(
            Field::new("size", FieldType::Button)
                .with_flags(radio_flags())
                .with_value(FieldValue::Name("large".into())),
        );
        let small = fx.tree.add_kid(root, Field::group("s")).unwrap();
        fx.tree.add_widget(small, button(0.0, "small").merged()).unwrap();
        let large = fx.tree.add_kid(root, Field::group("l")).unwrap();
        let large_widget = fx.tree.add_widget(large, button(20.0, "large").merged()).unwrap();

        assert_eq!(fx.tree.radio_role(large), RadioRole::RadioChild);
        let updates = synthesize(&fx.ctx(), large).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].widget, large_widget);
        assert_eq!(updates[0].state.as_deref(), Some("large"));

        let updates = synthesize(&fx.ctx(), small).unwrap();
        assert_eq!(updates[0].state.as_deref(), Some("Off"));
    }

    #[test]
    fn on_state_has_a_dot() {
        let mut fx = Fixture::new();
        let root = fx.tree.add_root(
            Field::new("r", FieldType::Button)
                .with_flags(radio_flags())
                .with_value(FieldValue::Name("x".into())),
        );
        fx.tree.add_widget(root, button(0.0, "x")).unwrap();
        let updates = synthesize(&fx.ctx(), root).unwrap();
        let on = updates[0].appearance.normal.get("x").unwrap();
        let off = updates[0].appearance.normal.get("Off").unwrap();
        assert!(on.ops.contains(&ContentOp::Fill));
        assert!(!off.ops.contains(&ContentOp::Fill));
        assert!(on.fonts.is_empty());
    }
}
