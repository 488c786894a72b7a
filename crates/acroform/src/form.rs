//! The [`Form`] model: field tree, form defaults and pages.

use std::sync::Arc;

use acroform_core::{
    AppearanceOptions, ButtonKind, Color, FieldId, FieldKind, FieldTree, FieldValue, FontRef,
    FontSize, FormDefaults, FormError, Page, RadioRole,
};
use acroform_parse::da;

use crate::appearance::{self, Context, WidgetUpdate};

/// An interactive form and the pages its widgets sit on.
///
/// Field mutators that take a `regenerate` flag, and the style setters,
/// rebuild the affected appearance streams immediately. Regeneration is
/// all-or-nothing per call: every appearance is computed before any widget
/// is touched, so an error leaves the previous appearances in place.
#[derive(Debug, Clone, Default)]
pub struct Form {
    tree: FieldTree,
    defaults: FormDefaults,
    pages: Vec<Page>,
    options: AppearanceOptions,
}

impl Form {
    /// An empty form over `pages`.
    pub fn new(pages: Vec<Page>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    /// A form over an already loaded field tree.
    pub fn from_parts(tree: FieldTree, defaults: FormDefaults, pages: Vec<Page>) -> Self {
        Self {
            tree,
            defaults,
            pages,
            options: AppearanceOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AppearanceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn tree(&self) -> &FieldTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut FieldTree {
        &mut self.tree
    }

    pub fn defaults(&self) -> &FormDefaults {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut FormDefaults {
        &mut self.defaults
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn options(&self) -> &AppearanceOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut AppearanceOptions {
        &mut self.options
    }

    /// Look a field up by fully qualified name (`parent.kid`).
    pub fn field_by_name(&self, name: &str) -> Option<FieldId> {
        self.tree.find_by_name(name)
    }

    /// Set the value of a field.
    ///
    /// Non-button values are pushed down to descendant fields. For a radio
    /// kid the value is stored on its group root so the whole group is
    /// reconciled.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] if `id` is unknown, or if `regenerate` is set and
    /// an affected appearance cannot be built.
    pub fn set_value(
        &mut self,
        id: FieldId,
        value: FieldValue,
        regenerate: bool,
    ) -> Result<(), FormError> {
        let target = match self.tree.radio_role(id) {
            RadioRole::RadioChild => self.tree.parent(id).unwrap_or(id),
            _ => id,
        };
        let affected = self.tree.set_value(target, value)?;
        tracing::debug!(
            field = %self.tree.fully_qualified_name(target),
            affected = affected.len(),
            "value set"
        );
        if regenerate {
            self.regenerate(target)?;
        }
        Ok(())
    }

    /// Override the font of a field and rewrite its DA string to match.
    ///
    /// The font is registered in the form resources if it is not there yet.
    pub fn set_font(&mut self, id: FieldId, font: FontRef) -> Result<(), FormError> {
        self.tree.field_mut(id)?.font = Some(Arc::clone(&font));
        self.defaults.resources.add(&font);
        self.sync_default_appearance(id)?;
        self.regenerate(id)
    }

    /// Override the font size of a field; [`FontSize::Auto`] fits the box.
    pub fn set_font_size(&mut self, id: FieldId, size: FontSize) -> Result<(), FormError> {
        self.tree.field_mut(id)?.font_size = Some(size);
        self.sync_default_appearance(id)?;
        self.regenerate(id)
    }

    /// Override the text color of a field.
    pub fn set_color(&mut self, id: FieldId, color: Color) -> Result<(), FormError> {
        self.tree.field_mut(id)?.color = Some(color);
        self.sync_default_appearance(id)?;
        self.regenerate(id)
    }

    /// Rotate every widget of a field (`/MK /R`).
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidRotation`] unless `degrees` is a multiple
    /// of 90.
    pub fn set_rotation(&mut self, id: FieldId, degrees: i32) -> Result<(), FormError> {
        if degrees % 90 != 0 {
            return Err(FormError::InvalidRotation(degrees));
        }
        for widget in self.tree.widgets(id) {
            self.tree.widget_mut(widget)?.characteristics.rotation = degrees.rem_euclid(360);
        }
        self.regenerate(id)
    }

    /// Set or clear one 1-based field flag bit and regenerate.
    pub fn set_field_flag(&mut self, id: FieldId, bit: u32, value: bool) -> Result<(), FormError> {
        self.tree.set_field_flag(id, bit, value)?;
        self.regenerate(id)
    }

    /// Rebuild the appearances controlled by `id`.
    ///
    /// A radio group root is rebuilt as a whole. Any other non-terminal
    /// field regenerates its terminal descendants.
    pub fn regenerate(&mut self, id: FieldId) -> Result<(), FormError> {
        let mut updates = Vec::new();
        self.collect_updates(id, &mut updates)?;
        self.apply(updates)
    }

    /// Rebuild every appearance in the form.
    pub fn regenerate_all(&mut self) -> Result<(), FormError> {
        let _span = tracing::info_span!("regenerate_all", fields = self.tree.len()).entered();
        let mut updates = Vec::new();
        for &root in self.tree.roots() {
            self.collect_updates(root, &mut updates)?;
        }
        self.apply(updates)
    }

    fn context(&self) -> Context<'_> {
        Context {
            tree: &self.tree,
            defaults: &self.defaults,
            pages: &self.pages,
            options: &self.options,
        }
    }

    fn collect_updates(&self, id: FieldId, out: &mut Vec<WidgetUpdate>) -> Result<(), FormError> {
        self.tree.field(id)?;
        let is_radio = self.tree.kind(id) == Some(FieldKind::Button(ButtonKind::Radio));
        if is_radio && self.tree.radio_role(id) == RadioRole::GroupRoot {
            out.extend(appearance::synthesize(&self.context(), id)?);
            return Ok(());
        }
        if self.tree.is_terminal(id) {
            out.extend(appearance::synthesize(&self.context(), id)?);
            return Ok(());
        }
        let kids: Vec<FieldId> = self.tree.field(id)?.field_kids().collect();
        for kid in kids {
            self.collect_updates(kid, out)?;
        }
        Ok(())
    }

    fn apply(&mut self, updates: Vec<WidgetUpdate>) -> Result<(), FormError> {
        for update in updates {
            let widget = self.tree.widget_mut(update.widget)?;
            widget.appearance = Some(Arc::new(update.appearance));
            widget.appearance_state = update.state;
            if update.print {
                widget.flags = widget.flags.with(acroform_core::AnnotationFlags::PRINT);
            }
        }
        Ok(())
    }

    /// Rewrite the local DA string from the resolved style.
    fn sync_default_appearance(&mut self, id: FieldId) -> Result<(), FormError> {
        let style = appearance::resolve_style(&self.context(), id)?;
        let resource = self
            .defaults
            .resources
            .name_of(&style.font)
            .unwrap_or_else(|| style.resource.clone());
        let da_string = da::format_da(&resource, style.size.value(), Some(style.color));
        tracing::trace!(da = %da_string, "default appearance rewritten");
        self.tree.field_mut(id)?.default_appearance = Some(da_string);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acroform_core::{
        AppearanceEntry, ConformanceLevel, Field, FieldFlags, FieldType, Rect, Widget,
    };
    use acroform_parse::StandardFont;

    fn form_with_text() -> (Form, FieldId) {
        let mut form = Form::new(vec![Page::letter()]);
        let id = form.tree_mut().add_root(
            Field::new("name", FieldType::Text).with_default_appearance("/Helv 10 Tf 0 g"),
        );
        form.tree_mut()
            .add_widget(id, Widget::new(Rect::new(10.0, 10.0, 110.0, 30.0)).on_page(0))
            .unwrap();
        (form, id)
    }

    #[test]
    fn set_value_regenerates() {
        let (mut form, id) = form_with_text();
        form.set_value(id, FieldValue::Text("Ada".into()), true).unwrap();
        let widget = form.tree().widget(form.tree().widgets(id)[0]).unwrap();
        let appearance = widget.appearance.as_ref().unwrap();
        assert!(matches!(appearance.normal, AppearanceEntry::Stream(_)));
    }

    #[test]
    fn set_value_without_regenerate_keeps_appearance() {
        let (mut form, id) = form_with_text();
        form.set_value(id, FieldValue::Text("Ada".into()), false).unwrap();
        let widget = form.tree().widget(form.tree().widgets(id)[0]).unwrap();
        assert!(widget.appearance.is_none());
    }

    #[test]
    fn failed_regeneration_leaves_widgets_untouched() {
        let (mut form, id) = form_with_text();
        form.regenerate(id).unwrap();
        let broken = form.tree_mut().add_root(
            Field::new("other", FieldType::Text).with_default_appearance("/Missing 10 Tf"),
        );
        form.tree_mut()
            .add_widget(broken, Widget::new(Rect::new(0.0, 0.0, 10.0, 10.0)))
            .unwrap();
        let before = form.tree().widget(form.tree().widgets(id)[0]).unwrap().appearance.clone();
        form.tree_mut().field_mut(id).unwrap().value = Some(FieldValue::Text("new".into()));

        let err = form.regenerate_all().unwrap_err();
        assert!(err.is_resource());
        let after = form.tree().widget(form.tree().widgets(id)[0]).unwrap().appearance.clone();
        assert!(Arc::ptr_eq(before.as_ref().unwrap(), after.as_ref().unwrap()));
    }

    #[test]
    fn rotation_must_be_a_right_angle() {
        let (mut form, id) = form_with_text();
        assert_eq!(form.set_rotation(id, 45), Err(FormError::InvalidRotation(45)));
        form.set_rotation(id, -90).unwrap();
        let widget = form.tree().widget(form.tree().widgets(id)[0]).unwrap();
        assert_eq!(widget.characteristics.rotation, 270);
        let stream = widget.appearance.as_ref().unwrap().normal.as_stream().unwrap();
        assert_eq!(stream.bbox.width(), 20.0);
    }

    #[test]
    fn style_setters_rewrite_default_appearance() {
        let (mut form, id) = form_with_text();
        form.set_font(id, StandardFont::zapf_dingbats()).unwrap();
        form.set_font_size(id, FontSize::Auto).unwrap();
        form.set_color(id, Color::Rgb(0.0, 0.0, 1.0)).unwrap();
        let da = form.tree().field(id).unwrap().default_appearance.clone();
        assert_eq!(da.as_deref(), Some("/F1 0 Tf 0 0 1 rg"));
        assert!(form.defaults().resources.get("F1").is_some());
    }

    #[test]
    fn radio_kid_value_goes_to_group() {
        let mut form = Form::new(vec![Page::letter()]);
        let flags = FieldFlags::empty().with(FieldFlags::RADIO);
        let root = form
            .tree_mut()
            .add_root(Field::new("pick", FieldType::Button).with_flags(flags));
        let mut kids = Vec::new();
        for (i, state) in ["one", "two"].into_iter().enumerate() {
            let kid = form.tree_mut().add_kid(root, Field::group(state)).unwrap();
            let x = 20.0 * i as f64;
            form.tree_mut()
                .add_widget(
                    kid,
                    Widget::new(Rect::new(x, 0.0, x + 10.0, 10.0))
                        .merged()
                        .with_on_state(state),
                )
                .unwrap();
            kids.push(kid);
        }

        form.set_value(kids[1], FieldValue::Name("two".into()), true).unwrap();
        assert_eq!(form.tree().value(root), Some(&FieldValue::Name("two".into())));
        let states: Vec<_> = form
            .tree()
            .all_widgets(root)
            .into_iter()
            .map(|w| form.tree().widget(w).unwrap().appearance_state.clone())
            .collect();
        assert_eq!(states, vec![Some("Off".into()), Some("two".into())]);
    }

    #[test]
    fn conformance_sets_print_flag() {
        let (form, id) = form_with_text();
        let mut form = form.with_options(AppearanceOptions {
            conformance: Some(ConformanceLevel::PdfA1b),
            ..AppearanceOptions::default()
        });
        form.regenerate(id).unwrap();
        let widget = form.tree().widget(form.tree().widgets(id)[0]).unwrap();
        assert!(widget.flags.contains(acroform_core::AnnotationFlags::PRINT));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let (mut form, _) = form_with_text();
        let mut other = FieldTree::new();
        other.add_root(Field::group("a"));
        let stray = other.add_root(Field::group("b"));
        assert!(form.regenerate(stray).is_err());
    }
}
