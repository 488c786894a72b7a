//! JSON form description consumed by `acroform render`.
//!
//! ```json
//! {
//!   "pages": [{ "width": 612, "height": 792 }],
//!   "default_appearance": "/Helv 0 Tf 0 g",
//!   "fields": [
//!     { "name": "name", "type": "text", "value": "Ada",
//!       "widgets": [{ "rect": [72, 700, 272, 720] }] }
//!   ]
//! }
//! ```

use acroform::{
    AppearanceCharacteristics, AppearanceOptions, BorderKind, BorderStyle, ChoiceOption, Color,
    Field, FieldFlags, FieldId, FieldType, FieldValue, Form, Justification, Page, Rect, Widget,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormFile {
    #[serde(default = "default_pages")]
    pub pages: Vec<PageEntry>,
    /// Form-wide DA string (`/AcroForm /DA`).
    #[serde(default)]
    pub default_appearance: Option<String>,
    #[serde(default)]
    pub options: AppearanceOptions,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageEntry {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: i32,
}

fn default_pages() -> Vec<PageEntry> {
    vec![PageEntry {
        width: 612.0,
        height: 792.0,
        rotation: 0,
    }]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKindName {
    Text,
    Checkbox,
    Radio,
    Push,
    Combo,
    List,
    Signature,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignName {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ValueEntry {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OptionEntry {
    Plain(String),
    Pair([String; 2]),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    pub name: String,
    /// Omitted for pure grouping fields.
    #[serde(rename = "type", default)]
    pub kind: Option<FieldKindName>,
    #[serde(default)]
    pub value: Option<ValueEntry>,
    #[serde(default)]
    pub da: Option<String>,
    #[serde(default)]
    pub align: Option<AlignName>,
    #[serde(default)]
    pub multiline: bool,
    #[serde(default)]
    pub password: bool,
    #[serde(default)]
    pub comb: bool,
    #[serde(default)]
    pub max_len: Option<u32>,
    #[serde(default)]
    pub options: Vec<OptionEntry>,
    #[serde(default)]
    pub top_index: Option<usize>,
    #[serde(default)]
    pub widgets: Vec<WidgetEntry>,
    #[serde(default)]
    pub kids: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetEntry {
    pub rect: [f64; 4],
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub on_state: Option<String>,
    #[serde(default)]
    pub background: Option<Vec<f64>>,
    #[serde(default)]
    pub border_color: Option<Vec<f64>>,
    #[serde(default)]
    pub border_width: Option<f64>,
    /// On/off dash lengths.
    #[serde(default)]
    pub dash: Option<[f64; 2]>,
    #[serde(default)]
    pub rotation: i32,
    #[serde(default)]
    pub caption: Option<String>,
}

impl FormFile {
    pub fn pages(&self) -> Vec<Page> {
        self.pages
            .iter()
            .map(|p| Page::new(Rect::new(0.0, 0.0, p.width, p.height), p.rotation))
            .collect()
    }

    /// Populate `form` with the described fields.
    pub fn populate(&self, form: &mut Form) -> Result<(), String> {
        form.defaults_mut().default_appearance = self.default_appearance.clone();
        *form.options_mut() = self.options.clone();
        let page_count = self.pages.len();
        for entry in &self.fields {
            let id = form.tree_mut().add_root(entry.field(None)?);
            entry.add_children(form, id, entry.kind, page_count)?;
        }
        Ok(())
    }
}

impl FieldEntry {
    fn field(&self, inherited: Option<FieldKindName>) -> Result<Field, String> {
        let mut field = match self.kind {
            Some(kind) => Field::new(self.name.clone(), field_type(kind)),
            None => Field::group(self.name.clone()),
        };
        let kind = self.kind.or(inherited);
        let mut flags = FieldFlags::empty();
        match self.kind {
            Some(FieldKindName::Radio) => {
                flags = flags.with(FieldFlags::RADIO).with(FieldFlags::NO_TOGGLE_TO_OFF)
            }
            Some(FieldKindName::Push) => flags = flags.with(FieldFlags::PUSH_BUTTON),
            Some(FieldKindName::Combo) => flags = flags.with(FieldFlags::COMBO),
            _ => {}
        }
        if self.multiline {
            flags = flags.with(FieldFlags::MULTILINE);
        }
        if self.password {
            flags = flags.with(FieldFlags::PASSWORD);
        }
        if self.comb {
            flags = flags.with(FieldFlags::COMB);
        }
        if matches!(&self.value, Some(ValueEntry::Many(_))) && kind == Some(FieldKindName::List) {
            flags = flags.with(FieldFlags::MULTI_SELECT);
        }
        if flags != FieldFlags::empty() {
            field = field.with_flags(flags);
        }

        if let Some(value) = &self.value {
            field = field.with_value(field_value(value, kind)?);
        }
        if let Some(da) = &self.da {
            field = field.with_default_appearance(da.clone());
        }
        if let Some(align) = self.align {
            field = field.with_justification(match align {
                AlignName::Left => Justification::Left,
                AlignName::Center => Justification::Center,
                AlignName::Right => Justification::Right,
            });
        }
        if let Some(max_len) = self.max_len {
            field = field.with_max_len(max_len);
        }
        if !self.options.is_empty() {
            field = field.with_options(
                self.options
                    .iter()
                    .map(|o| match o {
                        OptionEntry::Plain(value) => ChoiceOption::plain(value.clone()),
                        OptionEntry::Pair([export, display]) => {
                            ChoiceOption::new(export.clone(), display.clone())
                        }
                    })
                    .collect(),
            );
        }
        field.top_index = self.top_index;
        Ok(field)
    }

    fn add_children(
        &self,
        form: &mut Form,
        id: FieldId,
        inherited: Option<FieldKindName>,
        page_count: usize,
    ) -> Result<(), String> {
        let kind = self.kind.or(inherited);
        // A lone widget shares the field dictionary.
        let merged = self.widgets.len() == 1 && self.kids.is_empty();
        for widget in &self.widgets {
            if widget.page >= page_count {
                return Err(format!(
                    "field '{}': widget page {} exceeds page count ({page_count})",
                    self.name, widget.page
                ));
            }
            let mut built = widget.widget()?;
            if merged {
                built = built.merged();
            }
            form.tree_mut()
                .add_widget(id, built)
                .map_err(|e| e.to_string())?;
        }
        for kid in &self.kids {
            let kid_id = form
                .tree_mut()
                .add_kid(id, kid.field(kind)?)
                .map_err(|e| e.to_string())?;
            kid.add_children(form, kid_id, kind, page_count)?;
        }
        Ok(())
    }
}

impl WidgetEntry {
    fn widget(&self) -> Result<Widget, String> {
        let [llx, lly, urx, ury] = self.rect;
        let mut widget = Widget::new(Rect::new(llx, lly, urx, ury))
            .on_page(self.page)
            .with_characteristics(AppearanceCharacteristics {
                background: self.background.as_deref().map(color).transpose()?,
                border_color: self.border_color.as_deref().map(color).transpose()?,
                rotation: self.rotation,
                caption: self.caption.clone(),
            });
        if self.border_width.is_some() || self.dash.is_some() {
            widget = widget.with_border(BorderStyle {
                width: self.border_width.unwrap_or(1.0),
                kind: match self.dash {
                    Some([on, off]) => BorderKind::Dashed { on, off },
                    None => BorderKind::Solid,
                },
            });
        }
        if let Some(state) = &self.on_state {
            widget = widget.with_on_state(state.clone());
        }
        Ok(widget)
    }
}

fn field_type(kind: FieldKindName) -> FieldType {
    match kind {
        FieldKindName::Text => FieldType::Text,
        FieldKindName::Checkbox | FieldKindName::Radio | FieldKindName::Push => FieldType::Button,
        FieldKindName::Combo | FieldKindName::List => FieldType::Choice,
        FieldKindName::Signature => FieldType::Signature,
    }
}

fn field_value(value: &ValueEntry, kind: Option<FieldKindName>) -> Result<FieldValue, String> {
    let is_button = matches!(
        kind,
        Some(FieldKindName::Checkbox | FieldKindName::Radio | FieldKindName::Push)
    );
    match value {
        ValueEntry::One(v) if is_button => Ok(FieldValue::Name(v.clone())),
        ValueEntry::One(v) => Ok(FieldValue::Text(v.clone())),
        ValueEntry::Many(values) if kind == Some(FieldKindName::List) => {
            Ok(FieldValue::Choices(values.clone()))
        }
        ValueEntry::Many(_) => Err("only list fields accept several values".to_string()),
    }
}

fn color(components: &[f64]) -> Result<Color, String> {
    Color::from_components(components)
        .ok_or_else(|| format!("a color needs 1, 3 or 4 components, got {}", components.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> FormFile {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn minimal_document_gets_a_letter_page() {
        let file = parse(r#"{ "fields": [] }"#);
        assert_eq!(file.pages().len(), 1);
        assert_eq!(file.pages()[0].media_box.width(), 612.0);
    }

    #[test]
    fn builds_hierarchy_with_inherited_kind() {
        let file = parse(
            r#"{
                "fields": [{
                    "name": "size", "type": "radio", "value": "L",
                    "kids": [
                        { "name": "s", "widgets": [{ "rect": [0, 0, 10, 10], "on_state": "S" }] },
                        { "name": "l", "widgets": [{ "rect": [20, 0, 30, 10], "on_state": "L" }] }
                    ]
                }]
            }"#,
        );
        let mut form = Form::new(file.pages());
        file.populate(&mut form).unwrap();
        let tree = form.tree();
        let large = tree.find_by_name("size.l").unwrap();
        assert_eq!(tree.value(large), Some(&FieldValue::Name("L".into())));
        assert_eq!(tree.all_widgets(tree.roots()[0]).len(), 2);
    }

    #[test]
    fn list_accepts_several_values() {
        let file = parse(
            r#"{ "fields": [{ "name": "l", "type": "list", "value": ["a", "b"],
                 "options": ["a", ["b", "Bee"]], "widgets": [{ "rect": [0, 0, 50, 50] }] }] }"#,
        );
        let mut form = Form::new(file.pages());
        file.populate(&mut form).unwrap();
        let id = form.tree().roots()[0];
        assert!(form.tree().flags(id).contains(FieldFlags::MULTI_SELECT));
        assert_eq!(form.tree().field(id).unwrap().options[1].display, "Bee");
    }

    #[test]
    fn rejects_bad_colors_and_pages() {
        let file = parse(
            r#"{ "fields": [{ "name": "t", "type": "text",
                 "widgets": [{ "rect": [0, 0, 50, 20], "background": [1, 0] }] }] }"#,
        );
        let mut form = Form::new(file.pages());
        assert!(file.populate(&mut form).unwrap_err().contains("components"));

        let file = parse(
            r#"{ "fields": [{ "name": "t", "type": "text", "widgets": [{ "rect": [0, 0, 1, 1], "page": 3 }] }] }"#,
        );
        let mut form = Form::new(file.pages());
        assert!(file.populate(&mut form).unwrap_err().contains("page"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<FormFile, _> = serde_json::from_str(r#"{ "feilds": [] }"#);
        assert!(result.is_err());
    }
}
