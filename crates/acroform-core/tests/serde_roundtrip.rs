//! Serde serialization/deserialization round-trip tests.
//!
//! These tests verify that the public value types can be serialized to JSON
//! and deserialized back, producing equal values.

#![cfg(feature = "serde")]

use acroform_core::*;

/// Helper: serialize to JSON string, deserialize back, assert equality.
fn roundtrip<T>(value: &T)
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    let json = serde_json::to_string(value).expect("serialize failed");
    let restored: T = serde_json::from_str(&json).expect("deserialize failed");
    assert_eq!(*value, restored, "round-trip mismatch for JSON: {json}");
}

// --- Geometry types ---

#[test]
fn test_serde_rect_and_matrix() {
    roundtrip(&Rect::new(10.0, 20.0, 300.0, 400.0));
    roundtrip(&Matrix::new(0.0, 1.0, -1.0, 0.0, 200.0, 0.0));
    roundtrip(&Point::new(3.5, 2.25));
}

// --- Field attributes ---

#[test]
fn test_serde_colors() {
    roundtrip(&Color::Gray(0.5));
    roundtrip(&Color::Rgb(1.0, 0.0, 0.25));
    roundtrip(&Color::Cmyk(0.0, 0.1, 0.2, 0.3));
}

#[test]
fn test_serde_field_values() {
    roundtrip(&FieldValue::Text("Hello".to_string()));
    roundtrip(&FieldValue::Name("Yes".to_string()));
    roundtrip(&FieldValue::Choices(vec!["a".to_string(), "b".to_string()]));
    roundtrip(&FieldValue::Signature(ObjectRef::new(12, 0)));
}

#[test]
fn test_serde_field_kinds() {
    roundtrip(&FieldKind::Text);
    roundtrip(&FieldKind::Button(ButtonKind::Radio));
    roundtrip(&FieldKind::Choice(ChoiceKind::Combo));
    roundtrip(&FieldType::Signature);
}

#[test]
fn test_serde_widget_styling() {
    roundtrip(&BorderStyle {
        width: 2.0,
        kind: BorderKind::Dashed { on: 3.0, off: 1.0 },
    });
    roundtrip(&AppearanceCharacteristics {
        background: Some(Color::WHITE),
        border_color: Some(Color::BLACK),
        rotation: 90,
        caption: Some("OK".to_string()),
    });
    roundtrip(&CheckType::Star);
    roundtrip(&Justification::Center);
}

#[test]
fn test_serde_flags_and_sizes() {
    roundtrip(&FieldFlags::empty().with(FieldFlags::COMB));
    roundtrip(&AnnotationFlags::default().with(AnnotationFlags::PRINT));
    roundtrip(&FontSize::Auto);
    roundtrip(&FontSize::Fixed(12.0));
}

#[test]
fn test_serde_options_fill_missing_fields() {
    roundtrip(&AppearanceOptions::default());
    let opts: AppearanceOptions = serde_json::from_str(r#"{"min_font_size": 6.0}"#).unwrap();
    assert_eq!(opts.min_font_size, 6.0);
    assert_eq!(opts.default_font_size, 12.0);
}
