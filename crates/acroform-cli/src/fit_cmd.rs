use acroform::acroform_core::{MIN_FONT_SIZE, fit_font_size};
use acroform::{Rect, StandardFont};

pub fn run(width: f64, height: f64, text: &str, font: &str, border: f64) -> Result<(), i32> {
    if width <= 0.0 || height <= 0.0 {
        eprintln!("Error: width and height must be positive");
        return Err(2);
    }
    let Some(font) = StandardFont::from_alias(font) else {
        eprintln!("Error: unknown standard font '{font}'");
        return Err(1);
    };
    let size = fit_font_size(
        &font,
        &Rect::from_size(width, height),
        text,
        border,
        MIN_FONT_SIZE,
    );
    println!("{size:.3}");
    Ok(())
}
