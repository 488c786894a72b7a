use acroform::acroform_parse::da;
use acroform::{Color, FontSize};

use crate::cli::OutputFormat;

pub fn run(input: &str, format: &OutputFormat) -> Result<(), i32> {
    let decoded = da::decode(input);
    match format {
        OutputFormat::Text => {
            println!("font\t{}", decoded.font_name.as_deref().unwrap_or("-"));
            println!("size\t{}", size_text(decoded.size()));
            println!("color\t{}", color_text(decoded.color));
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "font": decoded.font_name,
                "size": decoded.font_size,
                "auto_size": decoded.size().is_some_and(|s| s.is_auto()),
                "color": decoded.color.map(|c| c.components()),
            });
            println!("{value}");
        }
    }
    Ok(())
}

fn size_text(size: Option<FontSize>) -> String {
    match size {
        Some(FontSize::Auto) => "auto".to_string(),
        Some(FontSize::Fixed(pt)) => da::format_number(pt),
        None => "-".to_string(),
    }
}

fn color_text(color: Option<Color>) -> String {
    let Some(color) = color else {
        return "-".to_string();
    };
    let components: Vec<String> = color.components().into_iter().map(da::format_number).collect();
    format!("{} {}", components.join(" "), color.fill_operator())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sizes() {
        assert_eq!(size_text(Some(FontSize::Auto)), "auto");
        assert_eq!(size_text(Some(FontSize::Fixed(9.5))), "9.5");
        assert_eq!(size_text(None), "-");
    }

    #[test]
    fn formats_colors() {
        assert_eq!(color_text(Some(Color::Rgb(1.0, 0.0, 0.0))), "1 0 0 rg");
        assert_eq!(color_text(None), "-");
    }
}
