//! Text field appearances, plus the single-line and multiline layout shared
//! with choice fields and push-button captions.

use acroform_core::{
    AppearanceDict, Color, ContentBuilder, FieldFlags, FieldId, FieldValue, FontSize, FormError,
    Justification, fit_font_size,
};

use super::border::draw_box;
use super::{Context, Frame, TextStyle, WidgetUpdate, conformance, resolve_style, widget_frames};

/// Marked-content tag viewers look for when editing variable text.
const VARIABLE_TEXT_TAG: &str = "Tx";

pub(super) fn synthesize(ctx: &Context<'_>, id: FieldId) -> Result<Vec<WidgetUpdate>, FormError> {
    let tree = ctx.tree;
    let style = resolve_style(ctx, id)?;
    let flags = tree.flags(id);
    let value = tree.value(id).and_then(FieldValue::as_str).unwrap_or("");
    let text = if flags.contains(FieldFlags::PASSWORD) {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let justification = tree.justification(id).unwrap_or_default();
    let comb = if flags.contains(FieldFlags::COMB) {
        match tree.max_len(id) {
            Some(n) if n > 0 => Some(n),
            _ => {
                tracing::error!(
                    field = %tree.fully_qualified_name(id),
                    "comb field without a positive /MaxLen, using normal layout"
                );
                None
            }
        }
    } else {
        None
    };
    let multiline = flags.contains(FieldFlags::MULTILINE);
    let print = conformance(ctx, id).is_some();

    let frames = widget_frames(ctx, id, &tree.widgets(id))?;
    Ok(frames
        .into_iter()
        .map(|(widget_id, widget, frame)| {
            let mut b = ContentBuilder::new();
            draw_box(&mut b, widget, frame.width, frame.height);
            if multiline {
                let paragraphs: Vec<String> = text.lines().map(str::to_string).collect();
                draw_multiline(&mut b, ctx, &style, &frame, &paragraphs, &[], justification);
            } else {
                draw_single_line(&mut b, ctx, &style, &frame, &text, justification, comb, true);
            }
            WidgetUpdate {
                widget: widget_id,
                appearance: AppearanceDict::stream(frame.stream(b, style.fonts())),
                state: None,
                print,
            }
        })
        .collect())
}

/// Lay out one line of text vertically centred in the frame.
///
/// Auto size fits the text into the frame. With `comb`, the box is divided
/// into that many equal cells and each character is centred in its own
/// cell, ignoring `justification`.
#[allow(clippy::too_many_arguments)]
pub(super) fn draw_single_line(
    b: &mut ContentBuilder,
    ctx: &Context<'_>,
    style: &TextStyle,
    frame: &Frame,
    text: &str,
    justification: Justification,
    comb: Option<u32>,
    marked: bool,
) {
    let font = style.font.as_ref();
    let (w, h, bw) = (frame.width, frame.height, frame.border_width);
    let size = match style.size {
        FontSize::Auto => fit_font_size(font, &frame.bbox, text, bw, ctx.options.min_font_size),
        FontSize::Fixed(size) => size,
    };
    let upem = font.units_per_em();
    let (ascent, descent) = (font.ascent(), font.descent());
    let baseline = (h - size * (ascent - descent) / upem) / 2.0 - descent * size / upem;
    let padding = ctx.options.text_padding + bw;

    begin_text_block(b, frame, marked);
    b.begin_text()
        .fill_color(style.color)
        .set_font(style.resource.clone(), size);
    match comb {
        Some(cells) => {
            let cell = w / f64::from(cells);
            let mut previous_x = 0.0;
            for (i, ch) in text.chars().take(cells as usize).enumerate() {
                let glyph = ch.to_string();
                let x = cell * i as f64 + (cell - font.width(&glyph, size)) / 2.0;
                let ty = if i == 0 { baseline } else { 0.0 };
                b.move_text(x - previous_x, ty).show_text(font.encode(&glyph));
                previous_x = x;
            }
        }
        None => {
            let x = aligned_x(justification, w, padding, font.width(text, size));
            b.move_text(x, baseline).show_text(font.encode(text));
        }
    }
    b.end_text();
    end_text_block(b, marked);
}

/// Lay out paragraphs top-down, wrapped to the frame width.
///
/// Auto size falls back to the configured default size. Lines belonging to
/// a paragraph listed in `selected` get a highlight bar and the highlight
/// text color. Lines that would run past the bottom padding are dropped.
pub(super) fn draw_multiline(
    b: &mut ContentBuilder,
    ctx: &Context<'_>,
    style: &TextStyle,
    frame: &Frame,
    paragraphs: &[String],
    selected: &[usize],
    justification: Justification,
) {
    let font = style.font.as_ref();
    let (w, h, bw) = (frame.width, frame.height, frame.border_width);
    let size = match style.size {
        FontSize::Auto => ctx.options.default_font_size,
        FontSize::Fixed(size) => size,
    };
    let upem = font.units_per_em();
    let ascent = font.ascent() * size / upem;
    let descent = font.descent() * size / upem;
    let padding = ctx.options.multiline_padding + bw;
    let leading = size;

    let mut lines: Vec<(String, bool)> = Vec::new();
    for (index, paragraph) in paragraphs.iter().enumerate() {
        let highlighted = selected.contains(&index);
        let wrapped = font.split_lines(paragraph, size, w - 2.0 * padding);
        if wrapped.is_empty() {
            lines.push((String::new(), highlighted));
        }
        lines.extend(wrapped.into_iter().map(|line| (line, highlighted)));
    }

    let first_baseline = h - padding - ascent;
    let visible = lines
        .iter()
        .enumerate()
        .take_while(|(i, _)| *i == 0 || first_baseline - *i as f64 * leading + descent >= bw)
        .count();
    let lines = &lines[..visible];

    begin_text_block(b, frame, true);
    for (i, (_, highlighted)) in lines.iter().enumerate() {
        if *highlighted {
            let y = first_baseline - i as f64 * leading;
            b.fill_color(ctx.options.highlight_color)
                .rectangle(bw, y + descent, w - 2.0 * bw, leading)
                .fill();
        }
    }
    b.begin_text().set_font(style.resource.clone(), size);
    let mut current_color: Option<Color> = None;
    let (mut cursor_x, mut cursor_y) = (0.0, 0.0);
    for (i, (line, highlighted)) in lines.iter().enumerate() {
        let color = if *highlighted {
            ctx.options.highlight_text_color
        } else {
            style.color
        };
        if current_color != Some(color) {
            b.fill_color(color);
            current_color = Some(color);
        }
        let x = aligned_x(justification, w, padding, font.width(line, size));
        let y = first_baseline - i as f64 * leading;
        b.move_text(x - cursor_x, y - cursor_y)
            .show_text(font.encode(line));
        (cursor_x, cursor_y) = (x, y);
    }
    b.end_text();
    end_text_block(b, true);
}

fn aligned_x(justification: Justification, width: f64, padding: f64, text_width: f64) -> f64 {
    match justification {
        Justification::Left => padding,
        Justification::Center => (width - text_width) / 2.0,
        Justification::Right => width - padding - text_width,
    }
}

fn begin_text_block(b: &mut ContentBuilder, frame: &Frame, marked: bool) {
    if marked {
        b.begin_marked_content(VARIABLE_TEXT_TAG);
    }
    let bw = frame.border_width;
    b.save_state().clip_rect(
        bw,
        bw,
        (frame.width - 2.0 * bw).max(0.0),
        (frame.height - 2.0 * bw).max(0.0),
    );
}

fn end_text_block(b: &mut ContentBuilder, marked: bool) {
    b.restore_state();
    if marked {
        b.end_marked_content();
    }
}
