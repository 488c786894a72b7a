//! Content-stream operation model for appearance streams.
//!
//! The synthesizer emits a sequence of [`ContentOp`] values through
//! [`ContentBuilder`]; serialising them into stream bytes is left to the
//! backend.

use crate::color::Color;
use crate::geometry::{Matrix, Point};

/// Bézier control-point factor for approximating a quarter circle.
const KAPPA: f64 = 0.552_284_749_8;

/// A single content-stream operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentOp {
    /// `q`
    SaveState,
    /// `Q`
    RestoreState,
    /// `cm`
    Transform(Matrix),
    /// `w`
    LineWidth(f64),
    /// `d`
    Dash { array: Vec<f64>, phase: f64 },
    /// `g` / `rg` / `k`
    FillColor(Color),
    /// `G` / `RG` / `K`
    StrokeColor(Color),
    /// `re`
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// `m`
    MoveTo(Point),
    /// `l`
    LineTo(Point),
    /// `c`
    CurveTo { cp1: Point, cp2: Point, end: Point },
    /// `h`
    ClosePath,
    /// `S`
    Stroke,
    /// `f`
    Fill,
    /// `B`
    FillStroke,
    /// `W`
    Clip,
    /// `n`
    EndPath,
    /// `BT`
    BeginText,
    /// `ET`
    EndText,
    /// `Tf` with the font resource name (without `/`).
    SetFont { name: String, size: f64 },
    /// `Td`
    MoveText { tx: f64, ty: f64 },
    /// `Tj` with already-encoded bytes.
    ShowText(Vec<u8>),
    /// `BMC` with the tag name (without `/`).
    BeginMarkedContent(String),
    /// `EMC`
    EndMarkedContent,
    /// `Do` with the XObject resource name (without `/`).
    PaintXObject(String),
}

impl ContentOp {
    /// The PDF operator this operation serialises to.
    pub fn operator(&self) -> &'static str {
        match self {
            ContentOp::SaveState => "q",
            ContentOp::RestoreState => "Q",
            ContentOp::Transform(_) => "cm",
            ContentOp::LineWidth(_) => "w",
            ContentOp::Dash { .. } => "d",
            ContentOp::FillColor(c) => c.fill_operator(),
            ContentOp::StrokeColor(c) => c.stroke_operator(),
            ContentOp::Rectangle { .. } => "re",
            ContentOp::MoveTo(_) => "m",
            ContentOp::LineTo(_) => "l",
            ContentOp::CurveTo { .. } => "c",
            ContentOp::ClosePath => "h",
            ContentOp::Stroke => "S",
            ContentOp::Fill => "f",
            ContentOp::FillStroke => "B",
            ContentOp::Clip => "W",
            ContentOp::EndPath => "n",
            ContentOp::BeginText => "BT",
            ContentOp::EndText => "ET",
            ContentOp::SetFont { .. } => "Tf",
            ContentOp::MoveText { .. } => "Td",
            ContentOp::ShowText(_) => "Tj",
            ContentOp::BeginMarkedContent(_) => "BMC",
            ContentOp::EndMarkedContent => "EMC",
            ContentOp::PaintXObject(_) => "Do",
        }
    }
}

/// Accumulates content operations for one appearance stream.
#[derive(Debug, Clone, Default)]
pub struct ContentBuilder {
    ops: Vec<ContentOp>,
}

impl ContentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: ContentOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.push(ContentOp::SaveState)
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.push(ContentOp::RestoreState)
    }

    pub fn transform(&mut self, matrix: Matrix) -> &mut Self {
        self.push(ContentOp::Transform(matrix))
    }

    pub fn line_width(&mut self, width: f64) -> &mut Self {
        self.push(ContentOp::LineWidth(width))
    }

    pub fn dash(&mut self, array: Vec<f64>, phase: f64) -> &mut Self {
        self.push(ContentOp::Dash { array, phase })
    }

    pub fn fill_color(&mut self, color: Color) -> &mut Self {
        self.push(ContentOp::FillColor(color))
    }

    pub fn stroke_color(&mut self, color: Color) -> &mut Self {
        self.push(ContentOp::StrokeColor(color))
    }

    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.push(ContentOp::Rectangle {
            x,
            y,
            width,
            height,
        })
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(ContentOp::MoveTo(Point::new(x, y)))
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(ContentOp::LineTo(Point::new(x, y)))
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> &mut Self {
        self.push(ContentOp::CurveTo {
            cp1: Point::new(x1, y1),
            cp2: Point::new(x2, y2),
            end: Point::new(x3, y3),
        })
    }

    pub fn close_path(&mut self) -> &mut Self {
        self.push(ContentOp::ClosePath)
    }

    /// Append a closed circle as four Bézier curves, counter-clockwise from
    /// the rightmost point.
    pub fn circle(&mut self, cx: f64, cy: f64, r: f64) -> &mut Self {
        let k = r * KAPPA;
        self.move_to(cx + r, cy)
            .curve_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r)
            .curve_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy)
            .curve_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r)
            .curve_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy)
            .close_path()
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.push(ContentOp::Stroke)
    }

    pub fn fill(&mut self) -> &mut Self {
        self.push(ContentOp::Fill)
    }

    pub fn fill_stroke(&mut self) -> &mut Self {
        self.push(ContentOp::FillStroke)
    }

    /// `re W n`: intersect the clip with a rectangle.
    pub fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.rectangle(x, y, width, height)
            .push(ContentOp::Clip)
            .push(ContentOp::EndPath)
    }

    pub fn begin_text(&mut self) -> &mut Self {
        self.push(ContentOp::BeginText)
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.push(ContentOp::EndText)
    }

    pub fn set_font(&mut self, name: impl Into<String>, size: f64) -> &mut Self {
        self.push(ContentOp::SetFont {
            name: name.into(),
            size,
        })
    }

    pub fn move_text(&mut self, tx: f64, ty: f64) -> &mut Self {
        self.push(ContentOp::MoveText { tx, ty })
    }

    pub fn show_text(&mut self, bytes: Vec<u8>) -> &mut Self {
        self.push(ContentOp::ShowText(bytes))
    }

    pub fn begin_marked_content(&mut self, tag: impl Into<String>) -> &mut Self {
        self.push(ContentOp::BeginMarkedContent(tag.into()))
    }

    pub fn end_marked_content(&mut self) -> &mut Self {
        self.push(ContentOp::EndMarkedContent)
    }

    pub fn paint_xobject(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(ContentOp::PaintXObject(name.into()))
    }

    pub fn ops(&self) -> &[ContentOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_ops(self) -> Vec<ContentOp> {
        self.ops
    }
}
