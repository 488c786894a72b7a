//! Serialise [`ContentOp`] sequences into content-stream bytes.

use acroform_core::{ContentOp, Matrix, Point};
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};

use crate::error::BackendError;

/// Encode operations as content-stream bytes.
pub fn encode_ops(ops: &[ContentOp]) -> Result<Vec<u8>, BackendError> {
    let content: Content<Vec<Operation>> = Content {
        operations: ops.iter().map(to_operation).collect(),
    };
    content
        .encode()
        .map_err(|e| BackendError::Write(format!("failed to encode content stream: {e}")))
}

/// A number operand; integral values are written without a fraction.
pub(crate) fn number(value: f64) -> Object {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        Object::Integer(value as i64)
    } else {
        Object::Real(value as _)
    }
}

fn numbers(values: &[f64]) -> Vec<Object> {
    values.iter().copied().map(number).collect()
}

fn point(p: Point) -> [Object; 2] {
    [number(p.x), number(p.y)]
}

fn matrix(m: &Matrix) -> Vec<Object> {
    numbers(&m.to_array())
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn to_operation(op: &ContentOp) -> Operation {
    let operands = match op {
        ContentOp::Transform(m) => matrix(m),
        ContentOp::LineWidth(w) => vec![number(*w)],
        ContentOp::Dash { array, phase } => {
            vec![Object::Array(numbers(array)), number(*phase)]
        }
        ContentOp::FillColor(c) | ContentOp::StrokeColor(c) => numbers(&c.components()),
        ContentOp::Rectangle {
            x,
            y,
            width,
            height,
        } => numbers(&[*x, *y, *width, *height]),
        ContentOp::MoveTo(p) | ContentOp::LineTo(p) => point(*p).to_vec(),
        ContentOp::CurveTo { cp1, cp2, end } => {
            let mut out = point(*cp1).to_vec();
            out.extend(point(*cp2));
            out.extend(point(*end));
            out
        }
        ContentOp::SetFont { name: font, size } => vec![name(font), number(*size)],
        ContentOp::MoveText { tx, ty } => numbers(&[*tx, *ty]),
        ContentOp::ShowText(bytes) => vec![Object::String(bytes.clone(), StringFormat::Literal)],
        ContentOp::BeginMarkedContent(tag) => vec![name(tag)],
        ContentOp::PaintXObject(resource) => vec![name(resource)],
        ContentOp::SaveState
        | ContentOp::RestoreState
        | ContentOp::ClosePath
        | ContentOp::Stroke
        | ContentOp::Fill
        | ContentOp::FillStroke
        | ContentOp::Clip
        | ContentOp::EndPath
        | ContentOp::BeginText
        | ContentOp::EndText
        | ContentOp::EndMarkedContent => Vec::new(),
    };
    Operation::new(op.operator(), operands)
}
