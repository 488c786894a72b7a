//! Appearance transform for rotated pages and rotated widgets.
//!
//! A widget appearance is authored upright in the frame the user sees. Two
//! rotations separate that frame from default user space: the page `/Rotate`
//! value and the widget's own `/MK /R` rotation (relative to the already
//! rotated page). [`compute_transform`] turns both into the form XObject
//! `/Matrix` plus the re-based `/BBox`.
//!
//! # Pipeline
//!
//! 1. Negate the page rotation and reduce it into `(-360, 0]`.
//! 2. Build the page rotation matrix `[cos, -sin, sin, cos]` with a
//!    translation looked up per quadrant, so the rotated origin lands on the
//!    visible lower-left corner.
//! 3. Compose the field rotation `[cos, sin, -sin, cos]` on top (`F × P`),
//!    with its own `(page, field)` translation table.
//! 4. Swap the box dimensions when the combined angle is an odd multiple of
//!    90 degrees.
//!
//! Only quadrant angles are supported. Unsupported page rotations are
//! logged and rendered with the identity transform.

use crate::geometry::{Matrix, Rect};

/// Output of the geometry pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldTransform {
    /// Form XObject `/Matrix`.
    pub matrix: Matrix,
    /// Form XObject `/BBox`, anchored at the origin.
    pub bbox: Rect,
}

/// Reduce a page rotation into the pipeline's winding convention.
///
/// The stored page rotation is clockwise; the pipeline works with its
/// negation, normalised into `(-360, 0]`.
pub fn normalize_page_angle(page_rotation: i32) -> i32 {
    let negated = -(page_rotation % 360);
    if negated > 0 { negated - 360 } else { negated }
}

/// Exact `(cos, sin)` for quadrant angles, trigonometric values otherwise.
fn cos_sin(degrees: i32) -> (f64, f64) {
    match degrees.rem_euclid(360) {
        0 => (1.0, 0.0),
        90 => (0.0, 1.0),
        180 => (-1.0, 0.0),
        270 => (0.0, -1.0),
        _ => {
            let rad = (degrees as f64).to_radians();
            (rad.cos(), rad.sin())
        }
    }
}

/// Page rotation translation, indexed by the normalised page angle.
///
/// `width` and `height` are the dimensions of the unrotated widget box.
fn page_translation(angle: i32, width: f64, height: f64) -> Option<(f64, f64)> {
    match angle {
        0 => Some((0.0, 0.0)),
        -90 | 270 => Some((width, 0.0)),
        -180 | 180 => Some((width, height)),
        -270 | 90 => Some((0.0, height)),
        _ => None,
    }
}

/// Field rotation translation in the page-rotated frame.
///
/// Indexed by the stored page rotation (clockwise, `0/90/180/270`) and the
/// field rotation (counter-clockwise, `0/90/180/270`). A zero field rotation
/// never translates; combinations outside the table translate by zero.
fn field_translation(page: i32, field: i32, width: f64, height: f64) -> (f64, f64) {
    match (page, field) {
        (_, 0) => (0.0, 0.0),
        (0, 90) => (width, 0.0),
        (0, 180) => (width, height),
        (0, 270) => (0.0, height),
        (90, 90) => (height, 0.0),
        (90, 180) => (height, width),
        (90, 270) => (0.0, width),
        (180, 90) => (width, 0.0),
        (180, 180) => (width, height),
        (180, 270) => (0.0, height),
        (270, 90) => (height, 0.0),
        (270, 180) => (height, width),
        (270, 270) => (0.0, width),
        _ => (0.0, 0.0),
    }
}

/// Combine page rotation and field rotation into an appearance transform.
///
/// `bbox` is the widget rectangle; only its size is used. The returned box
/// is anchored at the origin and has width and height exchanged when the
/// combined rotation is a quarter or three-quarter turn.
pub fn compute_transform(bbox: &Rect, page_rotation: i32, field_rotation: i32) -> FieldTransform {
    let width = bbox.width();
    let height = bbox.height();

    let page_angle = normalize_page_angle(page_rotation);
    let Some((tx, ty)) = page_translation(page_angle, width, height) else {
        tracing::warn!(
            page_rotation,
            "unsupported page rotation, rendering appearance without rotation"
        );
        return FieldTransform {
            matrix: Matrix::identity(),
            bbox: bbox.at_origin(),
        };
    };

    let (cos, sin) = cos_sin(page_angle);
    let page_matrix = Matrix::new(cos, -sin, sin, cos, tx, ty);

    let field_angle = field_rotation.rem_euclid(360);
    let matrix = if field_angle == 0 {
        page_matrix
    } else {
        let (fcos, fsin) = cos_sin(field_angle);
        let page_quadrant = (-page_angle).rem_euclid(360);
        let (fx, fy) = field_translation(page_quadrant, field_angle, width, height);
        Matrix::new(fcos, fsin, -fsin, fcos, fx, fy).then(&page_matrix)
    };

    let combined = (page_angle - field_angle).rem_euclid(360);
    let rebased = bbox.at_origin();
    let bbox = if combined % 180 == 90 {
        rebased.swapped()
    } else {
        rebased
    };

    FieldTransform { matrix, bbox }
}
