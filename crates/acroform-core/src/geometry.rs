//! Geometric primitives in PDF user space (bottom-left origin).

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rectangle with PDF native (bottom-left origin) coordinates.
///
/// Mirrors a PDF rectangle array `[llx lly urx ury]`:
/// - `llx`, `lly`: lower-left corner
/// - `urx`, `ury`: upper-right corner
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl Rect {
    pub fn new(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        Self { llx, lly, urx, ury }
    }

    /// Build a rectangle from a PDF array, normalizing swapped corners.
    pub fn from_array(values: [f64; 4]) -> Self {
        let [x0, y0, x1, y1] = values;
        Self {
            llx: x0.min(x1),
            lly: y0.min(y1),
            urx: x0.max(x1),
            ury: y0.max(y1),
        }
    }

    /// A rectangle anchored at the origin with the given size.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    /// The same size re-based at the origin.
    pub fn at_origin(&self) -> Rect {
        Rect::from_size(self.width(), self.height())
    }

    /// The same origin with width and height exchanged.
    pub fn swapped(&self) -> Rect {
        Rect::new(
            self.llx,
            self.lly,
            self.llx + self.height(),
            self.lly + self.width(),
        )
    }

    /// Compute the union of two rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            llx: self.llx.min(other.llx),
            lly: self.lly.min(other.lly),
            urx: self.urx.max(other.urx),
            ury: self.ury.max(other.ury),
        }
    }

    /// The rectangle as a PDF array `[llx lly urx ury]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.llx, self.lly, self.urx, self.ury]
    }
}

/// Affine transformation matrix `[a b c d e f]`.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`, the PDF row-vector
/// convention used by the `cm` operator and the form XObject `/Matrix` entry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Apply `self` first, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point through this matrix.
    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// Transform a rectangle and return the axis-aligned bounds of the result.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            self.transform_point(Point::new(rect.llx, rect.lly)),
            self.transform_point(Point::new(rect.urx, rect.lly)),
            self.transform_point(Point::new(rect.urx, rect.ury)),
            self.transform_point(Point::new(rect.llx, rect.ury)),
        ];
        let mut out = Rect::new(corners[0].x, corners[0].y, corners[0].x, corners[0].y);
        for p in &corners[1..] {
            out = out.union(&Rect::new(p.x, p.y, p.x, p.y));
        }
        out
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_array_normalizes_corners() {
        let r = Rect::from_array([200.0, 40.0, 0.0, 0.0]);
        assert_eq!(r, Rect::new(0.0, 0.0, 200.0, 40.0));
    }

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(10.0, 20.0, 50.0, 80.0);
        assert_eq!(r.width(), 40.0);
        assert_eq!(r.height(), 60.0);
        assert_eq!(r.at_origin(), Rect::new(0.0, 0.0, 40.0, 60.0));
        assert_eq!(r.swapped(), Rect::new(10.0, 20.0, 70.0, 60.0));
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(10.0, 20.0, 30.0, 40.0);
        let b = Rect::new(5.0, 25.0, 35.0, 45.0);
        assert_eq!(a.union(&b), Rect::new(5.0, 20.0, 35.0, 45.0));
    }

    #[test]
    fn test_matrix_then_applies_left_first() {
        let scale = Matrix::scale(2.0, 2.0);
        let shift = Matrix::translate(10.0, 0.0);
        let p = scale.then(&shift).transform_point(Point::new(1.0, 1.0));
        assert_eq!(p, Point::new(12.0, 2.0));
        let q = shift.then(&scale).transform_point(Point::new(1.0, 1.0));
        assert_eq!(q, Point::new(22.0, 2.0));
    }

    #[test]
    fn test_identity_transform_rect() {
        let r = Rect::new(0.0, 0.0, 200.0, 40.0);
        assert_eq!(Matrix::identity().transform_rect(&r), r);
        assert!(Matrix::default().is_identity());
    }

    #[test]
    fn test_rotation_transform_rect_bounds() {
        // 90 degrees counter-clockwise
        let rot = Matrix::new(0.0, 1.0, -1.0, 0.0, 0.0, 0.0);
        let r = rot.transform_rect(&Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(r, Rect::new(-10.0, 0.0, 0.0, 20.0));
    }
}
