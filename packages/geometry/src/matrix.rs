//! 2D affine matrices and axis-aligned boxes.
//!
//! A [`Matrix`] `(a, b, c, d, e, f)` maps `(x, y)` to
//! `(a·x + c·y + e, b·x + d·y + f)`, the same layout as an SVG
//! `matrix(a,b,c,d,e,f)` transform.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box holding every point. No points gives the zero box.
    pub fn from_points(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };

        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners clockwise from the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Box around the four corners after `matrix`.
    pub fn transformed(&self, matrix: &Matrix) -> Self {
        let corners = self.corners().map(|corner| matrix.transform_point(corner));
        Self::from_points(&corners)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub const fn translate(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation about the origin, in radians.
    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// `self · other`: apply `other` first, then `self`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// `translate(origin) · self · translate(-origin)`
    pub fn about(&self, origin: Point) -> Matrix {
        Matrix::translate(origin.x, origin.y)
            .multiply(self)
            .multiply(&Matrix::translate(-origin.x, -origin.y))
    }

    pub fn transform_point(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.e,
            self.b * point.x + self.d * point.y + self.f,
        )
    }

    pub fn approx_eq(&self, other: &Matrix, epsilon: f64) -> bool {
        [
            (self.a, other.a),
            (self.b, other.b),
            (self.c, other.c),
            (self.d, other.d),
            (self.e, other.e),
            (self.f, other.f),
        ]
        .iter()
        .all(|(x, y)| (x - y).abs() <= epsilon)
    }

    /// SVG `matrix(a,b,c,d,e,f)` text.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }

    /// Read the first `matrix(...)` in an SVG transform list. Anything else,
    /// including a matrix without exactly six finite values, is identity.
    pub fn parse_svg(transform: &str) -> Matrix {
        let Some(start) = transform.find("matrix(") else {
            return Matrix::identity();
        };
        let body = &transform[start + "matrix(".len()..];
        let Some(end) = body.find(')') else {
            return Matrix::identity();
        };

        let values: Option<Vec<f64>> = body[..end]
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| token.parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect();

        match values.as_deref() {
            Some(&[a, b, c, d, e, f]) => Matrix::new(a, b, c, d, e, f),
            _ => Matrix::identity(),
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix({},{},{},{},{},{})",
            trim_float(self.a),
            trim_float(self.b),
            trim_float(self.c),
            trim_float(self.d),
            trim_float(self.e),
            trim_float(self.f)
        )
    }
}

/// Six decimals, trailing zeros dropped.
fn trim_float(value: f64) -> String {
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Snap an angle (radians) to the nearest multiple of `step_degrees`.
pub fn constrain_angle(angle: f64, step_degrees: f64) -> f64 {
    let degrees = radians_to_degrees(angle);
    degrees_to_radians((degrees / step_degrees).round() * step_degrees)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_identity_is_neutral() {
        let m = Matrix::new(2.0, 0.5, -1.0, 3.0, 10.0, -4.0);
        assert_eq!(Matrix::identity().multiply(&m), m);
        assert_eq!(m.multiply(&Matrix::identity()), m);
    }

    #[test]
    fn test_multiply_applies_right_first() {
        let scale = Matrix::scale(2.0, 2.0);
        let shift = Matrix::translate(10.0, 0.0);
        let p = Point::new(1.0, 1.0);

        // shift then scale
        assert_eq!(scale.multiply(&shift).transform_point(p), Point::new(22.0, 2.0));
        // scale then shift
        assert_eq!(shift.multiply(&scale).transform_point(p), Point::new(12.0, 2.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let p = Matrix::rotate(PI / 2.0).transform_point(Point::new(1.0, 0.0));
        assert!((p.x - 0.0).abs() < EPS);
        assert!((p.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_scale_about_point() {
        let m = Matrix::scale(2.0, 2.0).about(Point::new(10.0, 10.0));
        assert_eq!(m.transform_point(Point::new(10.0, 10.0)), Point::new(10.0, 10.0));
        assert_eq!(m.transform_point(Point::new(20.0, 10.0)), Point::new(30.0, 10.0));
    }

    #[test]
    fn test_bounds_of_points() {
        assert_eq!(BoundingBox::from_points(&[]), BoundingBox::default());
        let bounds = BoundingBox::from_points(&[
            Point::new(3.0, -1.0),
            Point::new(-2.0, 4.0),
            Point::new(1.0, 1.0),
        ]);
        assert_eq!(bounds, BoundingBox::new(-2.0, -1.0, 5.0, 5.0));
    }

    #[test]
    fn test_svg_round_trip() {
        let m = Matrix::new(1.0, 0.0, 0.0, 1.0, 12.5, -3.0);
        assert_eq!(m.to_svg(), "matrix(1,0,0,1,12.5,-3)");
        assert_eq!(Matrix::parse_svg(&m.to_svg()), m);
    }

    #[test]
    fn test_parse_svg_fallbacks() {
        assert_eq!(Matrix::parse_svg("translate(10,20)"), Matrix::identity());
        assert_eq!(Matrix::parse_svg("matrix(1 2 3)"), Matrix::identity());
        assert_eq!(Matrix::parse_svg("matrix(1,0,0,1,a,0)"), Matrix::identity());
        assert_eq!(
            Matrix::parse_svg("rotate(3) matrix(2 0 0 2 1 1)"),
            Matrix::new(2.0, 0.0, 0.0, 2.0, 1.0, 1.0)
        );
    }

    #[test]
    fn test_constrain_angle() {
        let snapped = constrain_angle(degrees_to_radians(22.0), 15.0);
        assert!((radians_to_degrees(snapped) - 15.0).abs() < EPS);
        let snapped = constrain_angle(degrees_to_radians(-38.0), 15.0);
        assert!((radians_to_degrees(snapped) + 45.0).abs() < EPS);
    }
}
