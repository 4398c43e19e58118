// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core geometry types for recompose.

use serde::{Deserialize, Serialize};

/// A 2D point in pixel space. Image coordinates: x grows right, y grows down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Sum of both coordinates; the canonical-origin key for polygons.
    pub fn coord_sum(&self) -> f64 {
        self.x + self.y
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Rotate about `center` by `degrees`, using the image-space convention
    /// where a positive angle turns the point counter-clockwise on screen.
    pub fn rotate_about(&self, center: Point2, degrees: f64) -> Point2 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point2 {
            x: center.x + cos * dx + sin * dy,
            y: center.y - sin * dx + cos * dy,
        }
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point2> for (f32, f32) {
    fn from(p: Point2) -> Self {
        (p.x as f32, p.y as f32)
    }
}

/// An implicitly closed polygon (the last vertex connects to the first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Point2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point2>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Point2> {
        self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Rotate the vertex order so the vertex with the smallest `x + y` comes
    /// first. On ties the earliest such vertex wins.
    pub fn roll_to_origin(mut self) -> Self {
        let origin = self
            .vertices
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.coord_sum().total_cmp(&b.1.coord_sum()))
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        self.vertices.rotate_left(origin);
        self
    }

    /// Shoelace signed area. Positive means clockwise on screen (y down).
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        let mut twice = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            twice += a.x * b.y - b.x * a.y;
        }
        twice / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Reverse the vertex order if needed so the polygon winds clockwise on
    /// screen. Quads produced by different fitters only correspond
    /// vertex-for-vertex when they share a winding.
    pub fn with_clockwise_winding(mut self) -> Self {
        if self.signed_area() < 0.0 {
            self.vertices.reverse();
        }
        self
    }

    /// True when every turn has the same orientation (collinear runs count
    /// as convex).
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut sign = 0.0f64;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];
            let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
            if cross.abs() < 1e-9 {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }
}

/// A minimum-area bounding rectangle, re-expressed in the canvas orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    /// Corners after the orientation correction, origin-rolled, clockwise.
    pub corners: [Point2; 4],
    pub center: Point2,
    /// Extent along the rectangle's own axis at `angle`.
    pub width: f64,
    pub height: f64,
    /// Normalized angle in degrees, always in `[0, 180)`.
    pub angle: f64,
    /// The rotation (degrees) that was applied to the raw corners.
    pub rotation: f64,
}

impl OrientedRect {
    pub fn polygon(&self) -> Polygon {
        Polygon::new(self.corners.to_vec())
    }
}

/// Inclusive bounding box of the non-zero pixels of a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskBounds {
    pub xmin: u32,
    pub xmax: u32,
    pub ymin: u32,
    pub ymax: u32,
}

impl MaskBounds {
    /// `xmax - xmin`; a single-column object has width 0.
    pub fn width(&self) -> u32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> u32 {
        self.ymax - self.ymin
    }

    /// Integer center, floored.
    pub fn center(&self) -> (u32, u32) {
        ((self.xmax + self.xmin) / 2, (self.ymax + self.ymin) / 2)
    }
}

/// Solid RGB color used for backgrounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillColor(pub [u8; 3]);

impl FillColor {
    pub const BLACK: FillColor = FillColor([0, 0, 0]);
    pub const WHITE: FillColor = FillColor([255, 255, 255]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
        ])
    }

    #[test]
    fn roll_to_origin_puts_min_sum_first() {
        let rolled = square().roll_to_origin();
        assert_eq!(rolled.vertices()[0], Point2::new(0.0, 0.0));
        assert_eq!(rolled.vertices()[1], Point2::new(10.0, 0.0));
    }

    #[test]
    fn roll_to_origin_is_idempotent() {
        let once = square().roll_to_origin();
        let twice = once.clone().roll_to_origin();
        assert_eq!(once, twice);
    }

    #[test]
    fn roll_to_origin_ties_keep_earliest() {
        let poly = Polygon::new(vec![
            Point2::new(5.0, 5.0),
            Point2::new(0.0, 2.0),
            Point2::new(2.0, 0.0),
        ]);
        let rolled = poly.roll_to_origin();
        assert_eq!(rolled.vertices()[0], Point2::new(0.0, 2.0));
    }

    #[test]
    fn winding_is_normalized() {
        // `square()` already winds clockwise on screen and is left untouched.
        assert!((square().signed_area() - 100.0).abs() < 1e-9);
        assert_eq!(square().with_clockwise_winding(), square());

        // Top-left, bottom-left, bottom-right, top-right: counter-clockwise on screen.
        let ccw = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 10.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
        ]);
        assert!((ccw.signed_area() + 100.0).abs() < 1e-9);
        let cw = ccw.with_clockwise_winding();
        assert!(cw.signed_area() > 0.0);
        assert!((cw.area() - 100.0).abs() < 1e-9);
        assert_eq!(
            cw.vertices(),
            &[
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
                Point2::new(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn convexity_check() {
        assert!(square().is_convex());
        let dart = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 10.0),
        ]);
        assert!(!dart.is_convex());
    }

    #[test]
    fn rotate_about_quarter_turn() {
        let p = Point2::new(10.0, 0.0).rotate_about(Point2::default(), 90.0);
        // Counter-clockwise on screen: +x turns to -y.
        assert!(p.x.abs() < 1e-9);
        assert!((p.y + 10.0).abs() < 1e-9);
    }

    #[test]
    fn mask_bounds_center_floors() {
        let b = MaskBounds { xmin: 1, xmax: 4, ymin: 0, ymax: 3 };
        assert_eq!(b.center(), (2, 1));
        assert_eq!(b.width(), 3);
        assert_eq!(b.height(), 3);
    }
}
