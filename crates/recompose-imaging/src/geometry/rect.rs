// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Minimum-area rotated rectangles and their orientation normalization.

use image::GrayImage;
use recompose_core::{OrientedRect, Point2, Polygon, Result};
use tracing::{debug, instrument};

use super::contour::mask_hull;

/// A rotated rectangle defined by center, size, and angle.
///
/// `angle` is the direction (degrees, image space) of the `width` side and
/// is kept within `[0, 90)`; `height` runs perpendicular to it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotatedBox {
    pub center: Point2,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
}

impl RotatedBox {
    fn canonical(center: Point2, width: f64, height: f64, angle: f64) -> Self {
        // Every quarter turn of the reference side swaps width and height.
        let quarter_turns = (angle / 90.0).floor();
        let mut angle = angle - quarter_turns * 90.0;
        let mut swap = (quarter_turns as i64).rem_euclid(2) == 1;
        if angle >= 90.0 {
            angle -= 90.0;
            swap = !swap;
        }
        let (width, height) = if swap { (height, width) } else { (width, height) };
        Self {
            center,
            width,
            height,
            angle,
        }
    }

    /// The four corners, walking width, height, -width from the first.
    pub fn box_points(&self) -> [Point2; 4] {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let (ux, uy) = (cos * self.width / 2.0, sin * self.width / 2.0);
        let (vx, vy) = (-sin * self.height / 2.0, cos * self.height / 2.0);
        let c = self.center;
        [
            Point2::new(c.x - ux - vx, c.y - uy - vy),
            Point2::new(c.x + ux - vx, c.y + uy - vy),
            Point2::new(c.x + ux + vx, c.y + uy + vy),
            Point2::new(c.x - ux + vx, c.y - uy + vy),
        ]
    }
}

/// Minimum-area enclosing rectangle of a convex polygon (rotating calipers).
///
/// One side of the optimal rectangle is collinear with a hull edge, so each
/// edge direction is tried and the smallest area kept (first on ties).
pub fn min_area_box(hull: &Polygon) -> RotatedBox {
    let pts = hull.vertices();
    let Some(&first) = pts.first() else {
        return RotatedBox::default();
    };

    let n = pts.len();
    let mut best: Option<(f64, RotatedBox)> = None;

    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        let len = a.distance(&b);
        if len < 1e-12 {
            continue;
        }
        let (ux, uy) = ((b.x - a.x) / len, (b.y - a.y) / len);
        let (vx, vy) = (-uy, ux);

        let (mut umin, mut umax) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut vmin, mut vmax) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in pts {
            let pu = p.x * ux + p.y * uy;
            let pv = p.x * vx + p.y * vy;
            umin = umin.min(pu);
            umax = umax.max(pu);
            vmin = vmin.min(pv);
            vmax = vmax.max(pv);
        }

        let area = (umax - umin) * (vmax - vmin);
        if best.as_ref().is_some_and(|(best_area, _)| area >= *best_area) {
            continue;
        }

        let cu = (umin + umax) / 2.0;
        let cv = (vmin + vmax) / 2.0;
        let center = Point2::new(cu * ux + cv * vx, cu * uy + cv * vy);
        let angle = uy.atan2(ux).to_degrees();
        best = Some((
            area,
            RotatedBox::canonical(center, umax - umin, vmax - vmin, angle),
        ));
    }

    best.map(|(_, b)| b).unwrap_or(RotatedBox {
        center: first,
        ..RotatedBox::default()
    })
}

/// Normalize a box angle into `[0, 180)` so that it names the direction of
/// the longer side.
pub fn normalized_angle(rbox: &RotatedBox) -> f64 {
    if rbox.width > rbox.height {
        (rbox.angle + 180.0).rem_euclid(180.0)
    } else {
        (rbox.angle + 90.0).rem_euclid(180.0)
    }
}

/// Rotation (degrees) that lines the long side up with the canvas: horizontal
/// on a landscape canvas, vertical otherwise.
pub fn canvas_rotation(angle: f64, canvas: (u32, u32)) -> f64 {
    let (width, height) = canvas;
    if width > height {
        angle - 180.0
    } else {
        angle - 90.0
    }
}

/// Best-fit rotated rectangle of the largest object in `mask`, expressed in
/// the canvas orientation.
///
/// The minimum-area rectangle's corners are rotated about its center by the
/// canvas rotation, which yields an axis-aligned rectangle suitable as the
/// destination of a perspective warp.
#[instrument(skip(mask), fields(width = mask.width(), height = mask.height()))]
pub fn best_fit_rect(mask: &GrayImage) -> Result<OrientedRect> {
    let hull = mask_hull(mask)?;
    let rbox = min_area_box(&hull);

    let angle = normalized_angle(&rbox);
    let rotation = canvas_rotation(angle, mask.dimensions());
    debug!(
        box_angle = rbox.angle,
        box_width = rbox.width,
        box_height = rbox.height,
        angle,
        rotation,
        "Rotated rect fitted"
    );

    let rotated: Vec<Point2> = rbox
        .box_points()
        .iter()
        .map(|p| p.rotate_about(rbox.center, rotation))
        .collect();
    let poly = Polygon::new(rotated).with_clockwise_winding().roll_to_origin();

    let mut corners = [Point2::default(); 4];
    corners.copy_from_slice(poly.vertices());

    Ok(OrientedRect {
        corners,
        center: rbox.center,
        width: rbox.width,
        height: rbox.height,
        angle,
        rotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    /// Fill every pixel whose center falls inside the rotated box.
    fn draw_rotated(w: u32, h: u32, rbox: &RotatedBox) -> GrayImage {
        let (sin, cos) = rbox.angle.to_radians().sin_cos();
        GrayImage::from_fn(w, h, |x, y| {
            let dx = x as f64 - rbox.center.x;
            let dy = y as f64 - rbox.center.y;
            let u = dx * cos + dy * sin;
            let v = -dx * sin + dy * cos;
            if u.abs() <= rbox.width / 2.0 && v.abs() <= rbox.height / 2.0 {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn canonical_keeps_angle_below_ninety() {
        let b = RotatedBox::canonical(Point2::default(), 10.0, 4.0, 100.0);
        assert!(approx(b.angle, 10.0, 1e-9));
        assert_eq!((b.width, b.height), (4.0, 10.0));

        let b = RotatedBox::canonical(Point2::default(), 10.0, 4.0, -30.0);
        assert!(approx(b.angle, 60.0, 1e-9));
        assert_eq!((b.width, b.height), (4.0, 10.0));
    }

    #[test]
    fn min_area_box_of_axis_aligned_rectangle() {
        let hull = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(20.0, 0.0),
            Point2::new(20.0, 10.0),
            Point2::new(0.0, 10.0),
        ]);
        let b = min_area_box(&hull);
        assert!(approx(b.width * b.height, 200.0, 1e-9));
        assert!(approx(b.center.x, 10.0, 1e-9));
        assert!(approx(b.center.y, 5.0, 1e-9));
        assert!(approx(normalized_angle(&b), 0.0, 1e-9));
    }

    #[test]
    fn box_points_round_trip_through_min_area_box() {
        let original = RotatedBox {
            center: Point2::new(50.0, 40.0),
            width: 30.0,
            height: 12.0,
            angle: 25.0,
        };
        let hull = Polygon::new(original.box_points().to_vec());
        let b = min_area_box(&hull);
        assert!(approx(b.width * b.height, 360.0, 1e-6));
        assert!(approx(normalized_angle(&b), 25.0, 1e-6));
    }

    #[test]
    fn best_fit_rect_straightens_tilted_landscape_object() {
        let truth = RotatedBox {
            center: Point2::new(80.0, 60.0),
            width: 80.0,
            height: 40.0,
            angle: 15.0,
        };
        let mask = draw_rotated(160, 120, &truth);
        let rect = best_fit_rect(&mask).unwrap();

        assert!((0.0..180.0).contains(&rect.angle));
        assert!(approx(rect.angle, 15.0, 2.0), "angle {}", rect.angle);

        // Landscape canvas: long side ends up horizontal.
        let xs: Vec<f64> = rect.corners.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = rect.corners.iter().map(|p| p.y).collect();
        let span_x = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - xs.iter().cloned().fold(f64::INFINITY, f64::min);
        let span_y = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - ys.iter().cloned().fold(f64::INFINITY, f64::min);
        assert!(approx(span_x, 80.0, 3.0), "span_x {span_x}");
        assert!(approx(span_y, 40.0, 3.0), "span_y {span_y}");

        // Origin-rolled: top-left corner first.
        let first = rect.corners[0];
        assert!(rect.corners.iter().all(|p| first.coord_sum() <= p.coord_sum() + 1e-9));
    }

    #[test]
    fn portrait_canvas_stands_rectangle_upright() {
        let truth = RotatedBox {
            center: Point2::new(50.0, 80.0),
            width: 60.0,
            height: 30.0,
            angle: 10.0,
        };
        let mask = draw_rotated(100, 160, &truth);
        let rect = best_fit_rect(&mask).unwrap();

        let xs: Vec<f64> = rect.corners.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = rect.corners.iter().map(|p| p.y).collect();
        let span_x = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - xs.iter().cloned().fold(f64::INFINITY, f64::min);
        let span_y = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - ys.iter().cloned().fold(f64::INFINITY, f64::min);
        assert!(span_y > span_x);
    }

    #[test]
    fn angle_stays_in_range_for_many_orientations() {
        for deg in (0..180).step_by(7) {
            let truth = RotatedBox {
                center: Point2::new(60.0, 60.0),
                width: 50.0,
                height: 20.0,
                angle: deg as f64,
            };
            let mask = draw_rotated(120, 120, &truth);
            let rect = best_fit_rect(&mask).unwrap();
            assert!((0.0..180.0).contains(&rect.angle), "deg {deg} -> {}", rect.angle);
        }
    }
}
