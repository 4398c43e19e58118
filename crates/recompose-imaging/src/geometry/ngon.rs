// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Best-fit n-gon: shrink a convex hull to n vertices by greedy edge collapse.

use std::f64::consts::PI;

use image::GrayImage;
use recompose_core::{Point2, Polygon, RecomposeError, Result};
use tracing::{debug, instrument, trace};

use super::contour::mask_hull;

/// Slack on the `angle1 + angle2 > π` collapse test. Nearly collinear
/// neighbours are classified as non-collapsible.
pub const ANGLE_EPSILON: f64 = 1e-9;

/// Fit an `n`-sided polygon around the largest object in `mask`.
#[instrument(skip(mask), fields(width = mask.width(), height = mask.height()))]
pub fn best_fit_ngon(mask: &GrayImage, n: usize) -> Result<Polygon> {
    if n < 3 {
        return Err(RecomposeError::InvalidSpec(format!(
            "an n-gon needs at least 3 vertices, got {n}"
        )));
    }
    let hull = mask_hull(mask)?;
    fit_ngon(hull, n)
}

/// Reduce a convex hull to exactly `n` vertices.
///
/// Each pass looks at every edge `(i, i+1)`. An edge is collapsible when the
/// interior angles at its two endpoints sum to more than π; collapsing it
/// replaces both endpoints with the intersection of the neighbouring edges,
/// which adds the triangle `(edge_1, intersection, edge_2)` to the shape. The
/// edge adding the smallest triangle is collapsed (first found on ties).
///
/// The result winds clockwise on screen and starts at its min `x + y` vertex.
pub fn fit_ngon(hull: Polygon, n: usize) -> Result<Polygon> {
    let mut poly = hull.into_vertices();
    if poly.len() < n {
        return Err(RecomposeError::HullTooSmall {
            vertices: poly.len(),
            sides: n,
        });
    }

    while poly.len() > n {
        let len = poly.len();
        let mut best: Option<(usize, Point2, f64)> = None;

        for edge_1 in 0..len {
            let edge_2 = (edge_1 + 1) % len;
            let adj_1 = poly[(edge_1 + len - 1) % len];
            let adj_2 = poly[(edge_1 + 2) % len];
            let (p1, p2) = (poly[edge_1], poly[edge_2]);

            let angle_1 = interior_angle(adj_1, p1, p2);
            let angle_2 = interior_angle(p1, p2, adj_2);
            if angle_1 + angle_2 <= PI + ANGLE_EPSILON {
                continue;
            }

            let Some(intersect) = line_intersection((adj_1, p1), (p2, adj_2)) else {
                continue;
            };

            let area = triangle_area(p1, intersect, p2);
            if best.as_ref().is_some_and(|(_, _, best_area)| area >= *best_area) {
                continue;
            }
            best = Some((edge_1, intersect, area));
        }

        let Some((edge_1, intersect, area)) = best else {
            return Err(RecomposeError::NoFitFound { remaining: len });
        };
        trace!(edge_1, area, x = intersect.x, y = intersect.y, "Collapsing edge");

        poly[edge_1] = intersect;
        poly.remove((edge_1 + 1) % len);
    }

    debug!(vertices = poly.len(), "N-gon fitted");
    Ok(Polygon::new(poly).with_clockwise_winding().roll_to_origin())
}

/// Unsigned angle at `vertex` between the rays to `a` and `b`, in `[0, π]`.
fn interior_angle(a: Point2, vertex: Point2, b: Point2) -> f64 {
    let (ax, ay) = (a.x - vertex.x, a.y - vertex.y);
    let (bx, by) = (b.x - vertex.x, b.y - vertex.y);
    let cross = ax * by - ay * bx;
    let dot = ax * bx + ay * by;
    cross.abs().atan2(dot)
}

/// Intersection of two infinite lines, each given by two points.
///
/// Returns `None` for parallel (or degenerate) lines.
fn line_intersection(l1: (Point2, Point2), l2: (Point2, Point2)) -> Option<Point2> {
    let (p1, p2) = l1;
    let (p3, p4) = l2;

    let det = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if det.abs() < 1e-12 {
        return None;
    }

    let c1 = p1.x * p2.y - p1.y * p2.x;
    let c2 = p3.x * p4.y - p3.y * p4.x;
    let x = (c1 * (p3.x - p4.x) - (p1.x - p2.x) * c2) / det;
    let y = (c1 * (p3.y - p4.y) - (p1.y - p2.y) * c2) / det;
    Some(Point2::new(x, y))
}

/// Heron's formula.
fn triangle_area(a: Point2, b: Point2, c: Point2) -> f64 {
    let (ab, bc, ca) = (a.distance(&b), b.distance(&c), c.distance(&a));
    let s = (ab + bc + ca) / 2.0;
    (s * (s - ab) * (s - bc) * (s - ca)).max(0.0).sqrt()
}
