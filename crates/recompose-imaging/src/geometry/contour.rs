// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour and convex hull extraction from binary masks.

use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry;
use imageproc::point::Point;
use recompose_core::{Point2, Polygon, RecomposeError, Result};
use tracing::{debug, instrument};

/// Binarize a mask: values `>= 1` become 255, zeros stay 0.
pub fn binarize(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    let mut output = GrayImage::new(width, height);
    for (x, y, pixel) in mask.enumerate_pixels() {
        let binary = if pixel.0[0] >= 1 { 255u8 } else { 0u8 };
        output.put_pixel(x, y, Luma([binary]));
    }
    output
}

/// Find the outer contour with the most points.
///
/// Only top-level outer borders are considered (holes and objects nested
/// inside holes are ignored). When several contours have the same point
/// count the first one found wins.
#[instrument(skip(mask), fields(width = mask.width(), height = mask.height()))]
pub fn largest_contour(mask: &GrayImage) -> Result<Vec<Point<i32>>> {
    let binary = binarize(mask);
    let contours = find_contours::<i32>(&binary);
    debug!(total = contours.len(), "Contours found");

    contours
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .reduce(|best, c| if c.points.len() > best.points.len() { c } else { best })
        .map(|c| c.points)
        .ok_or(RecomposeError::NoObjectFound)
}

/// Convex hull of the integer points of a contour, as a float polygon.
pub fn convex_hull(contour: &[Point<i32>]) -> Polygon {
    let hull = geometry::convex_hull(contour);
    Polygon::new(
        hull.into_iter()
            .map(|p| Point2::new(p.x as f64, p.y as f64))
            .collect(),
    )
}

/// Convenience: hull of the largest contour of `mask`.
pub fn mask_hull(mask: &GrayImage) -> Result<Polygon> {
    let contour = largest_contour(mask)?;
    let hull = convex_hull(&contour);
    debug!(contour_points = contour.len(), hull_points = hull.len(), "Hull computed");
    Ok(hull)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_rect(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        img
    }

    #[test]
    fn binarize_thresholds_at_one() {
        let mut img = GrayImage::new(3, 1);
        img.put_pixel(1, 0, Luma([1]));
        img.put_pixel(2, 0, Luma([200]));
        let out = binarize(&img);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 255);
        assert_eq!(out.get_pixel(2, 0).0[0], 255);
    }

    #[test]
    fn empty_mask_has_no_object() {
        let img = GrayImage::new(20, 20);
        assert!(matches!(largest_contour(&img), Err(RecomposeError::NoObjectFound)));
    }

    #[test]
    fn largest_contour_picks_bigger_blob() {
        let mut img = filled_rect(60, 60, 5, 5, 10, 10);
        for y in 20..50 {
            for x in 20..50 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        let contour = largest_contour(&img).unwrap();
        assert!(contour.iter().all(|p| p.x >= 20 && p.y >= 20));
    }

    #[test]
    fn hull_of_rectangle_has_its_corners() {
        let img = filled_rect(50, 40, 10, 5, 30, 25);
        let hull = mask_hull(&img).unwrap();
        let xs: Vec<f64> = hull.vertices().iter().map(|p| p.x).collect();
        let ys: Vec<f64> = hull.vertices().iter().map(|p| p.y).collect();
        assert_eq!(xs.iter().cloned().fold(f64::INFINITY, f64::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max), 29.0);
        assert_eq!(ys.iter().cloned().fold(f64::INFINITY, f64::min), 5.0);
        assert_eq!(ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max), 24.0);
        assert!((hull.area() - 19.0 * 19.0).abs() < 1e-6);
    }
}
