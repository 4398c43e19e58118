// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective straightening — warp the best-fit quadrilateral of a masked
// object onto its best-fit rotated rectangle.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use recompose_core::{Polygon, RecomposeError, Result};
use tracing::{debug, info, instrument};

use super::ngon::best_fit_ngon;
use super::rect::best_fit_rect;

fn quad_points(poly: &Polygon) -> Result<[(f32, f32); 4]> {
    match poly.vertices() {
        [a, b, c, d] => Ok([(*a).into(), (*b).into(), (*c).into(), (*d).into()]),
        other => Err(RecomposeError::NoFitFound {
            remaining: other.len(),
        }),
    }
}

/// Projective transform taking quad `src` onto quad `dst`, vertex for vertex.
pub fn quad_projection(src: &Polygon, dst: &Polygon) -> Result<Projection> {
    let from = quad_points(src)?;
    let to = quad_points(dst)?;
    Projection::from_control_points(from, to).ok_or_else(|| {
        RecomposeError::Image("degenerate quadrilateral for perspective transform".into())
    })
}

/// Straighten a photographed flat object.
///
/// ## Pipeline
///
/// 1. Fit a 4-gon around the largest object in `mask` (source quad)
/// 2. Fit the rotated rectangle, aligned to the canvas (destination quad)
/// 3. Compute the projective transform between them
/// 4. Warp image and mask into canvases of the original size (black fill)
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn correct_perspective(image: &RgbImage, mask: &GrayImage) -> Result<(RgbImage, GrayImage)> {
    if image.dimensions() != mask.dimensions() {
        return Err(RecomposeError::DimensionMismatch {
            image: image.dimensions(),
            mask: mask.dimensions(),
        });
    }
    info!("Starting perspective correction");

    let src = best_fit_ngon(mask, 4)?;
    let dst = best_fit_rect(mask)?.polygon();
    debug!(src = ?src.vertices(), dst = ?dst.vertices(), "Quads fitted");

    let projection = quad_projection(&src, &dst)?;

    let (width, height) = image.dimensions();
    let mut out_image = RgbImage::new(width, height);
    let mut out_mask = GrayImage::new(width, height);
    warp_into(image, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]), &mut out_image);
    warp_into(mask, &projection, Interpolation::Bilinear, Luma([0]), &mut out_mask);

    info!("Perspective correction applied");
    Ok((out_image, out_mask))
}
