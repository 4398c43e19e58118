// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cutouts — composite a masked object over a solid background, optionally
// with a fading mirror reflection below it.

use image::{GrayImage, Rgb, RgbImage};
use recompose_core::{FillColor, RecomposeError, Result};
use tracing::{debug, info, instrument};

use super::reposition::mask_bounds;

/// Gap between the object's lowest row and the top of its reflection.
pub const REFLECTION_PADDING: u32 = 10;

/// Mirrored mask values at or above this are painted.
const REFLECTION_MASK_CUTOFF: u8 = 128;

/// Blend `fg` over `bg` with 8-bit alpha.
fn blend(fg: Rgb<u8>, bg: Rgb<u8>, alpha: u8) -> Rgb<u8> {
    let a = alpha as u32;
    let mix = |f: u8, b: u8| ((f as u32 * a + b as u32 * (255 - a) + 127) / 255) as u8;
    Rgb([mix(fg.0[0], bg.0[0]), mix(fg.0[1], bg.0[1]), mix(fg.0[2], bg.0[2])])
}

/// Composite `image` over a solid `background`, using `mask` as alpha.
#[instrument(skip(image, mask), fields(width = image.width(), height = image.height()))]
pub fn cutout(image: &RgbImage, mask: &GrayImage, background: FillColor) -> Result<RgbImage> {
    if image.dimensions() != mask.dimensions() {
        return Err(RecomposeError::DimensionMismatch {
            image: image.dimensions(),
            mask: mask.dimensions(),
        });
    }
    let bg = Rgb(background.0);
    Ok(RgbImage::from_fn(image.width(), image.height(), |x, y| {
        blend(*image.get_pixel(x, y), bg, mask.get_pixel(x, y).0[0])
    }))
}

/// Background weight for reflection row `row` of `rows`.
///
/// Runs linearly from `255 * (100 - opacity) / 100` at the top of the
/// reflection to 255 (pure background) at the bottom.
fn fade(row: u32, rows: u32, opacity: f64) -> u8 {
    let top = (255.0 * (100.0 - opacity) / 100.0).floor();
    if rows <= 1 {
        return 255;
    }
    let t = row as f64 / (rows - 1) as f64;
    (top + (255.0 - top) * t) as u8
}

/// Paint a mirrored, fading copy of the object below it.
///
/// Row `k` of the reflection mirrors object row `ymax - k` and is drawn at
/// `ymax + REFLECTION_PADDING + k`, down to the bottom of the canvas. Only
/// pixels whose mirrored mask value is at least 128 are painted. Opacity is
/// a percentage; 0 leaves the cutout unchanged.
#[instrument(skip(cutout, mask))]
pub fn add_reflection(
    cutout: &RgbImage,
    mask: &GrayImage,
    background: FillColor,
    opacity: f64,
) -> Result<RgbImage> {
    if cutout.dimensions() != mask.dimensions() {
        return Err(RecomposeError::DimensionMismatch {
            image: cutout.dimensions(),
            mask: mask.dimensions(),
        });
    }
    if !(0.0..=100.0).contains(&opacity) {
        return Err(RecomposeError::InvalidSpec(format!(
            "reflection opacity must be within [0, 100], got {opacity}"
        )));
    }

    let mut output = cutout.clone();
    if opacity == 0.0 {
        return Ok(output);
    }

    let bounds = mask_bounds(mask)?;
    let height = cutout.height();
    let top = bounds.ymax + REFLECTION_PADDING;
    if top >= height {
        debug!(ymax = bounds.ymax, height, "No room below object for a reflection");
        return Ok(output);
    }
    let rows = height - top;
    info!(rows, xmin = bounds.xmin, xmax = bounds.xmax, "Adding reflection");

    let bg = Rgb(background.0);
    for k in 0..rows.min(bounds.ymax + 1) {
        let src_y = bounds.ymax - k;
        let weight = fade(k, rows, opacity);
        for x in bounds.xmin..bounds.xmax {
            if mask.get_pixel(x, src_y).0[0] < REFLECTION_MASK_CUTOFF {
                continue;
            }
            let faded = blend(bg, *cutout.get_pixel(x, src_y), weight);
            output.put_pixel(x, top + k, faded);
        }
    }

    Ok(output)
}
