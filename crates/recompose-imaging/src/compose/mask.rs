// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mask preparation — thresholding, smoothing, and applying masks to images.

use image::{GrayImage, Luma, Rgb, RgbImage};
use tracing::{debug, instrument};

/// Half-width of the smoothing window (5×5).
const SMOOTH_RADIUS: u32 = 2;
/// The smoothing kernel is all ones scaled by 1/10.
const SMOOTH_DIVISOR: u64 = 10;

/// Zero every mask value below `floor(255 * threshold)`; keep the rest as-is.
#[instrument(skip(mask))]
pub fn threshold_mask(mask: &GrayImage, threshold: f64) -> GrayImage {
    let cutoff = (255.0 * threshold) as u32;
    debug!(cutoff, "Thresholding mask");

    let mut output = mask.clone();
    for pixel in output.pixels_mut() {
        if (pixel.0[0] as u32) < cutoff {
            pixel.0[0] = 0;
        }
    }
    output
}

/// Soften mask edges with a 5×5 box kernel scaled by 1/10.
///
/// Each output pixel is the sum of its 5×5 neighbourhood divided by 10,
/// rounded to nearest (halves up) and saturating at 255. Samples past the
/// border are reflected without repeating the edge pixel (`dcb|abcd|cba`), so
/// a solid mask stays at 255 everywhere and only a band around object edges
/// is feathered.
#[instrument(skip(mask), fields(width = mask.width(), height = mask.height()))]
pub fn smooth_mask(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    let r = SMOOTH_RADIUS as i64;

    let mut output = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut sum: u64 = 0;
            for dy in -r..=r {
                let sy = reflect_101(y as i64 + dy, height);
                for dx in -r..=r {
                    let sx = reflect_101(x as i64 + dx, width);
                    sum += mask.get_pixel(sx, sy).0[0] as u64;
                }
            }
            let value = ((sum + SMOOTH_DIVISOR / 2) / SMOOTH_DIVISOR).min(255) as u8;
            output.put_pixel(x, y, Luma([value]));
        }
    }
    output
}

/// Keep image pixels where the mask is set, per channel (`image & mask`).
pub fn apply_mask(image: &RgbImage, mask: &GrayImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let m = mask.get_pixel(x, y).0[0];
        let Rgb([r, g, b]) = *image.get_pixel(x, y);
        Rgb([r & m, g & m, b & m])
    })
}

/// Map an out-of-range index back into `[0, len)` by mirroring about the
/// edge pixels.
fn reflect_101(i: i64, len: u32) -> u32 {
    let n = len as i64;
    if n <= 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let m = i.rem_euclid(period);
    (if m < n { m } else { period - m }) as u32
}
