// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Object repositioning — rescale an image so the masked object has the
// requested size, then paste it into an output canvas at the requested
// fractional position.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageBuffer, Pixel, Rgb, RgbImage};
use recompose_core::{MaskBounds, RecomposeError, RepositionSpec, Result};
use tracing::{debug, info, instrument};

use crate::codec;

/// Smallest resize ratio ever applied.
pub const MIN_RESIZE_RATIO: f64 = 0.1;
/// Largest resize ratio ever applied.
pub const MAX_RESIZE_RATIO: f64 = 10.0;

/// Bounding box of the non-zero pixels of `mask`.
pub fn mask_bounds(mask: &GrayImage) -> Result<MaskBounds> {
    let mut bounds: Option<MaskBounds> = None;
    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel.0[0] == 0 {
            continue;
        }
        let b = bounds.get_or_insert(MaskBounds {
            xmin: x,
            xmax: x,
            ymin: y,
            ymax: y,
        });
        b.xmin = b.xmin.min(x);
        b.xmax = b.xmax.max(x);
        b.ymin = b.ymin.min(y);
        b.ymax = b.ymax.max(y);
    }
    bounds.ok_or(RecomposeError::EmptyMask)
}

/// Resize ratio that makes the object's limiting dimension span
/// `obj_scale` of the matching canvas dimension, clamped to
/// `[MIN_RESIZE_RATIO, MAX_RESIZE_RATIO]`.
///
/// Height limits when the object is taller than wide, or square on a
/// portrait canvas; width limits otherwise.
pub fn resize_ratio(bounds: &MaskBounds, out_size: (u32, u32), obj_scale: f64) -> f64 {
    let obj_w = bounds.width() as f64;
    let obj_h = bounds.height() as f64;
    let (out_w, out_h) = (out_size.0 as f64, out_size.1 as f64);

    let limit_by_height = obj_h > obj_w || (obj_h == obj_w && out_h > out_w);
    // Zero-extent objects give an infinite ratio, which the clamp handles.
    let ratio = if limit_by_height {
        out_h / obj_h * obj_scale
    } else {
        out_w / obj_w * obj_scale
    };
    ratio.clamp(MIN_RESIZE_RATIO, MAX_RESIZE_RATIO)
}

/// One axis of the crop-and-paste: copy `len` pixels starting at `src_start`
/// in the resized image to `dst_start` in the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisPlacement {
    pub src_start: i64,
    pub dst_start: i64,
    pub len: i64,
}

/// Place the resized object center at `pos` (fraction of `out_len`).
///
/// The source window is clamped to the resized image; the destination start
/// shifts by however much the window was clamped so the object keeps its
/// intended position. Bounds are truncated toward zero, never rounded.
pub fn place_axis(center: i64, out_len: u32, pos: f64, resized_len: u32) -> AxisPlacement {
    let before = out_len as f64 * pos;
    let after = out_len as f64 * (1.0 - pos);

    let src_start = (center as f64 - before).max(0.0) as i64;
    let src_end = (center as f64 + after).min(resized_len as f64) as i64;
    let dst_start = (before - (center - src_start) as f64) as i64;

    AxisPlacement {
        src_start,
        dst_start,
        len: (src_end - src_start).max(0),
    }
}

/// Copy the placed window of `src` into `dst`, skipping anything that would
/// land outside either buffer.
fn paste<P: Pixel>(
    src: &ImageBuffer<P, Vec<P::Subpixel>>,
    dst: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    x: AxisPlacement,
    y: AxisPlacement,
) {
    let (src_w, src_h) = (src.width() as i64, src.height() as i64);
    let (dst_w, dst_h) = (dst.width() as i64, dst.height() as i64);

    for dy in 0..y.len {
        let (sy, ty) = (y.src_start + dy, y.dst_start + dy);
        if sy < 0 || sy >= src_h || ty < 0 || ty >= dst_h {
            continue;
        }
        for dx in 0..x.len {
            let (sx, tx) = (x.src_start + dx, x.dst_start + dx);
            if sx < 0 || sx >= src_w || tx < 0 || tx >= dst_w {
                continue;
            }
            let pixel = *src.get_pixel(sx as u32, sy as u32);
            dst.put_pixel(tx as u32, ty as u32, pixel);
        }
    }
}

/// Reposition the masked object of `image` onto a new canvas.
///
/// Returns the composed image (background `spec.fill_color`) and the
/// matching mask (background 0), both of size `spec.out_size`.
#[instrument(skip(image, mask), fields(width = image.width(), height = image.height()))]
pub fn reposition(
    image: &RgbImage,
    mask: &GrayImage,
    spec: &RepositionSpec,
) -> Result<(RgbImage, GrayImage)> {
    spec.validate()?;
    if image.dimensions() != mask.dimensions() {
        return Err(RecomposeError::DimensionMismatch {
            image: image.dimensions(),
            mask: mask.dimensions(),
        });
    }

    let bounds = mask_bounds(mask)?;
    let ratio = resize_ratio(&bounds, spec.out_size, spec.obj_scale);

    let (img_w, img_h) = image.dimensions();
    let re_w = ((img_w as f64 * ratio) as u32).max(1);
    let re_h = ((img_h as f64 * ratio) as u32).max(1);
    info!(?bounds, ratio, re_w, re_h, "Repositioning object");

    let re_image = imageops::resize(image, re_w, re_h, FilterType::Triangle);
    let re_mask = imageops::resize(mask, re_w, re_h, FilterType::Triangle);

    let (center_x, center_y) = bounds.center();
    let re_center_x = (center_x as f64 * ratio) as i64;
    let re_center_y = (center_y as f64 * ratio) as i64;

    let (out_w, out_h) = spec.out_size;
    let x = place_axis(re_center_x, out_w, spec.pos_x, re_w);
    let y = place_axis(re_center_y, out_h, spec.pos_y, re_h);
    debug!(?x, ?y, "Crop placement computed");

    let mut out_image = RgbImage::from_pixel(out_w, out_h, Rgb(spec.fill_color.0));
    let mut out_mask = GrayImage::new(out_w, out_h);
    paste(&re_image, &mut out_image, x, y);
    paste(&re_mask, &mut out_mask, x, y);

    Ok((out_image, out_mask))
}

/// Byte-level wrapper: decode image and mask, reposition, encode both as PNG.
#[instrument(
    skip(image_bytes, mask_bytes),
    fields(image_len = image_bytes.len(), mask_len = mask_bytes.len())
)]
pub fn reposition_bytes(
    image_bytes: &[u8],
    mask_bytes: &[u8],
    spec: &RepositionSpec,
) -> Result<(Vec<u8>, Vec<u8>)> {
    let image = codec::decode_rgb(image_bytes)?;
    let mask = codec::decode_mask(mask_bytes)?;
    let (out_image, out_mask) = reposition(&image, &mask, spec)?;
    Ok((
        codec::encode_png(DynamicImage::ImageRgb8(out_image))?,
        codec::encode_png(DynamicImage::ImageLuma8(out_mask))?,
    ))
}
