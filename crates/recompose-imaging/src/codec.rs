// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Codec boundary — decode photos and masks, encode results.

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbImage};
use recompose_core::{RecomposeError, Result};
use tracing::{debug, instrument};

/// Decode any supported format into an 8-bit RGB image.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode_rgb(data: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(data)
        .map_err(|err| RecomposeError::Image(format!("failed to decode image: {}", err)))?;
    debug!(width = img.width(), height = img.height(), "Image decoded from bytes");
    Ok(img.to_rgb8())
}

/// Decode a mask. Only the first channel carries meaning.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode_mask(data: &[u8]) -> Result<GrayImage> {
    let img = image::load_from_memory(data)
        .map_err(|err| RecomposeError::Image(format!("failed to decode mask: {}", err)))?;
    Ok(mask_from_dynamic(&img))
}

/// Take channel 0 of `img` as a single-channel mask.
pub fn mask_from_dynamic(img: &DynamicImage) -> GrayImage {
    let rgb = img.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        Luma([rgb.get_pixel(x, y).0[0]])
    })
}

pub fn open_rgb(path: impl AsRef<Path>) -> Result<RgbImage> {
    let img = image::open(path.as_ref()).map_err(|err| {
        RecomposeError::Image(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    Ok(img.to_rgb8())
}

pub fn open_mask(path: impl AsRef<Path>) -> Result<GrayImage> {
    let img = image::open(path.as_ref()).map_err(|err| {
        RecomposeError::Image(format!(
            "failed to open mask {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    Ok(mask_from_dynamic(&img))
}

/// Encode as PNG bytes.
pub fn encode_png(image: DynamicImage) -> Result<Vec<u8>> {
    encode_to_format(&image, ImageFormat::Png)
}

/// Encode as JPEG bytes with the given quality (1-100).
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    image
        .write_with_encoder(encoder)
        .map_err(|err| RecomposeError::Image(format!("JPEG encoding failed: {}", err)))?;
    Ok(buffer)
}

/// Write an image to a file. The format is inferred from the file extension.
pub fn save(image: &DynamicImage, path: impl AsRef<Path>) -> Result<()> {
    image.save(path.as_ref()).map_err(|err| {
        RecomposeError::Image(format!(
            "failed to save image to {}: {}",
            path.as_ref().display(),
            err
        ))
    })
}

fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| RecomposeError::Image(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    #[test]
    fn garbage_is_an_image_error() {
        assert!(matches!(decode_rgb(b"not an image"), Err(RecomposeError::Image(_))));
        assert!(matches!(decode_mask(&[0u8; 4]), Err(RecomposeError::Image(_))));
    }

    #[test]
    fn mask_reads_first_channel() {
        let rgba = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgba([0, 255, 255, 255]) } else { Rgba([7, 0, 0, 255]) }
        });
        let mask = mask_from_dynamic(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(mask.get_pixel(0, 0).0[0], 0);
        assert_eq!(mask.get_pixel(1, 0).0[0], 7);
    }

    #[test]
    fn jpeg_encodes() {
        let img = RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]));
        let bytes = encode_jpeg(&img, 90).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(decode_rgb(&bytes).unwrap().dimensions(), (8, 8));
    }
}
