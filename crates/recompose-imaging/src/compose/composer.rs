// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Object composer — a chainable image + mask pipeline for segmented objects.

use image::{DynamicImage, GrayImage, RgbImage};
use recompose_core::{FillColor, RecomposeError, RepositionSpec, Result, SegmentationConfig};
use tracing::{debug, info, instrument};

use super::cutout::{add_reflection, cutout};
use super::mask::{smooth_mask, threshold_mask};
use super::reposition::reposition;
use crate::codec;
use crate::geometry::perspective::correct_perspective;

/// A photo and the mask of the object in it, transformed together.
///
/// Operations consume `self` and return the transformed composer, enabling
/// method chaining:
///
/// ```ignore
/// let (image, mask) = ObjectComposer::from_bytes(&photo, &mask)?
///     .threshold_mask(0.5)
///     .smooth_mask()
///     .correct_perspective()?
///     .reposition(&spec)?
///     .into_parts();
/// ```
#[derive(Debug, Clone)]
pub struct ObjectComposer {
    image: RgbImage,
    mask: GrayImage,
}

/// Everything the segmentation pipeline produces.
#[derive(Debug, Clone)]
pub struct SegmentationOutput {
    /// The cleaned-up mask in the original frame.
    pub mask: GrayImage,
    pub resized_image: RgbImage,
    pub resized_mask: GrayImage,
    /// Repositioned object over the configured background.
    pub cutout: RgbImage,
}

impl ObjectComposer {
    // -- Construction ---------------------------------------------------------

    pub fn new(image: RgbImage, mask: GrayImage) -> Result<Self> {
        if image.dimensions() != mask.dimensions() {
            return Err(RecomposeError::DimensionMismatch {
                image: image.dimensions(),
                mask: mask.dimensions(),
            });
        }
        Ok(Self { image, mask })
    }

    /// Decode a photo and its mask from encoded bytes (PNG, JPEG, ...).
    #[instrument(skip_all, fields(image_len = image.len(), mask_len = mask.len()))]
    pub fn from_bytes(image: &[u8], mask: &[u8]) -> Result<Self> {
        Self::new(codec::decode_rgb(image)?, codec::decode_mask(mask)?)
    }

    // -- Accessors ------------------------------------------------------------

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn mask(&self) -> &GrayImage {
        &self.mask
    }

    pub fn into_parts(self) -> (RgbImage, GrayImage) {
        (self.image, self.mask)
    }

    // -- Transformations (consume self, return new Self) -----------------------

    pub fn threshold_mask(self, threshold: f64) -> Self {
        Self {
            mask: threshold_mask(&self.mask, threshold),
            image: self.image,
        }
    }

    pub fn smooth_mask(self) -> Self {
        Self {
            mask: smooth_mask(&self.mask),
            image: self.image,
        }
    }

    pub fn correct_perspective(self) -> Result<Self> {
        let (image, mask) = correct_perspective(&self.image, &self.mask)?;
        Ok(Self { image, mask })
    }

    pub fn reposition(self, spec: &RepositionSpec) -> Result<Self> {
        let (image, mask) = reposition(&self.image, &self.mask, spec)?;
        Ok(Self { image, mask })
    }

    // -- Output ---------------------------------------------------------------

    pub fn cutout(&self, background: FillColor) -> Result<RgbImage> {
        cutout(&self.image, &self.mask, background)
    }

    pub fn cutout_with_reflection(&self, background: FillColor, opacity: f64) -> Result<RgbImage> {
        let base = self.cutout(background)?;
        add_reflection(&base, &self.mask, background, opacity)
    }

    pub fn image_png(&self) -> Result<Vec<u8>> {
        codec::encode_png(DynamicImage::ImageRgb8(self.image.clone()))
    }

    pub fn mask_png(&self) -> Result<Vec<u8>> {
        codec::encode_png(DynamicImage::ImageLuma8(self.mask.clone()))
    }

    // -- Full pipeline --------------------------------------------------------

    /// Run the segmented-object pipeline:
    ///
    /// 1. Threshold the mask (`mask_threshold`)
    /// 2. Smooth mask edges
    /// 3. Optionally straighten the object (`perspective_correction`)
    /// 4. Reposition onto the output canvas, sized like the input unless
    ///    `out_size` is set
    /// 5. Cut out over `background`, with a reflection when `reflection_opacity > 0`
    #[instrument(skip(self))]
    pub fn run_segmentation(self, config: &SegmentationConfig) -> Result<SegmentationOutput> {
        config.validate()?;
        info!("Running segmentation pipeline");

        let prepared = self.threshold_mask(config.mask_threshold).smooth_mask();
        let mask = prepared.mask.clone();

        let straightened = if config.perspective_correction {
            prepared.correct_perspective()?
        } else {
            prepared
        };

        let spec = config.reposition_spec(straightened.image.dimensions());
        let placed = straightened.reposition(&spec)?;
        let cutout = placed.cutout_with_reflection(config.background, config.reflection_opacity)?;
        debug!(width = cutout.width(), height = cutout.height(), "Cutout composed");

        let (resized_image, resized_mask) = placed.into_parts();
        Ok(SegmentationOutput {
            mask,
            resized_image,
            resized_mask,
            cutout,
        })
    }
}
