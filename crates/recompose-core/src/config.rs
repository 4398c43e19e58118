// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operation parameters and application configuration.

use serde::{Deserialize, Serialize};

use crate::error::{RecomposeError, Result};
use crate::FillColor;

/// Where and how large the masked object should appear on the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositionSpec {
    /// Output canvas size `(width, height)`.
    pub out_size: (u32, u32),
    /// Fraction of the canvas the object's limiting dimension should occupy.
    pub obj_scale: f64,
    /// Horizontal anchor of the object center, as a fraction of canvas width.
    pub pos_x: f64,
    /// Vertical anchor of the object center, as a fraction of canvas height.
    pub pos_y: f64,
    /// Background for canvas areas not covered by the pasted crop.
    pub fill_color: FillColor,
}

impl Default for RepositionSpec {
    fn default() -> Self {
        Self {
            out_size: (512, 512),
            obj_scale: 0.2,
            pos_x: 4.0 / 9.0,
            pos_y: 3.0 / 9.0,
            fill_color: FillColor::BLACK,
        }
    }
}

impl RepositionSpec {
    pub fn validate(&self) -> Result<()> {
        let (w, h) = self.out_size;
        if w == 0 || h == 0 {
            return Err(RecomposeError::InvalidSpec(format!(
                "output size must be non-zero, got {w}x{h}"
            )));
        }
        if !(self.obj_scale.is_finite() && self.obj_scale > 0.0) {
            return Err(RecomposeError::InvalidSpec(format!(
                "object scale must be positive, got {}",
                self.obj_scale
            )));
        }
        for (name, pos) in [("pos_x", self.pos_x), ("pos_y", self.pos_y)] {
            if !(0.0..=1.0).contains(&pos) {
                return Err(RecomposeError::InvalidSpec(format!(
                    "{name} must be within [0, 1], got {pos}"
                )));
            }
        }
        Ok(())
    }
}

/// Settings for the object segmentation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Mask values below `255 * mask_threshold` are discarded.
    pub mask_threshold: f64,
    /// Straighten the object with an n-gon → rotated-rect warp before repositioning.
    pub perspective_correction: bool,
    /// Reflection strength in percent (0 disables).
    pub reflection_opacity: f64,
    /// Background used for the cutout.
    pub background: FillColor,
    /// Output canvas size. `None` keeps the size of the (straightened) input.
    pub out_size: Option<(u32, u32)>,
    pub obj_scale: f64,
    pub pos_x: f64,
    pub pos_y: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            mask_threshold: 0.5,
            perspective_correction: false,
            reflection_opacity: 0.0,
            background: FillColor::WHITE,
            out_size: None,
            obj_scale: 0.8,
            pos_x: 0.5,
            pos_y: 0.5,
        }
    }
}

impl SegmentationConfig {
    /// The reposition step for an input of size `input`.
    pub fn reposition_spec(&self, input: (u32, u32)) -> RepositionSpec {
        RepositionSpec {
            out_size: self.out_size.unwrap_or(input),
            obj_scale: self.obj_scale,
            pos_x: self.pos_x,
            pos_y: self.pos_y,
            fill_color: FillColor::BLACK,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.mask_threshold) {
            return Err(RecomposeError::InvalidSpec(format!(
                "mask threshold must be within [0, 1], got {}",
                self.mask_threshold
            )));
        }
        if !(0.0..=100.0).contains(&self.reflection_opacity) {
            return Err(RecomposeError::InvalidSpec(format!(
                "reflection opacity must be within [0, 100], got {}",
                self.reflection_opacity
            )));
        }
        // Any non-empty input size stands in when the canvas follows the input.
        self.reposition_spec((1, 1)).validate()
    }
}

/// Settings for face extraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceConfig {
    /// Upper bound on faces taken from a single detector call.
    pub max_faces: usize,
    /// Landmarks whose visibility is below this are ignored.
    pub visibility_threshold: f32,
    /// Landmarks whose presence is below this are ignored.
    pub presence_threshold: f32,
    pub reposition: RepositionSpec,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            max_faces: 10,
            visibility_threshold: 0.5,
            presence_threshold: 0.5,
            reposition: RepositionSpec::default(),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecomposeConfig {
    pub reposition: RepositionSpec,
    pub segmentation: SegmentationConfig,
    pub face: FaceConfig,
}

impl RecomposeConfig {
    /// Parse a JSON configuration document. Missing fields take defaults.
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }
}
