// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Face landmark detection seam.

use std::path::Path;

use image::RgbImage;
use recompose_core::Result;
use serde::{Deserialize, Serialize};

use super::landmarks::FaceLandmarks;

/// Anything that can find face-mesh landmarks in a photo.
///
/// Implementations return one entry per detected face (possibly none); they
/// report `RecomposeError::Detector` only when the backend itself fails.
pub trait FaceLandmarkDetector {
    fn detect(&self, image: &RgbImage) -> Result<Vec<FaceLandmarks>>;
}

/// A detector that returns landmarks computed ahead of time, regardless of
/// the image it is given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticDetector {
    pub faces: Vec<FaceLandmarks>,
}

impl StaticDetector {
    pub fn new(faces: Vec<FaceLandmarks>) -> Self {
        Self { faces }
    }

    /// Parse `{ "faces": [ { "landmarks": [ { "x": .., "y": .. }, .. ] } ] }`.
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }
}

impl FaceLandmarkDetector for StaticDetector {
    fn detect(&self, _image: &RgbImage) -> Result<Vec<FaceLandmarks>> {
        Ok(self.faces.clone())
    }
}
