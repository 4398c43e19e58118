// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Face-mesh landmarks and the face-oval subset.

use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// Face-mesh edges tracing the outline of the face, as landmark index pairs.
pub const FACE_OVAL: [(usize, usize); 36] = [
    (10, 338),
    (338, 297),
    (297, 332),
    (332, 284),
    (284, 251),
    (251, 389),
    (389, 356),
    (356, 454),
    (454, 323),
    (323, 361),
    (361, 288),
    (288, 397),
    (397, 365),
    (365, 379),
    (379, 378),
    (378, 400),
    (400, 377),
    (377, 152),
    (152, 148),
    (148, 176),
    (176, 149),
    (149, 150),
    (150, 136),
    (136, 172),
    (172, 58),
    (58, 132),
    (132, 93),
    (93, 234),
    (234, 127),
    (127, 162),
    (162, 21),
    (21, 54),
    (54, 103),
    (103, 67),
    (67, 109),
    (109, 10),
];

/// A single landmark in normalized image coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// False when a reported visibility or presence score is under its threshold.
    pub fn is_confident(&self, visibility_threshold: f32, presence_threshold: f32) -> bool {
        let visible = self.visibility.is_none_or(|v| v >= visibility_threshold);
        let present = self.presence.is_none_or(|p| p >= presence_threshold);
        visible && present
    }
}

/// All landmarks of one detected face, indexed like the face mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    pub landmarks: Vec<Landmark>,
}

fn is_normalized(value: f32) -> bool {
    const TOLERANCE: f32 = 1e-6;
    (value > 0.0 || value.abs() <= TOLERANCE) && (value < 1.0 || (value - 1.0).abs() <= TOLERANCE)
}

/// Map normalized coordinates to a pixel, or `None` if they fall outside [0, 1].
pub fn normalized_to_pixel(x: f32, y: f32, width: u32, height: u32) -> Option<Point<i32>> {
    if width == 0 || height == 0 || !is_normalized(x) || !is_normalized(y) {
        return None;
    }
    let px = ((x as f64 * width as f64).floor() as i64).clamp(0, width as i64 - 1);
    let py = ((y as f64 * height as f64).floor() as i64).clamp(0, height as i64 - 1);
    Some(Point::new(px as i32, py as i32))
}

impl FaceLandmarks {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Pixel positions of the face-oval landmarks.
    ///
    /// An oval edge contributes its two endpoints only when both are
    /// confident and inside the image, so points may repeat.
    pub fn face_oval_points(
        &self,
        width: u32,
        height: u32,
        visibility_threshold: f32,
        presence_threshold: f32,
    ) -> Vec<Point<i32>> {
        let pixel = |idx: usize| {
            self.landmarks
                .get(idx)
                .filter(|lm| lm.is_confident(visibility_threshold, presence_threshold))
                .and_then(|lm| normalized_to_pixel(lm.x, lm.y, width, height))
        };

        let mut points = Vec::with_capacity(FACE_OVAL.len() * 2);
        for &(start, end) in FACE_OVAL.iter() {
            if let (Some(a), Some(b)) = (pixel(start), pixel(end)) {
                points.push(a);
                points.push(b);
            }
        }
        points
    }
}
