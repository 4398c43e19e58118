// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// recompose-imaging — Mask geometry and object composition.
//
// Provides contour and hull extraction, best-fit rotated rectangles and
// n-gons, perspective straightening, object repositioning onto a target
// canvas, cutouts with reflections, and face-oval masks from landmarks.

pub mod codec;
pub mod compose;
pub mod face;
pub mod geometry;

// Re-export the primary entry points so callers can use `recompose_imaging::reposition` etc.
pub use compose::composer::{ObjectComposer, SegmentationOutput};
pub use compose::reposition::{mask_bounds, reposition, reposition_bytes, resize_ratio};
pub use face::detector::{FaceLandmarkDetector, StaticDetector};
pub use face::{extract_and_reposition_face, extract_face_mask, face_cutout, face_oval_masks};
pub use geometry::contour::{convex_hull, largest_contour};
pub use geometry::ngon::best_fit_ngon;
pub use geometry::perspective::correct_perspective;
pub use geometry::rect::best_fit_rect;
