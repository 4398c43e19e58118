// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Face module — face-oval masks from landmarks, cutouts, and repositioning a
// face onto an output canvas.

pub mod detector;
pub mod landmarks;

use image::{GrayImage, Luma, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::geometry::convex_hull;
use imageproc::point::Point;
use recompose_core::{FaceConfig, RecomposeError, Result};
use tracing::{debug, info, instrument, warn};

use crate::compose::mask::apply_mask;
use crate::compose::reposition::reposition;
use detector::FaceLandmarkDetector;

pub use detector::StaticDetector;
pub use landmarks::{FACE_OVAL, FaceLandmarks, Landmark};

/// Convex hulls of the face ovals found in `image`, one per usable face.
///
/// Faces whose visible oval points do not span an area are skipped; if no
/// face is left the result is `NoFaceFound`.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn face_oval_hulls(
    image: &RgbImage,
    detector: &dyn FaceLandmarkDetector,
    config: &FaceConfig,
) -> Result<Vec<Vec<Point<i32>>>> {
    let faces = detector.detect(image)?;
    debug!(detected = faces.len(), "Landmarks detected");

    let (width, height) = image.dimensions();
    let mut hulls = Vec::new();
    for (idx, face) in faces.iter().take(config.max_faces).enumerate() {
        let mut points = face.face_oval_points(
            width,
            height,
            config.visibility_threshold,
            config.presence_threshold,
        );
        points.sort_by_key(|p| (p.x, p.y));
        points.dedup();
        if points.len() < 3 {
            warn!(face = idx, points = points.len(), "Face oval too sparse; skipping");
            continue;
        }
        let hull = convex_hull(points.as_slice());
        if hull.len() < 3 {
            warn!(face = idx, "Face oval is degenerate; skipping");
            continue;
        }
        hulls.push(hull);
    }

    if hulls.is_empty() {
        return Err(RecomposeError::NoFaceFound);
    }
    Ok(hulls)
}

fn fill_hull(mask: &mut GrayImage, hull: &[Point<i32>]) {
    draw_polygon_mut(mask, hull, Luma([255u8]));
}

/// One filled face-oval mask per detected face.
pub fn face_oval_masks(
    image: &RgbImage,
    detector: &dyn FaceLandmarkDetector,
    config: &FaceConfig,
) -> Result<Vec<GrayImage>> {
    let (width, height) = image.dimensions();
    let masks = face_oval_hulls(image, detector, config)?
        .iter()
        .map(|hull| {
            let mut mask = GrayImage::new(width, height);
            fill_hull(&mut mask, hull);
            mask
        })
        .collect();
    Ok(masks)
}

/// A single mask covering every detected face.
#[instrument(skip_all)]
pub fn extract_face_mask(
    image: &RgbImage,
    detector: &dyn FaceLandmarkDetector,
    config: &FaceConfig,
) -> Result<GrayImage> {
    let hulls = face_oval_hulls(image, detector, config)?;
    let mut mask = GrayImage::new(image.width(), image.height());
    for hull in &hulls {
        fill_hull(&mut mask, hull);
    }
    info!(faces = hulls.len(), "Face mask extracted");
    Ok(mask)
}

/// The photo with everything outside the face mask blacked out.
pub fn face_cutout(image: &RgbImage, mask: &GrayImage) -> Result<RgbImage> {
    if image.dimensions() != mask.dimensions() {
        return Err(RecomposeError::DimensionMismatch {
            image: image.dimensions(),
            mask: mask.dimensions(),
        });
    }
    Ok(apply_mask(image, mask))
}

/// Reposition the first detected face according to `config.reposition`.
#[instrument(skip_all)]
pub fn extract_and_reposition_face(
    image: &RgbImage,
    detector: &dyn FaceLandmarkDetector,
    config: &FaceConfig,
) -> Result<(RgbImage, GrayImage)> {
    let mut masks = face_oval_masks(image, detector, config)?;
    if masks.len() > 1 {
        debug!(faces = masks.len(), "Using the first face only");
    }
    let mask = masks.swap_remove(0);
    reposition(image, &mask, &config.reposition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use recompose_core::RepositionSpec;

    use crate::compose::reposition::mask_bounds;

    /// Landmarks with the face oval traced as an ellipse around (cx, cy).
    fn oval_face(cx: f32, cy: f32, rx: f32, ry: f32) -> FaceLandmarks {
        let mut landmarks = vec![Landmark::new(cx, cy); 478];
        for (i, &(start, _)) in FACE_OVAL.iter().enumerate() {
            let t = i as f32 / FACE_OVAL.len() as f32 * std::f32::consts::TAU;
            landmarks[start] = Landmark::new(cx + rx * t.sin(), cy - ry * t.cos());
        }
        FaceLandmarks::new(landmarks)
    }

    #[test]
    fn no_detections_is_no_face_found() {
        let detector = StaticDetector::default();
        let err = face_oval_masks(&RgbImage::new(50, 50), &detector, &FaceConfig::default())
            .unwrap_err();
        assert!(matches!(err, RecomposeError::NoFaceFound));
        assert_eq!(err.to_string(), "Face not found");
    }

    #[test]
    fn invisible_face_is_no_face_found() {
        let mut face = oval_face(0.5, 0.5, 0.2, 0.3);
        for lm in &mut face.landmarks {
            lm.presence = Some(0.1);
        }
        let detector = StaticDetector::new(vec![face]);
        let err = extract_face_mask(&RgbImage::new(50, 50), &detector, &FaceConfig::default())
            .unwrap_err();
        assert!(matches!(err, RecomposeError::NoFaceFound));
    }

    #[test]
    fn oval_mask_covers_face_only() {
        let image = RgbImage::new(100, 100);
        let detector = StaticDetector::new(vec![oval_face(0.5, 0.5, 0.2, 0.3)]);
        let masks = face_oval_masks(&image, &detector, &FaceConfig::default()).unwrap();
        assert_eq!(masks.len(), 1);
        let mask = &masks[0];
        assert_eq!(mask.get_pixel(50, 50).0[0], 255);
        assert_eq!(mask.get_pixel(5, 5).0[0], 0);

        let b = mask_bounds(mask).unwrap();
        assert!((b.xmin as i32 - 30).abs() <= 2 && (b.xmax as i32 - 70).abs() <= 2, "{b:?}");
        assert!((b.ymin as i32 - 20).abs() <= 2 && (b.ymax as i32 - 80).abs() <= 2, "{b:?}");
    }

    #[test]
    fn union_mask_and_max_faces() {
        let image = RgbImage::new(200, 100);
        let detector = StaticDetector::new(vec![
            oval_face(0.25, 0.5, 0.1, 0.3),
            oval_face(0.75, 0.5, 0.1, 0.3),
        ]);
        let mask = extract_face_mask(&image, &detector, &FaceConfig::default()).unwrap();
        assert_eq!(mask.get_pixel(50, 50).0[0], 255);
        assert_eq!(mask.get_pixel(150, 50).0[0], 255);
        assert_eq!(mask.get_pixel(100, 50).0[0], 0);

        let one = FaceConfig {
            max_faces: 1,
            ..FaceConfig::default()
        };
        let mask = extract_face_mask(&image, &detector, &one).unwrap();
        assert_eq!(mask.get_pixel(150, 50).0[0], 0);
    }

    #[test]
    fn cutout_keeps_face_pixels() {
        let image = RgbImage::from_pixel(100, 100, Rgb([90, 80, 70]));
        let detector = StaticDetector::new(vec![oval_face(0.5, 0.5, 0.2, 0.3)]);
        let mask = extract_face_mask(&image, &detector, &FaceConfig::default()).unwrap();
        let cut = face_cutout(&image, &mask).unwrap();
        assert_eq!(cut.get_pixel(50, 50).0, [90, 80, 70]);
        assert_eq!(cut.get_pixel(2, 2).0, [0, 0, 0]);
    }

    #[test]
    fn face_is_repositioned_to_requested_scale() {
        let image = RgbImage::from_pixel(200, 200, Rgb([200, 150, 120]));
        let detector = StaticDetector::new(vec![oval_face(0.3, 0.6, 0.1, 0.15)]);
        let config = FaceConfig {
            reposition: RepositionSpec {
                out_size: (256, 256),
                obj_scale: 0.5,
                pos_x: 0.5,
                pos_y: 0.5,
                ..RepositionSpec::default()
            },
            ..FaceConfig::default()
        };
        let (out_image, out_mask) =
            extract_and_reposition_face(&image, &detector, &config).unwrap();
        assert_eq!(out_image.dimensions(), (256, 256));

        let b = mask_bounds(&out_mask).unwrap();
        let height = (b.ymax - b.ymin) as f64;
        assert!((height / 256.0 - 0.5).abs() < 0.03, "height {height}");
        let (cx, cy) = b.center();
        assert!((cx as i64 - 128).abs() <= 4 && (cy as i64 - 128).abs() <= 4, "center {cx},{cy}");
    }
}
