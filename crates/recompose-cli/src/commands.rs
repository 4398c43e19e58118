// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand handlers.

use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;
use recompose_core::{RecomposeConfig, RepositionSpec, SegmentationConfig};
use recompose_imaging::codec;
use recompose_imaging::{
    ObjectComposer, StaticDetector, best_fit_ngon, best_fit_rect, extract_and_reposition_face,
    extract_face_mask, face_cutout, reposition,
};
use tracing::info;

use crate::{Cli, Command, PlacementArgs};

impl PlacementArgs {
    /// Apply the command-line overrides on top of `base`.
    pub fn apply(&self, base: RepositionSpec) -> RepositionSpec {
        RepositionSpec {
            out_size: (
                self.width.unwrap_or(base.out_size.0),
                self.height.unwrap_or(base.out_size.1),
            ),
            obj_scale: self.scale.unwrap_or(base.obj_scale),
            pos_x: self.pos_x.unwrap_or(base.pos_x),
            pos_y: self.pos_y.unwrap_or(base.pos_y),
            fill_color: base.fill_color,
        }
    }

    /// Apply the overrides to a segmentation config whose input is `input` pixels.
    pub fn apply_to_segmentation(&self, config: &mut SegmentationConfig, input: (u32, u32)) {
        if self.width.is_some() || self.height.is_some() {
            let (w, h) = config.out_size.unwrap_or(input);
            config.out_size = Some((self.width.unwrap_or(w), self.height.unwrap_or(h)));
        }
        config.obj_scale = self.scale.unwrap_or(config.obj_scale);
        config.pos_x = self.pos_x.unwrap_or(config.pos_x);
        config.pos_y = self.pos_y.unwrap_or(config.pos_y);
    }
}

fn load_config(path: Option<&Path>) -> Result<RecomposeConfig> {
    match path {
        Some(path) => RecomposeConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(RecomposeConfig::default()),
    }
}

fn save(image: DynamicImage, path: &Path) -> Result<()> {
    codec::save(&image, path).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote image");
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))
}

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Reposition {
            image,
            mask,
            out_image,
            out_mask,
            placement,
        } => {
            let spec = placement.apply(config.reposition);
            let photo = codec::open_rgb(&image)?;
            let object = codec::open_mask(&mask)?;
            let (resized, resized_mask) =
                reposition(&photo, &object, &spec).context("repositioning failed")?;
            save(DynamicImage::ImageRgb8(resized), &out_image)?;
            save(DynamicImage::ImageLuma8(resized_mask), &out_mask)?;
        }

        Command::FitNgon { mask, sides } => {
            let object = codec::open_mask(&mask)?;
            let polygon = best_fit_ngon(&object, sides)
                .with_context(|| format!("no {sides}-gon fits {}", mask.display()))?;
            println!("{}", serde_json::to_string_pretty(&polygon)?);
        }

        Command::FitRect { mask } => {
            let object = codec::open_mask(&mask)?;
            let rect = best_fit_rect(&object)
                .with_context(|| format!("no rectangle fits {}", mask.display()))?;
            println!("{}", serde_json::to_string_pretty(&rect)?);
        }

        Command::Segment {
            image,
            mask,
            out_dir,
            perspective,
            reflection,
            placement,
        } => {
            let mut segmentation = config.segmentation;
            segmentation.perspective_correction |= perspective;
            if let Some(opacity) = reflection {
                segmentation.reflection_opacity = opacity;
            }
            let photo = codec::open_rgb(&image)?;
            placement.apply_to_segmentation(&mut segmentation, photo.dimensions());

            let composer = ObjectComposer::new(photo, codec::open_mask(&mask)?)?;
            let output = composer
                .run_segmentation(&segmentation)
                .context("segmentation pipeline failed")?;

            ensure_dir(&out_dir)?;
            save(DynamicImage::ImageLuma8(output.mask), &out_dir.join("mask.png"))?;
            save(
                DynamicImage::ImageRgb8(output.resized_image),
                &out_dir.join("resized.png"),
            )?;
            save(
                DynamicImage::ImageLuma8(output.resized_mask),
                &out_dir.join("resized_mask.png"),
            )?;
            save(DynamicImage::ImageRgb8(output.cutout), &out_dir.join("cutout.png"))?;
        }

        Command::Face {
            image,
            landmarks,
            out_dir,
            placement,
        } => {
            let mut face = config.face;
            face.reposition = placement.apply(face.reposition);

            let photo = codec::open_rgb(&image)?;
            let detector = StaticDetector::load(&landmarks)
                .with_context(|| format!("failed to read landmarks {}", landmarks.display()))?;

            let mask = extract_face_mask(&photo, &detector, &face)?;
            let cutout = face_cutout(&photo, &mask)?;
            let (resized, resized_mask) = extract_and_reposition_face(&photo, &detector, &face)?;

            ensure_dir(&out_dir)?;
            save(DynamicImage::ImageLuma8(mask), &out_dir.join("face_mask.png"))?;
            save(DynamicImage::ImageRgb8(cutout), &out_dir.join("face_cutout.png"))?;
            save(DynamicImage::ImageRgb8(resized), &out_dir.join("face_resized.png"))?;
            save(
                DynamicImage::ImageLuma8(resized_mask),
                &out_dir.join("face_resized_mask.png"),
            )?;
        }
    }

    Ok(())
}
