// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// recompose — reposition masked objects and faces, fit shapes to masks.
//
// Entry point. Initialises logging, parses arguments, and dispatches to the
// subcommand handlers.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use recompose_core::RecomposeError;
use recompose_core::human_errors::humanize_error;

/// Reposition objects and faces in photos, and fit shapes to masks
#[derive(Parser, Debug)]
#[command(name = "recompose", version)]
#[command(about = "Reposition masked objects and faces, fit n-gons and rectangles", long_about = None)]
pub struct Cli {
    /// JSON configuration file; missing keys take their defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rescale and move the masked object onto a new canvas
    Reposition {
        /// Input photo
        #[arg(short, long)]
        image: PathBuf,
        /// Object mask (first channel, non-zero is object)
        #[arg(short, long)]
        mask: PathBuf,
        /// Where to write the repositioned photo
        #[arg(long, default_value = "resized.png")]
        out_image: PathBuf,
        /// Where to write the repositioned mask
        #[arg(long, default_value = "resized_mask.png")]
        out_mask: PathBuf,
        #[command(flatten)]
        placement: PlacementArgs,
    },

    /// Fit an n-sided polygon around the largest object in a mask (prints JSON)
    FitNgon {
        #[arg(short, long)]
        mask: PathBuf,
        /// Number of sides
        #[arg(short, long, default_value_t = 4)]
        sides: usize,
    },

    /// Fit a minimum-area rotated rectangle to a mask (prints JSON)
    FitRect {
        #[arg(short, long)]
        mask: PathBuf,
    },

    /// Clean up a segmentation mask and compose the object onto a background
    Segment {
        #[arg(short, long)]
        image: PathBuf,
        #[arg(short, long)]
        mask: PathBuf,
        /// Directory for mask.png, resized.png, resized_mask.png and cutout.png
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Straighten the object with a perspective warp first
        #[arg(long)]
        perspective: bool,
        /// Reflection opacity in percent (0 disables)
        #[arg(long)]
        reflection: Option<f64>,
        #[command(flatten)]
        placement: PlacementArgs,
    },

    /// Build face masks from precomputed landmarks and reposition the face
    Face {
        #[arg(short, long)]
        image: PathBuf,
        /// Landmarks JSON: {"faces": [{"landmarks": [{"x": .., "y": ..}, ..]}]}
        #[arg(short, long)]
        landmarks: PathBuf,
        /// Directory for face_mask.png, face_cutout.png, face_resized.png and face_resized_mask.png
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        #[command(flatten)]
        placement: PlacementArgs,
    },
}

/// Overrides for the configured reposition spec.
#[derive(Args, Debug, Default, Clone)]
pub struct PlacementArgs {
    /// Output width in pixels
    #[arg(long)]
    pub width: Option<u32>,
    /// Output height in pixels
    #[arg(long)]
    pub height: Option<u32>,
    /// Object size as a fraction of the output
    #[arg(long)]
    pub scale: Option<f64>,
    /// Horizontal object center as a fraction of the output width
    #[arg(long)]
    pub pos_x: Option<f64>,
    /// Vertical object center as a fraction of the output height
    #[arg(long)]
    pub pos_y: Option<f64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "Arguments parsed");

    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

/// Print the error chain, plus a suggestion when the root cause is ours.
fn report(err: &anyhow::Error) {
    eprintln!("error: {err:#}");
    if let Some(cause) = err.chain().find_map(|e| e.downcast_ref::<RecomposeError>()) {
        let human = humanize_error(cause);
        eprintln!("hint: {}", human.suggestion);
    }
}
