// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for recompose.

use thiserror::Error;

/// Top-level error type for all recompose operations.
#[derive(Debug, Error)]
pub enum RecomposeError {
    // -- Geometry errors --
    #[error("no object found in mask")]
    NoObjectFound,

    #[error("mask has no non-zero pixels")]
    EmptyMask,

    #[error("could not find the best fit n-gon (stalled at {remaining} vertices)")]
    NoFitFound { remaining: usize },

    #[error("convex hull has only {vertices} vertices, too few for a {sides}-gon")]
    HullTooSmall { vertices: usize, sides: usize },

    // -- Face errors --
    /// Shown to the end user as-is.
    #[error("Face not found")]
    NoFaceFound,

    #[error("face landmark detection failed: {0}")]
    Detector(String),

    // -- Input errors --
    #[error("invalid parameters: {0}")]
    InvalidSpec(String),

    #[error("image is {image:?} but mask is {mask:?}")]
    DimensionMismatch { image: (u32, u32), mask: (u32, u32) },

    #[error("image processing failed: {0}")]
    Image(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RecomposeError>;
