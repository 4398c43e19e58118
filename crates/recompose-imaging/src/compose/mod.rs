// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Composition module — mask preparation, repositioning onto an output canvas,
// and cutouts.

pub mod composer;
pub mod cutout;
pub mod mask;
pub mod reposition;

pub use composer::ObjectComposer;
