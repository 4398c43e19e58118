// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry module — contours, hulls, rotated rectangles, n-gon fitting, and
// perspective straightening of masked objects.

pub mod contour;
pub mod ngon;
pub mod perspective;
pub mod rect;
