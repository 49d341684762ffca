// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sheet detection: binarization, outer contour tracing, quad candidate
// selection, orientation search and perspective rectification.

pub mod contours;
pub mod orientation;
pub mod preprocess;
pub mod quad;
pub mod rectify;

pub use orientation::{SheetDetection, find_sheet};
pub use rectify::{order_corners, rectify};
