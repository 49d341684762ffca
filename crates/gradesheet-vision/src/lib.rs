// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// gradesheet-vision: Image pipeline for the Gradesheet OMR grader.
//
// Provides image handling (decode, resize, quarter-turn rotation, encode), sheet
// detection (binarization, outer contours, quad candidates, orientation search,
// perspective rectification), and grid-based bubble scoring with annotation.

pub mod detect;
pub mod grade;
pub mod image;
pub mod pipeline;

// Re-export the primary structs so callers can use `gradesheet_vision::SheetGrader` etc.
pub use detect::orientation::SheetDetection;
pub use grade::grid::GridScorer;
pub use crate::image::processor::ImageProcessor;
pub use pipeline::{GradeResult, SheetGrader};
