// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grading pipeline: one call per photographed sheet, from raw photo to
// annotated sheet and per-subject scores.

use gradesheet_core::error::GradesheetError;
use gradesheet_core::{AnswerKey, GradeReport, LayoutConfig, Quadrilateral};
use image::{DynamicImage, RgbImage};
use tracing::{info, instrument};

use crate::detect::orientation::find_sheet;
use crate::detect::rectify::{order_corners, rectify};
use crate::grade::grid::{GridScorer, split_and_stack};
use crate::image::processor::ImageProcessor;

/// Everything a successful grading run produces.
#[derive(Debug, Clone)]
pub struct GradeResult {
    pub report: GradeReport,
    /// Rectified sheet with awarded cells outlined.
    pub annotated: RgbImage,
    /// Sheet corners in the resized, rotated photo, ordered
    /// top-left, top-right, bottom-left, bottom-right.
    pub corners: Quadrilateral,
}

/// Grades photographed answer sheets against one answer key.
///
/// Holds only immutable configuration, so one grader can serve any number
/// of sheets, from any number of threads.
#[derive(Debug, Clone)]
pub struct SheetGrader {
    layout: LayoutConfig,
    key: AnswerKey,
}

impl SheetGrader {
    /// Validate the layout and key together. Any mismatch is reported here,
    /// before a single photo is looked at.
    pub fn new(layout: LayoutConfig, key: AnswerKey) -> Result<Self, GradesheetError> {
        layout.validate()?;
        key.validate(&layout)?;
        Ok(Self { layout, key })
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn key(&self) -> &AnswerKey {
        &self.key
    }

    /// Decode an uploaded JPEG/PNG buffer and grade it.
    #[instrument(skip_all, fields(data_len = data.len()))]
    pub fn grade_bytes(&self, data: &[u8]) -> Result<GradeResult, GradesheetError> {
        let photo = ImageProcessor::from_bytes(data)?.into_dynamic();
        self.grade(&photo)
    }

    /// Load a photo from disk and grade it.
    pub fn grade_file(&self, path: impl AsRef<std::path::Path>) -> Result<GradeResult, GradesheetError> {
        let photo = ImageProcessor::open(path)?.into_dynamic();
        self.grade(&photo)
    }

    /// Run the full pipeline on one decoded photo.
    ///
    /// 1. Resize to the canonical sheet size
    /// 2. Orientation search for the sheet boundary
    /// 3. Perspective rectification of the winning candidate
    /// 4. Split at `split_percent` and re-stack into the working image
    /// 5. Grid scoring and annotation
    ///
    /// Fails with `NoSheetDetected` or `RectificationFailed`; never returns
    /// a partial result.
    #[instrument(skip_all, fields(width = photo.width(), height = photo.height()))]
    pub fn grade(&self, photo: &DynamicImage) -> Result<GradeResult, GradesheetError> {
        let (width, height) = (self.layout.canonical_width, self.layout.canonical_height);

        let resized = ImageProcessor::from_dynamic(photo.clone())
            .resize_exact(width, height)
            .into_dynamic();

        let detection = find_sheet(&resized, &self.layout)?;
        let corners = order_corners(&detection.candidate.quad);
        let rectified = rectify(&detection.image, &corners, width, height)?;

        let working = split_and_stack(&rectified, self.layout.split_percent);
        let (annotated, subjects) = GridScorer::new(&self.layout, &self.key)?.score(&working);

        let report = GradeReport {
            subjects,
            rotation: detection.rotation,
            area_threshold: detection.area_threshold,
        };
        info!(
            total = report.total(),
            max_total = report.max_total(),
            rotation = %report.rotation,
            "Sheet graded"
        );

        Ok(GradeResult {
            report,
            annotated,
            corners,
        })
    }
}
