// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Orientation search: try each quarter turn and each area threshold in a
// fixed order until a sheet candidate appears.

use gradesheet_core::error::GradesheetError;
use gradesheet_core::{LayoutConfig, QuarterTurn};
use image::DynamicImage;
use tracing::{debug, info, instrument, warn};

use super::contours::{Contour, outer_contours};
use super::preprocess::binarize;
use super::quad::{QuadCandidate, select_quads};
use crate::image::processor::ImageProcessor;

/// The winning attempt of a sheet search.
#[derive(Debug, Clone)]
pub struct SheetDetection {
    /// The photo after applying `rotation`.
    pub image: DynamicImage,
    /// Largest candidate found under the winning threshold.
    pub candidate: QuadCandidate,
    pub rotation: QuarterTurn,
    pub area_threshold: f64,
    /// Attempts made, the winning one included.
    pub attempts: usize,
}

/// Every (rotation, threshold) pair in search priority order.
///
/// Rotation is the outer loop and threshold the inner one, so all thresholds
/// are tried on the upright photo before it is ever turned. The order is
/// fixed; on an ambiguous photo it decides which candidate wins.
pub fn search_plan(layout: &LayoutConfig) -> impl Iterator<Item = (QuarterTurn, f64)> + '_ {
    layout.rotations.iter().flat_map(move |&turn| {
        layout
            .area_thresholds
            .iter()
            .map(move |&threshold| (turn, threshold))
    })
}

/// Find the sheet boundary, turning the photo if necessary.
///
/// The first pair of [`search_plan`] that yields at least one quad candidate
/// wins and its largest candidate is returned. When no pair does,
/// `NoSheetDetected` reports how many were tried, always
/// [`LayoutConfig::search_attempts`].
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn find_sheet(image: &DynamicImage, layout: &LayoutConfig) -> Result<SheetDetection, GradesheetError> {
    debug!(planned = layout.search_attempts(), "Sheet search started");
    let mut attempts = 0;
    let mut prepared: Option<(QuarterTurn, DynamicImage, Vec<Contour>)> = None;

    for (turn, threshold) in search_plan(layout) {
        attempts += 1;

        if prepared.as_ref().map(|(t, _, _)| *t) != Some(turn) {
            let rotated = ImageProcessor::from_dynamic(image.clone())
                .rotate(turn)
                .into_dynamic();
            let contours = outer_contours(&binarize(&rotated, layout));
            prepared = Some((turn, rotated, contours));
        }
        let Some((_, rotated, contours)) = prepared.as_ref() else {
            continue;
        };

        let candidates = select_quads(contours, threshold, layout.poly_epsilon);
        debug!(
            attempt = attempts,
            rotation = %turn,
            threshold,
            candidates = candidates.len(),
            "Sheet search attempt"
        );

        if let Some(&candidate) = candidates.first() {
            info!(
                rotation = %turn,
                threshold,
                area = candidate.area,
                attempts,
                "Sheet boundary found"
            );
            return Ok(SheetDetection {
                image: rotated.clone(),
                candidate,
                rotation: turn,
                area_threshold: threshold,
                attempts,
            });
        }
    }

    warn!(attempts, "No sheet boundary under any rotation or threshold");
    Err(GradesheetError::NoSheetDetected { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradesheet_core::SubjectLayout;
    use image::{Rgb, RgbImage};
    use imageproc::drawing::draw_hollow_rect_mut;
    use imageproc::rect::Rect;

    fn layout() -> LayoutConfig {
        LayoutConfig::new(vec![SubjectLayout::new("Any", 10)])
    }

    /// White photo with a 3-pixel black sheet border.
    fn framed(width: u32, height: u32, frame: Rect) -> DynamicImage {
        let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        for inset in 0..3 {
            let r = Rect::at(frame.left() + inset, frame.top() + inset)
                .of_size(frame.width() - 2 * inset as u32, frame.height() - 2 * inset as u32);
            draw_hollow_rect_mut(&mut img, r, Rgb([0, 0, 0]));
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn plan_is_rotation_major() {
        let plan: Vec<(QuarterTurn, f64)> = search_plan(&layout()).collect();
        assert_eq!(plan.len(), 12);
        assert_eq!(plan[0], (QuarterTurn::None, 50_000.0));
        assert_eq!(plan[2], (QuarterTurn::None, 10_000.0));
        assert_eq!(plan[3], (QuarterTurn::Clockwise90, 50_000.0));
        assert_eq!(plan[11], (QuarterTurn::Clockwise270, 10_000.0));
    }

    #[test]
    fn blank_photo_exhausts_every_attempt() {
        let blank = DynamicImage::ImageRgb8(RgbImage::from_pixel(600, 780, Rgb([255, 255, 255])));
        let err = find_sheet(&blank, &layout()).unwrap_err();
        match err {
            GradesheetError::NoSheetDetected { attempts } => assert_eq!(attempts, 12),
            other => panic!("expected NoSheetDetected, got {other:?}"),
        }
    }

    #[test]
    fn attempt_count_follows_configured_search_space() {
        let layout = layout()
            .with_rotations(vec![QuarterTurn::None, QuarterTurn::Clockwise180])
            .with_area_thresholds(vec![40_000.0, 20_000.0, 5_000.0, 1_000.0]);
        let blank = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([240, 240, 240])));
        let err = find_sheet(&blank, &layout).unwrap_err();
        assert_eq!(layout.search_attempts(), 8);
        assert!(matches!(err, GradesheetError::NoSheetDetected { attempts: 8 }));
    }

    #[test]
    fn large_sheet_found_on_first_attempt() {
        let photo = framed(600, 780, Rect::at(40, 40).of_size(520, 700));
        let detection = find_sheet(&photo, &layout()).unwrap();
        assert_eq!(detection.attempts, 1);
        assert_eq!(detection.rotation, QuarterTurn::None);
        assert_eq!(detection.area_threshold, 50_000.0);
        assert!(detection.candidate.area > 520.0 * 700.0 * 0.95);
    }

    #[test]
    fn small_sheet_needs_relaxed_threshold() {
        // About 20 000 px²: fails 50 000 and 30 000, passes 10 000.
        let photo = framed(600, 780, Rect::at(200, 300).of_size(140, 145));
        let detection = find_sheet(&photo, &layout()).unwrap();
        assert_eq!(detection.attempts, 3);
        assert_eq!(detection.area_threshold, 10_000.0);
        assert_eq!(detection.rotation, QuarterTurn::None);
    }

    #[test]
    fn winning_image_is_the_rotated_photo() {
        let layout = layout().with_rotations(vec![QuarterTurn::Clockwise90]);
        let photo = framed(600, 780, Rect::at(40, 40).of_size(520, 700));
        let detection = find_sheet(&photo, &layout).unwrap();
        assert_eq!(detection.rotation, QuarterTurn::Clockwise90);
        assert_eq!((detection.image.width(), detection.image.height()), (780, 600));
    }
}
