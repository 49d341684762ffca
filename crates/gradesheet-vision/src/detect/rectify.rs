// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification: order the detected corners and warp the sheet
// onto the canonical rectangle.

use gradesheet_core::error::GradesheetError;
use gradesheet_core::{Corner, Quadrilateral};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, info, instrument, warn};

/// Reorder four corners into `[top_left, top_right, bottom_left, bottom_right]`.
///
/// Smallest `x + y` is top-left, largest is bottom-right; of the other two the
/// one further right (then higher, on a tie) is top-right. The rule assumes
/// the sheet sits within roughly 45° of upright; a sheet photographed at a
/// diagonal can come out mislabelled.
pub fn order_corners(quad: &Quadrilateral) -> Quadrilateral {
    let corners = quad.corners;
    let sum = |c: &Corner| c.x + c.y;

    let tl = (0..4)
        .min_by(|&a, &b| sum(&corners[a]).total_cmp(&sum(&corners[b])))
        .unwrap_or(0);
    let br = (0..4)
        .filter(|&i| i != tl)
        .max_by(|&a, &b| sum(&corners[a]).total_cmp(&sum(&corners[b])))
        .unwrap_or(3);

    let mut rest = (0..4).filter(|&i| i != tl && i != br);
    let (first, second) = match (rest.next(), rest.next()) {
        (Some(a), Some(b)) => (corners[a], corners[b]),
        _ => (corners[1], corners[2]),
    };
    let first_is_right = first.x > second.x || (first.x == second.x && first.y < second.y);
    let (tr, bl) = if first_is_right {
        (first, second)
    } else {
        (second, first)
    };

    Quadrilateral::new([corners[tl], tr, bl, corners[br]])
}

/// Warp the region inside `quad` to an exactly `width` x `height` image.
///
/// The corners are ordered first, then mapped to `(0,0)`, `(W,0)`, `(0,H)`,
/// `(W,H)`. Collinear or zero-area quads, and quads no projective transform
/// can map, fail with `RectificationFailed`. Pixels that fall outside the
/// photo come out white.
#[instrument(skip(image), fields(src_w = image.width(), src_h = image.height()))]
pub fn rectify(
    image: &DynamicImage,
    quad: &Quadrilateral,
    width: u32,
    height: u32,
) -> Result<RgbImage, GradesheetError> {
    let ordered = order_corners(quad);
    if ordered.is_degenerate() {
        warn!(?ordered, "Degenerate sheet quadrilateral");
        return Err(GradesheetError::RectificationFailed(format!(
            "corners enclose {:.1} px²",
            gradesheet_core::shoelace_area(&ordered.perimeter_order())
        )));
    }
    debug!(
        top_left = ?ordered.corners[0],
        top_right = ?ordered.corners[1],
        bottom_left = ?ordered.corners[2],
        bottom_right = ?ordered.corners[3],
        "Corners ordered"
    );

    let (w, h) = (width as f32, height as f32);
    let src = ordered.corners.map(|c| (c.x, c.y));
    let dest = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)];

    let projection = Projection::from_control_points(src, dest).ok_or_else(|| {
        GradesheetError::RectificationFailed("no projective transform maps these corners".into())
    })?;

    let input = image.to_rgb8();
    let mut output = RgbImage::new(width, height);
    warp_into(&input, &projection, Interpolation::Bilinear, Rgb([255, 255, 255]), &mut output);

    info!(width, height, "Sheet rectified");
    Ok(output)
}
