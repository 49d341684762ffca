// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outer contour extraction from a binary ink mask.

use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;
use tracing::debug;

/// A closed boundary, vertices in tracing order. The last vertex connects
/// back to the first.
pub type Contour = Vec<Point<i32>>;

/// Trace the outermost boundary of every connected ink region.
///
/// Borders of holes, and of regions nested inside holes, are discarded. Each
/// boundary is reduced to the vertices where its direction changes, so a
/// filled axis-aligned rectangle comes back as four points. A mask without
/// ink yields an empty list.
pub fn outer_contours(mask: &GrayImage) -> Vec<Contour> {
    let contours: Vec<Contour> = find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| compress_chain(&c.points))
        .filter(|points| !points.is_empty())
        .collect();
    debug!(count = contours.len(), "Outer contours traced");
    contours
}

/// Drop every vertex that continues the previous step's direction, and any
/// repeated vertex.
fn compress_chain(points: &[Point<i32>]) -> Contour {
    let mut deduped: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for &p in points {
        if deduped.last() != Some(&p) {
            deduped.push(p);
        }
    }
    while deduped.len() > 1 && deduped.first() == deduped.last() {
        deduped.pop();
    }

    let n = deduped.len();
    if n < 3 {
        return deduped;
    }

    let step = |from: Point<i32>, to: Point<i32>| ((to.x - from.x).signum(), (to.y - from.y).signum());

    (0..n)
        .filter(|&i| {
            let prev = deduped[(i + n - 1) % n];
            let here = deduped[i];
            let next = deduped[(i + 1) % n];
            step(prev, here) != step(here, next)
        })
        .map(|i| deduped[i])
        .collect()
}
