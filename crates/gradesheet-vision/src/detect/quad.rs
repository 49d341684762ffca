// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quad candidate selection: keep contours that are large enough and
// approximate to a four-vertex polygon.

use gradesheet_core::{Corner, Quadrilateral};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;

use super::contours::Contour;

/// A contour that may be the sheet's outer edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadCandidate {
    /// The four approximated vertices, in boundary order.
    pub quad: Quadrilateral,
    /// Area enclosed by the original (unapproximated) contour, in px².
    pub area: f64,
}

/// Filter contours down to quadrilateral candidates, largest first.
///
/// A contour survives when its enclosed area is strictly greater than
/// `area_threshold` and its Douglas-Peucker approximation, with tolerance
/// `epsilon_fraction` of its perimeter, has exactly four vertices.
/// No retrying happens here; the caller decides which thresholds to try.
pub fn select_quads(
    contours: &[Contour],
    area_threshold: f64,
    epsilon_fraction: f64,
) -> Vec<QuadCandidate> {
    let mut candidates: Vec<QuadCandidate> = contours
        .iter()
        .filter(|points| points.len() >= 4)
        .filter_map(|points| {
            let area = contour_area(points);
            if area <= area_threshold {
                return None;
            }
            let epsilon = epsilon_fraction * arc_length(points, true);
            if epsilon <= 0.0 {
                return None;
            }
            let approx = approximate_closed_polygon(points, epsilon);
            let [a, b, c, d] = approx.as_slice() else {
                return None;
            };
            Some(QuadCandidate {
                quad: Quadrilateral::new([to_corner(a), to_corner(b), to_corner(c), to_corner(d)]),
                area,
            })
        })
        .collect();

    candidates.sort_by(|a, b| b.area.total_cmp(&a.area));
    candidates
}

/// Area enclosed by a closed contour (shoelace formula).
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    let mut twice_area = 0i64;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += points[i].x as i64 * points[j].y as i64;
        twice_area -= points[j].x as i64 * points[i].y as i64;
    }
    twice_area.abs() as f64 / 2.0
}

/// Douglas-Peucker simplification of a closed boundary.
///
/// The boundary is split at the vertex farthest from its first point and each
/// half is simplified as an open curve. Vertices that end up within
/// `epsilon` of the line through their neighbours are then dropped, so a
/// tracing start in the middle of an edge does not survive as a fake corner.
pub fn approximate_closed_polygon(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let start = points[0];
    let Some(far) = (1..points.len()).max_by_key(|&i| {
        let dx = (points[i].x - start.x) as i64;
        let dy = (points[i].y - start.y) as i64;
        dx * dx + dy * dy
    }) else {
        return points.to_vec();
    };

    let mut second_half = points[far..].to_vec();
    second_half.push(start);

    let mut vertices = approximate_polygon_dp(&points[..=far], epsilon, false);
    let tail = approximate_polygon_dp(&second_half, epsilon, false);
    vertices.pop();
    vertices.extend_from_slice(&tail[..tail.len().saturating_sub(1)]);

    while vertices.len() > 3 {
        let n = vertices.len();
        let flat = (0..n).find(|&i| {
            let prev = vertices[(i + n - 1) % n];
            let next = vertices[(i + 1) % n];
            perpendicular_distance(vertices[i], prev, next) < epsilon
        });
        match flat {
            Some(i) => {
                vertices.remove(i);
            }
            None => break,
        }
    }

    vertices
}

/// Distance from `p` to the line through `a` and `b`.
fn perpendicular_distance(p: Point<i32>, a: Point<i32>, b: Point<i32>) -> f64 {
    let (dx, dy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
    let (px, py) = ((p.x - a.x) as f64, (p.y - a.y) as f64);
    let length = dx.hypot(dy);
    if length == 0.0 {
        return px.hypot(py);
    }
    (dx * py - dy * px).abs() / length
}

fn to_corner(p: &Point<i32>) -> Corner {
    Corner::new(p.x as f32, p.y as f32)
}
