// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Gradesheet grader.

use serde::{Deserialize, Serialize};

use crate::key::Answer;

/// Quadrilaterals enclosing less than this many square pixels are degenerate.
pub const MIN_QUAD_AREA: f32 = 1.0;

/// Clockwise rotation applied to a photo before sheet detection.
///
/// Only quarter turns are supported; the grader never estimates arbitrary
/// skew angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuarterTurn {
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl QuarterTurn {
    /// All four turns in search order.
    pub const ALL: [QuarterTurn; 4] = [
        Self::None,
        Self::Clockwise90,
        Self::Clockwise180,
        Self::Clockwise270,
    ];

    /// Build from a clockwise angle in degrees. Returns `None` unless the
    /// angle is a multiple of 90.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::None),
            90 => Some(Self::Clockwise90),
            180 => Some(Self::Clockwise180),
            270 => Some(Self::Clockwise270),
            _ => None,
        }
    }

    /// Clockwise angle in degrees (0, 90, 180 or 270).
    pub fn degrees(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 90,
            Self::Clockwise180 => 180,
            Self::Clockwise270 => 270,
        }
    }
}

impl std::fmt::Display for QuarterTurn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// A sub-pixel image coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    pub x: f32,
    pub y: f32,
}

impl Corner {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Corner {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Exactly four corners of a candidate sheet boundary.
///
/// As detected, the corners follow the traced boundary in no particular
/// starting position. After canonical ordering they are
/// `[top_left, top_right, bottom_left, bottom_right]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    pub corners: [Corner; 4],
}

impl Quadrilateral {
    pub fn new(corners: [Corner; 4]) -> Self {
        Self { corners }
    }

    /// Area enclosed when the corners are walked in their stored order.
    pub fn area(&self) -> f32 {
        shoelace_area(&self.corners)
    }

    /// Treat the corners as canonically ordered (TL, TR, BL, BR) and return
    /// them in boundary-walking order (TL, TR, BR, BL).
    pub fn perimeter_order(&self) -> [Corner; 4] {
        let [tl, tr, bl, br] = self.corners;
        [tl, tr, br, bl]
    }

    /// True when the canonically ordered quad encloses no meaningful area.
    pub fn is_degenerate(&self) -> bool {
        let area = shoelace_area(&self.perimeter_order());
        !area.is_finite() || area < MIN_QUAD_AREA
    }
}

/// Area of a simple polygon by the shoelace formula.
pub fn shoelace_area(corners: &[Corner]) -> f32 {
    let n = corners.len();
    let mut area = 0.0f32;
    for i in 0..n {
        let j = (i + 1) % n;
        area += corners[i].x * corners[j].y;
        area -= corners[j].x * corners[i].y;
    }
    area.abs() / 2.0
}

/// What the grader saw for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    /// Answer from the key.
    pub expected: Answer,
    /// Every choice column whose fill ratio passed the mark threshold.
    pub marked: Vec<usize>,
    /// Marks awarded for this question.
    pub awarded: u32,
}

/// Score for one subject block of the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectScore {
    pub subject: String,
    pub score: u32,
    /// Marks available on a perfect sheet: one award per single-answer
    /// question, one per accepted choice of an any-of question.
    pub max_score: u32,
    pub questions: Vec<QuestionOutcome>,
}

/// Structured grading outcome, free of pixel data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    /// Per-subject scores in answer-key order.
    pub subjects: Vec<SubjectScore>,
    /// Rotation under which the sheet was found.
    pub rotation: QuarterTurn,
    /// Area threshold that admitted the winning candidate.
    pub area_threshold: f64,
}

impl GradeReport {
    pub fn total(&self) -> u32 {
        self.subjects.iter().map(|s| s.score).sum()
    }

    pub fn max_total(&self) -> u32 {
        self.subjects.iter().map(|s| s.max_score).sum()
    }

    /// Scores only, in subject order.
    pub fn scores(&self) -> Vec<u32> {
        self.subjects.iter().map(|s| s.score).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turn_from_degrees() {
        assert_eq!(QuarterTurn::from_degrees(0), Some(QuarterTurn::None));
        assert_eq!(QuarterTurn::from_degrees(90), Some(QuarterTurn::Clockwise90));
        assert_eq!(QuarterTurn::from_degrees(-90), Some(QuarterTurn::Clockwise270));
        assert_eq!(QuarterTurn::from_degrees(450), Some(QuarterTurn::Clockwise90));
        assert_eq!(QuarterTurn::from_degrees(45), None);
    }

    #[test]
    fn shoelace_area_rectangle() {
        let corners = [
            Corner::new(0.0, 0.0),
            Corner::new(10.0, 0.0),
            Corner::new(10.0, 5.0),
            Corner::new(0.0, 5.0),
        ];
        let area = shoelace_area(&corners);
        assert!((area - 50.0).abs() < 1e-3, "Expected 50.0, got {}", area);
    }

    #[test]
    fn ordered_rectangle_is_not_degenerate() {
        let quad = Quadrilateral::new([
            Corner::new(0.0, 0.0),
            Corner::new(10.0, 0.0),
            Corner::new(0.0, 5.0),
            Corner::new(10.0, 5.0),
        ]);
        assert!(!quad.is_degenerate());
        assert!((shoelace_area(&quad.perimeter_order()) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn collinear_quad_is_degenerate() {
        let quad = Quadrilateral::new([
            Corner::new(0.0, 0.0),
            Corner::new(20.0, 20.0),
            Corner::new(10.0, 10.0),
            Corner::new(30.0, 30.0),
        ]);
        assert!(quad.is_degenerate());
    }

    #[test]
    fn report_totals_are_sums() {
        let subject = |name: &str, score, max_score| SubjectScore {
            subject: name.into(),
            score,
            max_score,
            questions: Vec::new(),
        };
        let report = GradeReport {
            subjects: vec![subject("A", 3, 5), subject("B", 0, 5)],
            rotation: QuarterTurn::None,
            area_threshold: 50_000.0,
        };
        assert_eq!(report.total(), 3);
        assert_eq!(report.max_total(), 10);
        assert_eq!(report.scores(), vec![3, 0]);
    }
}
