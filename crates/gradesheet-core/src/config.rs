// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sheet layout and detection configuration.

use serde::{Deserialize, Serialize};

use crate::error::GradesheetError;
use crate::types::QuarterTurn;

pub const DEFAULT_CANONICAL_WIDTH: u32 = 600;
pub const DEFAULT_CANONICAL_HEIGHT: u32 = 780;
pub const DEFAULT_CHOICES: usize = 4;
pub const DEFAULT_MARKS_PER_QUESTION: u32 = 1;
pub const DEFAULT_AREA_THRESHOLDS: [f64; 3] = [50_000.0, 30_000.0, 10_000.0];
pub const DEFAULT_SPLIT_PERCENT: u32 = 60;

/// One subject block on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectLayout {
    pub name: String,
    /// Number of question rows in the block.
    pub questions: usize,
}

impl SubjectLayout {
    pub fn new(name: impl Into<String>, questions: usize) -> Self {
        Self {
            name: name.into(),
            questions,
        }
    }
}

/// Immutable description of the sheet and of the detection search.
///
/// Built once per grading run and passed by reference into every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Width of the rectified sheet in pixels.
    pub canonical_width: u32,
    /// Height of the rectified sheet in pixels.
    pub canonical_height: u32,
    /// Choice columns per question.
    pub choices: usize,
    /// Marks for each awarded cell.
    pub marks_per_question: u32,
    /// Subject blocks, top to bottom.
    pub subjects: Vec<SubjectLayout>,
    /// Minimum sheet areas (px²) to try, largest first.
    pub area_thresholds: Vec<f64>,
    /// Rotations to try, in order.
    pub rotations: Vec<QuarterTurn>,
    /// Where the rectified sheet is cut into top and bottom regions, as a
    /// percentage of its height.
    pub split_percent: u32,
    /// Gaussian blur sigma applied before binarization.
    pub blur_sigma: f32,
    /// Half-width of the adaptive threshold window.
    pub block_radius: u32,
    /// Amount a pixel must be darker than its local mean to count as ink.
    pub threshold_offset: i32,
    /// Polygon approximation tolerance as a fraction of contour perimeter.
    pub poly_epsilon: f64,
    /// Ink must be at most this fraction of the sheet's paper brightness,
    /// on top of falling in the sheet's dark Otsu class.
    pub ink_contrast: f32,
}

impl LayoutConfig {
    /// Default sheet geometry and search settings for the given subjects.
    pub fn new(subjects: Vec<SubjectLayout>) -> Self {
        Self {
            canonical_width: DEFAULT_CANONICAL_WIDTH,
            canonical_height: DEFAULT_CANONICAL_HEIGHT,
            choices: DEFAULT_CHOICES,
            marks_per_question: DEFAULT_MARKS_PER_QUESTION,
            subjects,
            area_thresholds: DEFAULT_AREA_THRESHOLDS.to_vec(),
            rotations: QuarterTurn::ALL.to_vec(),
            split_percent: DEFAULT_SPLIT_PERCENT,
            blur_sigma: 1.0,
            block_radius: 12,
            threshold_offset: 10,
            poly_epsilon: 0.02,
            ink_contrast: 0.75,
        }
    }

    pub fn with_choices(mut self, choices: usize) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_marks_per_question(mut self, marks: u32) -> Self {
        self.marks_per_question = marks;
        self
    }

    pub fn with_area_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.area_thresholds = thresholds;
        self
    }

    pub fn with_rotations(mut self, rotations: Vec<QuarterTurn>) -> Self {
        self.rotations = rotations;
        self
    }

    /// Total number of question rows over all subjects.
    pub fn total_questions(&self) -> usize {
        self.subjects.iter().map(|s| s.questions).sum()
    }

    /// Number of (rotation, threshold) pairs the sheet search may try.
    pub fn search_attempts(&self) -> usize {
        self.rotations.len() * self.area_thresholds.len()
    }

    /// Reject layouts the pipeline cannot grade meaningfully.
    pub fn validate(&self) -> Result<(), GradesheetError> {
        let invalid = |msg: &str| Err(GradesheetError::InvalidConfiguration(msg.to_string()));

        if self.canonical_width == 0 || self.canonical_height == 0 {
            return invalid("canonical sheet size must be non-zero");
        }
        if self.choices == 0 {
            return invalid("at least one choice per question is required");
        }
        if self.subjects.is_empty() {
            return invalid("at least one subject is required");
        }
        if self.subjects.iter().any(|s| s.questions == 0) {
            return invalid("every subject needs at least one question");
        }
        if self.area_thresholds.is_empty() || self.rotations.is_empty() {
            return invalid("area thresholds and rotations must not be empty");
        }
        if self.area_thresholds.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return invalid("area thresholds must be finite and non-negative");
        }
        if self.area_thresholds.windows(2).any(|w| w[0] < w[1]) {
            return invalid("area thresholds must be in descending order");
        }
        if self.split_percent > 100 {
            return invalid("split percent must be within 0..=100");
        }
        let positive_sigma = self.blur_sigma.is_finite() && self.blur_sigma > 0.0;
        let positive_epsilon = self.poly_epsilon.is_finite() && self.poly_epsilon > 0.0;
        if !positive_sigma || !positive_epsilon {
            return invalid("blur sigma and polygon epsilon must be positive");
        }
        if !(self.ink_contrast.is_finite() && self.ink_contrast > 0.0 && self.ink_contrast <= 1.0) {
            return invalid("ink contrast must be within (0, 1]");
        }

        let block_height = self.canonical_height as usize / self.subjects.len();
        if let Some(s) = self.subjects.iter().find(|s| block_height / s.questions == 0) {
            return Err(GradesheetError::InvalidConfiguration(format!(
                "subject {:?} has more questions than pixel rows in its block",
                s.name
            )));
        }
        if self.canonical_width as usize / self.choices == 0 {
            return invalid("more choices than pixel columns");
        }

        Ok(())
    }
}
