// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for teachers and students using the grader.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how a front end presents the failure.

use crate::error::GradesheetError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The photo was unusable; taking another one should fix it.
    Recapture,
    /// Whoever set up the exam must fix the key or layout.
    SetupProblem,
    /// Something outside the photo went wrong (disk, encoding).
    Internal,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether submitting a different photo can succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `GradesheetError` into a `HumanError`.
pub fn humanize_error(err: &GradesheetError) -> HumanError {
    match err {
        GradesheetError::NoSheetDetected { .. } => HumanError {
            message: "We couldn't find the answer sheet in this photo.".into(),
            suggestion: "Lay the sheet flat on a contrasting surface so all four edges are visible, then take the photo again.".into(),
            retriable: true,
            severity: Severity::Recapture,
        },

        GradesheetError::RectificationFailed(_) => HumanError {
            message: "The sheet's corners couldn't be lined up.".into(),
            suggestion: "Hold the camera straight above the sheet and make sure no corner is folded or cut off, then try again.".into(),
            retriable: true,
            severity: Severity::Recapture,
        },

        GradesheetError::InvalidConfiguration(detail) => HumanError {
            message: "The answer key doesn't match the sheet layout.".into(),
            suggestion: format!("Check the number of subjects, questions and choices in the answer key. ({detail})"),
            retriable: false,
            severity: Severity::SetupProblem,
        },

        GradesheetError::ImageError(_) => HumanError {
            message: "This file couldn't be read as a picture.".into(),
            suggestion: "Upload a JPEG or PNG photo of the answer sheet.".into(),
            retriable: true,
            severity: Severity::Recapture,
        },

        GradesheetError::Io(err) => HumanError {
            message: "A file couldn't be read or written.".into(),
            suggestion: format!("Check that the file exists and that you have permission to use it. ({err})"),
            retriable: false,
            severity: Severity::Internal,
        },

        GradesheetError::Serialization(_) => HumanError {
            message: "The results couldn't be saved.".into(),
            suggestion: "Try again. If this keeps happening, report it to whoever runs the grader.".into(),
            retriable: false,
            severity: Severity::Internal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_sheet_asks_for_recapture() {
        let human = humanize_error(&GradesheetError::NoSheetDetected { attempts: 12 });
        assert_eq!(human.severity, Severity::Recapture);
        assert!(human.retriable);
    }

    #[test]
    fn rectification_is_treated_like_no_sheet() {
        let rect = humanize_error(&GradesheetError::RectificationFailed("zero area".into()));
        let none = humanize_error(&GradesheetError::NoSheetDetected { attempts: 1 });
        assert_eq!(rect.severity, none.severity);
        assert_eq!(rect.retriable, none.retriable);
    }

    #[test]
    fn bad_key_is_setup_problem() {
        let err = GradesheetError::InvalidConfiguration("subject \"SQL\" has 19 answers".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::SetupProblem);
        assert!(!human.retriable);
        assert!(human.suggestion.contains("SQL"));
    }
}
