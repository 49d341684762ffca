// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Gradesheet.

use thiserror::Error;

/// Top-level error type for all Gradesheet operations.
#[derive(Debug, Error)]
pub enum GradesheetError {
    // -- Detection errors --
    #[error("no answer sheet detected after {attempts} rotation/threshold attempts")]
    NoSheetDetected { attempts: usize },

    #[error("sheet rectification failed: {0}")]
    RectificationFailed(String),

    // -- Caller errors --
    #[error("invalid grading configuration: {0}")]
    InvalidConfiguration(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GradesheetError {
    /// True for the two failures that mean "no usable sheet in this photo".
    ///
    /// Callers treat both the same way: ask for a new photograph.
    pub fn is_detection_failure(&self) -> bool {
        matches!(
            self,
            Self::NoSheetDetected { .. } | Self::RectificationFailed(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, GradesheetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_failures_are_grouped() {
        assert!(GradesheetError::NoSheetDetected { attempts: 12 }.is_detection_failure());
        assert!(GradesheetError::RectificationFailed("collinear".into()).is_detection_failure());
        assert!(!GradesheetError::InvalidConfiguration("x".into()).is_detection_failure());
    }

    #[test]
    fn no_sheet_message_names_attempts() {
        let err = GradesheetError::NoSheetDetected { attempts: 12 };
        assert!(err.to_string().contains("12"));
    }
}
