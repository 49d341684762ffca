// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Built-in exam: five subjects of twenty four-choice questions each.

use gradesheet_core::error::GradesheetError;
use gradesheet_core::{AnswerKey, LayoutConfig, SubjectKey, SubjectLayout};

const QUESTIONS_PER_SUBJECT: usize = 20;

/// Subjects in sheet order, top to bottom, with their keys in letter
/// notation. A comma list means any of those choices earns marks.
const SUBJECTS: [(&str, [&str; QUESTIONS_PER_SUBJECT]); 5] = [
    (
        "Python",
        [
            "a", "c", "c", "c", "c", "a", "c", "c", "b", "c", "a", "a", "d", "a", "b", "a,b,c,d",
            "c", "d", "a", "b",
        ],
    ),
    (
        "EDA",
        [
            "a", "d", "b", "a", "c", "b", "a", "b", "d", "c", "c", "a", "b", "c", "a", "b", "d",
            "b", "a", "b",
        ],
    ),
    (
        "SQL",
        [
            "c", "c", "c", "b", "b", "a", "c", "b", "d", "a", "c", "b", "c", "c", "a", "b", "b",
            "a", "a,b", "b",
        ],
    ),
    (
        "PowerBI",
        [
            "b", "c", "a", "b", "c", "b", "b", "c", "c", "b", "b", "b", "d", "b", "a", "b", "b",
            "b", "b", "b",
        ],
    ),
    (
        "Statistics",
        [
            "a", "b", "c", "b", "c", "b", "b", "b", "a", "b", "c", "b", "c", "b", "b", "b", "c",
            "a", "b", "c",
        ],
    ),
];

pub fn layout() -> LayoutConfig {
    LayoutConfig::new(
        SUBJECTS
            .iter()
            .map(|(name, _)| SubjectLayout::new(*name, QUESTIONS_PER_SUBJECT))
            .collect(),
    )
}

pub fn answer_key() -> Result<AnswerKey, GradesheetError> {
    let subjects = SUBJECTS
        .iter()
        .map(|(name, letters)| SubjectKey::from_letters(*name, letters))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AnswerKey::new(subjects))
}
