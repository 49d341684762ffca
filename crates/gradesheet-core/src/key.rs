// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Answer keys: expected answers per subject, single- or multi-choice.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::GradesheetError;

/// Expected answer for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    /// Exactly one correct choice column.
    Single(usize),
    /// Several correct choice columns; each marked one earns an award.
    MultipleOf(BTreeSet<usize>),
}

impl Answer {
    /// Whether `choice` is one of the expected columns.
    pub fn accepts(&self, choice: usize) -> bool {
        match self {
            Self::Single(expected) => *expected == choice,
            Self::MultipleOf(expected) => expected.contains(&choice),
        }
    }

    /// Every expected column, ascending.
    pub fn choices(&self) -> Vec<usize> {
        match self {
            Self::Single(expected) => vec![*expected],
            Self::MultipleOf(expected) => expected.iter().copied().collect(),
        }
    }

    /// Highest award this question can earn.
    pub fn max_award(&self, marks_per_question: u32) -> u32 {
        match self {
            Self::Single(_) => marks_per_question,
            Self::MultipleOf(expected) => marks_per_question * expected.len() as u32,
        }
    }
}

/// Parses sheet letter notation: `"c"` is `Single(2)`, `"a, b"` is
/// `MultipleOf({0, 1})`. Case and whitespace are ignored.
impl FromStr for Answer {
    type Err = GradesheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let mut choices = BTreeSet::new();
        for part in compact.split(',') {
            let mut letters = part.chars();
            let index = match (letters.next(), letters.next()) {
                (Some(letter @ 'a'..='z'), None) => letter as usize - 'a' as usize,
                _ => {
                    return Err(GradesheetError::InvalidConfiguration(format!(
                        "answer {s:?} is not a letter or comma-separated letters"
                    )));
                }
            };
            choices.insert(index);
        }

        if compact.contains(',') {
            Ok(Self::MultipleOf(choices))
        } else {
            // Exactly one element: the loop ran once and succeeded.
            Ok(Self::Single(choices.into_iter().next().unwrap_or_default()))
        }
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letters: Vec<String> = self
            .choices()
            .into_iter()
            .map(|c| match u8::try_from(c) {
                Ok(c) if c < 26 => char::from(b'a' + c).to_string(),
                _ => format!("#{c}"),
            })
            .collect();
        write!(f, "{}", letters.join(","))
    }
}

/// Expected answers for one subject, one per question, in question order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectKey {
    pub subject: String,
    pub answers: Vec<Answer>,
}

impl SubjectKey {
    pub fn new(subject: impl Into<String>, answers: Vec<Answer>) -> Self {
        Self {
            subject: subject.into(),
            answers,
        }
    }

    /// Build a subject key from letter notation, one entry per question.
    pub fn from_letters(subject: impl Into<String>, letters: &[&str]) -> Result<Self, GradesheetError> {
        let answers = letters
            .iter()
            .map(|l| l.parse())
            .collect::<Result<Vec<Answer>, _>>()?;
        Ok(Self::new(subject, answers))
    }
}

/// The full answer key. Subject order is the grading order and must match
/// the block order of [`LayoutConfig::subjects`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerKey {
    pub subjects: Vec<SubjectKey>,
}

impl AnswerKey {
    pub fn new(subjects: Vec<SubjectKey>) -> Self {
        Self { subjects }
    }

    /// Look up a subject by name.
    pub fn subject(&self, name: &str) -> Option<&SubjectKey> {
        self.subjects.iter().find(|s| s.subject == name)
    }

    /// Check the key against a layout: same subjects in the same order, one
    /// answer per question, every choice in `[0, choices)`, no empty sets.
    pub fn validate(&self, layout: &LayoutConfig) -> Result<(), GradesheetError> {
        let invalid = |msg: String| Err(GradesheetError::InvalidConfiguration(msg));

        if self.subjects.len() != layout.subjects.len() {
            return invalid(format!(
                "answer key has {} subjects, layout has {}",
                self.subjects.len(),
                layout.subjects.len()
            ));
        }

        for (key, block) in self.subjects.iter().zip(&layout.subjects) {
            if key.subject != block.name {
                return invalid(format!(
                    "answer key subject {:?} does not match layout subject {:?}",
                    key.subject, block.name
                ));
            }
            if key.answers.len() != block.questions {
                return invalid(format!(
                    "subject {:?} has {} answers for {} questions",
                    key.subject,
                    key.answers.len(),
                    block.questions
                ));
            }
            for (question, answer) in key.answers.iter().enumerate() {
                if let Answer::MultipleOf(set) = answer {
                    if set.is_empty() {
                        return invalid(format!(
                            "subject {:?} question {} has an empty answer set",
                            key.subject,
                            question + 1
                        ));
                    }
                }
                if let Some(bad) = answer.choices().into_iter().find(|&c| c >= layout.choices) {
                    return invalid(format!(
                        "subject {:?} question {} expects choice {} but only {} choices exist",
                        key.subject,
                        question + 1,
                        bad,
                        layout.choices
                    ));
                }
            }
        }

        Ok(())
    }
}
