// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Gradesheet: Core types, layout configuration and error definitions shared
// across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod key;
pub mod types;

pub use config::{LayoutConfig, SubjectLayout};
pub use error::{GradesheetError, Result};
pub use key::{Answer, AnswerKey, SubjectKey};
pub use types::*;
