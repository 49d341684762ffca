// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grading: grid partitioning, fill-ratio bubble detection, answer matching
// and annotation of the rectified sheet.

pub mod grid;

pub use grid::{GridScorer, split_and_stack};
