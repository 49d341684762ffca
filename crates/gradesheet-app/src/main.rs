// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Gradesheet: optical mark recognition grader for photographed answer sheets
//
// Entry point. Initialises logging, parses the command line and reports
// grading failures in plain language.

mod cli;
mod exam;

use std::process::ExitCode;

use clap::Parser;
use gradesheet_core::GradesheetError;
use gradesheet_core::human_errors::{Severity, humanize_error};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli::Cli::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<GradesheetError>() {
                Some(grading) => {
                    let human = humanize_error(grading);
                    if human.retriable {
                        tracing::warn!(error = %grading, "Photo could not be graded");
                    } else {
                        tracing::error!(error = %grading, "Grading failed");
                    }
                    eprintln!("{}\n{}", human.message, human.suggestion);
                    ExitCode::from(exit_status(human.severity))
                }
                None => {
                    eprintln!("Error: {err:#}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// 2: take another photo, 3: fix the exam setup, 1: anything else.
fn exit_status(severity: Severity) -> u8 {
    match severity {
        Severity::Recapture => 2,
        Severity::SetupProblem => 3,
        Severity::Internal => 1,
    }
}
