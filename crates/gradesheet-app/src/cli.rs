// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line front end. Parses arguments, hands the photo to the grader
// and formats the outcome; no grading logic lives here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use gradesheet_core::{GradeReport, GradesheetError, LayoutConfig, QuarterTurn};
use gradesheet_vision::{GradeResult, ImageProcessor, SheetGrader};
use image::DynamicImage;

use crate::exam;

/// Grade a photographed multiple-choice answer sheet.
#[derive(Parser, Debug)]
#[command(name = "gradesheet", version, about)]
pub struct Cli {
    /// Photo of the answer sheet (JPEG or PNG).
    pub image: PathBuf,

    /// Write the rectified sheet, with awarded cells outlined, to this PNG.
    #[arg(long, value_name = "PNG")]
    pub annotated: Option<PathBuf>,

    /// Print the full report as JSON instead of the score table.
    #[arg(long)]
    pub json: bool,

    /// Clockwise turns to try, in order, when looking for the sheet
    /// (comma separated degrees). Defaults to 0,90,180,270.
    #[arg(long, value_delimiter = ',', value_name = "DEGREES")]
    pub rotations: Vec<i32>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let grader = SheetGrader::new(self.layout()?, exam::answer_key()?)?;

        tracing::info!(image = %self.image.display(), "Grading sheet");
        let result = grader.grade_file(&self.image)?;

        if let Some(path) = &self.annotated {
            save_annotated(&result, path)?;
            tracing::info!(path = %path.display(), "Annotated sheet written");
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result.report)?);
        } else {
            print!("{}", render_scores(&result.report));
        }
        Ok(())
    }

    /// The built-in exam layout, with the rotation search overridden when
    /// `--rotations` was given.
    fn layout(&self) -> Result<LayoutConfig, GradesheetError> {
        let layout = exam::layout();
        if self.rotations.is_empty() {
            return Ok(layout);
        }
        let turns = self
            .rotations
            .iter()
            .map(|&degrees| {
                QuarterTurn::from_degrees(degrees).ok_or_else(|| {
                    GradesheetError::InvalidConfiguration(format!("{degrees}° is not a quarter turn"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let layout = layout.with_rotations(turns);
        tracing::debug!(attempts = layout.search_attempts(), "Rotation search overridden");
        Ok(layout)
    }
}

fn save_annotated(result: &GradeResult, path: &Path) -> Result<()> {
    ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(result.annotated.clone()))
        .save(path)
        .with_context(|| format!("writing annotated sheet to {}", path.display()))
}

/// One `Subject: score/max` line per subject, then the total.
pub fn render_scores(report: &GradeReport) -> String {
    let mut out: String = report
        .subjects
        .iter()
        .map(|s| format!("{}: {}/{}\n", s.subject, s.score, s.max_score))
        .collect();
    out.push_str(&format!("Total Score: {}/{}\n", report.total(), report.max_total()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradesheet_core::{QuarterTurn, SubjectScore};

    fn report() -> GradeReport {
        GradeReport {
            subjects: vec![
                SubjectScore {
                    subject: "Python".into(),
                    score: 15,
                    max_score: 23,
                    questions: Vec::new(),
                },
                SubjectScore {
                    subject: "EDA".into(),
                    score: 20,
                    max_score: 20,
                    questions: Vec::new(),
                },
            ],
            rotation: QuarterTurn::None,
            area_threshold: 50_000.0,
        }
    }

    #[test]
    fn score_table_format() {
        assert_eq!(
            render_scores(&report()),
            "Python: 15/23\nEDA: 20/20\nTotal Score: 35/43\n"
        );
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from(["gradesheet", "sheet.jpg", "--annotated", "out.png", "--json"]).unwrap();
        assert_eq!(cli.image, PathBuf::from("sheet.jpg"));
        assert_eq!(cli.annotated, Some(PathBuf::from("out.png")));
        assert!(cli.json);
    }

    #[test]
    fn rotations_override_the_search() {
        let cli = Cli::try_parse_from(["gradesheet", "sheet.jpg", "--rotations", "0,180"]).unwrap();
        let layout = cli.layout().unwrap();
        assert_eq!(layout.rotations, vec![QuarterTurn::None, QuarterTurn::Clockwise180]);
        assert_eq!(layout.search_attempts(), 6);
    }

    #[test]
    fn non_quarter_turn_is_a_setup_error() {
        let cli = Cli::try_parse_from(["gradesheet", "sheet.jpg", "--rotations", "45"]).unwrap();
        let err = cli.run().unwrap_err();
        let grading = err.downcast_ref::<GradesheetError>().unwrap();
        assert!(matches!(grading, GradesheetError::InvalidConfiguration(_)));
    }

    #[test]
    fn image_is_required() {
        assert!(Cli::try_parse_from(["gradesheet"]).is_err());
    }

    #[test]
    fn missing_photo_surfaces_grader_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            image: dir.path().join("absent.jpg"),
            annotated: None,
            json: false,
            rotations: Vec::new(),
        };
        let err = cli.run().unwrap_err();
        assert!(err.downcast_ref::<gradesheet_core::GradesheetError>().is_some());
    }

    #[test]
    fn blank_photo_is_a_detection_failure() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("blank.png");
        image::RgbImage::from_pixel(600, 780, image::Rgb([255, 255, 255]))
            .save(&photo)
            .unwrap();

        let cli = Cli {
            image: photo,
            annotated: Some(dir.path().join("out.png")),
            json: true,
            rotations: Vec::new(),
        };
        let err = cli.run().unwrap_err();
        let grading = err.downcast_ref::<gradesheet_core::GradesheetError>().unwrap();
        assert!(grading.is_detection_failure());
        assert!(!dir.path().join("out.png").exists());
    }
}
