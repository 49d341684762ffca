// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grid scoring: partition the rectified sheet into subject blocks, question
// rows and choice columns, decide which cells are filled, and award marks
// against the answer key.

use gradesheet_core::error::GradesheetError;
use gradesheet_core::{AnswerKey, LayoutConfig, QuestionOutcome, SubjectScore};
use image::imageops::{self, grayscale};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::contrast::otsu_level;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::{debug, instrument};

/// Highlight colour for awarded cells.
pub const AWARD_COLOUR: Rgb<u8> = Rgb([0, 255, 0]);

/// Cut the sheet at `split_percent` of its height and stack the two parts
/// back as `[top; bottom]`.
pub fn split_and_stack(sheet: &RgbImage, split_percent: u32) -> RgbImage {
    let (width, height) = sheet.dimensions();
    let cut = (height as u64 * split_percent.min(100) as u64 / 100) as u32;

    let top = imageops::crop_imm(sheet, 0, 0, width, cut).to_image();
    let bottom = imageops::crop_imm(sheet, 0, cut, width, height - cut).to_image();

    let mut stacked = RgbImage::new(width, height);
    imageops::replace(&mut stacked, &top, 0, 0);
    imageops::replace(&mut stacked, &bottom, 0, cut as i64);
    stacked
}

/// Whether `ink` pixels out of a `cell_area` cell count as a mark: strictly
/// more than a quarter of the cell must be ink.
pub fn is_marked(ink: u64, cell_area: u64) -> bool {
    ink * 4 > cell_area
}

/// Scores one working image against an answer key.
///
/// The image height is split into one equal block per subject, each block
/// into one row per question, and the full width into one column per choice,
/// all by integer division. Remainder pixels at the bottom of a block or the
/// right edge are never scanned.
///
/// Ink is judged against the sheet itself, not a fixed grey level: see
/// [`ink_level`].
pub struct GridScorer<'a> {
    layout: &'a LayoutConfig,
    key: &'a AnswerKey,
}

impl<'a> GridScorer<'a> {
    /// Fails with `InvalidConfiguration` unless the key fits the layout
    /// exactly: same subjects, one answer per question, every choice in range.
    pub fn new(layout: &'a LayoutConfig, key: &'a AnswerKey) -> Result<Self, GradesheetError> {
        layout.validate()?;
        key.validate(layout)?;
        Ok(Self { layout, key })
    }

    /// Grade `working`, returning an annotated copy and per-subject scores
    /// in layout order.
    #[instrument(skip_all, fields(width = working.width(), height = working.height()))]
    pub fn score(&self, working: &RgbImage) -> (RgbImage, Vec<SubjectScore>) {
        let (width, height) = working.dimensions();
        let luma = grayscale(working);
        let ink_cutoff = ink_level(&luma, self.layout.ink_contrast);
        let mut annotated = working.clone();

        let choices = self.layout.choices;
        let marks = self.layout.marks_per_question;
        let block_height = height / self.layout.subjects.len() as u32;
        let col_width = width / choices as u32;

        let mut scores = Vec::with_capacity(self.layout.subjects.len());

        for (index, block) in self.layout.subjects.iter().enumerate() {
            let subject_key = &self.key.subjects[index];
            let block_top = index as u32 * block_height;
            let row_height = block_height / block.questions as u32;
            let cell_area = row_height as u64 * col_width as u64;

            let mut questions = Vec::with_capacity(block.questions);
            for question in 0..block.questions {
                let expected = &subject_key.answers[question];
                let y = block_top + question as u32 * row_height;

                let marked: Vec<usize> = (0..choices)
                    .filter(|&choice| {
                        let x = choice as u32 * col_width;
                        let ink = ink_cutoff.map_or(0, |level| count_ink(&luma, x, y, col_width, row_height, level));
                        is_marked(ink, cell_area)
                    })
                    .collect();

                let mut awarded = 0;
                for &choice in marked.iter().filter(|&&c| expected.accepts(c)) {
                    awarded += marks;
                    highlight(&mut annotated, choice as u32 * col_width, y, col_width, row_height);
                }

                questions.push(QuestionOutcome {
                    expected: expected.clone(),
                    marked,
                    awarded,
                });
            }

            let score = questions.iter().map(|q| q.awarded).sum();
            let max_score = subject_key.answers.iter().map(|a| a.max_award(marks)).sum();
            debug!(subject = %block.name, score, max_score, "Subject scored");

            scores.push(SubjectScore {
                subject: block.name.clone(),
                score,
                max_score,
                questions,
            });
        }

        (annotated, scores)
    }
}

/// Darkest luma still counted as paper-free ink on this sheet, or `None` when
/// the sheet has no usable contrast.
///
/// Starts from the sheet's Otsu level, then caps it at `contrast` times the
/// mean of the bright class. The cap keeps paper grain from being split into
/// "ink" on an unmarked sheet; deriving both from the sheet keeps a dimly lit
/// photo from reading as fully marked.
pub fn ink_level(luma: &GrayImage, contrast: f32) -> Option<u8> {
    let otsu = otsu_level(luma);
    let (sum, count) = luma
        .pixels()
        .map(|p| p.0[0])
        .filter(|&v| v > otsu)
        .fold((0u64, 0u64), |(sum, count), v| (sum + v as u64, count + 1));
    if count == 0 {
        return None;
    }
    let paper = sum as f32 / count as f32;
    let level = otsu.min((paper * contrast) as u8);
    debug!(otsu, paper, level, "Ink level derived");
    Some(level)
}

/// Number of pixels at or below `level` in the given cell.
fn count_ink(luma: &GrayImage, x: u32, y: u32, width: u32, height: u32, level: u8) -> u64 {
    let x_end = (x + width).min(luma.width());
    let y_end = (y + height).min(luma.height());
    let mut ink = 0u64;
    for py in y..y_end {
        for px in x..x_end {
            if luma.get_pixel(px, py).0[0] <= level {
                ink += 1;
            }
        }
    }
    ink
}

/// Two-pixel hollow rectangle around a cell.
fn highlight(image: &mut RgbImage, x: u32, y: u32, width: u32, height: u32) {
    if width == 0 || height == 0 {
        return;
    }
    draw_hollow_rect_mut(image, Rect::at(x as i32, y as i32).of_size(width, height), AWARD_COLOUR);
    if width > 2 && height > 2 {
        draw_hollow_rect_mut(
            image,
            Rect::at(x as i32 + 1, y as i32 + 1).of_size(width - 2, height - 2),
            AWARD_COLOUR,
        );
    }
}
