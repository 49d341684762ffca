// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the gradesheet-vision crate: the whole grading
// pipeline on a synthetic photo, plus the sheet search on its own.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use gradesheet_core::{AnswerKey, LayoutConfig, SubjectKey, SubjectLayout};
use gradesheet_vision::SheetGrader;
use gradesheet_vision::detect::find_sheet;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn layout() -> LayoutConfig {
    LayoutConfig::new(vec![
        SubjectLayout::new("Subject 1", 10),
        SubjectLayout::new("Subject 2", 10),
    ])
}

fn key() -> AnswerKey {
    let letters = ["a", "b", "c", "d", "a", "b", "c", "d", "a", "b"];
    AnswerKey::new(vec![
        SubjectKey::from_letters("Subject 1", &letters).unwrap(),
        SubjectKey::from_letters("Subject 2", &letters).unwrap(),
    ])
}

/// 1200x1560 white photo with a bordered sheet and one bubble per row filled.
fn photo() -> DynamicImage {
    let mut img = RgbImage::from_pixel(1200, 1560, Rgb([245, 245, 245]));
    for inset in 0..6 {
        let r = Rect::at(60 + inset, 60 + inset).of_size(1080 - 2 * inset as u32, 1440 - 2 * inset as u32);
        draw_hollow_rect_mut(&mut img, r, Rgb([10, 10, 10]));
    }
    for row in 0..20 {
        let choice = row % 4;
        let x = 60 + choice * 270 + 60;
        let y = 60 + row * 72 + 12;
        draw_filled_rect_mut(&mut img, Rect::at(x as i32, y as i32).of_size(150, 48), Rgb([20, 20, 20]));
    }
    DynamicImage::ImageRgb8(img)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Full pipeline: resize, search, rectify, split and score.
fn bench_grade_sheet(c: &mut Criterion) {
    let grader = SheetGrader::new(layout(), key()).unwrap();
    let photo = photo();

    c.bench_function("grade_sheet (1200x1560)", |b| {
        b.iter(|| {
            let result = grader.grade(black_box(&photo));
            black_box(result.map(|r| r.report.total()).ok());
        });
    });
}

/// Sheet search alone, on a photo already at canonical size.
fn bench_find_sheet(c: &mut Criterion) {
    let layout = layout();
    let photo = photo().resize_exact(600, 780, image::imageops::FilterType::Triangle);

    c.bench_function("find_sheet (600x780)", |b| {
        b.iter(|| {
            black_box(find_sheet(black_box(&photo), &layout).ok());
        });
    });
}

criterion_group!(benches, bench_grade_sheet, bench_find_sheet);
criterion_main!(benches);
