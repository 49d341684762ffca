// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preprocessing: grayscale, Gaussian smoothing and inverted adaptive
// binarization producing an ink mask for contour tracing.

use gradesheet_core::LayoutConfig;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;
use tracing::{debug, instrument};

/// Mask value for ink pixels.
pub const INK: u8 = 255;
/// Mask value for background pixels.
pub const BACKGROUND: u8 = 0;

/// Turn a photo into a binary ink mask of the same dimensions.
///
/// 1. Convert to grayscale
/// 2. Gaussian blur (`layout.blur_sigma`) to suppress sensor noise
/// 3. Adaptive thresholding against the local mean over a
///    `(2 * block_radius + 1)` square window. A pixel at or below
///    `local_mean - threshold_offset` becomes [`INK`], everything else
///    [`BACKGROUND`].
///
/// Uniform regions, however dark, produce no ink: only pixels darker than
/// their surroundings survive, which is what lets the printed sheet border
/// stand out from a dark table.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn binarize(image: &DynamicImage, layout: &LayoutConfig) -> GrayImage {
    let gray = image.to_luma8();
    let blurred = gaussian_blur_f32(&gray, layout.blur_sigma);
    let mask = adaptive_threshold_inv(&blurred, layout.block_radius, layout.threshold_offset);
    debug!(
        ink_pixels = mask.pixels().filter(|p| p.0[0] == INK).count(),
        "Binarization complete"
    );
    mask
}

/// Inverted local-mean threshold over a precomputed integral image.
pub fn adaptive_threshold_inv(gray: &GrayImage, block_radius: u32, offset: i32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let integral = compute_integral_image(gray);
    let mut output = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let local_mean = region_mean(&integral, width, height, x, y, block_radius);
            let threshold = local_mean - offset as f64;
            let pixel_val = gray.get_pixel(x, y).0[0] as f64;
            let value = if pixel_val <= threshold { INK } else { BACKGROUND };
            output.put_pixel(x, y, Luma([value]));
        }
    }

    output
}

// -- Integral image helpers ---------------------------------------------------

/// Compute the integral (summed-area table) of a grayscale image.
///
/// `integral[y * (width+1) + x]` contains the sum of all pixel values in the
/// rectangle [0, 0) to (x, y) (exclusive on both axes). The table has
/// dimensions `(width+1) x (height+1)` with a zero-padded border.
fn compute_integral_image(gray: &GrayImage) -> Vec<u64> {
    let (w, h) = gray.dimensions();
    let stride = (w + 1) as usize;
    let mut table = vec![0u64; stride * (h + 1) as usize];

    for y in 0..h {
        let mut row_sum: u64 = 0;
        for x in 0..w {
            row_sum += gray.get_pixel(x, y).0[0] as u64;
            let idx = (y + 1) as usize * stride + (x + 1) as usize;
            let above = y as usize * stride + (x + 1) as usize;
            table[idx] = row_sum + table[above];
        }
    }

    table
}

/// Mean pixel value of the square window centred on (cx, cy), clamped to
/// the image.
fn region_mean(
    integral: &[u64],
    img_width: u32,
    img_height: u32,
    cx: u32,
    cy: u32,
    radius: u32,
) -> f64 {
    let stride = (img_width + 1) as usize;

    let x1 = cx.saturating_sub(radius) as usize;
    let y1 = cy.saturating_sub(radius) as usize;
    let x2 = (cx as usize + radius as usize + 1).min(img_width as usize);
    let y2 = (cy as usize + radius as usize + 1).min(img_height as usize);

    let area = ((x2 - x1) * (y2 - y1)) as f64;
    if area == 0.0 {
        return 128.0;
    }

    // S = I[y2][x2] - I[y1][x2] - I[y2][x1] + I[y1][x1]
    let sum = integral[y2 * stride + x2] as f64
        - integral[y1 * stride + x2] as f64
        - integral[y2 * stride + x1] as f64
        + integral[y1 * stride + x1] as f64;

    sum / area
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradesheet_core::SubjectLayout;
    use image::{Rgb, RgbImage};
    use imageproc::drawing::draw_hollow_rect_mut;
    use imageproc::rect::Rect;

    fn layout() -> LayoutConfig {
        LayoutConfig::new(vec![SubjectLayout::new("Any", 10)])
    }

    #[test]
    fn output_matches_input_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(37, 53, Rgb([200, 180, 160])));
        let mask = binarize(&img, &layout());
        assert_eq!(mask.dimensions(), (37, 53));
    }

    #[test]
    fn uniform_image_has_no_ink() {
        for level in [0u8, 90, 255] {
            let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 64, Luma([level])));
            let mask = binarize(&img, &layout());
            assert!(
                mask.pixels().all(|p| p.0[0] == BACKGROUND),
                "uniform level {level} produced ink"
            );
        }
    }

    #[test]
    fn dark_line_on_white_is_ink() {
        let mut img = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        draw_hollow_rect_mut(&mut img, Rect::at(20, 20).of_size(60, 60), Rgb([0, 0, 0]));
        let mask = binarize(&DynamicImage::ImageRgb8(img), &layout());

        assert_eq!(mask.get_pixel(20, 50).0[0], INK, "line pixel should be ink");
        assert_eq!(mask.get_pixel(50, 50).0[0], BACKGROUND, "paper should be background");
        assert_eq!(mask.get_pixel(2, 2).0[0], BACKGROUND, "margin should be background");
    }

    #[test]
    fn mask_is_strictly_binary() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_fn(50, 50, |x, y| {
            Luma([((x * 5 + y * 3) % 256) as u8])
        }));
        let mask = binarize(&img, &layout());
        assert!(mask.pixels().all(|p| p.0[0] == INK || p.0[0] == BACKGROUND));
    }

    #[test]
    fn region_mean_clamps_at_corner() {
        let gray = GrayImage::from_pixel(4, 4, Luma([100]));
        let integral = compute_integral_image(&gray);
        let mean = region_mean(&integral, 4, 4, 0, 0, 10);
        assert!((mean - 100.0).abs() < 1e-9);
    }
}
