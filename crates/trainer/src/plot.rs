//! Actual-vs-predicted scatter rendering
//!
//! Draws the held-out evaluation as a PNG: one dot per observation,
//! the y = x line for reference, and plain axes.

use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use tracing::info;

use regressor::PredictionPoint;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const MARGIN: f32 = 50.0;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);
const DIAGONAL: Rgb<u8> = Rgb([220, 60, 60]);
const POINT: Rgb<u8> = Rgb([50, 90, 200]);

/// Render the scatter plot to `path`.
pub fn render_scatter(points: &[PredictionPoint], path: &Path) -> anyhow::Result<()> {
    let mut canvas = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);

    let (min, max) = bounds(points);
    let span = (max - min).max(f64::EPSILON);

    let to_x = |value: f64| MARGIN + ((value - min) / span) as f32 * (WIDTH as f32 - 2.0 * MARGIN);
    let to_y = |value: f64| {
        HEIGHT as f32 - MARGIN - ((value - min) / span) as f32 * (HEIGHT as f32 - 2.0 * MARGIN)
    };

    // Axes.
    draw_line_segment_mut(
        &mut canvas,
        (MARGIN, HEIGHT as f32 - MARGIN),
        (WIDTH as f32 - MARGIN, HEIGHT as f32 - MARGIN),
        AXIS,
    );
    draw_line_segment_mut(
        &mut canvas,
        (MARGIN, MARGIN),
        (MARGIN, HEIGHT as f32 - MARGIN),
        AXIS,
    );

    // Perfect-prediction reference.
    draw_line_segment_mut(
        &mut canvas,
        (to_x(min), to_y(min)),
        (to_x(max), to_y(max)),
        DIAGONAL,
    );

    for point in points {
        draw_filled_circle_mut(
            &mut canvas,
            (to_x(point.actual) as i32, to_y(point.predicted) as i32),
            3,
            POINT,
        );
    }

    canvas.save(path)?;
    info!("Wrote scatter plot to {}", path.display());
    Ok(())
}

fn bounds(points: &[PredictionPoint]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for point in points {
        min = min.min(point.actual).min(point.predicted);
        max = max.max(point.actual).max(point.predicted);
    }
    if !min.is_finite() || !max.is_finite() {
        (0.0, 1.0)
    } else {
        (min, max)
    }
}
