//! PNGグラフ出力
//!
//! HTMLを開けない環境向けに、月別の一致率の折れ線と全期間平均の破線を
//! 画像として書き出す。文字は描かない（目盛り線は5%刻み）。

use super::ReportOptions;
use crate::error::{FilterError, Result};
use housing_filter_common::MonthlyReport;
use image::{ImageFormat, Rgba, RgbaImage};
use std::path::Path;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 600;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 50.0;
const GRID_STEP: f64 = 5.0;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const GRID: Rgba<u8> = Rgba([225, 225, 225, 255]);
const AXIS: Rgba<u8> = Rgba([90, 90, 90, 255]);
const PERCENTAGE: Rgba<u8> = Rgba([255, 99, 132, 255]);
const AVERAGE: Rgba<u8> = Rgba([54, 162, 235, 255]);

/// 描画領域（ピクセル座標）
struct Plot {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    y_max: f64,
    points: usize,
}

impl Plot {
    fn new(points: usize, y_max: f64) -> Self {
        Self {
            left: MARGIN_LEFT,
            right: f64::from(WIDTH) - MARGIN_RIGHT,
            top: MARGIN_TOP,
            bottom: f64::from(HEIGHT) - MARGIN_BOTTOM,
            y_max,
            points,
        }
    }

    fn x(&self, index: usize) -> f64 {
        if self.points <= 1 {
            return (self.left + self.right) / 2.0;
        }
        self.left + (self.right - self.left) * index as f64 / (self.points - 1) as f64
    }

    /// 上限を超える値は枠の上端に張り付ける
    fn y(&self, percentage: f64) -> f64 {
        let clamped = percentage.clamp(0.0, self.y_max);
        self.bottom - (self.bottom - self.top) * clamped / self.y_max
    }
}

/// 月別一致率の折れ線グラフを描く
pub fn render_png(report: &MonthlyReport, options: &ReportOptions) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let y_max = if options.y_max > 0.0 { options.y_max } else { 100.0 };
    let plot = Plot::new(report.buckets.len(), y_max);

    let mut level = GRID_STEP;
    while level < y_max {
        let y = plot.y(level);
        draw_line(&mut img, (plot.left, y), (plot.right, y), GRID, 1.0);
        level += GRID_STEP;
    }
    for index in 0..report.buckets.len() {
        let x = plot.x(index);
        draw_line(&mut img, (x, plot.bottom), (x, plot.bottom + 6.0), AXIS, 1.0);
    }
    draw_line(&mut img, (plot.left, plot.top), (plot.left, plot.bottom), AXIS, 2.0);
    draw_line(&mut img, (plot.left, plot.bottom), (plot.right, plot.bottom), AXIS, 2.0);

    if report.buckets.is_empty() {
        return img;
    }

    let average = plot.y(report.overall_percentage());
    draw_dashed_line(&mut img, (plot.left, average), (plot.right, average), AVERAGE, 2.0);

    let points: Vec<(f64, f64)> = report
        .buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| (plot.x(i), plot.y(bucket.match_percentage)))
        .collect();
    for pair in points.windows(2) {
        draw_line(&mut img, pair[0], pair[1], PERCENTAGE, 3.0);
    }
    for &(x, y) in &points {
        draw_disc(&mut img, x, y, 4.0, PERCENTAGE);
    }

    img
}

pub fn write_png(report: &MonthlyReport, path: &Path, options: &ReportOptions) -> Result<()> {
    render_png(report, options)
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| FilterError::ChartGeneration(e.to_string()))
}

fn draw_disc(img: &mut RgbaImage, cx: f64, cy: f64, radius: f64, color: Rgba<u8>) {
    let max_x = img.width() as i64 - 1;
    let max_y = img.height() as i64 - 1;
    let min_x = ((cx - radius).floor() as i64).clamp(0, max_x);
    let to_x = ((cx + radius).ceil() as i64).clamp(0, max_x);
    let min_y = ((cy - radius).floor() as i64).clamp(0, max_y);
    let to_y = ((cy + radius).ceil() as i64).clamp(0, max_y);

    let r2 = radius * radius;
    for y in min_y..=to_y {
        for x in min_x..=to_x {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            if dx * dx + dy * dy <= r2 {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

fn draw_line(img: &mut RgbaImage, from: (f64, f64), to: (f64, f64), color: Rgba<u8>, width: f64) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let steps = (dx * dx + dy * dy).sqrt().max(1.0).ceil() as u32;
    let radius = (width / 2.0).max(0.5);
    for step in 0..=steps {
        let t = f64::from(step) / f64::from(steps);
        draw_disc(img, from.0 + dx * t, from.1 + dy * t, radius, color);
    }
}

/// 8px描いて6px空ける
fn draw_dashed_line(
    img: &mut RgbaImage,
    from: (f64, f64),
    to: (f64, f64),
    color: Rgba<u8>,
    width: f64,
) {
    const DASH: f64 = 8.0;
    const GAP: f64 = 6.0;

    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let length = (dx * dx + dy * dy).sqrt();
    if length <= 0.0 {
        return;
    }

    let mut start = 0.0;
    while start < length {
        let end = (start + DASH).min(length);
        let a = (from.0 + dx * start / length, from.1 + dy * start / length);
        let b = (from.0 + dx * end / length, from.1 + dy * end / length);
        draw_line(img, a, b, color, width);
        start = end + GAP;
    }
}
