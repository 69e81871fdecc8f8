//! Server-side SVG charts.
//!
//! Every chart is drawn with plotters into an in-memory SVG document so views
//! can embed it inline. Empty inputs still produce a titled, empty chart.

use std::f64::consts::PI;
use std::ops::Range;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::analytics::{ChapterCompletion, CompletionDistribution, ScorePoint, StudentTrend};
use crate::error::{DashboardError, Result};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 400;
const FONT: &str = "sans-serif";

const COMPLETED_COLOR: RGBColor = RGBColor(46, 139, 87);
const NOT_COMPLETED_COLOR: RGBColor = RGBColor(220, 80, 60);
const SERIES_COLOR: RGBColor = RGBColor(52, 101, 164);

type DrawResult = std::result::Result<(), DrawingAreaErrorKind<std::io::Error>>;

fn chart_error(err: impl std::fmt::Display) -> DashboardError {
    DashboardError::Chart(err.to_string())
}

fn render_svg(draw: impl FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> DrawResult) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;
        draw(&root).map_err(chart_error)?;
        root.present().map_err(chart_error)?;
    }
    Ok(svg)
}

/// Range covering `values` with a little headroom; `0..1` when empty.
fn padded_range(values: impl Iterator<Item = f64>, from_zero: bool) -> Range<f64> {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if from_zero {
        lo = lo.min(0.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        hi = lo + 1.0;
    }
    let pad = (hi - lo) * 0.05;
    (if from_zero && lo >= 0.0 { lo } else { lo - pad })..(hi + pad)
}

fn chapter_range(chapters: impl Iterator<Item = u32>) -> Range<i64> {
    let (lo, hi) = chapters.fold((i64::MAX, i64::MIN), |(lo, hi), c| {
        let c = i64::from(c);
        (lo.min(c), hi.max(c))
    });
    if lo > hi {
        1..2
    } else {
        lo..hi + 1
    }
}

fn chapter_label(value: &SegmentValue<i64>) -> String {
    match value {
        SegmentValue::Exact(c) | SegmentValue::CenterOf(c) => c.to_string(),
        SegmentValue::Last => String::new(),
    }
}

/// A (chapter, base, top) rectangle per entry; equal chapters stack.
fn chapter_bars(
    title: &str,
    y_desc: &str,
    bars: &[(u32, f64, f64)],
    y_range: Range<f64>,
) -> Result<String> {
    let x_range = chapter_range(bars.iter().map(|b| b.0));
    render_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 20).into_font())
            .margin(12)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range.into_segmented(), y_range)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("chapter")
            .y_desc(y_desc)
            .x_label_formatter(&chapter_label)
            .draw()?;

        chart.draw_series(bars.iter().map(|&(chapter, base, top)| {
            let c = i64::from(chapter);
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(c), base), (SegmentValue::Exact(c + 1), top)],
                SERIES_COLOR.mix(0.8).filled(),
            );
            bar.set_margin(0, 0, 6, 6);
            bar
        }))?;
        Ok(())
    })
}

pub fn completion_pie(distribution: &CompletionDistribution) -> Result<String> {
    let slices = [
        ("Not Completed", distribution.not_completed, NOT_COMPLETED_COLOR),
        ("Completed", distribution.completed, COMPLETED_COLOR),
    ];
    let total = distribution.completed + distribution.not_completed;

    render_svg(|root| {
        let area = root.titled("Completion Distribution", (FONT, 20).into_font())?;
        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = f64::from(w.min(h)) * 0.38;

        if total == 0 {
            area.draw(&Text::new("No records", (center.0 - 40, center.1), (FONT, 16).into_font()))?;
            return Ok(());
        }

        let mut start = -PI / 2.0;
        for (label, count, color) in slices {
            if count == 0 {
                continue;
            }
            let share = count as f64 / total as f64;
            let sweep = share * 2.0 * PI;
            let steps = ((sweep / (2.0 * PI)) * 90.0).ceil().max(2.0) as usize;

            let mut points = vec![center];
            points.extend((0..=steps).map(|i| {
                let angle = start + sweep * i as f64 / steps as f64;
                (
                    center.0 + (radius * angle.cos()).round() as i32,
                    center.1 + (radius * angle.sin()).round() as i32,
                )
            }));
            area.draw(&Polygon::new(points, color.filled()))?;

            let mid = start + sweep / 2.0;
            let anchor = (
                center.0 + (radius * 0.6 * mid.cos()).round() as i32 - 40,
                center.1 + (radius * 0.6 * mid.sin()).round() as i32,
            );
            area.draw(&Text::new(
                format!("{label} {:.1}%", share * 100.0),
                anchor,
                (FONT, 14).into_font().color(&WHITE),
            ))?;

            start += sweep;
        }
        Ok(())
    })
}

pub fn score_time_scatter(points: &[ScorePoint]) -> Result<String> {
    let x_range = padded_range(points.iter().map(|p| p.time_spent), true);
    let y_range = padded_range(points.iter().map(|p| p.score), true);

    render_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Score vs Time Spent", (FONT, 20).into_font())
            .margin(12)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc("time_spent")
            .y_desc("score")
            .draw()?;

        for (completed, color, label) in [
            (false, NOT_COMPLETED_COLOR, "0"),
            (true, COMPLETED_COLOR, "1"),
        ] {
            chart
                .draw_series(
                    points
                        .iter()
                        .filter(|p| p.completed == completed)
                        .map(|p| Circle::new((p.time_spent, p.score), 2, color.mix(0.6).filled())),
                )?
                .label(format!("completed = {label}"))
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    })
}

pub fn chapter_completion_bars(chapters: &[ChapterCompletion]) -> Result<String> {
    let bars: Vec<(u32, f64, f64)> = chapters
        .iter()
        .map(|c| (c.chapter, 0.0, c.completion_rate))
        .collect();
    chapter_bars("Completion Rate per Chapter", "completed", &bars, 0.0..1.05)
}

pub fn score_trend_line(trend: &StudentTrend) -> Result<String> {
    let x_range = chapter_range(trend.chapters.iter().copied());
    let y_range = padded_range(trend.scores.iter().copied(), true);
    let points: Vec<(SegmentValue<i64>, f64)> = trend
        .chapters
        .iter()
        .zip(&trend.scores)
        .map(|(&c, &s)| (SegmentValue::CenterOf(i64::from(c)), s))
        .collect();

    render_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Score by Chapter", (FONT, 20).into_font())
            .margin(12)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range.into_segmented(), y_range)?;

        chart
            .configure_mesh()
            .x_desc("chapter")
            .y_desc("score")
            .x_label_formatter(&chapter_label)
            .draw()?;

        chart.draw_series(LineSeries::new(points.clone(), SERIES_COLOR.stroke_width(2)))?;
        chart.draw_series(
            points
                .into_iter()
                .map(|p| Circle::new(p, 4, SERIES_COLOR.filled())),
        )?;
        Ok(())
    })
}

pub fn time_spent_bars(trend: &StudentTrend) -> Result<String> {
    let mut stacked: Vec<(u32, f64, f64)> = Vec::with_capacity(trend.chapters.len());
    for (&chapter, &time) in trend.chapters.iter().zip(&trend.time_spent) {
        let base = stacked
            .iter()
            .filter(|b| b.0 == chapter)
            .map(|b| b.2)
            .fold(0.0, f64::max);
        stacked.push((chapter, base, base + time));
    }
    let y_range = padded_range(stacked.iter().map(|b| b.2), true);
    chapter_bars("Time Spent by Chapter", "time_spent", &stacked, y_range)
}
