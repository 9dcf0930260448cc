//! Marginal distribution panels for the joint plot: box, violin, histogram
//! and density views of a single column, drawn horizontally (top panel) or
//! vertically (right panel) without axes.

use crate::stat;
use anyhow::{bail, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::Deserialize;
use std::ops::Range;
use std::str::FromStr;

/// Bin count used by the histogram marginal.
const MARGINAL_BINS: usize = 20;

/// The univariate view drawn in the marginal panels of a joint plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MarginalKind {
    #[serde(rename = "box")]
    Box,
    #[serde(rename = "violin")]
    Violin,
    #[serde(rename = "histogram")]
    Histogram,
    #[serde(rename = "density")]
    Density,
}

impl FromStr for MarginalKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "box" => Ok(MarginalKind::Box),
            "violin" => Ok(MarginalKind::Violin),
            "histogram" => Ok(MarginalKind::Histogram),
            "density" => Ok(MarginalKind::Density),
            other => bail!(
                "Invalid marginal kind '{}'. Must be one of: box, violin, histogram, density",
                other
            ),
        }
    }
}

/// Direction of the value axis within a marginal panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Orientation {
    /// Value axis along x (top panel)
    Horizontal,
    /// Value axis along y (right panel)
    Vertical,
}

/// Map a (value, cross) pair into panel coordinates.
fn orient(orientation: Orientation, value: f64, cross: f64) -> (f64, f64) {
    match orientation {
        Orientation::Horizontal => (value, cross),
        Orientation::Vertical => (cross, value),
    }
}

/// Draw one marginal panel. `value_range` must match the adjoining scatter
/// axis so the panels line up; `pad_left`/`pad_bottom` reserve the same
/// label areas as the main chart without drawing any axes here.
pub(crate) fn draw_marginal<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    values: &[f64],
    kind: MarginalKind,
    orientation: Orientation,
    value_range: Range<f64>,
    pad_left: u32,
    pad_bottom: u32,
    color: RGBColor,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let cross_range = match kind {
        MarginalKind::Histogram => {
            let max = stat::bin_values(values, MARGINAL_BINS)?.max_count() as f64;
            0.0..(max * 1.05).max(1.0)
        }
        // Box and violin geometry is centered at 0.5; density is normalized
        _ => 0.0..1.05,
    };

    let (x_range, y_range) = match orientation {
        Orientation::Horizontal => (value_range, cross_range),
        Orientation::Vertical => (cross_range, value_range),
    };

    let mut chart = ChartBuilder::on(area)
        .y_label_area_size(pad_left)
        .x_label_area_size(pad_bottom)
        .build_cartesian_2d(x_range, y_range)
        .context("Failed to build marginal chart")?;

    match kind {
        MarginalKind::Box => draw_box(&mut chart, values, orientation, color),
        MarginalKind::Violin => draw_violin(&mut chart, values, orientation, color),
        MarginalKind::Histogram => draw_histogram(&mut chart, values, orientation, color),
        MarginalKind::Density => draw_density(&mut chart, values, orientation, color),
    }
}

type MarginalChart<'a, DB> = ChartContext<
    'a,
    DB,
    Cartesian2d<plotters::coord::types::RangedCoordf64, plotters::coord::types::RangedCoordf64>,
>;

fn draw_box<DB: DrawingBackend>(
    chart: &mut MarginalChart<DB>,
    values: &[f64],
    orientation: Orientation,
    color: RGBColor,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let stats = stat::box_stats(values)?;

    let center = 0.5;
    let half_width = 0.25;
    let cap_half = 0.1;

    let whisker_style = color.stroke_width(2);

    // Whiskers with end caps
    let segments = [
        vec![
            orient(orientation, stats.lower_whisker, center),
            orient(orientation, stats.q1, center),
        ],
        vec![
            orient(orientation, stats.q3, center),
            orient(orientation, stats.upper_whisker, center),
        ],
        vec![
            orient(orientation, stats.lower_whisker, center - cap_half),
            orient(orientation, stats.lower_whisker, center + cap_half),
        ],
        vec![
            orient(orientation, stats.upper_whisker, center - cap_half),
            orient(orientation, stats.upper_whisker, center + cap_half),
        ],
    ];
    for segment in segments {
        chart
            .draw_series(std::iter::once(PathElement::new(segment, whisker_style)))
            .context("Failed to draw box whisker")?;
    }

    // Box, then the median line on top
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [
                orient(orientation, stats.q1, center - half_width),
                orient(orientation, stats.q3, center + half_width),
            ],
            color.mix(0.5).filled(),
        )))
        .context("Failed to draw box body")?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![
                orient(orientation, stats.median, center - half_width),
                orient(orientation, stats.median, center + half_width),
            ],
            color.stroke_width(2),
        )))
        .context("Failed to draw box median")?;

    if !stats.outliers.is_empty() {
        chart
            .draw_series(
                stats
                    .outliers
                    .iter()
                    .map(|&v| Circle::new(orient(orientation, v, center), 2, color.filled())),
            )
            .context("Failed to draw box outliers")?;
    }

    Ok(())
}

fn draw_violin<DB: DrawingBackend>(
    chart: &mut MarginalChart<DB>,
    values: &[f64],
    orientation: Orientation,
    color: RGBColor,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (grid, density) = stat::kde_curve(values);
    if grid.is_empty() {
        return Ok(());
    }

    let center = 0.5;
    let half_width = 0.4;

    // Symmetric outline: forward along one side, back along the other
    let mut points = Vec::with_capacity(grid.len() * 2);
    for (v, d) in grid.iter().zip(density.iter()) {
        points.push(orient(orientation, *v, center + d * half_width));
    }
    for (v, d) in grid.iter().zip(density.iter()).rev() {
        points.push(orient(orientation, *v, center - d * half_width));
    }

    chart
        .draw_series(std::iter::once(Polygon::new(
            points.clone(),
            color.mix(0.5).filled(),
        )))
        .context("Failed to draw violin body")?;

    points.push(points[0]);
    chart
        .draw_series(std::iter::once(PathElement::new(points, color.stroke_width(1))))
        .context("Failed to draw violin outline")?;

    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    chart: &mut MarginalChart<DB>,
    values: &[f64],
    orientation: Orientation,
    color: RGBColor,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let bins = stat::bin_values(values, MARGINAL_BINS)?;

    for (idx, &count) in bins.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let left = bins.start + idx as f64 * bins.width;
        let right = left + bins.width;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [
                    orient(orientation, left, 0.0),
                    orient(orientation, right, count as f64),
                ],
                color.mix(0.6).filled(),
            )))
            .context("Failed to draw marginal histogram bar")?;
    }

    Ok(())
}

fn draw_density<DB: DrawingBackend>(
    chart: &mut MarginalChart<DB>,
    values: &[f64],
    orientation: Orientation,
    color: RGBColor,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (grid, density) = stat::kde_curve(values);
    if grid.is_empty() {
        return Ok(());
    }

    let points: Vec<(f64, f64)> = grid
        .iter()
        .zip(density.iter())
        .map(|(&v, &d)| orient(orientation, v, d))
        .collect();

    chart
        .draw_series(LineSeries::new(points, color.stroke_width(2)))
        .context("Failed to draw density curve")?;

    Ok(())
}
