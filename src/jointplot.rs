//! Joint distribution plot: a scatter panel with marginal distribution
//! panels for both columns, laid out on a 2x2 grid with 5:1 width and 1:5
//! height ratios. The Pearson correlation of the two columns is printed
//! and returned alongside the figure.

use crate::data::Table;
use crate::figure::{self, Figure, Scene};
use crate::marginal::{self, MarginalKind, Orientation};
use crate::palette::ColorPalette;
use crate::stat;
use crate::RenderOptions;
use anyhow::{bail, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::collections::HashMap;
use std::ops::Range;

const X_LABEL_AREA: u32 = 40;
const Y_LABEL_AREA: u32 = 50;

#[derive(Debug, Clone)]
pub struct JointPlotSpec {
    pub x: String,
    pub y: String,
    /// Style of the two marginal panels
    pub kind: MarginalKind,
    /// Color the scatter by this column's values
    pub hue: Option<String>,
    pub title: Option<String>,
}

/// Render the joint plot and return it together with the Pearson
/// correlation of (x, y), which is also printed to stdout before
/// rendering begins.
pub fn render_joint_plot(
    table: &Table,
    spec: &JointPlotSpec,
    options: &RenderOptions,
) -> Result<(Figure, f64)> {
    let scene = prepare_scene(table, spec)?;
    println!("Pearson correlation coefficient: {}", scene.correlation);
    let figure = figure::render_scene(&scene, options)?;
    Ok((figure, scene.correlation))
}

#[derive(Debug)]
struct ScatterGroup {
    /// Hue value for the legend; `None` when no hue column is set
    key: Option<String>,
    points: Vec<(f64, f64)>,
    color: RGBColor,
}

#[derive(Debug)]
struct JointPlotScene {
    groups: Vec<ScatterGroup>,
    x_values: Vec<f64>,
    y_values: Vec<f64>,
    x_range: Range<f64>,
    y_range: Range<f64>,
    x_label: String,
    y_label: String,
    kind: MarginalKind,
    title: Option<String>,
    correlation: f64,
}

fn prepare_scene(table: &Table, spec: &JointPlotSpec) -> Result<JointPlotScene> {
    if table.is_empty() {
        bail!("Table must contain at least one data row");
    }

    let x_values = table.numeric(&spec.x)?;
    let y_values = table.numeric(&spec.y)?;
    let correlation = stat::pearson(&x_values, &y_values)?;

    let palette = ColorPalette::category10();
    let groups = match &spec.hue {
        Some(hue_col) => {
            let hue_values = table.text(hue_col)?;

            let mut keys: Vec<String> = hue_values.clone();
            keys.sort();
            keys.dedup();
            let color_map = palette.assign_colors(&keys);

            let mut grouped: HashMap<String, Vec<(f64, f64)>> = HashMap::new();
            for ((&x, &y), key) in x_values.iter().zip(y_values.iter()).zip(hue_values.iter()) {
                grouped.entry(key.clone()).or_default().push((x, y));
            }

            keys.into_iter()
                .map(|key| {
                    let points = grouped.remove(&key).unwrap_or_default();
                    let color = color_map[&key];
                    ScatterGroup {
                        key: Some(key),
                        points,
                        color,
                    }
                })
                .collect()
        }
        None => {
            let points = x_values
                .iter()
                .zip(y_values.iter())
                .map(|(&x, &y)| (x, y))
                .collect();
            vec![ScatterGroup {
                key: None,
                points,
                color: palette.assign_colors(&["default".to_string()])["default"],
            }]
        }
    };

    Ok(JointPlotScene {
        groups,
        x_range: pad_range(&x_values),
        y_range: pad_range(&y_values),
        x_label: spec.x.clone(),
        y_label: spec.y.clone(),
        x_values,
        y_values,
        kind: spec.kind,
        title: spec.title.clone(),
        correlation,
    })
}

fn pad_range(values: &[f64]) -> Range<f64> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

impl Scene for JointPlotScene {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        let root = match &self.title {
            Some(title) => root
                .titled(title, ("sans-serif", 20))
                .context("Failed to draw title")?,
            None => root.clone(),
        };

        // 2x2 grid, no spacing: height ratios 1:5, width ratios 5:1.
        // The top-right quadrant stays blank.
        let (width, height) = root.dim_in_pixel();
        let (top, bottom) = root.split_vertically(height / 6);
        let (top_left, _top_right) = top.split_horizontally(width * 5 / 6);
        let (main_area, right) = bottom.split_horizontally(width * 5 / 6);

        let mut chart = ChartBuilder::on(&main_area)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(self.x_range.clone(), self.y_range.clone())
            .context("Failed to build chart")?;

        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .context("Failed to draw mesh")?;

        for group in &self.groups {
            let color = group.color;
            let series = chart
                .draw_series(
                    group
                        .points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 3, color.mix(0.25).filled())),
                )
                .context("Failed to draw scatter points")?;

            if let Some(key) = &group.key {
                series
                    .label(key.as_str())
                    .legend(move |(x, y)| Circle::new((x + 5, y), 3, color.filled()));
            }
        }

        if self.groups.iter().any(|g| g.key.is_some()) {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .context("Failed to draw legend")?;
        }

        let marginal_color = self.groups[0].color;
        marginal::draw_marginal(
            &top_left,
            &self.x_values,
            self.kind,
            Orientation::Horizontal,
            self.x_range.clone(),
            Y_LABEL_AREA,
            0,
            marginal_color,
        )?;
        marginal::draw_marginal(
            &right,
            &self.y_values,
            self.kind,
            Orientation::Vertical,
            self.y_range.clone(),
            0,
            X_LABEL_AREA,
            marginal_color,
        )?;

        Ok(())
    }
}
