//! Horizontal bar chart sorted by value, annotated with percentages, with
//! the running cumulative sum overlaid on a secondary top axis.

use crate::data::Table;
use crate::figure::{self, Figure, Scene};
use crate::palette::ColorPalette;
use crate::stat;
use crate::RenderOptions;
use anyhow::{bail, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

#[derive(Debug, Clone)]
pub struct CumSumSpec {
    /// Column holding one label per bar
    pub labels: String,
    /// Numeric column the bars and cumulative sum are computed from
    pub values: String,
}

/// Render the cumulative-sum bar chart described by `spec` over `table`.
pub fn render_cum_sum_bar(
    table: &Table,
    spec: &CumSumSpec,
    options: &RenderOptions,
) -> Result<Figure> {
    let scene = prepare_scene(table, spec)?;
    figure::render_scene(&scene, options)
}

#[derive(Debug)]
struct CumSumScene {
    /// Bar labels in descending-value order
    labels: Vec<String>,
    values: Vec<f64>,
    cumulative: Vec<f64>,
}

fn prepare_scene(table: &Table, spec: &CumSumSpec) -> Result<CumSumScene> {
    if table.is_empty() {
        bail!("Table must contain at least one data row");
    }

    let labels = table.text(&spec.labels)?;
    let values = table.numeric(&spec.values)?;

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let labels: Vec<String> = order.iter().map(|&i| labels[i].clone()).collect();
    let values: Vec<f64> = order.iter().map(|&i| values[i]).collect();
    let cumulative = stat::cumulative_sum(&values);

    Ok(CumSumScene {
        labels,
        values,
        cumulative,
    })
}

impl Scene for CumSumScene {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        let n = self.labels.len();
        let value_max = self
            .values
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        let x_max = (value_max * 1.1).max(1.0);
        let cum_max = (self
            .cumulative
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max)
            * 1.05)
            .max(1.0);

        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .caption("Bar Plot with Cumulative Sum Overlay", ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(80)
            .top_x_label_area_size(40)
            .build_cartesian_2d(0.0..x_max, 0.0..n as f64)
            .context("Failed to build chart")?
            .set_secondary_coord(0.0..cum_max, 0.0..n as f64);

        let labels = self.labels.clone();
        chart
            .configure_mesh()
            .y_labels(n)
            .y_label_formatter(&|y| {
                let idx = *y as usize;
                labels.get(idx).cloned().unwrap_or_default()
            })
            .x_desc("Values")
            .y_desc("Labels")
            .draw()
            .context("Failed to draw mesh")?;

        chart
            .configure_secondary_axes()
            .x_desc("Cumulative Sum")
            .draw()
            .context("Failed to draw secondary axis")?;

        let bar_color = ColorPalette::category10().assign_colors(&["bars".to_string()])["bars"];
        for (idx, &value) in self.values.iter().enumerate() {
            let base = idx as f64;
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(0.0, base + 0.1), (value, base + 0.9)],
                    bar_color.filled(),
                )))
                .context("Failed to draw bar")?;

            chart
                .draw_series(std::iter::once(Text::new(
                    format!("{:.2}%", value),
                    (value, base + 0.5),
                    ("sans-serif", 12),
                )))
                .context("Failed to draw bar annotation")?;
        }

        // Cumulative line with circle markers against the top axis
        let line_points: Vec<(f64, f64)> = self
            .cumulative
            .iter()
            .enumerate()
            .map(|(idx, &c)| (c, idx as f64 + 0.5))
            .collect();

        chart
            .draw_secondary_series(LineSeries::new(line_points.clone(), RED.stroke_width(2)))
            .context("Failed to draw cumulative line")?;
        chart
            .draw_secondary_series(
                line_points
                    .iter()
                    .map(|&point| Circle::new(point, 3, RED.filled())),
            )
            .context("Failed to draw cumulative markers")?;

        Ok(())
    }
}
