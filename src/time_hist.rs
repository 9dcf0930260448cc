//! Overlapping histograms of one or more time-valued columns, with optional
//! mean markers and an optional upper limit applied before binning.

use crate::data::Table;
use crate::figure::{self, Figure, Scene};
use crate::palette;
use crate::stat;
use crate::RenderOptions;
use anyhow::{bail, Context, Result};
use chrono::NaiveTime;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::FontTransform;
use std::ops::Range;

/// What to plot: each column is drawn as a semi-transparent histogram in the
/// matching color.
#[derive(Debug, Clone)]
pub struct TimeHistSpec {
    pub columns: Vec<String>,
    pub colors: Vec<String>,
    pub bins: usize,
    pub title: String,
    /// Draw a dashed vertical line at each column's mean
    pub show_mean: bool,
    /// Keep only values strictly below this limit before binning and
    /// before computing the mean
    pub limit: Option<f64>,
}

/// Render the histogram described by `spec` over `table`.
pub fn render_time_hist(
    table: &Table,
    spec: &TimeHistSpec,
    options: &RenderOptions,
) -> Result<Figure> {
    let scene = prepare_scene(table, spec)?;
    figure::render_scene(&scene, options)
}

#[derive(Debug)]
struct HistSeries {
    name: String,
    color: RGBColor,
    bins: stat::Bins,
    mean: Option<f64>,
}

#[derive(Debug)]
struct TimeHistScene {
    series: Vec<HistSeries>,
    x_range: Range<f64>,
    y_max: f64,
    title: String,
    time_axis: bool,
}

fn prepare_scene(table: &Table, spec: &TimeHistSpec) -> Result<TimeHistScene> {
    if spec.columns.is_empty() {
        bail!("Time histogram requires at least one column");
    }
    if spec.columns.len() != spec.colors.len() {
        bail!(
            "Columns and colors must have the same length (columns: {}, colors: {})",
            spec.columns.len(),
            spec.colors.len()
        );
    }
    if table.is_empty() {
        bail!("Table must contain at least one data row");
    }

    let mut series = Vec::new();
    for (col, color_name) in spec.columns.iter().zip(spec.colors.iter()) {
        let color = palette::parse_color(color_name)
            .with_context(|| format!("Invalid color for column '{}'", col))?;

        let mut values = table.numeric(col)?;
        if let Some(limit) = spec.limit {
            values.retain(|&v| v < limit);
            if values.is_empty() {
                bail!("Column '{}' has no values below the limit {}", col, limit);
            }
        }

        let mean = if spec.show_mean {
            Some(stat::mean(&values))
        } else {
            None
        };

        series.push(HistSeries {
            name: col.clone(),
            color,
            bins: stat::bin_values(&values, spec.bins)?,
            mean,
        });
    }

    // The original keys the axis format off the final column's dtype
    let time_axis = table.is_time(spec.columns.last().unwrap())?;

    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_max = 0.0f64;
    for s in &series {
        x_min = x_min.min(s.bins.start);
        x_max = x_max.max(s.bins.start + s.bins.width * s.bins.counts.len() as f64);
        y_max = y_max.max(s.bins.max_count() as f64);
    }

    let x_range = if x_min == x_max {
        (x_min - 1.0)..(x_max + 1.0)
    } else {
        let padding = (x_max - x_min) * 0.05;
        (x_min - padding)..(x_max + padding)
    };

    Ok(TimeHistScene {
        series,
        x_range,
        y_max: (y_max * 1.05).max(1.0),
        title: spec.title.clone(),
        time_axis,
    })
}

impl Scene for TimeHistScene {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .caption(&self.title, ("sans-serif", 20))
            .x_label_area_size(if self.time_axis { 60 } else { 40 })
            .y_label_area_size(50)
            .build_cartesian_2d(self.x_range.clone(), 0.0..self.y_max)
            .context("Failed to build chart")?;

        let time_fmt = |v: &f64| format_seconds_of_day(*v);
        let mut mesh = chart.configure_mesh();
        if self.time_axis {
            mesh.x_label_formatter(&time_fmt).x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            );
        }
        mesh.draw().context("Failed to draw mesh")?;

        for s in &self.series {
            let style = s.color.mix(0.5).filled();
            let bins = &s.bins;
            let legend_color = s.color;

            chart
                .draw_series(bins.counts.iter().enumerate().filter(|(_, &c)| c > 0).map(
                    |(idx, &count)| {
                        let left = bins.start + idx as f64 * bins.width;
                        Rectangle::new([(left, 0.0), (left + bins.width, count as f64)], style)
                    },
                ))
                .context("Failed to draw histogram bars")?
                .label(s.name.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], legend_color.filled())
                });
        }

        // Mean markers go on top of every histogram
        for s in &self.series {
            if let Some(mean) = s.mean {
                chart
                    .draw_series(DashedLineSeries::new(
                        vec![(mean, 0.0), (mean, self.y_max)],
                        5,
                        3,
                        s.color.stroke_width(2),
                    ))
                    .context("Failed to draw mean marker")?;
            }
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .context("Failed to draw legend")?;

        Ok(())
    }
}

/// Format a seconds-of-day value as HH:MM:SS for axis ticks.
fn format_seconds_of_day(v: f64) -> String {
    let secs = (v.rem_euclid(86_400.0) as u32).min(86_399);
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use chrono::NaiveDate;

    fn make_table() -> Table {
        Table::new(vec![
            (
                "DepDelay".to_string(),
                Column::Number(vec![1.0, 2.0, 3.0, 100.0]),
            ),
            (
                "ArrDelay".to_string(),
                Column::Number(vec![5.0, 6.0, 7.0, 8.0]),
            ),
        ])
        .unwrap()
    }

    fn make_spec(columns: Vec<&str>, colors: Vec<&str>) -> TimeHistSpec {
        TimeHistSpec {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            colors: colors.iter().map(|s| s.to_string()).collect(),
            bins: 4,
            title: "Delays".to_string(),
            show_mean: false,
            limit: None,
        }
    }

    #[test]
    fn test_empty_columns_rejected() {
        let result = prepare_scene(&make_table(), &make_spec(vec![], vec![]));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least one column"));
    }

    #[test]
    fn test_mismatched_colors_rejected() {
        let result = prepare_scene(
            &make_table(),
            &make_spec(vec!["DepDelay", "ArrDelay"], vec!["red"]),
        );
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("same length"));
    }

    #[test]
    fn test_unknown_column_rejected() {
        let result = prepare_scene(&make_table(), &make_spec(vec!["TaxiOut"], vec!["red"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_unknown_color_rejected() {
        let result = prepare_scene(&make_table(), &make_spec(vec!["DepDelay"], vec!["blurple"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown color"));
    }

    #[test]
    fn test_mean_uses_only_values_below_limit() {
        let mut spec = make_spec(vec!["DepDelay"], vec!["red"]);
        spec.show_mean = true;
        spec.limit = Some(10.0);
        let scene = prepare_scene(&make_table(), &spec).unwrap();
        // 100.0 is filtered out; mean of [1, 2, 3]
        assert_eq!(scene.series[0].mean, Some(2.0));
    }

    #[test]
    fn test_mean_without_limit_uses_full_column() {
        let mut spec = make_spec(vec!["DepDelay"], vec!["red"]);
        spec.show_mean = true;
        let scene = prepare_scene(&make_table(), &spec).unwrap();
        assert_eq!(scene.series[0].mean, Some(26.5));
    }

    #[test]
    fn test_limit_is_strict() {
        let mut spec = make_spec(vec!["DepDelay"], vec!["red"]);
        spec.limit = Some(3.0);
        let scene = prepare_scene(&make_table(), &spec).unwrap();
        // Values >= 3.0 excluded: only [1, 2] remain
        assert_eq!(scene.series[0].bins.counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn test_limit_filtering_everything_is_an_error() {
        let mut spec = make_spec(vec!["DepDelay"], vec!["red"]);
        spec.limit = Some(0.5);
        let result = prepare_scene(&make_table(), &spec);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("no values below the limit"));
    }

    #[test]
    fn test_time_axis_tracks_final_column_type() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let table = Table::new(vec![
            (
                "DepTime".to_string(),
                Column::Time(vec![
                    day.and_hms_opt(8, 0, 0).unwrap(),
                    day.and_hms_opt(9, 30, 0).unwrap(),
                ]),
            ),
            ("DepDelay".to_string(), Column::Number(vec![3.0, 12.0])),
        ])
        .unwrap();

        let scene = prepare_scene(&table, &make_spec(vec!["DepTime"], vec!["blue"])).unwrap();
        assert!(scene.time_axis);

        let scene = prepare_scene(
            &table,
            &make_spec(vec!["DepTime", "DepDelay"], vec!["blue", "red"]),
        )
        .unwrap();
        assert!(!scene.time_axis);
    }

    #[test]
    fn test_format_seconds_of_day() {
        assert_eq!(format_seconds_of_day(0.0), "00:00:00");
        assert_eq!(format_seconds_of_day((8 * 3600 + 15 * 60) as f64), "08:15:00");
        assert_eq!(format_seconds_of_day(86_399.0), "23:59:59");
    }

    #[test]
    fn test_render_produces_png() {
        let spec = make_spec(vec!["DepDelay", "ArrDelay"], vec!["red", "blue"]);
        let figure = render_time_hist(&make_table(), &spec, &RenderOptions::default()).unwrap();
        assert_eq!(&figure.bytes()[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }
}
