// Library exports for delaygraph

pub mod columns;
pub mod cumsum;
pub mod data;
pub mod figure;
pub mod jointplot;
pub mod marginal;
pub mod palette;
pub mod stat;
pub mod time_hist;

pub use cumsum::{render_cum_sum_bar, CumSumSpec};
pub use data::{Column, Table};
pub use figure::Figure;
pub use jointplot::{render_joint_plot, JointPlotSpec};
pub use marginal::MarginalKind;
pub use time_hist::{render_time_hist, TimeHistSpec};

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
    /// Persist the figure here before it is returned; `None` writes nothing.
    #[serde(default)]
    pub save_path: Option<PathBuf>,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            format: OutputFormat::Png,
            save_path: None,
        }
    }
}
