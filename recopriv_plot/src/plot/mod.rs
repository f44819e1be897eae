mod axes;
mod colormap;
mod marker;

// Re-exports.
pub use colormap::Colormap;
pub use marker::Marker;

use crate::axis::SweepAxis;
use crate::config::Layout;
use crate::db::{RatioSeries, SweepSeries};
use crate::error::{Error, Result};
use crate::metric::Metric;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

/// Aggregated data of one panel, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelData {
    pub axis: &'static SweepAxis,
    pub metric: Metric,
    pub series: PanelSeries,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelSeries {
    Sweep(Vec<SweepSeries>),
    PerRecord(Vec<RatioSeries>),
}

/// Draws `panels` on `root`, split into the cells of `layout` and filled
/// row by row.
pub fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    panels: &[PanelData],
    layout: Layout,
) -> Result<()> {
    if panels.len() > layout.cells() {
        return Err(Error::Configuration(format!(
            "{} panels don't fit in a {}x{} layout",
            panels.len(),
            layout.rows,
            layout.cols
        )));
    }

    root.fill(&WHITE).map_err(render_error)?;
    let cells =
        root.split_evenly((layout.rows as usize, layout.cols as usize));
    for (panel, cell) in panels.iter().zip(cells.iter()) {
        match &panel.series {
            PanelSeries::Sweep(series) => {
                axes::draw_sweep(cell, panel.axis, &panel.metric, series)?
            }
            PanelSeries::PerRecord(series) => {
                axes::draw_ratios(cell, panel.axis, &panel.metric, series)?
            }
        }
    }
    root.present().map_err(render_error)
}

/// Draws the (rate, metric value) pair of every target on `root`.
pub fn draw_rates<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    metric: &Metric,
    rates: &[(f64, f64)],
) -> Result<()> {
    root.fill(&WHITE).map_err(render_error)?;
    axes::draw_rates(root, metric, rates)?;
    root.present().map_err(render_error)
}

pub(crate) fn render_error<E>(error: DrawingAreaErrorKind<E>) -> Error
where
    E: std::error::Error + Send + Sync,
{
    Error::Render(error.to_string())
}
