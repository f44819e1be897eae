use crate::axis::{AxisMode, SweepAxis};
use crate::db::{RatioSeries, SweepSeries, TargetRate};
use crate::error::{Error, Result};
use crate::fmt::PlotFmt;
use crate::metric::Metric;
use crate::plot::{render_error, Colormap};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

const MARKER_SIZE: i32 = 5;
// padding around the normalized [0, 1] ranges of per-record panels
const RATIO_PADDING: f64 = 0.1;
// width of the color scale drawn next to per-record panels
const SCALE_WIDTH: u32 = 80;

/// Ranges of the x and y axes of a panel: the sweep values and the metric
/// bounds for sweeps, padded unit ratios and padded bounds for per-record
/// panels.
pub fn panel_ranges(
    axis: &SweepAxis,
    metric: &Metric,
) -> Result<(Range<f64>, Range<f64>)> {
    let (y_min, y_max) = metric.bounds;
    match axis.mode {
        AxisMode::Sweep => {
            let (x_min, x_max) = axis.range().ok_or_else(|| {
                Error::Render(format!("axis {} has no sweep values", axis.name))
            })?;
            Ok((x_min..x_max, y_min..y_max))
        }
        AxisMode::PerRecord => Ok((
            -RATIO_PADDING..1.0 + RATIO_PADDING,
            y_min - RATIO_PADDING..y_max + RATIO_PADDING,
        )),
    }
}

/// Draws one line with markers per group, each point being the reduction of
/// one sweep point.
pub fn draw_sweep<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    axis: &SweepAxis,
    metric: &Metric,
    series: &[SweepSeries],
) -> Result<()> {
    let (x_range, y_range) = panel_ranges(axis, metric)?;

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .map_err(render_error)?;
    chart
        .configure_mesh()
        .x_desc(axis.label)
        .y_desc(metric.label)
        .draw()
        .map_err(render_error)?;

    for (index, series) in series.iter().enumerate() {
        let color = PlotFmt::color(index);
        let marker = PlotFmt::marker(index);
        let points = series.xy(axis);

        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                color.stroke_width(2),
            ))
            .map_err(render_error)?
            .label(series.label.as_str())
            .legend(move |(x, y)| {
                EmptyElement::at((x, y))
                    + PathElement::new(
                        vec![(-10, 0), (10, 0)],
                        color.stroke_width(2),
                    )
                    + Polygon::new(marker.outline(MARKER_SIZE), color.filled())
            });
        chart
            .draw_series(points.into_iter().map(|point| {
                EmptyElement::at(point)
                    + Polygon::new(marker.outline(MARKER_SIZE), color.filled())
            }))
            .map_err(render_error)?;
    }

    draw_legend(&mut chart)
}

/// Draws every (ratio, value) group as a marker colored by its number of
/// occurrences, next to the color scale of those occurrences.
pub fn draw_ratios<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    axis: &SweepAxis,
    metric: &Metric,
    series: &[RatioSeries],
) -> Result<()> {
    let colormap = Colormap::spanning(
        series
            .iter()
            .flat_map(|series| series.occurrences())
            .map(|count| count as f64),
    );

    let (width, _) = area.dim_in_pixel();
    let (plot_area, scale_area) =
        area.split_horizontally(width.saturating_sub(SCALE_WIDTH));

    let (x_range, y_range) = panel_ranges(axis, metric)?;

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.clone(), y_range.clone())
        .map_err(render_error)?;
    chart
        .configure_mesh()
        .x_desc(axis.label)
        .y_desc(metric.label)
        .draw()
        .map_err(render_error)?;

    for (index, series) in series.iter().enumerate() {
        let marker = PlotFmt::marker(index);
        // infinite ratios (null populations) fall outside of the panel
        let groups = series.groups.iter().filter(|group| {
            x_range.contains(&group.ratio) && y_range.contains(&group.value)
        });

        chart
            .draw_series(groups.map(|group| {
                let color = colormap.color(group.occurrences() as f64);
                EmptyElement::at((group.ratio, group.value))
                    + Polygon::new(marker.outline(MARKER_SIZE), color.filled())
            }))
            .map_err(render_error)?
            .label(series.label.as_str())
            .legend(move |(x, y)| {
                EmptyElement::at((x, y))
                    + Polygon::new(marker.outline(MARKER_SIZE), BLACK.filled())
            });
    }

    draw_legend(&mut chart)?;
    colormap.draw_scale(&scale_area)
}

/// Ranges of a rate scatter: one unit past the extreme rates, and the
/// metric bounds padded as in per-record panels.
pub fn rate_ranges(
    rates: &[(f64, f64)],
    metric: &Metric,
) -> (Range<f64>, Range<f64>) {
    let (x_min, x_max) = rates
        .iter()
        .map(|(rate, _)| *rate)
        .filter(|rate| rate.is_finite())
        .fold(None::<(f64, f64)>, |range, rate| match range {
            None => Some((rate, rate)),
            Some((min, max)) => Some((min.min(rate), max.max(rate))),
        })
        .unwrap_or((0.0, 0.0));
    let (y_min, y_max) = metric.bounds;
    (
        x_min - 1.0..x_max + 1.0,
        y_min - RATIO_PADDING..y_max + RATIO_PADDING,
    )
}

/// Draws the rate of every target against its `metric` value.
pub fn draw_rates<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    metric: &Metric,
    rates: &[(f64, f64)],
) -> Result<()> {
    let (x_range, y_range) = rate_ranges(rates, metric);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.clone(), y_range.clone())
        .map_err(render_error)?;
    chart
        .configure_mesh()
        .x_desc(TargetRate::LABEL)
        .y_desc(metric.label)
        .draw()
        .map_err(render_error)?;

    let color = PlotFmt::color(1);
    let marker = PlotFmt::marker(0);
    let points = rates.iter().copied().filter(|(rate, value)| {
        x_range.contains(rate) && y_range.contains(value)
    });
    chart
        .draw_series(points.map(|point| {
            EmptyElement::at(point)
                + Polygon::new(marker.outline(MARKER_SIZE), color.filled())
        }))
        .map_err(render_error)?;
    Ok(())
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(
    chart: &mut ChartContext<
        'a,
        DB,
        Cartesian2d<RangedCoordf64, RangedCoordf64>,
    >,
) -> Result<()> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(TRANSPARENT)
        .draw()
        .map_err(render_error)
}
