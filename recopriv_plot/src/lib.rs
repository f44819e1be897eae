pub mod axis;
pub mod config;
pub mod db;
mod error;
mod fmt;
pub mod metric;
pub mod plot;

// Re-exports.
pub use axis::{AxisMode, AxisValue, SweepAxis};
pub use config::{
    Aggregation, ExperimentGroup, Layout, Panel, PanelGroup, PlotRequest,
};
pub use db::{DataSource, FsDataSource, Reduction, ResultsDB, TargetRate};
pub use error::{Error, Result};
pub use fmt::PlotFmt;
pub use metric::{Metric, MetricTable};
pub use plot::{PanelData, PanelSeries};

use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::Path;

/// A panel whose axis and metric have been resolved.
#[derive(Debug, Clone, Copy)]
pub struct PlannedPanel<'a> {
    pub axis: &'static SweepAxis,
    pub metric: &'a Metric,
    pub groups: &'a [PanelGroup],
}

/// A figure whose panels have all been resolved. Building one doesn't touch
/// any results file.
#[derive(Debug, Clone)]
pub struct PlotPlan<'a> {
    pub layout: Layout,
    pub panels: Vec<PlannedPanel<'a>>,
}

/// Aggregates results of experiment groups and draws them.
pub struct PlotRenderer<S> {
    db: ResultsDB<S>,
    metrics: MetricTable,
    aggregation: Aggregation,
}

impl<S: DataSource> PlotRenderer<S> {
    pub fn new(db: ResultsDB<S>, aggregation: Aggregation) -> Self {
        Self {
            db,
            metrics: MetricTable::new(),
            aggregation,
        }
    }

    pub fn db(&self) -> &ResultsDB<S> {
        &self.db
    }

    /// Resolves every axis and metric name of `panels` and checks that they
    /// fit in `layout`.
    pub fn plan<'a>(
        &'a self,
        panels: &'a [Panel],
        layout: Layout,
    ) -> Result<PlotPlan<'a>> {
        if panels.len() > layout.cells() {
            return Err(Error::Configuration(format!(
                "{} panels don't fit in a {}x{} layout",
                panels.len(),
                layout.rows,
                layout.cols
            )));
        }
        let panels = panels
            .iter()
            .map(|panel| -> Result<PlannedPanel<'a>> {
                Ok(PlannedPanel {
                    axis: SweepAxis::resolve(&panel.axis)?,
                    metric: self.metrics.resolve(&panel.metric)?,
                    groups: &panel.groups,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(PlotPlan { layout, panels })
    }

    /// Runs, for every panel and every group, the aggregation its axis asks
    /// for.
    pub fn aggregate(&self, plan: &PlotPlan<'_>) -> Result<Vec<PanelData>> {
        plan.panels
            .iter()
            .map(|panel| self.aggregate_panel(panel))
            .collect()
    }

    fn aggregate_panel(&self, panel: &PlannedPanel<'_>) -> Result<PanelData> {
        let PlannedPanel {
            axis,
            metric,
            groups,
        } = *panel;
        tracing::info!(
            "panel {} over {}: {} groups",
            metric.name,
            axis.name,
            groups.len()
        );

        let series = match axis.mode {
            AxisMode::Sweep => {
                let series = groups
                    .iter()
                    .map(|group| {
                        tracing::info!(
                            "{}: sweeping {}",
                            group.group.label,
                            axis.name
                        );
                        self.db.sweep(
                            group,
                            axis,
                            metric,
                            self.aggregation.filter(group),
                            self.aggregation.reduction,
                        )
                    })
                    .collect::<Result<Vec<_>>>()?;
                PanelSeries::Sweep(series)
            }
            AxisMode::PerRecord => {
                let series = groups
                    .iter()
                    .map(|group| {
                        tracing::info!(
                            "{}: reading records",
                            group.group.label
                        );
                        self.db.per_record(
                            group,
                            metric,
                            self.aggregation.filter(group),
                        )
                    })
                    .collect::<Result<Vec<_>>>()?;
                PanelSeries::PerRecord(series)
            }
        };

        Ok(PanelData {
            axis,
            metric: metric.clone(),
            series,
        })
    }

    /// Plans, aggregates and draws `panels` on `root`. Nothing is read if
    /// any panel fails to resolve.
    pub fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        panels: &[Panel],
        layout: Layout,
    ) -> Result<()> {
        let plan = self.plan(panels, layout)?;
        let data = self.aggregate(&plan)?;
        plot::draw(root, &data, layout)
    }

    /// Like `draw` but writes the figure, sized after `layout`, to the SVG
    /// file at `output`.
    pub fn render(
        &self,
        output: &Path,
        panels: &[Panel],
        layout: Layout,
    ) -> Result<()> {
        let plan = self.plan(panels, layout)?;
        let data = self.aggregate(&plan)?;
        write_svg(output, layout.figure_size(), |root| {
            plot::draw(root, &data, layout)
        })
    }

    /// Computes the rate of every target of `group` and writes them, against
    /// the `metric` value of the matching record of the group, to the SVG
    /// file at `output`.
    pub fn render_rates(
        &self,
        output: &Path,
        group: &PanelGroup,
        metric: &str,
        auxiliary_fraction: f64,
    ) -> Result<Vec<TargetRate>> {
        if !(0.0..=1.0).contains(&auxiliary_fraction) {
            return Err(Error::Configuration(format!(
                "auxiliary fraction {} is not within [0, 1]",
                auxiliary_fraction
            )));
        }
        let metric = self.metrics.resolve(metric)?;

        let rates = self.db.target_rates(group, auxiliary_fraction)?;
        let values = self.db.record_values(group, metric)?;
        if rates.len() != values.len() {
            tracing::warn!(
                "{}: {} targets but {} {} records; plotting {}",
                group.group.label,
                rates.len(),
                values.len(),
                metric.name,
                rates.len().min(values.len())
            );
        }
        let points: Vec<_> = rates
            .iter()
            .zip(values)
            .map(|(rate, value)| (rate.rate, value))
            .collect();

        write_svg(output, config::CELL_SIZE, |root| {
            plot::draw_rates(root, metric, &points)
        })?;
        Ok(rates)
    }
}

// The file is only created once the whole figure is drawn.
fn write_svg<F>(output: &Path, size: (u32, u32), draw: F) -> Result<()>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<()>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw(&root)?;
    }
    fs::write(output, svg).map_err(|source| Error::Io {
        path: output.to_path_buf(),
        source,
    })?;
    tracing::info!("figure written to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{line, MemorySource};
    use std::path::PathBuf;

    fn unique_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "recopriv_plot_{}_{}",
            name,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        path
    }

    fn groups(dirs: &[&str], population_size: f64) -> Vec<PanelGroup> {
        dirs.iter()
            .map(|dir| PanelGroup {
                group: ExperimentGroup::new(*dir, ""),
                path_suffix: String::new(),
                population_size,
            })
            .collect()
    }

    fn panel(axis: &str, metric: &str, groups: Vec<PanelGroup>) -> Panel {
        Panel {
            axis: axis.to_string(),
            metric: metric.to_string(),
            groups,
        }
    }

    #[test]
    fn unknown_names_are_rejected_before_reading() {
        let renderer = PlotRenderer::new(
            ResultsDB::new(MemorySource::new(), "results"),
            Aggregation::default(),
        );
        let layout = Layout::new(1, 2).unwrap();

        let panels = vec![
            panel("k", "yield", groups(&["g"], 50.0)),
            panel("bogus", "yield", groups(&["g"], 50.0)),
        ];
        let mut svg = String::new();
        let root = SVGBackend::with_string(&mut svg, layout.figure_size())
            .into_drawing_area();
        let error = renderer.draw(&root, &panels, layout).unwrap_err();
        assert!(
            matches!(error, Error::UnknownAxis(ref name) if name == "bogus")
        );
        assert!(error.is_configuration());
        assert_eq!(renderer.db().source().opened(), 0);

        let panels = vec![panel("k", "latency", groups(&["g"], 50.0))];
        let error = renderer.draw(&root, &panels, layout).unwrap_err();
        assert!(matches!(error, Error::UnknownMetric(_)));
        assert_eq!(renderer.db().source().opened(), 0);
    }

    #[test]
    fn layout_too_small() {
        let renderer = PlotRenderer::new(
            ResultsDB::new(MemorySource::new(), "results"),
            Aggregation::default(),
        );
        let panels = vec![
            panel("k", "yield", groups(&["g"], 50.0)),
            panel("k", "accuracy", groups(&["g"], 50.0)),
        ];
        let error = renderer
            .plan(&panels, Layout::new(1, 1).unwrap())
            .unwrap_err();
        assert!(error.is_configuration());
    }

    #[test]
    fn each_panel_reads_its_own_file() {
        let mut source = MemorySource::new();
        source.add("results/g/sybilAttack.csv", &line(0.5, 100));
        source.add("results/g/recoQuality.csv", &line(1.2, 100));
        let renderer = PlotRenderer::new(
            ResultsDB::new(source, "results"),
            Aggregation::default(),
        );
        let panels = vec![
            panel("iPerNb", "RMSE", groups(&["g"], 50.0)),
            panel("iPerNb", "accuracy", groups(&["g"], 50.0)),
        ];
        let plan = renderer
            .plan(&panels, Layout::new(1, 2).unwrap())
            .unwrap();
        let data = renderer.aggregate(&plan).unwrap();

        let values = |panel: &PanelData| match &panel.series {
            PanelSeries::PerRecord(series) => series[0].values(),
            other => panic!("unexpected series: {:?}", other),
        };
        assert_eq!(values(&data[0]), vec![1.2]);
        assert_eq!(values(&data[1]), vec![0.5]);
    }

    #[test]
    fn k_neighbors_yield_end_to_end() {
        let base_dir = unique_path("k_neighbors_yield");
        let axis = SweepAxis::resolve("k-neighbors").unwrap();
        for value in axis.values {
            let dir = base_dir.join("g").join(axis.dir_name(value));
            fs::create_dir_all(&dir).unwrap();
            // the yield column averages to 7
            fs::write(dir.join("sybilAttack.csv"), "0,6,0\n0,8,0\n0,7,0\n")
                .unwrap();
        }

        let renderer = PlotRenderer::new(
            ResultsDB::new(FsDataSource, &base_dir),
            Aggregation::default(),
        );
        let panels = vec![panel("k-neighbors", "yield", groups(&["g"], 50.0))];
        let layout = Layout::from_code(110).unwrap();
        let plan = renderer.plan(&panels, layout).unwrap();
        let data = renderer.aggregate(&plan).unwrap();
        match &data[0].series {
            PanelSeries::Sweep(series) => {
                let xy = series[0].xy(axis);
                let x: Vec<_> = xy.iter().map(|(x, _)| *x).collect();
                let y: Vec<_> = xy.iter().map(|(_, y)| *y).collect();
                assert_eq!(
                    x,
                    vec![
                        1.0, 3.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 40.0, 50.0,
                        75.0, 100.0
                    ]
                );
                assert_eq!(y, vec![7.0; 12]);
                assert_eq!(series[0].counts(), vec![3; 12]);
            }
            other => panic!("unexpected series: {:?}", other),
        }

        let output = base_dir.join(PlotFmt::file_name(""));
        renderer.render(&output, &panels, layout).unwrap();
        let svg = fs::read_to_string(&output).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Yield"));

        fs::remove_dir_all(&base_dir).unwrap();
    }

    #[test]
    fn missing_sweep_point_is_fatal() {
        let base_dir = unique_path("missing_sweep_point");
        let dir = base_dir.join("g").join("k_1");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("sybilAttack.csv"), "0,6,0\n").unwrap();

        let renderer = PlotRenderer::new(
            ResultsDB::new(FsDataSource, &base_dir),
            Aggregation::default(),
        );
        let panels = vec![panel("k", "yield", groups(&["g"], 50.0))];
        let output = base_dir.join("plot.svg");
        let error = renderer
            .render(&output, &panels, Layout::new(1, 1).unwrap())
            .unwrap_err();
        assert!(matches!(error, Error::MissingData { .. }));
        assert!(!output.exists());

        fs::remove_dir_all(&base_dir).unwrap();
    }

    #[test]
    fn failed_drawing_writes_nothing() {
        let base_dir = unique_path("failed_drawing");
        fs::create_dir_all(&base_dir).unwrap();
        let output = base_dir.join("plot.svg");

        let error = write_svg(&output, (100, 100), |root| {
            root.fill(&WHITE).map_err(plot::render_error)?;
            Err(Error::Render(String::from("panel failed")))
        })
        .unwrap_err();
        assert!(matches!(error, Error::Render(_)));
        assert!(!output.exists());

        write_svg(&output, (100, 100), |root| {
            root.fill(&WHITE).map_err(plot::render_error)
        })
        .unwrap();
        assert!(fs::read_to_string(&output).unwrap().contains("<svg"));

        fs::remove_dir_all(&base_dir).unwrap();
    }

    #[test]
    fn target_rates_end_to_end() {
        let base_dir = unique_path("target_rates");
        let dir = base_dir.join("g").join("extra");
        fs::create_dir_all(&dir).unwrap();
        // target 0 has a median of 4 extra items, target 1 of 30
        fs::write(
            dir.join("aboveThres.csv"),
            "0,0,4,20\n0,0,2,20\n0,0,6,20\n1,0,30,20\n",
        )
        .unwrap();
        fs::write(
            dir.join("sybilAttack.csv"),
            format!("{}\n{}\n", line(0.5, 50), line(0.25, 50)),
        )
        .unwrap();

        let renderer = PlotRenderer::new(
            ResultsDB::new(FsDataSource, &base_dir),
            Aggregation::default(),
        );
        let group = PanelGroup {
            group: ExperimentGroup::new("g", ""),
            path_suffix: String::from("/extra"),
            population_size: 50.0,
        };
        let output = base_dir.join(PlotFmt::rates_file_name("/extra"));
        let rates = renderer
            .render_rates(&output, &group, "sybN", 0.1)
            .unwrap();
        let rates: Vec<_> = rates.iter().map(|rate| rate.rate).collect();
        assert_eq!(rates, vec![14.0, -12.0]);
        let svg = fs::read_to_string(&output).unwrap();
        assert!(svg.contains("Sybil neighbors"));

        fs::remove_dir_all(&base_dir).unwrap();
    }

    #[test]
    fn target_rates_check_arguments_first() {
        let renderer = PlotRenderer::new(
            ResultsDB::new(MemorySource::new(), "results"),
            Aggregation::default(),
        );
        let group = groups(&["g"], 50.0).remove(0);
        let output = Path::new("rates.svg");

        let error = renderer
            .render_rates(output, &group, "sybN", 1.5)
            .unwrap_err();
        assert!(error.is_configuration());
        let error = renderer
            .render_rates(output, &group, "latency", 0.1)
            .unwrap_err();
        assert!(matches!(error, Error::UnknownMetric(_)));
        assert_eq!(renderer.db().source().opened(), 0);
    }
}
