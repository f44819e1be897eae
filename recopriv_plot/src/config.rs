use crate::db::{PopulationFilter, Reduction};
use crate::error::{Error, Result};
use crate::fmt::PlotFmt;
use std::path::PathBuf;

/// Population size assumed for every group unless told otherwise.
pub const DEFAULT_POPULATION_SIZE: f64 = 50.0;

/// Size in pixels of one panel of the figure.
pub const CELL_SIZE: (u32, u32) = (700, 400);

/// One labeled experiment configuration: a subdirectory of the results
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentGroup {
    pub dir: String,
    pub label: String,
}

impl ExperimentGroup {
    /// An empty `label` means the group is labeled by its directory.
    pub fn new(dir: impl Into<String>, label: impl Into<String>) -> Self {
        let dir = dir.into();
        let mut label = label.into();
        if label.is_empty() {
            label = dir.clone();
        }
        Self { dir, label }
    }

    pub fn from_lists(dirs: &[String], labels: &[String]) -> Result<Vec<Self>> {
        if dirs.len() != labels.len() {
            return Err(Error::Configuration(format!(
                "{} group directories but {} labels",
                dirs.len(),
                labels.len()
            )));
        }
        Ok(dirs
            .iter()
            .zip(labels)
            .map(|(dir, label)| Self::new(dir.as_str(), label.as_str()))
            .collect())
    }
}

/// A group as drawn in a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelGroup {
    pub group: ExperimentGroup,
    /// Appended to the group directory before the sweep point directories.
    pub path_suffix: String,
    /// Population size of the group's experiments. It's both the population
    /// filter threshold and the numerator of per-record ratios.
    pub population_size: f64,
}

/// One panel of the figure: an (axis, metric) pair over some groups. Names
/// are resolved when the figure is planned.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub axis: String,
    pub metric: String,
    pub groups: Vec<PanelGroup>,
}

/// Grid of panels of the figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub rows: u32,
    pub cols: u32,
}

impl Layout {
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::Configuration(format!(
                "layout must have at least one row and one column, got {}x{}",
                rows, cols
            )));
        }
        Ok(Self { rows, cols })
    }

    /// Decodes a three-digit layout code: the hundreds digit is the number
    /// of rows and the tens digit the number of columns (e.g. `120` is one
    /// row with two columns). The units digit is ignored.
    pub fn from_code(code: u32) -> Result<Self> {
        if !(100..1000).contains(&code) {
            return Err(Error::Configuration(format!(
                "layout code {} should have exactly three digits",
                code
            )));
        }
        Self::new(code / 100, code / 10 % 10)
    }

    pub fn cells(&self) -> usize {
        (self.rows * self.cols) as usize
    }

    pub fn figure_size(&self) -> (u32, u32) {
        let (width, height) = CELL_SIZE;
        (self.cols * width, self.rows * height)
    }
}

/// How records are aggregated, shared by all panels of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregation {
    pub min_population: bool,
    pub reduction: Reduction,
}

impl Aggregation {
    pub fn filter(&self, group: &PanelGroup) -> Option<PopulationFilter> {
        if self.min_population {
            Some(PopulationFilter::new(group.population_size))
        } else {
            None
        }
    }
}

impl Default for Aggregation {
    fn default() -> Self {
        Self {
            min_population: false,
            reduction: Reduction::Mean,
        }
    }
}

/// Everything a plot invocation was asked to do, before any name is
/// resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub base_dir: PathBuf,
    pub axis: String,
    pub metrics: Vec<String>,
    pub layout: Layout,
    pub groups: Vec<ExperimentGroup>,
    pub path_suffix: String,
    /// One per group; `None` means the default for every group.
    pub population_sizes: Option<Vec<f64>>,
    pub aggregation: Aggregation,
    pub output_dir: PathBuf,
}

impl PlotRequest {
    /// One panel per metric, all with the same axis and groups.
    pub fn panels(&self) -> Result<Vec<Panel>> {
        let population_sizes = match &self.population_sizes {
            Some(sizes) if sizes.len() != self.groups.len() => {
                return Err(Error::Configuration(format!(
                    "{} groups but {} population sizes",
                    self.groups.len(),
                    sizes.len()
                )));
            }
            Some(sizes) => sizes.clone(),
            None => vec![DEFAULT_POPULATION_SIZE; self.groups.len()],
        };
        let groups: Vec<_> = self
            .groups
            .iter()
            .zip(population_sizes)
            .map(|(group, population_size)| PanelGroup {
                group: group.clone(),
                path_suffix: self.path_suffix.clone(),
                population_size,
            })
            .collect();

        Ok(self
            .metrics
            .iter()
            .map(|metric| Panel {
                axis: self.axis.clone(),
                metric: metric.clone(),
                groups: groups.clone(),
            })
            .collect())
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(PlotFmt::file_name(&self.path_suffix))
    }
}

/// Splits a comma-separated command-line list. Entries are trimmed but
/// empty entries are kept.
pub fn parse_list(list: &str) -> Vec<String> {
    list.split(',').map(|entry| entry.trim().to_string()).collect()
}

pub fn parse_population_sizes(list: &str) -> Result<Vec<f64>> {
    parse_list(list)
        .iter()
        .map(|entry| {
            entry.parse::<f64>().map_err(|_| {
                Error::Configuration(format!(
                    "population size `{}` is not a number",
                    entry
                ))
            })
        })
        .collect()
}
