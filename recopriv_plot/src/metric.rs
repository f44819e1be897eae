use crate::db::{Field, RecordTransform};
use crate::error::{Error, Result};

/// Results file read for a metric, inside each results directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFile {
    SybilAttack,
    RecoQuality,
    AboveThreshold,
}

impl DataFile {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::SybilAttack => "sybilAttack.csv",
            Self::RecoQuality => "recoQuality.csv",
            Self::AboveThreshold => "aboveThres.csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: &'static str,
    pub alias: Option<&'static str>,
    pub label: &'static str,
    pub transform: RecordTransform,
    /// Default y-axis bounds.
    pub bounds: (f64, f64),
    pub data_file: DataFile,
}

impl Metric {
    fn new(
        name: &'static str,
        alias: Option<&'static str>,
        label: &'static str,
        transform: RecordTransform,
    ) -> Self {
        Self {
            name,
            alias,
            label,
            transform,
            bounds: (0.0, 1.0),
            data_file: DataFile::SybilAttack,
        }
    }

    fn bounds(mut self, min: f64, max: f64) -> Self {
        self.bounds = (min, max);
        self
    }

    fn data_file(mut self, data_file: DataFile) -> Self {
        self.data_file = data_file;
        self
    }

    fn matches(&self, name: &str) -> bool {
        self.name == name || self.alias == Some(name)
    }
}

/// All metrics that can be plotted.
#[derive(Debug, Clone)]
pub struct MetricTable {
    metrics: Vec<Metric>,
}

impl MetricTable {
    pub fn new() -> Self {
        let field = RecordTransform::field;
        let metrics = vec![
            Metric::new(
                "infiltration",
                None,
                "Sybil infiltration",
                field(Field::SybilInfiltration),
            ),
            Metric::new("yield", None, "Yield", field(Field::Yield))
                .bounds(0.0, 40.0),
            Metric::new("accuracy", None, "Accuracy", field(Field::Accuracy)),
            Metric::new(
                "expected-neighborhoods",
                Some("expectedNeighborhoods"),
                "Expected neighborhoods",
                field(Field::ExpectedNeighborhoods),
            ),
            Metric::new(
                "target-is-neighbor",
                Some("TiN"),
                "Target is neighbor",
                field(Field::TargetIsNeighbor),
            ),
            Metric::new(
                "sybil-neighbors",
                Some("sybN"),
                "Sybil neighbors",
                field(Field::SybilNeighbors),
            ),
            Metric::new(
                "perfectly-similar-counterparts",
                Some("PSC"),
                "Perfectly similar counterparts",
                field(Field::PerfectlySimilarCounterparts),
            )
            .bounds(0.0, 18.0),
            Metric::new(
                "accuracy-yield",
                Some("AxY"),
                "Accuracy * Yield",
                field(Field::Yield) * field(Field::Accuracy),
            )
            .bounds(0.0, 6.0),
            Metric::new("rmse", Some("RMSE"), "RMSE", field(Field::Rmse))
                .bounds(1.0, 1.45)
                .data_file(DataFile::RecoQuality),
        ];
        Self { metrics }
    }

    /// Looks up a metric by its name or its short alias.
    pub fn resolve(&self, name: &str) -> Result<&Metric> {
        self.metrics
            .iter()
            .find(|metric| metric.matches(name))
            .ok_or_else(|| Error::UnknownMetric(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Metric> {
        self.metrics.iter()
    }
}

impl Default for MetricTable {
    fn default() -> Self {
        Self::new()
    }
}
