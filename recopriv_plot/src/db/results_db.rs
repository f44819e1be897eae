use crate::axis::SweepAxis;
use crate::config::PanelGroup;
use crate::db::{
    DataSource, Field, FieldError, RatioSeries, RatioTable, Record, SweepPoint,
    SweepSeries, TargetRate, TargetTable,
};
use crate::error::{Error, Result};
use crate::metric::{DataFile, Metric};
use csv::StringRecord;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How the records of one sweep point are reduced to a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Mean,
    Median,
}

impl Reduction {
    pub fn reduce(&self, values: &mut [f64]) -> SweepPoint {
        let count = values.len();
        if count == 0 {
            return SweepPoint::empty();
        }
        let value = match self {
            Self::Mean => values.iter().sum::<f64>() / count as f64,
            Self::Median => {
                values.sort_unstable_by(f64::total_cmp);
                let middle = count / 2;
                if count % 2 == 0 {
                    (values[middle - 1] + values[middle]) / 2.0
                } else {
                    values[middle]
                }
            }
        };
        SweepPoint { value, count }
    }
}

impl FromStr for Reduction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            other => Err(Error::Configuration(format!(
                "unknown reduction `{}`: expected `mean` or `median`",
                other
            ))),
        }
    }
}

/// Keeps only records of targets whose population is at least `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationFilter {
    min: f64,
}

impl PopulationFilter {
    pub fn new(min: f64) -> Self {
        Self { min }
    }

    pub fn keep(
        &self,
        record: &Record<'_>,
    ) -> std::result::Result<bool, FieldError> {
        let population = record.get(Field::PopulationSize)?;
        Ok(population - self.min >= 0.0)
    }
}

/// Results of one batch of experiments: `{base_dir}/{group}{suffix}/...`.
#[derive(Debug)]
pub struct ResultsDB<S> {
    source: S,
    base_dir: PathBuf,
}

impl<S: DataSource> ResultsDB<S> {
    pub fn new(source: S, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            base_dir: base_dir.into(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory of a group, i.e. the one holding either its sweep point
    /// directories or its single per-record results file.
    pub fn group_dir(&self, group: &PanelGroup) -> PathBuf {
        let dir = format!("{}{}", group.group.dir, group.path_suffix);
        // the suffix usually starts with a `/` and the group directory may
        // be empty; never let that turn the path into an absolute one
        self.base_dir.join(dir.trim_start_matches('/'))
    }

    /// Reduces, for every value of `axis`, the `metric` of all eligible
    /// records of that sweep point.
    pub fn sweep(
        &self,
        group: &PanelGroup,
        axis: &SweepAxis,
        metric: &Metric,
        filter: Option<PopulationFilter>,
        reduction: Reduction,
    ) -> Result<SweepSeries> {
        let group_dir = self.group_dir(group);
        let required = Self::required_fields(metric, filter.is_some());

        let mut points = Vec::with_capacity(axis.values.len());
        for axis_value in axis.values {
            let path = group_dir
                .join(axis.dir_name(axis_value))
                .join(metric.data_file.file_name());

            let mut values = Vec::new();
            self.for_each_record(&path, &required, |record| {
                if let Some(filter) = filter {
                    if !filter.keep(&record)? {
                        return Ok(());
                    }
                }
                values.push(metric.transform.apply(&record)?);
                Ok(())
            })?;

            let point = reduction.reduce(&mut values);
            if point.is_empty() {
                tracing::warn!(
                    "{}: no eligible records in {}; plotting zero",
                    group.group.label,
                    path.display()
                );
            }
            points.push(point);
        }

        let series = SweepSeries {
            label: group.group.label.clone(),
            points,
        };
        if filter.is_some() {
            tracing::info!(
                "{} {}: remaining records per point: {:?}",
                metric.label,
                series.label,
                series.counts()
            );
        }
        Ok(series)
    }

    /// Groups the records of the group's single results file by their exact
    /// (`metric` value, population) pair.
    pub fn per_record(
        &self,
        group: &PanelGroup,
        metric: &Metric,
        filter: Option<PopulationFilter>,
    ) -> Result<RatioSeries> {
        let path = self
            .group_dir(group)
            .join(metric.data_file.file_name());
        let required = Self::required_fields(metric, true);

        let mut table = RatioTable::new(group.population_size);
        self.for_each_record(&path, &required, |record| {
            let value = metric.transform.apply(&record)?;
            let population = record.get(Field::PopulationSize)?;
            if let Some(filter) = filter {
                if !filter.keep(&record)? {
                    return Ok(());
                }
            }
            table.insert(record.line(), value, population.trunc() as i64);
            Ok(())
        })?;

        let series = table.into_series(group.group.label.clone());
        let reportable: Vec<_> = series
            .reportable()
            .map(|group| &group.record_ids)
            .collect();
        if !reportable.is_empty() {
            tracing::info!(
                "{}: records with ratio <= 0.2 and {} <= 0.2: {:?}",
                series.label,
                metric.name,
                reportable
            );
        }
        Ok(series)
    }

    /// The `metric` value of every record of the group's single results
    /// file, in file order.
    pub fn record_values(
        &self,
        group: &PanelGroup,
        metric: &Metric,
    ) -> Result<Vec<f64>> {
        let path = self
            .group_dir(group)
            .join(metric.data_file.file_name());
        let required = Self::required_fields(metric, false);

        let mut values = Vec::new();
        self.for_each_record(&path, &required, |record| {
            values.push(metric.transform.apply(&record)?);
            Ok(())
        })?;
        Ok(values)
    }

    /// Summarizes, per target, the extra items of the group's
    /// above-threshold file against the target's reference, once
    /// `auxiliary_fraction` of it is discounted.
    pub fn target_rates(
        &self,
        group: &PanelGroup,
        auxiliary_fraction: f64,
    ) -> Result<Vec<TargetRate>> {
        let path = self
            .group_dir(group)
            .join(DataFile::AboveThreshold.file_name());
        let required = [Field::Target, Field::ExtraItems, Field::Reference];

        let mut table = TargetTable::new();
        self.for_each_record(&path, &required, |record| {
            let target = record.get(Field::Target)?;
            let extra = record.get(Field::ExtraItems)?;
            let reference = record.get(Field::Reference)?;
            table.insert(target.trunc() as i64, extra, reference);
            Ok(())
        })?;

        let rates = table.into_rates(auxiliary_fraction);
        tracing::info!(
            "{}: {} targets, {} with a negative rate",
            group.group.label,
            rates.len(),
            rates.iter().filter(|rate| rate.is_negative()).count()
        );
        Ok(rates)
    }

    fn required_fields(metric: &Metric, population: bool) -> Vec<Field> {
        let mut fields = metric.transform.fields();
        if population && !fields.contains(&Field::PopulationSize) {
            fields.push(Field::PopulationSize);
        }
        fields
    }

    // The file is closed when this returns, including on the first error.
    fn for_each_record<F>(
        &self,
        path: &Path,
        required: &[Field],
        mut visit: F,
    ) -> Result<()>
    where
        F: FnMut(Record<'_>) -> std::result::Result<(), FieldError>,
    {
        tracing::debug!("reading {}", path.display());
        let input = self.source.open(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let mut fields = StringRecord::new();
        while reader
            .read_record(&mut fields)
            .map_err(|e| Self::csv_error(path, e))?
        {
            let line = fields
                .position()
                .map(|position| position.line())
                .unwrap_or_default();
            let record = Record::new(line, &fields);
            record
                .check(required)
                .and_then(|()| visit(record))
                .map_err(|e| Error::Parse {
                    path: path.to_path_buf(),
                    line,
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }

    fn csv_error(path: &Path, error: csv::Error) -> Error {
        let line = error
            .position()
            .map(|position| position.line())
            .unwrap_or_default();
        let reason = error.to_string();
        match error.into_kind() {
            csv::ErrorKind::Io(source) => Error::Io {
                path: path.to_path_buf(),
                source,
            },
            _ => Error::Parse {
                path: path.to_path_buf(),
                line,
                reason,
            },
        }
    }
}

/// In-memory results used by the tests of this crate.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::io::{Cursor, Read};
    use std::rc::Rc;

    #[derive(Default)]
    pub struct MemorySource {
        files: HashMap<PathBuf, String>,
        opened: Cell<usize>,
    }

    impl MemorySource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add(&mut self, path: impl Into<PathBuf>, contents: &str) {
            self.files.insert(path.into(), contents.to_string());
        }

        /// Number of `open` calls so far, successful or not.
        pub fn opened(&self) -> usize {
            self.opened.get()
        }
    }

    impl DataSource for MemorySource {
        fn open(&self, path: &Path) -> Result<Box<dyn Read>> {
            self.opened.set(self.opened.get() + 1);
            match self.files.get(path) {
                Some(contents) => {
                    Ok(Box::new(Cursor::new(contents.clone().into_bytes())))
                }
                None => Err(Error::MissingData {
                    path: path.to_path_buf(),
                }),
            }
        }
    }

    /// Serves one file for any path and records whether its reader was
    /// dropped.
    pub struct DropSource {
        contents: String,
        dropped: Rc<Cell<bool>>,
    }

    impl DropSource {
        pub fn new(contents: &str) -> Self {
            Self {
                contents: contents.to_string(),
                dropped: Rc::new(Cell::new(false)),
            }
        }

        pub fn dropped(&self) -> bool {
            self.dropped.get()
        }
    }

    impl DataSource for DropSource {
        fn open(&self, _path: &Path) -> Result<Box<dyn Read>> {
            self.dropped.set(false);
            Ok(Box::new(DropReader {
                input: Cursor::new(self.contents.clone().into_bytes()),
                dropped: Rc::clone(&self.dropped),
            }))
        }
    }

    struct DropReader {
        input: Cursor<Vec<u8>>,
        dropped: Rc<Cell<bool>>,
    }

    impl Read for DropReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Drop for DropReader {
        fn drop(&mut self) {
            self.dropped.set(true);
        }
    }

    /// A results line with the given value in every metric column and the
    /// given population.
    pub fn line(value: f64, population: u32) -> String {
        let mut fields = vec![value.to_string(); 12];
        fields.push(population.to_string());
        fields.join(",")
    }
}
