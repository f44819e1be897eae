mod results_db;
mod schema;
mod series;
mod targets;
mod transform;

// Re-exports.
pub use results_db::{PopulationFilter, Reduction, ResultsDB};
pub use schema::{Field, FieldError, Record};
pub use series::{RatioGroup, RatioSeries, RatioTable, SweepPoint, SweepSeries};
pub use targets::{TargetRate, TargetTable};
pub use transform::RecordTransform;

#[cfg(test)]
pub(crate) use results_db::testing;

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Where results files are read from.
pub trait DataSource {
    fn open(&self, path: &Path) -> Result<Box<dyn Read>>;
}

/// Reads results files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDataSource;

impl DataSource for FsDataSource {
    fn open(&self, path: &Path) -> Result<Box<dyn Read>> {
        match File::open(path) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::MissingData {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(Error::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl<S: DataSource + ?Sized> DataSource for &S {
    fn open(&self, path: &Path) -> Result<Box<dyn Read>> {
        (**self).open(path)
    }
}
