use csv::StringRecord;
use std::fmt;

/// Columns of the results files that are read by the plots. Results files
/// have no header: columns are addressed by their position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    SybilInfiltration,
    Yield,
    Accuracy,
    ExpectedNeighborhoods,
    Rmse,
    TargetIsNeighbor,
    SybilNeighbors,
    PerfectlySimilarCounterparts,
    PopulationSize,
    // columns of `aboveThres.csv`
    Target,
    ExtraItems,
    Reference,
}

impl Field {
    /// 0-based position of the field in a results record.
    pub fn index(&self) -> usize {
        match self {
            Self::SybilInfiltration => 0,
            Self::Yield => 1,
            Self::Accuracy => 2,
            // the 5th column holds the expected neighborhoods in
            // `sybilAttack.csv` and the RMSE in `recoQuality.csv`
            Self::ExpectedNeighborhoods | Self::Rmse => 4,
            Self::TargetIsNeighbor => 5,
            Self::SybilNeighbors => 6,
            Self::PerfectlySimilarCounterparts => 9,
            Self::PopulationSize => 12,
            Self::Target => 0,
            Self::ExtraItems => 2,
            Self::Reference => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SybilInfiltration => "sybil_infiltration",
            Self::Yield => "yield",
            Self::Accuracy => "accuracy",
            Self::ExpectedNeighborhoods => "expected_neighborhoods",
            Self::Rmse => "rmse",
            Self::TargetIsNeighbor => "target_is_neighbor",
            Self::SybilNeighbors => "sybil_neighbors",
            Self::PerfectlySimilarCounterparts => {
                "perfectly_similar_counterparts"
            }
            Self::PopulationSize => "population_size",
            Self::Target => "target",
            Self::ExtraItems => "extra_items",
            Self::Reference => "reference",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" (index {})", self.name(), self.index())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("field {field} is missing: record only has {len} fields")]
    Missing { field: Field, len: usize },
    #[error("field {field} is not a number: {value:?}")]
    NotANumber { field: Field, value: String },
}

/// One line of a results file.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    line: u64,
    fields: &'a StringRecord,
}

impl<'a> Record<'a> {
    pub fn new(line: u64, fields: &'a StringRecord) -> Self {
        Self { line, fields }
    }

    /// 1-based line of this record in its file; this is also the record
    /// identifier in per-record plots.
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Checks that the record is long enough to hold all `fields`.
    pub fn check(&self, fields: &[Field]) -> Result<(), FieldError> {
        // report the field furthest away so that the error tells how short
        // the record actually is
        let missing = fields
            .iter()
            .filter(|field| field.index() >= self.len())
            .max_by_key(|field| field.index());
        match missing {
            Some(&field) => Err(FieldError::Missing {
                field,
                len: self.len(),
            }),
            None => Ok(()),
        }
    }

    pub fn get(&self, field: Field) -> Result<f64, FieldError> {
        let value = self.fields.get(field.index()).ok_or(FieldError::Missing {
            field,
            len: self.len(),
        })?;
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| FieldError::NotANumber {
                field,
                value: value.to_string(),
            })
    }
}
