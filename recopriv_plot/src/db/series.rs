use crate::axis::SweepAxis;
use std::collections::HashMap;

/// Reduction of one sweep point: the reduced value of all eligible records and
/// how many records were eligible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub value: f64,
    pub count: usize,
}

impl SweepPoint {
    /// Sweep point without eligible records. It's plotted as zero.
    pub fn empty() -> Self {
        Self {
            value: 0.0,
            count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// One group's series in a sweep panel. The i-th point corresponds to the
/// i-th value of the axis it was aggregated over.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSeries {
    pub label: String,
    pub points: Vec<SweepPoint>,
}

impl SweepSeries {
    /// Pairs each point with its axis value.
    pub fn xy(&self, axis: &SweepAxis) -> Vec<(f64, f64)> {
        debug_assert_eq!(axis.values.len(), self.points.len());
        axis.values
            .iter()
            .zip(self.points.iter())
            .map(|(x, point)| (x.value(), point.value))
            .collect()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.points.iter().map(|point| point.count).collect()
    }
}

/// Records of a per-record plot sharing the exact same (value, population)
/// pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioGroup {
    pub ratio: f64,
    pub value: f64,
    pub population: i64,
    pub record_ids: Vec<u64>,
}

impl RatioGroup {
    pub fn occurrences(&self) -> usize {
        self.record_ids.len()
    }

    /// Groups in the lower-left corner of the plot deserve a closer look.
    pub fn is_reportable(&self) -> bool {
        self.ratio <= 0.2 && self.value <= 0.2
    }
}

/// Frequency table of a per-record plot, in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioSeries {
    pub label: String,
    pub groups: Vec<RatioGroup>,
}

impl RatioSeries {
    pub fn ratios(&self) -> Vec<f64> {
        self.groups.iter().map(|group| group.ratio).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.groups.iter().map(|group| group.value).collect()
    }

    pub fn occurrences(&self) -> Vec<usize> {
        self.groups.iter().map(RatioGroup::occurrences).collect()
    }

    pub fn record_ids(&self) -> Vec<Vec<u64>> {
        self.groups
            .iter()
            .map(|group| group.record_ids.clone())
            .collect()
    }

    pub fn reportable(&self) -> impl Iterator<Item = &RatioGroup> {
        self.groups.iter().filter(|group| group.is_reportable())
    }
}

// Exact-equality key of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ValueKey {
    Bits(u64),
    // NaN equals nothing, so it's keyed by the record it comes from
    NotANumber(u64),
}

/// Builds a `RatioSeries` one record at a time.
pub struct RatioTable {
    numerator: f64,
    index: HashMap<(ValueKey, i64), usize>,
    groups: Vec<RatioGroup>,
}

impl RatioTable {
    pub fn new(numerator: f64) -> Self {
        Self {
            numerator,
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    pub fn insert(&mut self, record_id: u64, value: f64, population: i64) {
        let key = (Self::value_key(record_id, value), population);
        match self.index.get(&key) {
            Some(&position) => {
                self.groups[position].record_ids.push(record_id);
            }
            None => {
                let ratio = self.numerator / population as f64;
                self.index.insert(key, self.groups.len());
                self.groups.push(RatioGroup {
                    ratio,
                    value,
                    population,
                    record_ids: vec![record_id],
                });
            }
        }
    }

    pub fn into_series(self, label: String) -> RatioSeries {
        RatioSeries {
            label,
            groups: self.groups,
        }
    }

    // `0.0 == -0.0`, so both should land in the same group
    fn value_key(record_id: u64, value: f64) -> ValueKey {
        if value.is_nan() {
            ValueKey::NotANumber(record_id)
        } else if value == 0.0 {
            ValueKey::Bits(0f64.to_bits())
        } else {
            ValueKey::Bits(value.to_bits())
        }
    }
}
