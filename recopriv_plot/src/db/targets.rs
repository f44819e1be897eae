use crate::db::Reduction;
use std::collections::HashMap;

/// How far a target is, once the auxiliary items are discounted, above the
/// typical number of extra items of its attackers.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRate {
    pub target: i64,
    /// Reference of the target, scaled down by the auxiliary fraction.
    pub reference: f64,
    pub extra_median: f64,
    pub rate: f64,
    /// Number of records of the target.
    pub count: usize,
}

impl TargetRate {
    pub const LABEL: &'static str = "Reference - median extra items";

    pub fn is_negative(&self) -> bool {
        self.rate < 0.0
    }
}

struct TargetEntry {
    target: i64,
    reference: f64,
    extras: Vec<f64>,
}

/// Builds the `TargetRate`s of an above-threshold file one record at a
/// time, in first-seen target order.
#[derive(Default)]
pub struct TargetTable {
    index: HashMap<i64, usize>,
    entries: Vec<TargetEntry>,
}

impl TargetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference of a target is the one of its first record.
    pub fn insert(&mut self, target: i64, extra: f64, reference: f64) {
        match self.index.get(&target) {
            Some(&position) => self.entries[position].extras.push(extra),
            None => {
                self.index.insert(target, self.entries.len());
                self.entries.push(TargetEntry {
                    target,
                    reference,
                    extras: vec![extra],
                });
            }
        }
    }

    pub fn into_rates(self, auxiliary_fraction: f64) -> Vec<TargetRate> {
        self.entries
            .into_iter()
            .map(|mut entry| {
                let reference = (1.0 - auxiliary_fraction) * entry.reference;
                let median = Reduction::Median.reduce(&mut entry.extras);
                TargetRate {
                    target: entry.target,
                    reference,
                    extra_median: median.value,
                    rate: reference - median.value,
                    count: median.count,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_per_target() {
        let mut table = TargetTable::new();
        table.insert(0, 3.0, 20.0);
        table.insert(0, 9.0, 0.0);
        table.insert(0, 5.0, 0.0);
        table.insert(1, 30.0, 10.0);
        table.insert(1, 40.0, 10.0);
        let rates = table.into_rates(0.1);

        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].target, 0);
        assert_eq!(rates[0].reference, 18.0);
        assert_eq!(rates[0].extra_median, 5.0);
        assert_eq!(rates[0].rate, 13.0);
        assert_eq!(rates[0].count, 3);
        assert!(!rates[0].is_negative());

        assert_eq!(rates[1].target, 1);
        assert_eq!(rates[1].extra_median, 35.0);
        assert_eq!(rates[1].rate, 9.0 - 35.0);
        assert!(rates[1].is_negative());
    }

    #[test]
    fn targets_keep_first_seen_order() {
        let mut table = TargetTable::new();
        table.insert(7, 1.0, 4.0);
        table.insert(2, 1.0, 4.0);
        table.insert(7, 3.0, 100.0);
        let rates = table.into_rates(0.0);
        let targets: Vec<_> = rates.iter().map(|rate| rate.target).collect();
        assert_eq!(targets, vec![7, 2]);
        assert_eq!(rates[0].reference, 4.0);
        assert_eq!(rates[0].extra_median, 2.0);
    }
}
