use crate::error::{Error, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisValue {
    Integer(u32),
    Fraction(f64),
}

impl AxisValue {
    pub fn value(&self) -> f64 {
        match self {
            Self::Integer(value) => *value as f64,
            Self::Fraction(value) => *value,
        }
    }
}

// Directory names were created by scripts that print integers as `10` and
// fractions as `0.5` or `1.0`.
impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Fraction(value) => write!(f, "{:?}", value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisMode {
    /// One results directory per axis value.
    Sweep,
    /// A single results file; x values are derived from each record.
    PerRecord,
}

#[derive(Debug, PartialEq)]
pub struct SweepAxis {
    pub name: &'static str,
    pub alias: &'static str,
    pub label: &'static str,
    pub dir_prefix: &'static str,
    pub mode: AxisMode,
    pub values: &'static [AxisValue],
}

use AxisValue::{Fraction, Integer};

const AUXILIARY_ITEM_FRACTIONS: [AxisValue; 8] = [
    Fraction(0.1),
    Fraction(0.2),
    Fraction(0.3),
    Fraction(0.5),
    Fraction(0.7),
    Fraction(0.8),
    Fraction(0.9),
    Fraction(1.0),
];

const EXTRA_ITEMS: [AxisValue; 10] = [
    Integer(5),
    Integer(10),
    Integer(15),
    Integer(20),
    Integer(25),
    Integer(30),
    Integer(35),
    Integer(40),
    Integer(45),
    Integer(50),
];

const K_NEIGHBORS: [AxisValue; 12] = [
    Integer(1),
    Integer(3),
    Integer(5),
    Integer(10),
    Integer(15),
    Integer(20),
    Integer(25),
    Integer(30),
    Integer(40),
    Integer(50),
    Integer(75),
    Integer(100),
];

const REMOVAL_RATES: [AxisValue; 10] = [
    Fraction(0.1),
    Fraction(0.2),
    Fraction(0.3),
    Fraction(0.4),
    Fraction(0.5),
    Fraction(0.6),
    Fraction(0.7),
    Fraction(0.8),
    Fraction(0.9),
    Fraction(1.0),
];

const BEST_WORST_FRACTIONS: [AxisValue; 9] = [
    Integer(2),
    Integer(3),
    Integer(4),
    Integer(5),
    Integer(6),
    Integer(7),
    Integer(8),
    Integer(9),
    Integer(10),
];

pub static AXES: [SweepAxis; 6] = [
    SweepAxis {
        name: "auxiliary-item-fraction",
        alias: "auxPer",
        label: "Fraction Auxiliary Items",
        dir_prefix: "percentAuxItems_",
        mode: AxisMode::Sweep,
        values: &AUXILIARY_ITEM_FRACTIONS,
    },
    SweepAxis {
        name: "extra-items",
        alias: "nbExtra",
        label: "Extra Items Number",
        dir_prefix: "nbExtraItems_",
        mode: AxisMode::Sweep,
        values: &EXTRA_ITEMS,
    },
    SweepAxis {
        name: "k-neighbors",
        alias: "k",
        label: "k (nb neighbors)",
        dir_prefix: "k_",
        mode: AxisMode::Sweep,
        values: &K_NEIGHBORS,
    },
    SweepAxis {
        name: "removal-rate",
        alias: "removalRate",
        label: "Removal Rate",
        dir_prefix: "removalRate_",
        mode: AxisMode::Sweep,
        values: &REMOVAL_RATES,
    },
    SweepAxis {
        name: "best-worst-fraction",
        alias: "bwFrac",
        label: "fracBestItems: 1/x",
        dir_prefix: "bestWorstFrac_",
        mode: AxisMode::Sweep,
        values: &BEST_WORST_FRACTIONS,
    },
    SweepAxis {
        name: "removed-per-auxiliary",
        alias: "iPerNb",
        label: "nbRemovedItems / nbAuxiliaryItems",
        dir_prefix: "",
        mode: AxisMode::PerRecord,
        values: &[],
    },
];

impl SweepAxis {
    /// Looks up an axis by its name or its short alias.
    pub fn resolve(name: &str) -> Result<&'static SweepAxis> {
        AXES.iter()
            .find(|axis| axis.name == name || axis.alias == name)
            .ok_or_else(|| Error::UnknownAxis(name.to_string()))
    }

    /// Name of the results directory of one sweep point.
    pub fn dir_name(&self, value: &AxisValue) -> String {
        format!("{}{}", self.dir_prefix, value)
    }

    pub fn is_sweep(&self) -> bool {
        self.mode == AxisMode::Sweep
    }

    /// Smallest and largest axis values. `None` for per-record axes.
    pub fn range(&self) -> Option<(f64, f64)> {
        let first = self.values.first()?.value();
        let last = self.values.last()?.value();
        Some((first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_by_name_and_alias() {
        let axis = SweepAxis::resolve("k-neighbors").unwrap();
        assert_eq!(axis.dir_prefix, "k_");
        assert_eq!(axis.values.len(), 12);
        assert!(std::ptr::eq(axis, SweepAxis::resolve("k").unwrap()));

        let axis = SweepAxis::resolve("iPerNb").unwrap();
        assert_eq!(axis.mode, AxisMode::PerRecord);
        assert!(axis.values.is_empty());
        assert_eq!(axis.range(), None);
    }

    #[test]
    fn resolve_unknown() {
        let error = SweepAxis::resolve("bogus").unwrap_err();
        assert!(
            matches!(error, Error::UnknownAxis(ref name) if name == "bogus")
        );
        assert!(error.is_configuration());
    }

    #[test]
    fn sweep_axes_are_strictly_ascending() {
        for axis in AXES.iter().filter(|axis| axis.is_sweep()) {
            assert!(!axis.values.is_empty(), "{} has no values", axis.name);
            assert!(
                axis.values
                    .windows(2)
                    .all(|pair| pair[0].value() < pair[1].value()),
                "{} is not strictly ascending",
                axis.name
            );
        }
    }

    #[test]
    fn dir_names() {
        let k = SweepAxis::resolve("k").unwrap();
        assert_eq!(k.dir_name(&Integer(100)), "k_100");
        let aux = SweepAxis::resolve("auxPer").unwrap();
        assert_eq!(aux.dir_name(&Fraction(0.3)), "percentAuxItems_0.3");
        assert_eq!(aux.dir_name(&Fraction(1.0)), "percentAuxItems_1.0");
        assert_eq!(aux.range(), Some((0.1, 1.0)));
    }
}
