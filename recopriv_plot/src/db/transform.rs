use crate::db::schema::{Field, FieldError, Record};
use std::ops::Mul;

/// Maps a results record to the single number that gets plotted.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordTransform {
    Field(Field),
    Product(Box<RecordTransform>, Box<RecordTransform>),
}

impl RecordTransform {
    pub fn field(field: Field) -> Self {
        Self::Field(field)
    }

    pub fn apply(&self, record: &Record<'_>) -> Result<f64, FieldError> {
        match self {
            Self::Field(field) => record.get(*field),
            Self::Product(a, b) => Ok(a.apply(record)? * b.apply(record)?),
        }
    }

    /// All fields read by this transform.
    pub fn fields(&self) -> Vec<Field> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields(&self, fields: &mut Vec<Field>) {
        match self {
            Self::Field(field) => {
                if !fields.contains(field) {
                    fields.push(*field);
                }
            }
            Self::Product(a, b) => {
                a.collect_fields(fields);
                b.collect_fields(fields);
            }
        }
    }
}

impl Mul for RecordTransform {
    type Output = RecordTransform;

    fn mul(self, other: Self) -> Self::Output {
        RecordTransform::Product(Box::new(self), Box::new(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::StringRecord;

    #[test]
    fn product() {
        let fields = StringRecord::from(vec!["0", "20", "0.25"]);
        let record = Record::new(1, &fields);
        let transform = RecordTransform::field(Field::Yield)
            * RecordTransform::field(Field::Accuracy);
        assert_eq!(transform.apply(&record), Ok(5.0));
        assert_eq!(transform.fields(), vec![Field::Yield, Field::Accuracy]);
    }

    #[test]
    fn product_fails_if_any_side_fails() {
        let fields = StringRecord::from(vec!["0", "20"]);
        let record = Record::new(1, &fields);
        let transform = RecordTransform::field(Field::Yield)
            * RecordTransform::field(Field::Accuracy);
        assert_eq!(
            transform.apply(&record),
            Err(FieldError::Missing {
                field: Field::Accuracy,
                len: 2
            })
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use csv::StringRecord;
    use quickcheck_macros::quickcheck;

    const FIELDS: [Field; 7] = [
        Field::SybilInfiltration,
        Field::Yield,
        Field::Accuracy,
        Field::ExpectedNeighborhoods,
        Field::TargetIsNeighbor,
        Field::SybilNeighbors,
        Field::PerfectlySimilarCounterparts,
    ];

    fn record_fields(values: &[u16]) -> StringRecord {
        // 13 columns so that every field in the schema exists
        let values: Vec<_> = (0..13)
            .map(|i| {
                let value = values.get(i).copied().unwrap_or(1);
                (value as f64 / 8.0).to_string()
            })
            .collect();
        StringRecord::from(values)
    }

    #[quickcheck]
    fn product_is_the_product_of_its_sides(
        values: Vec<u16>,
        a: usize,
        b: usize,
    ) -> bool {
        let fields = record_fields(&values);
        let record = Record::new(1, &fields);
        let a = RecordTransform::field(FIELDS[a % FIELDS.len()]);
        let b = RecordTransform::field(FIELDS[b % FIELDS.len()]);
        let expected = a.apply(&record).unwrap() * b.apply(&record).unwrap();
        (a * b).apply(&record).unwrap() == expected
    }

    #[quickcheck]
    fn product_is_associative(values: Vec<u16>, a: usize, b: usize) -> bool {
        let fields = record_fields(&values);
        let record = Record::new(1, &fields);
        let a = RecordTransform::field(FIELDS[a % FIELDS.len()]);
        let b = RecordTransform::field(FIELDS[b % FIELDS.len()]);
        let c = RecordTransform::field(Field::PopulationSize);
        // values are multiples of 1/8 bounded by 2^13, so products are exact
        let left = ((a.clone() * b.clone()) * c.clone()).apply(&record);
        let right = (a * (b * c)).apply(&record);
        left == right
    }
}
