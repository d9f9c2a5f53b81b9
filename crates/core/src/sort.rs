//! Report ordering.

use crate::record::PatientRecord;
use serde::Serialize;
use std::cmp::Ordering;

/// Field a report can be ordered by.
///
/// `PatientId` orders by the identifier itself; every other field orders by the number of
/// entries in the named list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    PatientId,
    Diagnoses,
    MalformedDiagnoses,
    #[default]
    PriorityDiagnoses,
    ResolvedDiagnoses,
}

impl SortField {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::PatientId => "patient_id",
            SortField::Diagnoses => "diagnoses",
            SortField::MalformedDiagnoses => "malformed_diagnoses",
            SortField::PriorityDiagnoses => "priority_diagnoses",
            SortField::ResolvedDiagnoses => "resolved_diagnoses",
        }
    }

    /// Parse a field name, falling back to [`SortField::PriorityDiagnoses`] for anything
    /// unrecognised.
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim() {
            "patient_id" => SortField::PatientId,
            "diagnoses" => SortField::Diagnoses,
            "malformed_diagnoses" => SortField::MalformedDiagnoses,
            "priority_diagnoses" => SortField::PriorityDiagnoses,
            "resolved_diagnoses" => SortField::ResolvedDiagnoses,
            other => {
                tracing::debug!("unknown sort field '{}'; using priority_diagnoses", other);
                SortField::PriorityDiagnoses
            }
        }
    }

    fn key(self, record: &PatientRecord) -> i64 {
        let len = match self {
            SortField::PatientId => return record.patient_id,
            SortField::Diagnoses => record.diagnoses.len(),
            SortField::MalformedDiagnoses => record.malformed_diagnoses.len(),
            SortField::PriorityDiagnoses => record.priority_diagnoses.len(),
            SortField::ResolvedDiagnoses => record.resolved_diagnoses.len(),
        };
        i64::try_from(len).unwrap_or(i64::MAX)
    }
}

impl std::str::FromStr for SortField {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

impl SortOrder {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }

    pub fn is_descending(self) -> bool {
        self == SortOrder::Descending
    }
}

/// Sorts records in place. Records with equal keys keep their relative order in both
/// directions.
pub fn sort_records(records: &mut [PatientRecord], field: SortField, order: SortOrder) {
    records.sort_by(|a, b| {
        let ord: Ordering = field.key(a).cmp(&field.key(b));
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ResolvedDiagnosis;
    use dx_types::{Code, Description};
    use rstest::rstest;

    fn record(id: i64, priority: usize) -> PatientRecord {
        PatientRecord {
            patient_id: id,
            diagnoses: vec![],
            priority_diagnoses: (0..priority)
                .map(|i| Description::new(format!("COVID-19 variant {i}")).unwrap())
                .collect(),
            malformed_diagnoses: vec![],
            resolved_diagnoses: vec![],
        }
    }

    fn ids(records: &[PatientRecord]) -> Vec<i64> {
        records.iter().map(|r| r.patient_id).collect()
    }

    #[rstest]
    #[case("patient_id", SortField::PatientId)]
    #[case("diagnoses", SortField::Diagnoses)]
    #[case("malformed_diagnoses", SortField::MalformedDiagnoses)]
    #[case("priority_diagnoses", SortField::PriorityDiagnoses)]
    #[case("resolved_diagnoses", SortField::ResolvedDiagnoses)]
    #[case("fev", SortField::PriorityDiagnoses)]
    #[case("", SortField::PriorityDiagnoses)]
    fn parses_field_names(#[case] name: &str, #[case] expected: SortField) {
        assert_eq!(SortField::parse_lenient(name), expected);
        assert_eq!(name.parse::<SortField>().unwrap(), expected);
    }

    #[test]
    fn priority_descending_keeps_ties_in_input_order() {
        let mut records: Vec<_> = [0, 2, 0, 1, 0, 0]
            .iter()
            .enumerate()
            .map(|(i, &n)| record(i as i64, n))
            .collect();

        sort_records(&mut records, SortField::PriorityDiagnoses, SortOrder::Descending);
        assert_eq!(ids(&records), vec![1, 3, 0, 2, 4, 5]);
    }

    #[test]
    fn ascending_reverses_distinct_keys_and_keeps_ties_stable() {
        let base: Vec<_> = [1, 0, 3, 0, 2]
            .iter()
            .enumerate()
            .map(|(i, &n)| record(i as i64, n))
            .collect();

        let mut desc = base.clone();
        sort_records(&mut desc, SortField::PriorityDiagnoses, SortOrder::Descending);
        let mut asc = base;
        sort_records(&mut asc, SortField::PriorityDiagnoses, SortOrder::Ascending);

        assert_eq!(ids(&desc), vec![2, 4, 0, 1, 3]);
        assert_eq!(ids(&asc), vec![1, 3, 0, 4, 2]);
    }

    #[test]
    fn sorts_by_identifier_value() {
        let mut records = vec![record(3, 0), record(-1, 0), record(7, 0)];
        sort_records(&mut records, SortField::PatientId, SortOrder::Descending);
        assert_eq!(ids(&records), vec![7, 3, -1]);
        sort_records(&mut records, SortField::PatientId, SortOrder::Ascending);
        assert_eq!(ids(&records), vec![-1, 3, 7]);
    }

    #[test]
    fn sorts_by_resolved_count() {
        let mut with_resolved = record(9, 0);
        with_resolved.resolved_diagnoses.push(ResolvedDiagnosis {
            code: Code::from("I10"),
            description: None,
        });
        let mut records = vec![record(1, 3), with_resolved];
        sort_records(&mut records, SortField::ResolvedDiagnoses, SortOrder::Descending);
        assert_eq!(ids(&records), vec![9, 1]);
    }

    #[test]
    fn default_order_is_descending() {
        assert!(SortOrder::default().is_descending());
        assert_eq!(SortField::default(), SortField::PriorityDiagnoses);
        assert_eq!(SortOrder::from_descending(false), SortOrder::Ascending);
    }
}
