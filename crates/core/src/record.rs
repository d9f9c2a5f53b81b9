//! Patient input data and derived report records.
//!
//! [`Patient`] is caller-owned input: an identifier plus raw codes. [`PatientRecord`] is the
//! enriched view built from it by [`RecordBuilder`], recomputed from scratch on every report so
//! descriptions always reflect the lookup service at the time of the call.

use crate::classify::{classify, PriorityKeywords};
use crate::lookup::CodeLookup;
use dx_types::{Code, Description};
use serde::{Deserialize, Serialize, Serializer};

/// A patient as supplied by the caller.
///
/// `resolved_diagnoses` is optional in JSON input and always present once deserialized, so
/// later operations never need to patch it in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: i64,
    pub diagnoses: Vec<Code>,
    #[serde(default)]
    pub resolved_diagnoses: Vec<Code>,
}

impl Patient {
    pub fn new(patient_id: i64, diagnoses: Vec<Code>) -> Self {
        Self {
            patient_id,
            diagnoses,
            resolved_diagnoses: Vec::new(),
        }
    }

    pub fn with_resolved(mut self, resolved: Vec<Code>) -> Self {
        self.resolved_diagnoses = resolved;
        self
    }
}

/// A code that resolved, with its description. Serializes as a `[code, description]` pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnosis {
    pub code: Code,
    pub description: Description,
}

impl Serialize for Diagnosis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.code, &self.description).serialize(serializer)
    }
}

/// A cured code, paired with whatever the lookup returned for it today.
///
/// Serializes as `[code, description]`, with `null` when the code no longer resolves.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedDiagnosis {
    pub code: Code,
    pub description: Option<Description>,
}

impl Serialize for ResolvedDiagnosis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.code, &self.description).serialize(serializer)
    }
}

/// Enriched, report-ready view of one patient.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatientRecord {
    pub patient_id: i64,
    pub diagnoses: Vec<Diagnosis>,
    pub priority_diagnoses: Vec<Description>,
    pub malformed_diagnoses: Vec<Code>,
    pub resolved_diagnoses: Vec<ResolvedDiagnosis>,
}

impl PatientRecord {
    /// True when `description` was flagged as a priority diagnosis for this patient.
    pub fn is_priority(&self, description: &Description) -> bool {
        self.priority_diagnoses.contains(description)
    }
}

/// Builds [`PatientRecord`]s from [`Patient`]s.
pub struct RecordBuilder<'a> {
    lookup: &'a dyn CodeLookup,
    keywords: &'a PriorityKeywords,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(lookup: &'a dyn CodeLookup, keywords: &'a PriorityKeywords) -> Self {
        Self { lookup, keywords }
    }

    /// Classifies the active diagnoses and looks up each resolved code.
    ///
    /// Resolved codes are never reclassified as malformed: a resolved code that no longer
    /// resolves is reported with `description: None`.
    pub fn build(&self, patient: &Patient) -> PatientRecord {
        let classification = classify(&patient.diagnoses, self.keywords, self.lookup);

        let resolved_diagnoses = patient
            .resolved_diagnoses
            .iter()
            .map(|code| ResolvedDiagnosis {
                code: code.clone(),
                description: self.lookup.lookup(code),
            })
            .collect();

        PatientRecord {
            patient_id: patient.patient_id,
            diagnoses: classification.valid,
            priority_diagnoses: classification.priority,
            malformed_diagnoses: classification.malformed,
            resolved_diagnoses,
        }
    }

    pub fn build_all(&self, patients: &[Patient]) -> Vec<PatientRecord> {
        patients.iter().map(|p| self.build(p)).collect()
    }
}
