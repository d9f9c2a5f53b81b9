//! Patient file loading and `ID:CODE` mutation arguments.

use anyhow::{anyhow, bail, Context};
use dx_core::{Code, Patient, ReportService};
use std::path::Path;

/// Reads a JSON array of patients.
pub fn load_patients(path: &Path) -> anyhow::Result<Vec<Patient>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read patient file {}", path.display()))?;
    let patients: Vec<Patient> = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse patient file {}", path.display()))?;
    tracing::debug!("loaded {} patients from {}", patients.len(), path.display());
    Ok(patients)
}

/// A parsed `ID:CODE` argument.
#[derive(Clone, Debug, PartialEq)]
pub struct Mutation {
    pub patient_id: i64,
    pub code: Code,
}

impl std::str::FromStr for Mutation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, code) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("expected ID:CODE, got '{s}'"))?;
        let patient_id = id
            .trim()
            .parse::<i64>()
            .with_context(|| format!("invalid patient id '{id}'"))?;
        let code = code.trim();
        if code.is_empty() {
            bail!("missing code in '{s}'");
        }
        Ok(Self {
            patient_id,
            code: Code::from(code),
        })
    }
}

/// Applies all additions, then all cures, in the order given.
pub fn apply_mutations(
    service: &ReportService,
    patients: &mut Vec<Patient>,
    adds: &[Mutation],
    cures: &[Mutation],
) {
    for m in adds {
        let outcome = service.add_diagnosis(patients, m.patient_id, m.code.clone());
        tracing::info!("add {} to patient {}: {:?}", m.code, m.patient_id, outcome);
    }
    for m in cures {
        let outcome = service.cure(patients, m.patient_id, &m.code);
        tracing::info!("cure {} for patient {}: {:?}", m.code, m.patient_id, outcome);
    }
}
