//! In-place edits to a caller-owned patient list.

use crate::constants::INVALID_ENTRY_MESSAGE;
use crate::lookup::CodeLookup;
use crate::record::Patient;
use dx_types::Code;

/// What [`add_diagnosis`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// The code was appended to an existing patient.
    Appended,
    /// The patient already had this exact code; nothing changed.
    AlreadyPresent,
    /// No patient had the identifier, so a new one was created.
    PatientCreated,
}

/// What [`cure`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CureOutcome {
    /// The code moved from `diagnoses` to `resolved_diagnoses`.
    Cured,
    /// Unknown patient, or the code is absent or does not resolve. Nothing changed.
    InvalidEntry,
}

/// Adds `code` to the first patient with `patient_id`, creating the patient if needed.
///
/// Adding a code the patient already has is a no-op.
pub fn add_diagnosis(patients: &mut Vec<Patient>, patient_id: i64, code: Code) -> AddOutcome {
    if let Some(patient) = patients.iter_mut().find(|p| p.patient_id == patient_id) {
        if patient.diagnoses.contains(&code) {
            return AddOutcome::AlreadyPresent;
        }
        tracing::debug!("adding {} to patient {}", code, patient_id);
        patient.diagnoses.push(code);
        return AddOutcome::Appended;
    }

    tracing::debug!("creating patient {} with diagnosis {}", patient_id, code);
    patients.push(Patient::new(patient_id, vec![code]));
    AddOutcome::PatientCreated
}

/// Moves the first occurrence of `code` from a patient's active diagnoses to their resolved
/// diagnoses.
///
/// Identifiers are not unique, so every patient with `patient_id` is considered in order and
/// the first one that currently has `code` is the one cured. The move only happens when the
/// code still resolves through `lookup`, and the lookup is skipped when no such patient has the
/// code. Every other case is reported as [`CureOutcome::InvalidEntry`] and leaves `patients`
/// unchanged.
pub fn cure(
    patients: &mut [Patient],
    patient_id: i64,
    code: &Code,
    lookup: &dyn CodeLookup,
) -> CureOutcome {
    let target = patients
        .iter_mut()
        .filter(|p| p.patient_id == patient_id)
        .find_map(|p| p.diagnoses.iter().position(|c| c == code).map(|i| (p, i)));

    let Some((patient, index)) = target else {
        tracing::info!(
            "{}: no patient {} has diagnosis {}",
            INVALID_ENTRY_MESSAGE,
            patient_id,
            code
        );
        return CureOutcome::InvalidEntry;
    };

    if lookup.lookup(code).is_none() {
        tracing::info!("{}: {} does not resolve", INVALID_ENTRY_MESSAGE, code);
        return CureOutcome::InvalidEntry;
    }

    let moved = patient.diagnoses.remove(index);
    patient.resolved_diagnoses.push(moved);
    CureOutcome::Cured
}
