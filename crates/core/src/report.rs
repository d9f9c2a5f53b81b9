//! Report service.
//!
//! [`ReportService`] bundles the resolved configuration with a [`CodeLookup`] and exposes the
//! whole pipeline: build records, sort them, render them as a table, and apply the add/cure
//! mutations to a caller-owned patient list.

use crate::config::CoreConfig;
use crate::lookup::{CodeLookup, NlmClient};
use crate::mutate::{self, AddOutcome, CureOutcome};
use crate::record::{Patient, PatientRecord, RecordBuilder};
use crate::sort::{sort_records, SortField, SortOrder};
use crate::table::{self, TableOptions};
use crate::DxResult;
use dx_types::{Code, Description};
use std::sync::Arc;

/// Pure report operations - no CLI or I/O concerns.
pub struct ReportService {
    cfg: Arc<CoreConfig>,
    lookup: Box<dyn CodeLookup>,
}

impl ReportService {
    /// Creates a service around an explicit lookup implementation.
    pub fn new(cfg: Arc<CoreConfig>, lookup: Box<dyn CodeLookup>) -> Self {
        Self { cfg, lookup }
    }

    /// Creates a service that resolves codes against the configured HTTP endpoint.
    ///
    /// # Errors
    ///
    /// Returns `DxError::HttpClient` if the HTTP client cannot be built.
    pub fn with_nlm_client(cfg: Arc<CoreConfig>) -> DxResult<Self> {
        let client = NlmClient::from_config(&cfg)?;
        tracing::debug!("using lookup endpoint {}", client.base_url());
        Ok(Self::new(cfg, Box::new(client)))
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    fn builder(&self) -> RecordBuilder<'_> {
        RecordBuilder::new(&*self.lookup, self.cfg.priority_keywords())
    }

    /// Looks up a single code.
    pub fn describe(&self, code: &Code) -> Option<Description> {
        self.lookup.lookup(code)
    }

    /// Builds one record per patient, in input order.
    pub fn build_records(&self, patients: &[Patient]) -> Vec<PatientRecord> {
        self.builder().build_all(patients)
    }

    /// Builds and sorts records for every patient.
    pub fn build_report(
        &self,
        patients: &[Patient],
        field: SortField,
        order: SortOrder,
    ) -> Vec<PatientRecord> {
        let mut records = self.build_records(patients);
        sort_records(&mut records, field, order);
        tracing::info!(
            "built report for {} patients sorted by {} ({})",
            records.len(),
            field,
            if order.is_descending() { "descending" } else { "ascending" }
        );
        records
    }

    /// Renders the colour-coded table. Never fails; see [`table::render`].
    pub fn render_table(&self, patients: &[Patient], options: &TableOptions) -> String {
        table::render(patients, options, &self.builder())
    }

    pub fn add_diagnosis(
        &self,
        patients: &mut Vec<Patient>,
        patient_id: i64,
        code: Code,
    ) -> AddOutcome {
        mutate::add_diagnosis(patients, patient_id, code)
    }

    pub fn cure(&self, patients: &mut [Patient], patient_id: i64, code: &Code) -> CureOutcome {
        mutate::cure(patients, patient_id, code, &*self.lookup)
    }
}
