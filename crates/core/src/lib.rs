//! # Diagnosis Report Core
//!
//! Core logic for turning raw patient diagnosis codes into a readable report:
//! - Look up each code's description through a [`CodeLookup`]
//! - Split codes into valid, malformed and priority diagnoses
//! - Sort the resulting [`PatientRecord`]s and optionally render them as a colour-coded table
//! - Add diagnoses to, and cure diagnoses from, a caller-owned patient list
//!
//! **No CLI concerns**: argument parsing, file handling and logging setup belong in `dx-cli`.

pub mod classify;
pub mod config;
pub mod constants;
pub mod error;
pub mod lookup;
pub mod mutate;
pub mod record;
pub mod report;
pub mod sort;
pub mod table;
pub mod validation;

pub use classify::{classify, Classification, PriorityKeywords};
pub use config::CoreConfig;
pub use error::{DxError, DxResult};
pub use lookup::{CodeLookup, InMemoryLookup, NlmClient};
pub use mutate::{add_diagnosis, cure, AddOutcome, CureOutcome};
pub use record::{Diagnosis, Patient, PatientRecord, RecordBuilder, ResolvedDiagnosis};
pub use report::ReportService;
pub use sort::{sort_records, SortField, SortOrder};
pub use table::{CategoryStyle, TableColor, TableOptions};

// Re-export the shared value types so callers need only one dependency.
pub use dx_types::{Code, Description, DescriptionError};
