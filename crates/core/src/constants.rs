//! Constants used throughout the diagnosis report core crate.
//!
//! Lookup defaults mirror the public NLM Clinical Tables ICD-10-CM search API. Text constants
//! are the fixed strings the table renderer and mutators emit.

/// Default search endpoint for ICD-10-CM code lookups.
pub const DEFAULT_LOOKUP_BASE_URL: &str = "https://clinicaltables.nlm.nih.gov/api/icd10cm/v3/search";

/// Fields searched by the lookup service (`sf` query parameter).
pub const DEFAULT_SEARCH_FIELDS: &str = "code";

/// Maximum number of matches requested per lookup (`maxList` query parameter).
pub const DEFAULT_MAX_LIST: u32 = 1;

/// Substrings that mark a resolved description as a priority diagnosis.
pub const DEFAULT_PRIORITY_KEYWORDS: [&str; 2] = ["covid", "respiratory failure"];

/// Description shown in the table for codes that did not resolve.
pub const UNAVAILABLE_DESCRIPTION: &str = "Diagnosis unavailable";

/// Returned by the table renderer when every category is switched off.
pub const NO_DATA_MESSAGE: &str = "No data to organize";

/// Prefix of the string returned when the table cannot be rendered.
pub const RENDER_FAILURE_PREFIX: &str = "Input data formatted incorrectly";

/// Logged when a cure request names an unknown patient or an absent/invalid code.
pub const INVALID_ENTRY_MESSAGE: &str = "Invalid code or patient entry";

/// Table header cells.
pub const TABLE_HEADERS: [&str; 3] = ["Patient ID", "ICD-10 Codes", "Diagnoses"];

/// Environment variable names read once at startup by binaries.
pub const ENV_LOOKUP_URL: &str = "DX_LOOKUP_URL";
pub const ENV_SEARCH_FIELDS: &str = "DX_SEARCH_FIELDS";
pub const ENV_MAX_LIST: &str = "DX_MAX_LIST";
pub const ENV_PRIORITY_KEYWORDS: &str = "DX_PRIORITY_KEYWORDS";
