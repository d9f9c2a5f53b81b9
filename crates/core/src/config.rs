//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Nothing in the pipeline reads environment variables while a report is being built.

use crate::classify::PriorityKeywords;
use crate::constants::{DEFAULT_LOOKUP_BASE_URL, DEFAULT_MAX_LIST, DEFAULT_SEARCH_FIELDS};
use crate::validation::{validate_lookup_base_url, validate_search_fields};
use crate::{DxError, DxResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    lookup_base_url: String,
    search_fields: String,
    max_list: u32,
    priority_keywords: PriorityKeywords,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `DxError::InvalidInput` if the lookup URL or search fields fail validation, or
    /// if `max_list` is zero.
    pub fn new(
        lookup_base_url: String,
        search_fields: String,
        max_list: u32,
        priority_keywords: PriorityKeywords,
    ) -> DxResult<Self> {
        validate_lookup_base_url(&lookup_base_url)?;
        validate_search_fields(&search_fields)?;

        if max_list == 0 {
            return Err(DxError::InvalidInput("max_list must be at least 1".into()));
        }

        Ok(Self {
            lookup_base_url,
            search_fields,
            max_list,
            priority_keywords,
        })
    }

    /// Build a configuration from optional env-style values, falling back to defaults.
    ///
    /// Arguments are the raw values of `DX_LOOKUP_URL`, `DX_SEARCH_FIELDS`, `DX_MAX_LIST` and
    /// `DX_PRIORITY_KEYWORDS`. The caller decides where those come from.
    pub fn from_env_values(
        lookup_url: Option<String>,
        search_fields: Option<String>,
        max_list: Option<String>,
        priority_keywords: Option<String>,
    ) -> DxResult<Self> {
        Self::new(
            non_blank(lookup_url).unwrap_or_else(|| DEFAULT_LOOKUP_BASE_URL.to_string()),
            non_blank(search_fields).unwrap_or_else(|| DEFAULT_SEARCH_FIELDS.to_string()),
            max_list_from_env_value(max_list)?,
            priority_keywords_from_env_value(priority_keywords)?,
        )
    }

    pub fn lookup_base_url(&self) -> &str {
        &self.lookup_base_url
    }

    pub fn search_fields(&self) -> &str {
        &self.search_fields
    }

    pub fn max_list(&self) -> u32 {
        self.max_list
    }

    pub fn priority_keywords(&self) -> &PriorityKeywords {
        &self.priority_keywords
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            lookup_base_url: DEFAULT_LOOKUP_BASE_URL.to_string(),
            search_fields: DEFAULT_SEARCH_FIELDS.to_string(),
            max_list: DEFAULT_MAX_LIST,
            priority_keywords: PriorityKeywords::default(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the lookup result limit from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default of 1.
pub fn max_list_from_env_value(value: Option<String>) -> DxResult<u32> {
    let Some(value) = non_blank(value) else {
        return Ok(DEFAULT_MAX_LIST);
    };

    value
        .parse::<u32>()
        .map_err(|e| DxError::InvalidInput(format!("invalid max list '{value}': {e}")))
}

/// Parse a comma-separated priority keyword list from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default keywords.
///
/// # Errors
///
/// Returns `DxError::InvalidInput` if a value is given but contains no usable keyword
/// (for example `" , ,"`).
pub fn priority_keywords_from_env_value(value: Option<String>) -> DxResult<PriorityKeywords> {
    let Some(value) = non_blank(value) else {
        return Ok(PriorityKeywords::default());
    };

    let keywords = PriorityKeywords::new(value.split(','));
    if keywords.is_empty() {
        return Err(DxError::InvalidInput(
            "priority keyword list contains no keywords".into(),
        ));
    }

    Ok(keywords)
}
