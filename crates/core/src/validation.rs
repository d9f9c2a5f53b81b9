//! Input validation utilities.
//!
//! Configuration values end up inside outbound request URLs, so they are checked once at
//! startup rather than trusted at lookup time.

use crate::{DxError, DxResult};

/// Validates that a lookup endpoint is an absolute `http`/`https` URL.
///
/// # Errors
///
/// Returns `DxError::InvalidInput` if the value is blank, too long, unparseable, uses a
/// different scheme, or already carries a query string.
pub fn validate_lookup_base_url(url: &str) -> DxResult<()> {
    const MAX_URL_LEN: usize = 2048;

    if url.trim().is_empty() {
        return Err(DxError::InvalidInput("lookup URL cannot be empty".into()));
    }

    if url.len() > MAX_URL_LEN {
        return Err(DxError::InvalidInput(format!(
            "lookup URL exceeds maximum length of {} characters",
            MAX_URL_LEN
        )));
    }

    let parsed = reqwest::Url::parse(url)
        .map_err(|e| DxError::InvalidInput(format!("lookup URL is not a valid URL: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DxError::InvalidInput(format!(
            "lookup URL must use http or https, got '{}'",
            parsed.scheme()
        )));
    }

    if parsed.query().is_some() {
        return Err(DxError::InvalidInput(
            "lookup URL must not contain a query string".into(),
        ));
    }

    Ok(())
}

/// Validates the comma-separated list of fields passed to the lookup service as `sf`.
///
/// # Errors
///
/// Returns `DxError::InvalidInput` if the value is blank or contains characters other than
/// ASCII alphanumerics, `.`, `_` and `,`.
pub fn validate_search_fields(fields: &str) -> DxResult<()> {
    if fields.trim().is_empty() {
        return Err(DxError::InvalidInput("search fields cannot be empty".into()));
    }

    let ok = fields
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'.' | b'_' | b','));

    if !ok {
        return Err(DxError::InvalidInput(
            "search fields contain invalid characters (only alphanumeric, '.', '_', ',' allowed)"
                .into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://clinicaltables.nlm.nih.gov/api/icd10cm/v3/search")]
    #[case("http://127.0.0.1:8080/search")]
    fn accepts_http_urls(#[case] url: &str) {
        validate_lookup_base_url(url).expect("should accept");
    }

    #[rstest]
    #[case("")]
    #[case("not a url")]
    #[case("ftp://example.com/search")]
    #[case("https://example.com/search?sf=code")]
    fn rejects_bad_urls(#[case] url: &str) {
        let err = validate_lookup_base_url(url).expect_err("should reject");
        assert!(matches!(err, DxError::InvalidInput(_)));
    }

    #[rstest]
    #[case("code", true)]
    #[case("code,name", true)]
    #[case("code&terms=x", false)]
    #[case("  ", false)]
    fn search_fields_character_set(#[case] fields: &str, #[case] ok: bool) {
        assert_eq!(validate_search_fields(fields).is_ok(), ok);
    }
}
