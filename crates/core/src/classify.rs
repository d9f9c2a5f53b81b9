//! Diagnosis classification.
//!
//! Splits one patient's raw codes into resolved diagnoses, priority descriptions and malformed
//! entries. The only source of truth for validity is the [`CodeLookup`]: a code that resolves
//! is valid, anything else is malformed.

use crate::constants::DEFAULT_PRIORITY_KEYWORDS;
use crate::lookup::CodeLookup;
use crate::record::Diagnosis;
use dx_types::{Code, Description};

/// Lowercase substrings that mark a description as a priority diagnosis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriorityKeywords(Vec<String>);

impl PriorityKeywords {
    /// Builds a keyword set, lowercasing each entry and dropping blanks and duplicates.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalised: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !normalised.contains(&keyword) {
                normalised.push(keyword);
            }
        }
        Self(normalised)
    }

    /// True when any keyword occurs in the description, ignoring case.
    pub fn matches(&self, description: &Description) -> bool {
        self.0.iter().any(|keyword| description.contains_lowercase(keyword))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for PriorityKeywords {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY_KEYWORDS)
    }
}

/// Output of [`classify`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    /// Codes that resolved, paired with their description, in input order.
    pub valid: Vec<Diagnosis>,
    /// Descriptions of valid codes that matched a priority keyword, in input order.
    pub priority: Vec<Description>,
    /// Raw codes that did not resolve, in input order.
    pub malformed: Vec<Code>,
}

/// Classifies `codes` by looking each one up in turn.
///
/// Every code is looked up exactly once. A code lands in either `valid` or `malformed`, never
/// both, and malformed entries keep their original value.
pub fn classify(
    codes: &[Code],
    keywords: &PriorityKeywords,
    lookup: &dyn CodeLookup,
) -> Classification {
    let mut out = Classification::default();

    for code in codes {
        match lookup.lookup(code) {
            Some(description) => {
                if keywords.matches(&description) {
                    out.priority.push(description.clone());
                }
                out.valid.push(Diagnosis {
                    code: code.clone(),
                    description,
                });
            }
            None => {
                tracing::debug!("code {} did not resolve; marking malformed", code);
                out.malformed.push(code.clone());
            }
        }
    }

    out
}
