//! Value types shared by the diagnosis report crates.
//!
//! - [`Code`]: a raw diagnosis code exactly as it arrived in patient data
//! - [`Description`]: a non-empty description returned by a code lookup
//!
//! Neither type knows anything about ICD-10 structure. A code is only "valid" once a lookup
//! service resolves it to a [`Description`].

mod code;

pub use code::Code;

/// Errors that can occur when creating validated description text.
#[derive(Debug, thiserror::Error)]
pub enum DescriptionError {
    /// The input text was empty or contained only whitespace
    #[error("description cannot be empty")]
    Empty,
}

/// Human-readable description of a diagnosis code.
///
/// Always contains at least one non-whitespace character. Surrounding whitespace is trimmed
/// during construction so that keyword matching and table output see the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Description(String);

impl Description {
    /// Creates a new `Description`, rejecting blank input.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionError::Empty`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, DescriptionError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DescriptionError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring test against an already-lowercased needle.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(needle)
    }
}

impl std::fmt::Display for Description {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for Description {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Description {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Description::new(&s).map_err(serde::de::Error::custom)
    }
}
