//! Raw diagnosis codes.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A diagnosis code as supplied in patient data.
///
/// Patient files are not validated on the way in, so an entry in a diagnosis list may be any
/// JSON value. Strings become [`Code::Text`]; everything else is kept verbatim in
/// [`Code::Other`] so that a malformed entry such as the number `1` is reported back as `1`
/// rather than `"1"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Code {
    Text(String),
    Other(serde_json::Value),
}

impl Code {
    /// The string form used when querying a lookup service.
    ///
    /// Numbers are coerced to their decimal text. Booleans, nulls, arrays and objects have no
    /// meaningful query form and return `None`.
    pub fn query_term(&self) -> Option<Cow<'_, str>> {
        match self {
            Code::Text(text) => Some(Cow::Borrowed(text.as_str())),
            Code::Other(serde_json::Value::String(text)) => Some(Cow::Borrowed(text.as_str())),
            Code::Other(serde_json::Value::Number(n)) => Some(Cow::Owned(n.to_string())),
            Code::Other(_) => None,
        }
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Code::Text(text) => f.write_str(text),
            Code::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Code {
    fn from(value: &str) -> Self {
        Code::Text(value.to_owned())
    }
}

impl From<String> for Code {
    fn from(value: String) -> Self {
        Code::Text(value)
    }
}

impl From<i64> for Code {
    fn from(value: i64) -> Self {
        Code::Other(serde_json::Value::from(value))
    }
}

impl From<serde_json::Value> for Code {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => Code::Text(text),
            other => Code::Other(other),
        }
    }
}
