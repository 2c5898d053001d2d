//! Source identifiers

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SourceError};

/// Opaque key naming a unit of source text.
///
/// In practice this is a path relative to the project root, but nothing outside
/// [`crate::live`] looks inside it. Cloning is cheap.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceId(Arc<str>);

impl SourceId {
    /// Create an identifier. Empty strings are rejected as `MissingParameter`.
    pub fn new(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(SourceError::MissingParameter);
        }
        Ok(Self(Arc::from(id)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SourceId {
    type Error = SourceError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SourceId> for String {
    fn from(id: SourceId) -> Self {
        id.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_identifier_is_missing_parameter() {
        assert!(matches!(
            SourceId::new(""),
            Err(SourceError::MissingParameter)
        ));
    }

    #[test]
    fn test_identifier_is_kept_verbatim() {
        let id = SourceId::new("../secret").unwrap();
        assert_eq!(id.as_str(), "../secret");
        assert_eq!(id.to_string(), "../secret");
    }
}
