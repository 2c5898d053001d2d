//! Error types for vitrine_core

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse failure category, shared by the resolver, the query boundary and the panel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No identifier was supplied
    MissingParameter,
    /// The identifier resolves outside the permitted root
    AccessDenied,
    /// Nothing exists at the resolved location
    NotFound,
    /// Unexpected read failure
    Internal,
}

impl ErrorKind {
    /// HTTP status used for this kind at the query boundary
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::MissingParameter => 400,
            ErrorKind::AccessDenied => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
        }
    }

    /// Inverse of [`ErrorKind::status_code`]. Unknown statuses map to `Internal`.
    pub fn from_status_code(status: u16) -> Self {
        match status {
            400 => ErrorKind::MissingParameter,
            403 => ErrorKind::AccessDenied,
            404 => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::MissingParameter => "missing parameter",
            ErrorKind::AccessDenied => "access denied",
            ErrorKind::NotFound => "not found",
            ErrorKind::Internal => "internal failure",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while resolving source text
#[derive(Error, Debug)]
pub enum SourceError {
    /// Empty or absent identifier
    #[error("source identifier is required")]
    MissingParameter,

    /// Identifier escapes the permitted root
    #[error("access denied: {id}")]
    AccessDenied { id: String },

    /// No content for the identifier
    #[error("source not found: {id}")]
    NotFound { id: String },

    /// Read failed for a reason other than absence
    #[error("failed to read {id}: {source}")]
    Internal {
        id: String,
        #[source]
        source: io::Error,
    },

    /// Snapshot file could not be decoded or encoded
    #[error("snapshot format error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl SourceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SourceError::MissingParameter => ErrorKind::MissingParameter,
            SourceError::AccessDenied { .. } => ErrorKind::AccessDenied,
            SourceError::NotFound { .. } => ErrorKind::NotFound,
            SourceError::Internal { .. } | SourceError::Snapshot(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for vitrine_core operations
pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_round_trip_for_known_kinds() {
        for kind in [
            ErrorKind::MissingParameter,
            ErrorKind::AccessDenied,
            ErrorKind::NotFound,
            ErrorKind::Internal,
        ] {
            assert_eq!(ErrorKind::from_status_code(kind.status_code()), kind);
        }
        assert_eq!(ErrorKind::from_status_code(502), ErrorKind::Internal);
    }

    #[test]
    fn test_error_kind_of_internal_read() {
        let err = SourceError::Internal {
            id: "a.ts".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().contains("a.ts"));
    }
}
