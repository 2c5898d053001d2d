//! Error types for vitrine_server

use std::io;

use thiserror::Error;

/// Errors raised while serving or issuing a source query
#[derive(Error, Debug)]
pub enum ServerError {
    /// Client sent nothing before the request timeout
    #[error("timed out waiting for request")]
    Timeout,

    #[error("HTTP connection error: {0}")]
    Connection(#[from] hyper::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for vitrine_server operations
pub type Result<T> = std::result::Result<T, ServerError>;
