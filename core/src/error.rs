//! Error types for the catalog client.
//!
//! # Design
//! The sentinel-returning operations never surface these; they are reported
//! to the diagnostics sink instead. The `try_*` operations return them so a
//! caller that cares can tell a dead network from a 500 from a bad payload.

use thiserror::Error;

/// Failure of a single request/response cycle.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No response was obtained: connection refused, DNS failure, timeout,
    /// or the body could not be read.
    #[error("network failure: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body was not valid JSON for the expected shape.
    #[error("malformed response body: {0}")]
    Parse(String),
}

impl TransportError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TransportError::Network(_) => FailureKind::Network,
            TransportError::Http { status, .. } => FailureKind::Http { status: *status },
            TransportError::Parse(_) => FailureKind::Parse,
        }
    }
}

/// Classification of a `TransportError` without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Http { status: u16 },
    Parse,
}

/// Errors raised while loading `CatalogConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}
