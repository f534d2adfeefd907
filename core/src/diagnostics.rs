//! Failure reporting for the sentinel-returning operations.
//!
//! Operations that swallow a failure hand a [`Diagnostic`] to the injected
//! [`DiagnosticsSink`]. The default sink logs through `tracing`; the
//! recording sink keeps the records for later inspection.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{FailureKind, TransportError};
use crate::http::HttpMethod;

/// One swallowed failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Name of the resource operation, e.g. `list_products`.
    pub operation: &'static str,
    pub method: HttpMethod,
    pub url: String,
    pub kind: FailureKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(operation: &'static str, method: HttpMethod, url: &str, error: &TransportError) -> Self {
        Self {
            operation,
            method,
            url: url.to_string(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, diagnostic: Diagnostic);
}

impl<T: DiagnosticsSink + ?Sized> DiagnosticsSink for Arc<T> {
    fn record(&self, diagnostic: Diagnostic) {
        (**self).record(diagnostic);
    }
}

/// Logs each diagnostic at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn record(&self, diagnostic: Diagnostic) {
        tracing::warn!(
            operation = diagnostic.operation,
            method = %diagnostic.method,
            url = %diagnostic.url,
            kind = ?diagnostic.kind,
            "{}",
            diagnostic.message
        );
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    records: Mutex<Vec<Diagnostic>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Diagnostic> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn record(&self, diagnostic: Diagnostic) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingDiagnostics::new();
        assert!(sink.is_empty());

        let refused = TransportError::Network("connection refused".to_string());
        let broken = TransportError::Http {
            status: 500,
            body: "boom".to_string(),
        };
        sink.record(Diagnostic::new("list_products", HttpMethod::Get, "http://h/a", &refused));
        sink.record(Diagnostic::new("add_to_cart", HttpMethod::Post, "http://h/b", &broken));

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].operation, "list_products");
        assert_eq!(records[0].kind, FailureKind::Network);
        assert_eq!(records[1].kind, FailureKind::Http { status: 500 });
        assert_eq!(records[1].message, "HTTP 500: boom");
    }
}
