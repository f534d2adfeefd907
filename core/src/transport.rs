//! Single request/response cycle against the catalog backend.
//!
//! # Design
//! `Transport` owns the base URL and three injected capabilities: the
//! `HttpExecutor` doing the I/O, the `CredentialProvider` supplying the bearer
//! token, and the `DiagnosticsSink` receiving swallowed failures.
//!
//! Requests are built as plain `HttpRequest` values (`build`), executed, then
//! checked and parsed (`parse`). `send` chains the three and returns a
//! `Result`; `fetch_list` / `fetch_one` collapse any failure into an empty
//! `Vec` / `None` after reporting it.

use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::credentials::{CredentialProvider, NoCredentials};
use crate::diagnostics::{Diagnostic, DiagnosticsSink, TracingDiagnostics};
use crate::error::TransportError;
use crate::http::{HttpExecutor, HttpMethod, HttpRequest, HttpResponse, UreqExecutor};

/// Whether a request must carry the bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    None,
    Bearer,
}

pub struct Transport {
    base_url: String,
    executor: Box<dyn HttpExecutor>,
    credentials: Box<dyn CredentialProvider>,
    diagnostics: Box<dyn DiagnosticsSink>,
}

impl Transport {
    /// Transport using `ureq`, no credentials and `tracing` diagnostics.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            executor: Box::new(UreqExecutor::new()),
            credentials: Box::new(NoCredentials),
            diagnostics: Box::new(TracingDiagnostics),
        }
    }

    pub fn with_executor(mut self, executor: impl HttpExecutor + 'static) -> Self {
        self.executor = Box::new(executor);
        self
    }

    pub fn with_credentials(mut self, credentials: impl CredentialProvider + 'static) -> Self {
        self.credentials = Box::new(credentials);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: impl DiagnosticsSink + 'static) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request for `endpoint`, relative to the base URL.
    ///
    /// With `Auth::Bearer` the token is read from the credential provider now;
    /// when none is stored the header is left off and the backend decides.
    pub fn build(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
        auth: Auth,
    ) -> HttpRequest {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut headers = Vec::new();

        if auth == Auth::Bearer {
            match self.credentials.bearer_token() {
                Some(token) => headers.push((
                    "authorization".to_string(),
                    format!("Bearer {}", token.expose_secret()),
                )),
                None => tracing::warn!(%method, %url, "no bearer token stored; sending unauthenticated"),
            }
        }

        let body = body.map(|value| {
            headers.push(("content-type".to_string(), "application/json".to_string()));
            value.to_string()
        });

        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.executor.execute(request)?;
        tracing::debug!(status = response.status, url = %request.url, "received response");
        Ok(response)
    }

    /// Execute `request` and parse the JSON body as `T`.
    pub fn send<T: DeserializeOwned>(&self, request: &HttpRequest) -> Result<T, TransportError> {
        let response = self.execute(request)?;
        parse(response)
    }

    /// `send`, with any failure reported and replaced by an empty `Vec`.
    pub fn fetch_list<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: &HttpRequest,
    ) -> Vec<T> {
        self.settle(operation, request, |req| self.send::<Vec<T>>(req))
            .unwrap_or_default()
    }

    /// `send`, with any failure reported and replaced by `None`. A JSON
    /// `null` body also yields `None`, without a report.
    pub fn fetch_one<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: &HttpRequest,
    ) -> Option<T> {
        self.settle(operation, request, |req| self.send::<Option<T>>(req))
            .flatten()
    }

    fn settle<T>(
        &self,
        operation: &'static str,
        request: &HttpRequest,
        run: impl FnOnce(&HttpRequest) -> Result<T, TransportError>,
    ) -> Option<T> {
        match run(request) {
            Ok(value) => Some(value),
            Err(e) => {
                self.diagnostics
                    .record(Diagnostic::new(operation, request.method, &request.url, &e));
                None
            }
        }
    }
}

/// Check the status and parse the JSON body of `response` as `T`.
///
/// Any 2xx status is a success. An empty body reads as JSON `null`.
pub fn parse<T: DeserializeOwned>(response: HttpResponse) -> Result<T, TransportError> {
    if !response.is_success() {
        return Err(TransportError::Http {
            status: response.status,
            body: response.body,
        });
    }
    let body = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    serde_json::from_str(body).map_err(|e| TransportError::Parse(e.to_string()))
}
