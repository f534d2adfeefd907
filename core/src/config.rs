//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_API_BASE` - Base URL of the catalog API (e.g. `http://host/api/Home`)
//!
//! ## Optional
//! - `CATALOG_MEDIA_BASE` - Origin product images are served from
//!   (default: scheme, host and port of `CATALOG_API_BASE`)
//! - `CATALOG_TOKEN_FILE` - JSON key-value file holding the bearer token
//!   under `"token"`
//! - `CATALOG_TIMEOUT_SECS` - Global per-request timeout in whole seconds,
//!   at least 1 (default: none)

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const API_BASE_VAR: &str = "CATALOG_API_BASE";
pub const MEDIA_BASE_VAR: &str = "CATALOG_MEDIA_BASE";
pub const TOKEN_FILE_VAR: &str = "CATALOG_TOKEN_FILE";
pub const TIMEOUT_VAR: &str = "CATALOG_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Base URL every endpoint is resolved against.
    pub api_base: Url,
    /// Origin that relative image paths are resolved against.
    pub media_base: String,
    pub token_file: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl CatalogConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let raw_base = get(API_BASE_VAR).ok_or_else(|| ConfigError::MissingEnvVar(API_BASE_VAR.to_string()))?;
        let api_base = parse_http_url(API_BASE_VAR, &raw_base)?;

        let media_base = match get(MEDIA_BASE_VAR) {
            Some(raw) => {
                parse_http_url(MEDIA_BASE_VAR, &raw)?;
                raw.trim_end_matches('/').to_string()
            }
            None => api_base.origin().ascii_serialization(),
        };

        let timeout = get(TIMEOUT_VAR)
            .map(|raw| {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::InvalidEnvVar(TIMEOUT_VAR.to_string(), e.to_string()))?;
                // A zero timeout would fail every request before it is sent.
                if secs == 0 {
                    return Err(ConfigError::InvalidEnvVar(
                        TIMEOUT_VAR.to_string(),
                        "timeout must be at least one second".to_string(),
                    ));
                }
                Ok(Duration::from_secs(secs))
            })
            .transpose()?;

        Ok(Self {
            api_base,
            media_base,
            token_file: get(TOKEN_FILE_VAR).map(PathBuf::from),
            timeout,
        })
    }
}

fn parse_http_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var.to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            var.to_string(),
            format!("unsupported scheme {other}"),
        )),
    }
}
