//! Canonical request builder.
//!
//! The canonical request is five lines joined with `\n` (no trailing
//! newline):
//!
//! ```text
//! Tue, 01 Jan 2030 00:00:00 -0000
//! GET
//! api-1234.example.com
//! /admin/v1/users
//! limit=300&offset=0
//! ```

use chrono::{DateTime, Utc};
use duoadmin_domain::constants::SIGNED_DATE_FORMAT;
use duoadmin_domain::{AdminError, HttpMethod, RequestParams, Result};

/// Format `at` as `Www, dd MMM yyyy HH:mm:ss -0000`.
///
/// chrono's `%a`/`%b` are always English, whatever the host locale.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(SIGNED_DATE_FORMAT).to_string()
}

/// The exact text that gets signed. Not retained after signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    timestamp: String,
    method: HttpMethod,
    host: String,
    path: String,
    query: String,
    text: String,
}

impl CanonicalRequest {
    /// Build from a method name, validating it is one of GET/POST/PUT/DELETE.
    pub fn build(
        method: &str,
        host: &str,
        path: &str,
        timestamp: DateTime<Utc>,
        params: &RequestParams,
    ) -> Result<Self> {
        Self::new(method.parse()?, host, path, timestamp, params)
    }

    pub fn new(
        method: HttpMethod,
        host: &str,
        path: &str,
        timestamp: DateTime<Utc>,
        params: &RequestParams,
    ) -> Result<Self> {
        let path = path.trim();
        validate_path(path)?;

        let host = host.trim().to_lowercase();
        if host.is_empty() {
            return Err(AdminError::InvalidRequest("API host must not be empty".to_string()));
        }

        let timestamp = format_timestamp(timestamp);
        let query = params.to_form_body();
        let text = [timestamp.as_str(), method.as_str(), host.as_str(), path, query.trim()].join("\n");

        Ok(Self { timestamp, method, host, path: path.to_string(), query, text })
    }

    /// Value sent in the date header; must equal the first canonical line.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Sorted, percent-encoded parameter string.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

pub(crate) fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AdminError::InvalidRequest("request path must not be empty".to_string()));
    }
    if !path.starts_with('/') {
        return Err(AdminError::InvalidRequest(format!("request path '{path}' must start with '/'")));
    }
    if path.contains('?') {
        return Err(AdminError::InvalidRequest(format!(
            "request path '{path}' must not contain a query string; pass parameters instead"
        )));
    }
    Ok(())
}
