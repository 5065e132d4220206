//! Error taxonomy shared by every layer of the client.
//!
//! Failures that reached the wire carry a [`RequestSummary`] so callers can
//! see which method and path was attempted. Secret material never appears in
//! any variant.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MALFORMED_RESPONSE_CODE;
use crate::types::HttpMethod;

/// The request that produced a failure, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub method: String,
    pub path: String,
    pub params: BTreeMap<String, String>,
}

impl RequestSummary {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        params: BTreeMap<String, String>,
    ) -> Self {
        Self { method: method.into(), path: path.into(), params }
    }
}

impl fmt::Display for RequestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Coarse grouping of remote failures.
///
/// Lets callers tell a signature or clock-skew rejection apart from a
/// resource that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiFailureCategory {
    /// 401/403: bad signature, clock skew, revoked or under-privileged key
    Authentication,
    /// 429
    RateLimit,
    /// 404
    NotFound,
    /// 400: missing or invalid parameters
    BadRequest,
    /// 409
    Conflict,
    /// 5xx
    Server,
    Unknown,
}

/// A failure classified by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    /// Envelope status, e.g. `FAIL`.
    pub code: String,
    /// Five digit vendor code (HTTP status followed by a two digit suffix).
    pub numeric_code: Option<u64>,
    pub message: Option<String>,
    pub detail: Option<String>,
    pub http_status: Option<u16>,
    pub request: RequestSummary,
}

impl ApiFailure {
    pub fn category(&self) -> ApiFailureCategory {
        let status = self
            .numeric_code
            .and_then(|code| u16::try_from(code / 100).ok())
            .filter(|status| (100..600).contains(status))
            .or(self.http_status);

        match status {
            Some(401 | 403) => ApiFailureCategory::Authentication,
            Some(429) => ApiFailureCategory::RateLimit,
            Some(404) => ApiFailureCategory::NotFound,
            Some(400) => ApiFailureCategory::BadRequest,
            Some(409) => ApiFailureCategory::Conflict,
            Some(status) if status >= 500 => ApiFailureCategory::Server,
            _ => ApiFailureCategory::Unknown,
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.code, self.request)?;
        if let Some(code) = self.numeric_code {
            write!(f, " (code {code})")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, " [{detail}]")?;
        }
        Ok(())
    }
}

/// Main error type for duoadmin
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum AdminError {
    #[error("Credentials are not configured; initialize the credential store first")]
    NotConfigured,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Transport error on {request}: {message}")]
    Transport { request: RequestSummary, message: String },

    #[error("API error: {0}")]
    Api(ApiFailure),

    #[error("Malformed response to {request}: {detail}")]
    MalformedResponse { request: RequestSummary, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Security error: {0}")]
    Security(String),
}

impl AdminError {
    /// Taxonomy name of the failure. For remote failures this is the
    /// envelope status reported by the service.
    pub fn code(&self) -> &str {
        match self {
            Self::NotConfigured => "NotConfigured",
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::Validation(_) => "Validation",
            Self::Transport { .. } => "TransportError",
            Self::Api(failure) => &failure.code,
            Self::MalformedResponse { .. } => MALFORMED_RESPONSE_CODE,
            Self::Config(_) => "Config",
            Self::Security(_) => "Security",
        }
    }

    /// The request this failure belongs to, when it reached the wire.
    pub fn request(&self) -> Option<&RequestSummary> {
        match self {
            Self::Transport { request, .. } | Self::MalformedResponse { request, .. } => {
                Some(request)
            }
            Self::Api(failure) => Some(&failure.request),
            _ => None,
        }
    }

    pub fn api_failure(&self) -> Option<&ApiFailure> {
        match self {
            Self::Api(failure) => Some(failure),
            _ => None,
        }
    }

    /// Whether replaying `method` after this failure is safe.
    ///
    /// Transport failures leave the remote effect unknown, so only idempotent
    /// methods qualify. Malformed responses qualify once; the caller's retry
    /// policy enforces the bound. Remote-classified failures are surfaced.
    pub fn is_retryable(&self, method: HttpMethod) -> bool {
        match self {
            Self::Transport { .. } | Self::MalformedResponse { .. } => method.is_idempotent(),
            Self::Api(_)
            | Self::NotConfigured
            | Self::InvalidRequest(_)
            | Self::Validation(_)
            | Self::Config(_)
            | Self::Security(_) => false,
        }
    }
}

/// Result type alias for duoadmin operations
pub type Result<T> = std::result::Result<T, AdminError>;
