//! Client configuration structures

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DATE_HEADER;

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Caller-side timeout for a single exchange. When it fires the remote
    /// effect of the request is unknown.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Name of the signed date header.
    pub date_header: String,
    pub retry: RetryConfig,
    /// Location of the encrypted credential file, if one is used.
    pub credential_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("duoadmin/", env!("CARGO_PKG_VERSION")).to_string(),
            date_header: DEFAULT_DATE_HEADER.to_string(),
            retry: RetryConfig::default(),
            credential_path: None,
        }
    }
}

/// Retry settings for idempotent requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3, base_backoff_ms: 200 }
    }
}
