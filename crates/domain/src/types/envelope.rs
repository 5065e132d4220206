//! Outer JSON wrapper carried by every API response.

use serde::Deserialize;
use serde_json::Value;

use crate::constants::STATUS_OK;

/// Decoded response envelope.
///
/// `response` is only meaningful when `status` is `OK`. The service names the
/// status field `stat`; `status` is accepted as well.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(alias = "stat")]
    pub status: String,
    #[serde(default)]
    pub response: Option<Value>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub message_detail: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl ResponseEnvelope {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Vendor error code, which is sent as a number but occasionally as a
    /// numeric string.
    pub fn numeric_code(&self) -> Option<u64> {
        match self.code.as_ref()? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
