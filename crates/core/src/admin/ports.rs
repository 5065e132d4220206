//! Boundaries the service depends on: the HTTPS exchange and wall-clock time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duoadmin_domain::Result;

use crate::signing::SignedRequest;

/// Status and raw body of one HTTPS exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }
}

/// Performs one exchange. Implementations do not retry and do not interpret
/// the body; connection, TLS and timeout failures map to
/// [`AdminError::Transport`](duoadmin_domain::AdminError::Transport).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &SignedRequest) -> Result<RawResponse>;
}

/// Source of the timestamp stamped into each signature.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
