//! Connectivity and account-level endpoints

use std::sync::Arc;

use duoadmin_core::AdminService;
use duoadmin_domain::constants::{CHECK_PATH, INFO_SUMMARY_PATH};
use duoadmin_domain::{HttpMethod, RequestParams, Result};
use serde_json::Value;
use tracing::instrument;

pub struct AccountApi {
    service: Arc<AdminService>,
}

impl AccountApi {
    pub fn new(service: Arc<AdminService>) -> Self {
        Self { service }
    }

    /// Unsigned liveness check; returns the server time payload.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<Value> {
        self.service.ping().await
    }

    /// Signed no-op that verifies the integration key, secret and clock.
    #[instrument(skip(self))]
    pub async fn check(&self) -> Result<Value> {
        self.service.request(HttpMethod::Get, CHECK_PATH, RequestParams::new()).await
    }

    /// Account-wide counts (users, admins, integrations, telephony credits).
    #[instrument(skip(self))]
    pub async fn info_summary(&self) -> Result<Value> {
        self.service.request(HttpMethod::Get, INFO_SUMMARY_PATH, RequestParams::new()).await
    }
}
