use std::sync::Arc;

use duoadmin_core::AdminService;
use duoadmin_domain::constants::{ADMINS_PATH, ADMIN_PAGE_SIZE};
use duoadmin_domain::{Admin, HttpMethod, RequestParams, Result};
use tracing::instrument;

/// Administrator endpoints
pub struct AdminsApi {
    service: Arc<AdminService>,
}

impl AdminsApi {
    pub fn new(service: Arc<AdminService>) -> Self {
        Self { service }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Admin>> {
        self.service
            .request_all(HttpMethod::Get, ADMINS_PATH, RequestParams::new(), ADMIN_PAGE_SIZE)
            .await
    }
}
