use std::sync::Arc;

use duoadmin_core::AdminService;
use duoadmin_domain::constants::{PHONES_PATH, PHONE_PAGE_SIZE};
use duoadmin_domain::{HttpMethod, Phone, RequestParams, Result};
use tracing::instrument;

/// Phone endpoints
pub struct PhonesApi {
    service: Arc<AdminService>,
}

impl PhonesApi {
    pub fn new(service: Arc<AdminService>) -> Self {
        Self { service }
    }

    /// List every phone, paging 500 at a time.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Phone>> {
        self.service
            .request_all(HttpMethod::Get, PHONES_PATH, RequestParams::new(), PHONE_PAGE_SIZE)
            .await
    }
}
