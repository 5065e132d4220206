use std::sync::Arc;

use duoadmin_common::validation::require_non_empty;
use duoadmin_core::{AdminService, ValidationResultExt};
use duoadmin_domain::constants::{GROUPS_PATH, GROUP_PAGE_SIZE};
use duoadmin_domain::{Group, HttpMethod, RequestParams, Result};
use tracing::instrument;

use super::path_segment;

/// Group endpoints
pub struct GroupsApi {
    service: Arc<AdminService>,
}

impl GroupsApi {
    pub fn new(service: Arc<AdminService>) -> Self {
        Self { service }
    }

    /// List every group, paging 100 at a time.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Group>> {
        self.service
            .request_all(HttpMethod::Get, GROUPS_PATH, RequestParams::new(), GROUP_PAGE_SIZE)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, group_id: &str) -> Result<Group> {
        let group_id = require_non_empty("group_id", group_id).or_invalid()?;
        self.service
            .request_as(HttpMethod::Get, &path_segment(GROUPS_PATH, group_id), RequestParams::new())
            .await
    }
}
