//! User operations

use std::sync::Arc;

use duoadmin_common::validation::{require_non_empty, EmailValidator, StringValidator, Validator};
use duoadmin_core::{AdminService, ValidationResultExt};
use duoadmin_domain::constants::{USERS_PATH, USER_PAGE_SIZE};
use duoadmin_domain::{HttpMethod, NewUser, RequestParams, Result, User};
use serde_json::Value;
use tracing::{debug, instrument};

use super::path_segment;

const MAX_USERNAME_LEN: usize = 100;
const MAX_NOTES_LEN: usize = 512;

/// User endpoints
pub struct UsersApi {
    service: Arc<AdminService>,
}

impl UsersApi {
    pub fn new(service: Arc<AdminService>) -> Self {
        Self { service }
    }

    /// List every user, paging 300 at a time.
    ///
    /// # Errors
    ///
    /// Any failing page fails the whole listing.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<User>> {
        let users: Vec<User> = self
            .service
            .request_all(HttpMethod::Get, USERS_PATH, RequestParams::new(), USER_PAGE_SIZE)
            .await?;

        debug!(count = users.len(), "Users listed");
        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: &str) -> Result<User> {
        let user_id = require_non_empty("user_id", user_id).or_invalid()?;
        self.service
            .request_as(HttpMethod::Get, &path_segment(USERS_PATH, user_id), RequestParams::new())
            .await
    }

    /// Look a user up by username. `None` when no user matches.
    #[instrument(skip(self))]
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let username = require_non_empty("username", username).or_invalid()?;
        let params = RequestParams::new().with("username", username);
        let matches: Vec<User> = self.service.request_as(HttpMethod::Get, USERS_PATH, params).await?;
        Ok(matches.into_iter().next())
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// `Validation` naming every bad field (empty or overlong username,
    /// malformed email, overlong notes) before anything is sent.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn create(&self, user: &NewUser) -> Result<User> {
        let params = new_user_params(user)?;
        let created: User = self.service.request_as(HttpMethod::Post, USERS_PATH, params).await?;

        debug!(user_id = %created.user_id, "User created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: &str) -> Result<()> {
        let user_id = require_non_empty("user_id", user_id).or_invalid()?;
        let _: Value = self
            .service
            .request(HttpMethod::Delete, &path_segment(USERS_PATH, user_id), RequestParams::new())
            .await?;
        Ok(())
    }
}

fn new_user_params(user: &NewUser) -> Result<RequestParams> {
    let username = StringValidator::new().not_empty().max_length(MAX_USERNAME_LEN);
    let notes = StringValidator::new().max_length(MAX_NOTES_LEN);
    Validator::new()
        .check("username", &username, user.username.as_str())
        .check_opt("email", &EmailValidator, user.email.as_deref())
        .check_opt("notes", &notes, user.notes.as_deref())
        .finish()
        .or_invalid()?;

    let mut params = RequestParams::new().with("username", user.username.trim());
    params.insert_opt("email", user.email.as_deref().map(str::trim));
    params.insert_opt("realname", user.realname.as_deref());
    params.insert_opt("status", user.status.map(|s| s.to_string()));
    params.insert_opt("notes", user.notes.as_deref());
    Ok(params)
}
