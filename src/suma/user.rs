//! SUSE Manager user management for group accounts.

use crate::suma::{SumaError, SumaSession};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_USER_EMAIL: &str = "root@localhost";

#[derive(Debug, Deserialize)]
struct UserEntry {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ListUsersResponse {
    #[serde(default)]
    result: Vec<UserEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUser<'a> {
    login: &'a str,
    password: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct DeleteUser<'a> {
    login: &'a str,
}

impl SumaSession {
    pub async fn list_users(&self) -> Result<Vec<String>, SumaError> {
        let rsp: ListUsersResponse = self
            .client
            .get_json(&self.session, "user/listUsers", &[])
            .await?;
        Ok(rsp.result.into_iter().map(|u| u.login).collect())
    }

    pub async fn user_exists(&self, login: &str) -> Result<bool, SumaError> {
        let users = self.list_users().await?;
        debug!("Users in SUSE Manager: {:?}", users);
        Ok(users.iter().any(|u| u == login))
    }

    /// Fails with `AlreadyExists` if `login` is already a SUSE Manager user.
    pub async fn ensure_user_absent(&self, login: &str) -> Result<(), SumaError> {
        if self.user_exists(login).await? {
            return Err(SumaError::AlreadyExists(format!("user {}", login)));
        }
        Ok(())
    }

    /// Creates `login` unless it already exists.
    pub async fn add_user(&self, login: &str, password: &str) -> Result<u16, SumaError> {
        self.ensure_user_absent(login).await?;
        self.create_user(login, password).await
    }

    /// Creates `login` with the group name as first and last name, without
    /// checking for an existing user.
    pub async fn create_user(&self, login: &str, password: &str) -> Result<u16, SumaError> {
        let payload = CreateUser {
            login,
            password,
            first_name: login,
            last_name: login,
            email: DEFAULT_USER_EMAIL,
        };
        let status = self
            .client
            .post_json(&self.session, "user/create", &payload)
            .await?;
        info!("Created SUSE Manager user {}", login);
        Ok(status)
    }

    /// Deletes `login`. Returns `false` if the user did not exist.
    pub async fn remove_user(&self, login: &str) -> Result<bool, SumaError> {
        if !self.user_exists(login).await? {
            info!("User {} already removed from SUSE Manager", login);
            return Ok(false);
        }

        self.client
            .post_json(&self.session, "user/delete", &DeleteUser { login })
            .await?;
        info!("Removed SUSE Manager user {}", login);
        Ok(true)
    }
}
