//! `SecretStore` implementation backed by a logged-in Vault client.

use crate::http::HttpOptions;
use crate::interface::SecretStore;
use crate::vault::{auth, kv, policy, AppRoleCredentials, VaultClient, VaultError, VaultLogin};
use async_trait::async_trait;
use std::collections::HashMap;

pub struct VaultStore {
    client: VaultClient,
}

impl VaultStore {
    /// Authenticates with AppRole and returns a store holding the client token.
    pub async fn login(login: &VaultLogin, options: &HttpOptions) -> Result<Self, VaultError> {
        let mut client = VaultClient::new(&login.addr, options)?;
        auth::approle_login(&mut client, &login.role_id, &login.secret_id).await?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SecretStore for VaultStore {
    async fn get_secret(&self, path: &str) -> Result<HashMap<String, String>, VaultError> {
        kv::read_secret(&self.client, path).await
    }

    async fn put_secret(&self, path: &str, key: &str, value: &str) -> Result<(), VaultError> {
        kv::update_secret(&self.client, path, key, value).await
    }

    async fn create_policy(&self, name: &str, policy_hcl: &str) -> Result<(), VaultError> {
        policy::create_policy(&self.client, name, policy_hcl).await
    }

    async fn delete_policy(&self, name: &str) -> Result<(), VaultError> {
        policy::delete_policy(&self.client, name).await
    }

    async fn create_role(
        &self,
        name: &str,
        policies: &[String],
    ) -> Result<AppRoleCredentials, VaultError> {
        auth::create_role(&self.client, name, policies).await
    }

    async fn delete_role(&self, name: &str) -> Result<(), VaultError> {
        auth::delete_role(&self.client, name).await
    }

    async fn enable_kv2(&self, mount: &str) -> Result<(), VaultError> {
        kv::enable_kv2(&self.client, mount).await
    }

    async fn disable_kv(&self, mount: &str) -> Result<(), VaultError> {
        kv::disable_kv(&self.client, mount).await
    }

    async fn logout(&self) -> Result<(), VaultError> {
        auth::revoke_self(&self.client).await
    }
}
