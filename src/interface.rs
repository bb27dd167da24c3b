//! Capability traits shared by the workflows and their test doubles.

use crate::suma::{AuthorizedSystem, SumaError};
use crate::vault::{AppRoleCredentials, VaultError};
use async_trait::async_trait;
use std::collections::HashMap;

/// Secret store operations, modelled on the HashiCorp Vault HTTP API.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Reads the key-value pairs at a KV v2 `data/` path.
    async fn get_secret(&self, path: &str) -> Result<HashMap<String, String>, VaultError>;

    /// Sets a single key at a KV v2 `data/` path, keeping any existing keys.
    async fn put_secret(&self, path: &str, key: &str, value: &str) -> Result<(), VaultError>;

    async fn create_policy(&self, name: &str, policy_hcl: &str) -> Result<(), VaultError>;

    async fn delete_policy(&self, name: &str) -> Result<(), VaultError>;

    /// Creates an AppRole role bound to `policies` and issues its credentials.
    async fn create_role(
        &self,
        name: &str,
        policies: &[String],
    ) -> Result<AppRoleCredentials, VaultError>;

    async fn delete_role(&self, name: &str) -> Result<(), VaultError>;

    async fn enable_kv2(&self, mount: &str) -> Result<(), VaultError>;

    async fn disable_kv(&self, mount: &str) -> Result<(), VaultError>;

    /// Revokes the store's own token.
    async fn logout(&self) -> Result<(), VaultError>;
}

/// Resolves managed systems in the fleet manager.
#[async_trait]
pub trait SystemResolver: Send + Sync {
    /// Returns the system id registered for `hostname`.
    async fn resolve_id(&self, hostname: &str) -> Result<i64, SumaError>;

    /// Returns the primary IP address recorded for system `id`.
    async fn resolve_ip(&self, id: i64) -> Result<String, SumaError>;
}

/// Decides whether an address lies inside a permitted network.
pub trait NetworkChecker: Send + Sync {
    fn is_in_network(&self, ip: &str, network: &str) -> bool;
}

/// Mutating system operations. Each call consumes the authorization it acts on.
#[async_trait]
pub trait GroupMutator: Send + Sync {
    /// Adds the authorized system to `group`, returning the HTTP status.
    async fn add_to_group(&self, group: &str, system: AuthorizedSystem)
        -> Result<u16, SumaError>;

    /// Force-deletes the authorized system's whole record, returning the HTTP status.
    async fn remove_system(&self, system: AuthorizedSystem) -> Result<u16, SumaError>;
}
