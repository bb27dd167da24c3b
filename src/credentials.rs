//! Reads SUSE Manager credentials and per-group configuration from the secret store.
//!
//! Layout, with the default prefix `kv-clab-`:
//!
//! - `kv-clab-<credentials group>/data/suma`: `login`, `password` and optionally `url`
//! - `kv-clab-<group>/data/config`: `network`
//! - `kv-clab-<group>/data/approle_output`: `role_id`, `secret_id` of the group's AppRole

use crate::error::ProvisionError;
use crate::interface::SecretStore;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

pub const DEFAULT_KV_PREFIX: &str = "kv-clab-";
pub const DEFAULT_CREDENTIALS_GROUP: &str = "dagobah";

#[derive(Clone, PartialEq)]
pub struct FleetCredentials {
    pub url: Option<String>,
    pub login: String,
    pub password: String,
}

impl fmt::Debug for FleetCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FleetCredentials")
            .field("url", &self.url)
            .field("login", &self.login)
            .field("password", &"*******")
            .finish()
    }
}

/// The KV paths belonging to one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvLayout {
    prefix: String,
}

impl KvLayout {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    pub fn mount(&self, group: &str) -> String {
        format!("{}{}", self.prefix, group)
    }

    pub fn credentials_path(&self, group: &str) -> String {
        format!("{}/data/suma", self.mount(group))
    }

    pub fn config_path(&self, group: &str) -> String {
        format!("{}/data/config", self.mount(group))
    }

    pub fn approle_output_path(&self, group: &str) -> String {
        format!("{}/data/approle_output", self.mount(group))
    }
}

impl Default for KvLayout {
    fn default() -> Self {
        Self::new(DEFAULT_KV_PREFIX)
    }
}

fn required(
    secret: &mut HashMap<String, String>,
    path: &str,
    key: &str,
) -> Result<String, ProvisionError> {
    secret
        .remove(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ProvisionError::MissingSecret {
            path: path.to_string(),
            key: key.to_string(),
        })
}

pub struct CredentialBroker<'a, S: ?Sized> {
    store: &'a S,
    layout: &'a KvLayout,
}

impl<'a, S: SecretStore + ?Sized> CredentialBroker<'a, S> {
    pub fn new(store: &'a S, layout: &'a KvLayout) -> Self {
        Self { store, layout }
    }

    pub async fn fleet_credentials(
        &self,
        credentials_group: &str,
    ) -> Result<FleetCredentials, ProvisionError> {
        let path = self.layout.credentials_path(credentials_group);
        debug!("Reading SUSE Manager credentials from {}", path);
        let mut secret = self.store.get_secret(&path).await?;

        Ok(FleetCredentials {
            login: required(&mut secret, &path, "login")?,
            password: required(&mut secret, &path, "password")?,
            url: secret.remove("url").filter(|v| !v.is_empty()),
        })
    }

    pub async fn permitted_network(&self, group: &str) -> Result<String, ProvisionError> {
        let path = self.layout.config_path(group);
        let mut secret = self.store.get_secret(&path).await?;
        let network = required(&mut secret, &path, "network")?;
        debug!("Permitted network for group {}: {}/24", group, network);
        Ok(network)
    }
}
