//! Vault module
//!
//! Implements the secret store side of provisioning: AppRole login and logout,
//! KV v2 reads and writes, ACL policies and AppRole roles.
//!
//! ## Testing strategy:
//! - Each module contains its own unit tests within a `#[cfg(test)] mod tests` block
//! - Vault endpoints are mocked with `wiremock`
//! - Integration tests in the `tests/` directory drive whole CLI runs

pub mod auth;
pub mod client;
pub mod error;
pub mod kv;
pub mod policy;
pub mod store;

pub use client::VaultClient;
pub use error::VaultError;
pub use store::VaultStore;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials for AppRole authentication.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct AppRoleCredentials {
    /// The role_id for AppRole authentication.
    pub role_id: String,
    /// The secret_id for AppRole authentication.
    pub secret_id: String,
}

impl fmt::Debug for AppRoleCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppRoleCredentials")
            .field("role_id", &self.role_id)
            .field("secret_id", &"*******")
            .finish()
    }
}

/// Where and how to log into Vault.
#[derive(Clone, PartialEq)]
pub struct VaultLogin {
    /// Vault API URL, e.g., "https://vault.example.com:8200".
    pub addr: String,
    pub role_id: String,
    pub secret_id: String,
}

impl fmt::Debug for VaultLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultLogin")
            .field("addr", &self.addr)
            .field("role_id", &self.role_id)
            .field("secret_id", &"*******")
            .finish()
    }
}
