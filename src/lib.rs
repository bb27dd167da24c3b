//! suma-register - host and user provisioning for SUSE Manager backed by Vault
//!
//! Two command-line tools share this library:
//!
//! - `register-system` adds a system to a SUSE Manager system group, or deletes it,
//!   after checking that its IP lies in the group's permitted /24 network.
//! - `register-user` creates or removes a group's Vault policy, AppRole, KV mount
//!   and SUSE Manager user.
//!
//! ## Architecture
//!
//! - `cli` module - flag parsing and validation, drives one run
//! - `workflow` module - the provisioning runs, generic over the capability traits
//! - `interface` module - the traits at the seams (`SecretStore`, `SystemResolver`,
//!   `NetworkChecker`, `GroupMutator`)
//! - `vault` module - Vault HTTP client and its `SecretStore` implementation
//! - `suma` module - SUSE Manager HTTP client, the membership guard and mutations
//! - `credentials` module - the KV layout and the credential broker

pub mod cli;
pub mod credentials;
pub mod error;
pub mod http;

// Interface module is available to all other modules
pub mod interface;

pub mod suma;
pub mod task;
pub mod vault;
pub mod workflow;

pub use error::ProvisionError;
pub use task::Task;

use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber used by both binaries. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,suma_register={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initialize logging for tests
#[cfg(test)]
pub(crate) fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer() // This ensures output goes to both stdout and test output
        .try_init();
}
