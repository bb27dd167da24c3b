//! HTTP settings shared by the Vault and SUSE Manager clients.

use reqwest::ClientBuilder;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpOptions {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Accept invalid TLS certificates (self-signed lab setups).
    pub insecure: bool,
}

impl HttpOptions {
    pub fn new(timeout_secs: u64, insecure: bool) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            insecure,
        }
    }

    pub(crate) fn client_builder(&self) -> ClientBuilder {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(self.insecure)
    }
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECS, false)
    }
}
