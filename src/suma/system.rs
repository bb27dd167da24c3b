//! System lookups: hostname to system id, system id to IP address.

use crate::interface::SystemResolver;
use crate::suma::{SumaError, SumaSession};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// Id reported to operators when a hostname could not be resolved.
pub const UNRESOLVED_SYSTEM_ID: i64 = -1;

/// How to pick a system when a hostname lookup returns several matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MatchPolicy {
    /// Keep the last match returned by SUSE Manager.
    #[default]
    Last,
    /// Keep the first match.
    First,
    /// Refuse to pick when more than one system matches.
    Unique,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SystemRecord {
    pub id: i64,
    #[serde(default, rename = "name")]
    pub hostname: String,
}

#[derive(Debug, Deserialize)]
struct GetIdResponse {
    success: Option<bool>,
    #[serde(default)]
    result: Vec<SystemRecord>,
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NetworkResult {
    #[serde(default)]
    ip: String,
    #[serde(default)]
    hostname: String,
}

#[derive(Debug, Deserialize)]
struct GetNetworkResponse {
    success: Option<bool>,
    result: Option<NetworkResult>,
    message: Option<String>,
}

fn reported_failure(method: &str, success: Option<bool>, message: Option<String>) -> Result<(), SumaError> {
    if success == Some(false) {
        return Err(SumaError::Protocol(format!(
            "{} reported failure: {}",
            method,
            message.unwrap_or_else(|| "no message".to_string())
        )));
    }
    Ok(())
}

/// Applies `policy` to the records returned for `hostname`.
pub fn pick_match(
    records: Vec<SystemRecord>,
    policy: MatchPolicy,
    hostname: &str,
) -> Result<SystemRecord, SumaError> {
    if records.len() > 1 {
        warn!(
            "{} systems match hostname {}, applying {:?} policy",
            records.len(),
            hostname,
            policy
        );
    }
    let count = records.len();
    let picked = match policy {
        MatchPolicy::Last => records.into_iter().last(),
        MatchPolicy::First => records.into_iter().next(),
        MatchPolicy::Unique if count > 1 => {
            return Err(SumaError::Protocol(format!(
                "hostname {} matches {} systems",
                hostname, count
            )))
        }
        MatchPolicy::Unique => records.into_iter().next(),
    };
    // an id of 0 or below means no system
    picked.filter(|r| r.id > 0).ok_or_else(|| {
        SumaError::NotFound(format!(
            "host {} not found in SUSE Manager (system id {})",
            hostname, UNRESOLVED_SYSTEM_ID
        ))
    })
}

impl SumaSession {
    /// Looks up the system record registered under exactly `hostname`.
    pub async fn lookup_system(&self, hostname: &str) -> Result<SystemRecord, SumaError> {
        let rsp: GetIdResponse = self
            .client
            .get_json(&self.session, "system/getId", &[("name", hostname.to_string())])
            .await?;
        reported_failure("system/getId", rsp.success, rsp.message)?;

        let record = pick_match(rsp.result, self.match_policy, hostname)?;
        debug!("Found system id {} for {}", record.id, hostname);
        Ok(record)
    }
}

#[async_trait]
impl SystemResolver for SumaSession {
    async fn resolve_id(&self, hostname: &str) -> Result<i64, SumaError> {
        self.lookup_system(hostname).await.map(|record| record.id)
    }

    async fn resolve_ip(&self, id: i64) -> Result<String, SumaError> {
        let rsp: GetNetworkResponse = self
            .client
            .get_json(&self.session, "system/getNetwork", &[("sid", id.to_string())])
            .await?;
        reported_failure("system/getNetwork", rsp.success, rsp.message)?;

        let network = rsp.result.unwrap_or_default();
        if network.ip.is_empty() {
            return Err(SumaError::NotFound(format!(
                "no IP recorded for system id {} in SUSE Manager",
                id
            )));
        }
        debug!("Found IP {} ({}) for system id {}", network.ip, network.hostname, id);
        Ok(network.ip)
    }
}
